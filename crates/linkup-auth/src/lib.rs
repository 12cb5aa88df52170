//! # linkup-auth
//!
//! Credential handling for Linkup.
//!
//! - `jwt`: HS256 token issuance and verification; the verified `sub`
//!   claim is the caller's [`Identity`](linkup_core::Identity).

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
