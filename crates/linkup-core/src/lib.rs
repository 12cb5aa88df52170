//! # linkup-core
//!
//! Core crate for Linkup. Contains configuration schemas, the `Identity`
//! type used to address connected users, social domain events, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Linkup crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
pub use types::Identity;
