//! # linkup-entity
//!
//! Document shapes shared by the account collaborator and the real-time
//! broadcast hooks. Field names follow the JSON documents clients already
//! consume (`camelCase`, `_id`).

pub mod account;
pub mod post;
pub mod story;

pub use account::Account;
pub use post::{Comment, Post};
pub use story::Story;
