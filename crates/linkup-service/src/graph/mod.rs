//! Follow and block relationships.

pub mod service;

pub use service::SocialGraphService;
