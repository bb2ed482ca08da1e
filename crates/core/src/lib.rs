//! `logbook-core`: domain building blocks shared by every other crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod username;

pub use entity::Entity;
pub use error::DomainError;
pub use id::ProductId;
pub use username::Username;
