//! Infrastructure layer: stores, repositories, configuration.

pub mod config;
pub mod credentials;
pub mod logs;
pub mod products;

pub use config::{AppConfig, ConfigError};
pub use credentials::{Credential, CredentialStore, CredentialStoreError, InMemoryCredentialStore};
pub use logs::{InMemoryLogRegister, LogEntry, LogRegister, LogRegisterError};
pub use products::{InMemoryProductRepository, ProductRepository, ProductRepositoryError};
