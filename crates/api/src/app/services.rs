//! Application services: the credential lifecycle, the log register and the
//! product pass-through, wired to whichever stores were built at startup.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use logbook_auth::{BcryptHasher, Hs256Tokens, PasswordHash, PasswordHasher, TokenIssuer, TokenVerifier};
use logbook_core::Username;
use logbook_infra::{
    AppConfig, Credential, CredentialStore, CredentialStoreError, InMemoryCredentialStore,
    InMemoryLogRegister, InMemoryProductRepository, LogEntry, LogRegister, LogRegisterError,
    ProductRepository,
};
use logbook_products::{NewProduct, Product};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("user not found")]
    UserNotFound,

    #[error("invalid password")]
    InvalidPassword,

    #[error("user already exists: {0}")]
    DuplicateUser(Username),

    #[error("no log entries")]
    NoLogs,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Token(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<CredentialStoreError> for ServiceError {
    fn from(err: CredentialStoreError) -> Self {
        match err {
            CredentialStoreError::DuplicateUser(u) => ServiceError::DuplicateUser(u),
            CredentialStoreError::UserNotFound(_) => ServiceError::UserNotFound,
            CredentialStoreError::Storage(msg) => ServiceError::Storage(msg),
        }
    }
}

/// Everything the handlers need, shared behind an `Arc`.
pub struct AppServices {
    credentials: Arc<dyn CredentialStore>,
    logs: Arc<dyn LogRegister>,
    products: Arc<dyn ProductRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
}

impl AppServices {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        logs: Arc<dyn LogRegister>,
        products: Arc<dyn ProductRepository>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            credentials,
            logs,
            products,
            hasher,
            issuer,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Credential lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn register(&self, username: Username, password: String) -> Result<Credential, ServiceError> {
        let digest = self.hash(password).await?;
        let credential = self.credentials.register(username, digest)?;
        tracing::info!(username = %credential.username, "user registered");
        Ok(credential)
    }

    /// Check the password and hand out a session token.
    pub async fn login(&self, username: &Username, password: String) -> Result<String, ServiceError> {
        let credential = self.credentials.find_by_username(username)?;

        let hasher = self.hasher.clone();
        let digest = credential.password_hash;
        let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| ServiceError::Hashing(e.to_string()))?;
        if !valid {
            tracing::info!(%username, "login rejected: invalid password");
            return Err(ServiceError::InvalidPassword);
        }

        let token = self
            .issuer
            .issue(username, Utc::now())
            .map_err(|e| ServiceError::Token(e.to_string()))?;
        tracing::info!(%username, "user logged in");
        Ok(token)
    }

    /// Replace the password of an existing account.
    pub async fn reset_password(&self, username: &Username, new_password: String) -> Result<(), ServiceError> {
        // Unknown users are rejected before paying for a hash.
        self.credentials.find_by_username(username)?;

        let digest = self.hash(new_password).await?;
        self.credentials.update_password(username, digest)?;
        tracing::info!(%username, "password reset");
        Ok(())
    }

    async fn hash(&self, plaintext: String) -> Result<PasswordHash, ServiceError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| ServiceError::Hashing(e.to_string()))?
            .map_err(|e| ServiceError::Hashing(e.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Log register
    // ─────────────────────────────────────────────────────────────────────────

    pub fn append_log(&self, username: Username, message: String, level: String) -> LogEntry {
        let entry = self
            .logs
            .append(LogEntry::new(username, message, level, Utc::now()));
        tracing::info!(user = %entry.username, level = %entry.level, "log entry appended");
        entry
    }

    pub fn list_logs(&self) -> Result<Vec<LogEntry>, ServiceError> {
        self.logs.list_all().map_err(|e| match e {
            LogRegisterError::Empty => ServiceError::NoLogs,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Products
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn add_product(&self, product: NewProduct) -> Result<Product, ServiceError> {
        let product = self
            .products
            .insert(product)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        tracing::info!(product_id = %product.id, title = %product.title, "product saved");
        Ok(product)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        self.products
            .list()
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }
}

/// Services plus the verifier the auth gate needs.
pub struct Wiring {
    pub services: AppServices,
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Build the services described by `config`.
///
/// Credentials and logs always live in memory. Products go to Postgres when the
/// `postgres` feature is enabled and `DATABASE_URL` is set.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<Wiring> {
    let hasher = Arc::new(BcryptHasher::new(config.bcrypt_cost)?);

    let mut tokens = Hs256Tokens::new(config.jwt_secret());
    if let Some(ttl) = config.token_ttl() {
        tokens = tokens.with_ttl(ttl);
    }
    let tokens = Arc::new(tokens);

    let services = AppServices::new(
        Arc::new(InMemoryCredentialStore::new()),
        Arc::new(InMemoryLogRegister::new()),
        build_product_repository(config).await?,
        hasher,
        tokens.clone(),
    );

    Ok(Wiring {
        services,
        verifier: tokens,
    })
}

#[cfg(feature = "postgres")]
async fn build_product_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn ProductRepository>> {
    match config.database_url.as_deref() {
        Some(url) => {
            let repo = logbook_infra::products::PostgresProductRepository::connect(url).await?;
            tracing::info!("products stored in postgres");
            Ok(Arc::new(repo))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; products kept in memory");
            Ok(Arc::new(InMemoryProductRepository::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_product_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn ProductRepository>> {
    if config.database_url.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the `postgres` feature");
    }
    Ok(Arc::new(InMemoryProductRepository::new()))
}
