//! Product persistence: a pass-through to a document collection.

mod in_memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use in_memory::InMemoryProductRepository;
#[cfg(feature = "postgres")]
pub use postgres::PostgresProductRepository;

use std::sync::Arc;

use logbook_products::{NewProduct, Product};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductRepositoryError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Product repository abstraction.
#[async_trait::async_trait]
pub trait ProductRepository: Send + Sync {
    /// Store a product, assigning its id and creation time.
    async fn insert(&self, product: NewProduct) -> Result<Product, ProductRepositoryError>;

    /// All stored products, oldest first.
    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError>;
}

#[async_trait::async_trait]
impl<S> ProductRepository for Arc<S>
where
    S: ProductRepository + ?Sized,
{
    async fn insert(&self, product: NewProduct) -> Result<Product, ProductRepositoryError> {
        (**self).insert(product).await
    }

    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        (**self).list().await
    }
}
