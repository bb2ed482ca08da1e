use std::sync::RwLock;

use chrono::Utc;

use logbook_core::ProductId;
use logbook_products::{NewProduct, Product};

use super::{ProductRepository, ProductRepositoryError};

/// In-memory product collection for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: NewProduct) -> Result<Product, ProductRepositoryError> {
        let product = product.into_product(ProductId::new(), Utc::now());
        self.products
            .write()
            .map_err(|_| ProductRepositoryError::Storage("lock poisoned".to_string()))?
            .push(product.clone());
        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let products = self
            .products
            .read()
            .map_err(|_| ProductRepositoryError::Storage("lock poisoned".to_string()))?;
        Ok(products.clone())
    }
}
