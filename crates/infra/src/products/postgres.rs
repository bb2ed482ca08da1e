//! Postgres-backed product repository.
//!
//! Expects an existing table:
//!
//! ```sql
//! CREATE TABLE products (
//!     id          uuid PRIMARY KEY,
//!     title       text NOT NULL,
//!     description text NOT NULL,
//!     categories  text[] NOT NULL,
//!     created_at  timestamptz NOT NULL
//! );
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use logbook_core::ProductId;
use logbook_products::{NewProduct, Product};

use super::{ProductRepository, ProductRepositoryError};

/// Products stored in PostgreSQL.
///
/// `Send + Sync`; the SQLx pool handles connection sharing.
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: Arc<PgPool>,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, ProductRepositoryError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> ProductRepositoryError {
    match err {
        sqlx::Error::Database(db_err) => ProductRepositoryError::Storage(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        other => ProductRepositoryError::Storage(format!("{operation}: {other}")),
    }
}

#[async_trait::async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self, product), fields(title = %product.title))]
    async fn insert(&self, product: NewProduct) -> Result<Product, ProductRepositoryError> {
        let product = product.into_product(ProductId::new(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO products (id, title, description, categories, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.categories)
        .bind(product.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, categories, created_at
            FROM products
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.into_iter()
            .map(|row| -> Result<Product, ProductRepositoryError> {
                let decode = |e| map_sqlx_error("decode_product", e);
                Ok(Product {
                    id: ProductId::from_uuid(row.try_get::<uuid::Uuid, _>("id").map_err(decode)?),
                    title: row.try_get("title").map_err(decode)?,
                    description: row.try_get("description").map_err(decode)?,
                    categories: row.try_get::<Vec<String>, _>("categories").map_err(decode)?,
                    created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(decode)?,
                })
            })
            .collect()
    }
}
