use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logbook_core::{DomainError, Entity, ProductId};

/// Split a comma-separated category list.
///
/// Each part is trimmed; empty parts are dropped; order is preserved.
pub fn parse_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// A product that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
}

impl NewProduct {
    /// Build from raw request fields. `categories` is the comma-separated form.
    pub fn from_input(
        title: impl Into<String>,
        description: impl Into<String>,
        categories: &str,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }

        Ok(Self {
            title,
            description: description.into(),
            categories: parse_categories(categories),
        })
    }

    /// Assign identity and creation time.
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            categories: self.categories,
            created_at,
        }
    }
}

/// A stored product document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
