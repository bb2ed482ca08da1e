use std::sync::Arc;

use axum::{
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    Json,
};

use logbook_products::{NewProduct, Product};

use crate::app::dto::{CreateProductRequest, ProductCreatedResponse};
use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductCreatedResponse>), ApiError> {
    let Json(body) = body?;
    let product = NewProduct::from_input(body.title, body.description, &body.categories)?;

    let product = services
        .add_product(product)
        .await
        .map_err(|e| errors::service_error_with_details(e, "Failed to add product"))?;

    Ok((
        StatusCode::CREATED,
        Json(ProductCreatedResponse {
            message: "Product added successfully",
            product,
        }),
    ))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = services
        .list_products()
        .await
        .map_err(|e| errors::service_error_with_details(e, "Failed to fetch products"))?;
    Ok(Json(products))
}
