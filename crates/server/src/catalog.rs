use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use fatoura_core::domain::client::{Client, ClientId, NewClient};
use fatoura_core::domain::product::{Product, ProductId};
use fatoura_core::errors::ApplicationError;
use fatoura_core::invoicing::standard_tax_rate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::error::{correlation_id, read_json, ApiError};
use crate::state::AppState;

#[derive(Clone, Debug, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: Decimal,
    #[serde(default)]
    pub stock_quantity: Decimal,
    #[serde(default = "standard_tax_rate")]
    pub tax_rate_percent: Decimal,
}

impl NewProduct {
    fn into_product(self, id: ProductId, currency: &str) -> Result<Product, ApplicationError> {
        if self.stock_quantity < Decimal::ZERO {
            return Err(ApplicationError::InvalidRequest(
                "stock_quantity must not be negative".to_string(),
            ));
        }
        let product = Product {
            id,
            name: self.name.trim().to_string(),
            description: self
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            unit_price: self.unit_price,
            currency: currency.to_string(),
            stock_quantity: self.stock_quantity,
            tax_rate_percent: self.tax_rate_percent,
        };
        product.validate()?;
        Ok(product)
    }
}

pub async fn create_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NewClient>, JsonRejection>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let correlation_id = correlation_id(&headers);
    let new_client = read_json(payload, &correlation_id)?;

    let client = new_client
        .into_client(ClientId::generate())
        .map_err(|error| ApiError::new(error, &correlation_id))?;
    state
        .clients
        .save(client.clone())
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;

    info!(
        event_name = "api.client.created",
        correlation_id = %correlation_id,
        client_id = %client.id.0,
        "client created"
    );
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list_clients(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Client>>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let clients =
        state.clients.list().await.map_err(|error| ApiError::new(error, &correlation_id))?;
    Ok(Json(clients))
}

pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let correlation_id = correlation_id(&headers);
    let new_product = read_json(payload, &correlation_id)?;

    let product = new_product
        .into_product(ProductId::generate(), &state.currency)
        .map_err(|error| ApiError::new(error, &correlation_id))?;
    state
        .products
        .save(product.clone())
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;

    info!(
        event_name = "api.product.created",
        correlation_id = %correlation_id,
        product_id = %product.id.0,
        "product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Product>>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let products =
        state.products.list().await.map_err(|error| ApiError::new(error, &correlation_id))?;
    Ok(Json(products))
}

#[cfg(test)]
mod tests {
    use fatoura_core::domain::product::ProductId;
    use fatoura_core::errors::ApplicationError;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::NewProduct;

    #[test]
    fn new_product_defaults_rate_and_stock() {
        let new_product: NewProduct =
            serde_json::from_value(json!({ "name": " Ramette A4 ", "unit_price": 12.5 }))
                .expect("new product");

        let product =
            new_product.into_product(ProductId("P-1".to_string()), "TND").expect("product");

        assert_eq!(product.name, "Ramette A4");
        assert_eq!(product.unit_price, Decimal::new(125, 1));
        assert_eq!(product.stock_quantity, Decimal::ZERO);
        assert_eq!(product.tax_rate_percent, Decimal::from(19));
        assert_eq!(product.currency, "TND");
    }

    #[test]
    fn negative_stock_is_rejected() {
        let new_product: NewProduct = serde_json::from_value(
            json!({ "name": "Toner", "unit_price": "80", "stock_quantity": "-1" }),
        )
        .expect("new product");

        let error = new_product
            .into_product(ProductId("P-2".to_string()), "TND")
            .expect_err("negative stock");

        assert!(matches!(error, ApplicationError::InvalidRequest(_)));
    }
}
