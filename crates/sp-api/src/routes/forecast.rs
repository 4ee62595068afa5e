//! Inventory forecast endpoint.

use axum::Json;
use serde::Deserialize;

use crate::forecast::generate_forecast;
use sp_protocol::{Bill, Product, ProductForecast};

/// Request body for a forecast run.
#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub bills: Vec<Bill>,
}

/// POST /api/v1/forecast — days-of-stock estimate for the supplied products.
pub async fn forecast(Json(req): Json<ForecastRequest>) -> Json<Vec<ProductForecast>> {
    Json(generate_forecast(&req.products, &req.bills))
}
