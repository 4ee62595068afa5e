use serde::{Deserialize, Serialize};

/// A product with its current stock level.
///
/// `name` is the unique key within a forecast run; duplicate entries sharing
/// a name have their stock summed by the forecast service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub stock: u32,
}

/// Per-product forecast result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForecast {
    pub name: String,
    pub stock: u32,
    /// Average units sold per day over the observed sales window, 2 decimals.
    pub avg_daily_sales: f64,
    /// Estimated days of stock remaining, 1 decimal. `None` (wire `null`)
    /// when there is no sales history to divide by.
    pub forecast_days_left: Option<f64>,
}
