use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single line on a bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItem {
    pub name: String,
    #[serde(default = "default_qty")]
    pub qty: u32,
    /// Discount percentage applied to this line, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
}

fn default_qty() -> u32 {
    1
}

/// A raw transaction record from the entity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    /// Calendar day of the sale.
    pub date: NaiveDate,
    /// Staff member who handled the bill (absent on forecast-only input).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    /// Bill total in currency units.
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub items: Vec<BillItem>,
}
