use serde::{Deserialize, Serialize};

/// A staff member as known to the entity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    /// Stable external identifier (database-assigned).
    pub id: String,
    /// Identifier of the underlying account, used for access control.
    /// Distinct from `id`.
    pub owner_ref: String,
    /// Display name; matching against it is case-insensitive.
    pub name: String,
}

/// Aggregated per-staff counters, the input to scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffCounters {
    pub staff_id: String,
    pub staff_name: String,
    pub bills_handled: u64,
    pub total_processed: f64,
    pub avg_discount: f64,
}

/// A scored staff row, the output of the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredStaff {
    pub staff_id: String,
    pub staff_name: String,
    pub bills_handled: u64,
    pub total_processed: f64,
    pub avg_discount: f64,
    pub score: f64,
}
