//! Entity provider — the data source the dispatcher queries on demand.
//!
//! Staff, products, and the raw bill log are read fresh on every dispatch
//! call; the core imposes no caching contract on the provider.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use sp_protocol::{Bill, BillItem, Product, StaffMember};

/// Supplies the current entity lists and transaction log.
#[async_trait]
pub trait EntityProvider: Send + Sync {
    async fn staff(&self) -> anyhow::Result<Vec<StaffMember>>;
    async fn products(&self) -> anyhow::Result<Vec<Product>>;
    async fn bills(&self) -> anyhow::Result<Vec<Bill>>;
}

/// In-memory provider over `RwLock`-guarded lists (development and tests).
pub struct MemoryProvider {
    staff: Arc<RwLock<Vec<StaffMember>>>,
    products: Arc<RwLock<Vec<Product>>>,
    bills: Arc<RwLock<Vec<Bill>>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            staff: Arc::new(RwLock::new(Vec::new())),
            products: Arc::new(RwLock::new(Vec::new())),
            bills: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Provider pre-loaded with a small shop: four staff members, three
    /// products, and a ten-day bill history.
    pub fn with_sample_data() -> Self {
        let staff = vec![
            staff_member("st-1", "acct-alice", "Alice Morgan"),
            staff_member("st-2", "acct-rahul", "Rahul Mehta"),
            staff_member("st-3", "acct-priya", "Priya Shah"),
            staff_member("st-4", "acct-dev", "Dev Patel"),
        ];

        let products = vec![
            product("Widget", 100),
            product("Gadget", 40),
            product("Doohickey", 25),
        ];

        // Widget sells 50 units over 2026-08-01..2026-08-10 (10 calendar
        // days): average 5.0/day, 20.0 days of stock left. Doohickey never
        // sells.
        let bills = vec![
            bill(
                "2026-08-01",
                "st-1",
                1000.0,
                vec![item("Widget", 10, Some(5.0)), item("Gadget", 2, None)],
            ),
            bill("2026-08-03", "st-3", 1200.0, vec![item("Widget", 10, None)]),
            bill(
                "2026-08-05",
                "st-3",
                800.0,
                vec![item("Widget", 10, Some(10.0))],
            ),
            bill("2026-08-08", "st-2", 600.0, vec![item("Widget", 10, None)]),
            bill("2026-08-10", "st-3", 400.0, vec![item("Widget", 10, None)]),
        ];

        Self {
            staff: Arc::new(RwLock::new(staff)),
            products: Arc::new(RwLock::new(products)),
            bills: Arc::new(RwLock::new(bills)),
        }
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityProvider for MemoryProvider {
    async fn staff(&self) -> anyhow::Result<Vec<StaffMember>> {
        Ok(self.staff.read().await.clone())
    }

    async fn products(&self) -> anyhow::Result<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn bills(&self) -> anyhow::Result<Vec<Bill>> {
        Ok(self.bills.read().await.clone())
    }
}

fn staff_member(id: &str, owner_ref: &str, name: &str) -> StaffMember {
    StaffMember {
        id: id.into(),
        owner_ref: owner_ref.into(),
        name: name.into(),
    }
}

fn product(name: &str, stock: u32) -> Product {
    Product {
        name: name.into(),
        stock,
    }
}

fn bill(date: &str, staff_id: &str, total: f64, items: Vec<BillItem>) -> Bill {
    Bill {
        date: date.parse::<NaiveDate>().expect("sample date"),
        staff_id: Some(staff_id.into()),
        total,
        items,
    }
}

fn item(name: &str, qty: u32, discount: Option<f64>) -> BillItem {
    BillItem {
        name: name.into(),
        qty,
        discount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_data_is_consistent() {
        let provider = MemoryProvider::with_sample_data();
        let staff = provider.staff().await.unwrap();
        let products = provider.products().await.unwrap();
        let bills = provider.bills().await.unwrap();

        assert_eq!(staff.len(), 4);
        assert_eq!(products.len(), 3);
        assert_eq!(bills.len(), 5);

        // Every bill's staff_id points at a known staff member.
        for b in &bills {
            let sid = b.staff_id.as_deref().unwrap();
            assert!(staff.iter().any(|s| s.id == sid), "unknown staff {sid}");
        }
    }
}
