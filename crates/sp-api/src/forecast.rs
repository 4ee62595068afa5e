//! Inventory forecast service — pure days-of-stock arithmetic.
//!
//! Given products and the bill log, estimates how many days the current
//! stock of each product will last at the observed average daily sales rate.

use std::collections::HashMap;

use chrono::NaiveDate;

use sp_protocol::{Bill, Product, ProductForecast};

/// Compute a forecast for every distinct product name, in first-seen order.
///
/// Stock is summed across duplicate entries sharing a name. The sales window
/// for a product is `(last sale date - first sale date) + 1` calendar days;
/// a product with no sales history gets `avg_daily_sales = 0` and a `None`
/// forecast rather than an error.
pub fn generate_forecast(products: &[Product], bills: &[Bill]) -> Vec<ProductForecast> {
    let mut sales: HashMap<&str, Vec<(NaiveDate, u32)>> = HashMap::new();
    for bill in bills {
        for item in &bill.items {
            sales
                .entry(item.name.as_str())
                .or_default()
                .push((bill.date, item.qty));
        }
    }

    let mut order: Vec<&str> = Vec::new();
    let mut stock_by_name: HashMap<&str, u32> = HashMap::new();
    for product in products {
        let name = product.name.as_str();
        if !stock_by_name.contains_key(name) {
            order.push(name);
        }
        *stock_by_name.entry(name).or_insert(0) += product.stock;
    }

    order
        .into_iter()
        .map(|name| {
            let stock = stock_by_name[name];
            forecast_one(name, stock, sales.get(name).map(Vec::as_slice))
        })
        .collect()
}

fn forecast_one(name: &str, stock: u32, sales: Option<&[(NaiveDate, u32)]>) -> ProductForecast {
    let window = sales.and_then(|s| {
        let first = s.iter().map(|(d, _)| *d).min()?;
        let last = s.iter().map(|(d, _)| *d).max()?;
        let total: u64 = s.iter().map(|(_, qty)| u64::from(*qty)).sum();
        Some((total, (last - first).num_days() + 1))
    });
    let Some((total, total_days)) = window else {
        return ProductForecast {
            name: name.to_string(),
            stock,
            avg_daily_sales: 0.0,
            forecast_days_left: None,
        };
    };

    // total_days >= 1 by construction; the only zero-average case is a
    // sales history of zero-quantity lines.
    let avg = total as f64 / total_days as f64;
    let forecast_days_left = if avg > 0.0 {
        Some(round1(stock as f64 / avg))
    } else {
        None
    };

    ProductForecast {
        name: name.to_string(),
        stock,
        avg_daily_sales: round2(avg),
        forecast_days_left,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use sp_protocol::BillItem;

    fn bill(date: &str, items: Vec<(&str, u32)>) -> Bill {
        Bill {
            date: date.parse().unwrap(),
            staff_id: None,
            total: 0.0,
            items: items
                .into_iter()
                .map(|(name, qty)| BillItem {
                    name: name.into(),
                    qty,
                    discount: None,
                })
                .collect(),
        }
    }

    fn product(name: &str, stock: u32) -> Product {
        Product {
            name: name.into(),
            stock,
        }
    }

    #[test]
    fn fifty_units_over_ten_days() {
        let products = vec![product("Widget", 100)];
        let bills = vec![
            bill("2026-08-01", vec![("Widget", 20)]),
            bill("2026-08-05", vec![("Widget", 10)]),
            bill("2026-08-10", vec![("Widget", 20)]),
        ];

        let result = generate_forecast(&products, &bills);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].avg_daily_sales, 5.0);
        assert_eq!(result[0].forecast_days_left, Some(20.0));
    }

    #[test]
    fn no_sales_history_yields_null_forecast() {
        let products = vec![product("Doohickey", 25)];
        let bills = vec![bill("2026-08-01", vec![("Widget", 3)])];

        let result = generate_forecast(&products, &bills);
        assert_eq!(result[0].stock, 25);
        assert_eq!(result[0].avg_daily_sales, 0.0);
        assert_eq!(result[0].forecast_days_left, None);
    }

    #[test]
    fn zero_quantity_sales_yield_null_forecast() {
        let products = vec![product("Widget", 10)];
        let bills = vec![bill("2026-08-01", vec![("Widget", 0)])];

        let result = generate_forecast(&products, &bills);
        assert_eq!(result[0].avg_daily_sales, 0.0);
        assert_eq!(result[0].forecast_days_left, None);
    }

    #[test]
    fn duplicate_product_entries_aggregate_stock() {
        let products = vec![
            product("Widget", 60),
            product("Gadget", 5),
            product("Widget", 40),
        ];
        let bills = vec![
            bill("2026-08-01", vec![("Widget", 5)]),
            bill("2026-08-02", vec![("Widget", 5)]),
        ];

        let result = generate_forecast(&products, &bills);
        // First-seen order, one row per distinct name.
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Widget");
        assert_eq!(result[0].stock, 100);
        assert_eq!(result[0].forecast_days_left, Some(20.0));
        assert_eq!(result[1].name, "Gadget");
    }

    #[test]
    fn single_day_window_counts_as_one_day() {
        let products = vec![product("Gadget", 40)];
        let bills = vec![bill("2026-08-01", vec![("Gadget", 2)])];

        let result = generate_forecast(&products, &bills);
        assert_eq!(result[0].avg_daily_sales, 2.0);
        assert_eq!(result[0].forecast_days_left, Some(20.0));
    }

    #[test]
    fn average_rounds_to_two_decimals_days_to_one() {
        // 7 units over 3 days: avg 2.333... -> 2.33; 10 / 2.333... = 4.285... -> 4.3
        let products = vec![product("Widget", 10)];
        let bills = vec![
            bill("2026-08-01", vec![("Widget", 4)]),
            bill("2026-08-03", vec![("Widget", 3)]),
        ];

        let result = generate_forecast(&products, &bills);
        assert_eq!(result[0].avg_daily_sales, 2.33);
        assert_eq!(result[0].forecast_days_left, Some(4.3));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let products = vec![product("Widget", 100), product("Gadget", 40)];
        let bills = vec![
            bill("2026-08-01", vec![("Widget", 20), ("Gadget", 1)]),
            bill("2026-08-10", vec![("Widget", 30)]),
        ];

        let a = generate_forecast(&products, &bills);
        let b = generate_forecast(&products, &bills);
        assert_eq!(a, b);
    }
}
