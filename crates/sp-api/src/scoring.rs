//! Staff scoring service — pure ranking formula, plus the per-staff
//! aggregation of raw bills into scoring counters.

use sp_protocol::{Bill, ScoredStaff, StaffCounters, StaffMember};

use crate::forecast::round2;

/// Score and rank staff rows, descending by score. The sort is stable, so
/// equal scores keep their input order.
///
/// Weights: each bill handled is worth 0.5, each currency unit processed
/// 0.0001, and each discount percentage point costs 0.2.
pub fn evaluate_scores(rows: Vec<StaffCounters>) -> Vec<ScoredStaff> {
    let mut scored: Vec<ScoredStaff> = rows
        .into_iter()
        .map(|row| {
            let score = row.bills_handled as f64 * 0.5 + row.total_processed * 0.0001
                - row.avg_discount * 0.2;
            ScoredStaff {
                staff_id: row.staff_id,
                staff_name: row.staff_name,
                bills_handled: row.bills_handled,
                total_processed: row.total_processed,
                avg_discount: round2(row.avg_discount),
                score: round2(score),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Aggregate one staff member's counters from the raw bill log.
///
/// Returns `None` when the member handled no bills at all. The average
/// discount is taken over every line item on their bills, with missing
/// discounts counted as zero.
pub fn aggregate_staff_counters(staff: &StaffMember, bills: &[Bill]) -> Option<StaffCounters> {
    let mine: Vec<&Bill> = bills
        .iter()
        .filter(|b| b.staff_id.as_deref() == Some(staff.id.as_str()))
        .collect();
    if mine.is_empty() {
        return None;
    }

    let bills_handled = mine.len() as u64;
    let total_processed: f64 = mine.iter().map(|b| b.total).sum();

    let mut item_count = 0u64;
    let mut discount_sum = 0.0;
    for bill in &mine {
        for item in &bill.items {
            item_count += 1;
            discount_sum += item.discount.unwrap_or(0.0);
        }
    }
    let avg_discount = if item_count > 0 {
        discount_sum / item_count as f64
    } else {
        0.0
    };

    Some(StaffCounters {
        staff_id: staff.id.clone(),
        staff_name: staff.name.clone(),
        bills_handled,
        total_processed,
        avg_discount: round2(avg_discount),
    })
}
