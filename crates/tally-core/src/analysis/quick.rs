//! Local quick analysis of uploaded tables
//!
//! Best-effort summarizer, not a validator: no row can make it fail.

use serde_json::Value;

use crate::aggregate::{rank_by_magnitude, totals_by_category};
use crate::fields::{resolve_amount, AdHocRow};
use crate::models::QuickAnalysis;
use crate::money::Money;

/// Number of categories kept in `top_categories`
pub const TOP_CATEGORY_LIMIT: usize = 8;

/// Summarize rows whose amount sign encodes inflow (>= 0) or outflow (< 0)
///
/// Categories are summed on the signed amount, ranked by magnitude and
/// truncated to [`TOP_CATEGORY_LIMIT`].
pub fn quick_analysis(rows: &[AdHocRow]) -> QuickAnalysis {
    let (inflow, outflow) = rows.iter().map(resolve_amount).fold(
        (Money::ZERO, Money::ZERO),
        |(inflow, outflow), amount| {
            if amount.is_negative() {
                (inflow, outflow + amount.abs())
            } else {
                (inflow + amount, outflow)
            }
        },
    );

    QuickAnalysis {
        inflow,
        outflow,
        net: inflow - outflow,
        top_categories: rank_by_magnitude(totals_by_category(rows), TOP_CATEGORY_LIMIT),
    }
}

/// Extract rows from a JSON document
///
/// Accepts either a bare array or an object with a `rows` array. Entries that
/// are not objects become empty rows so they still count (as zero).
pub fn rows_from_json(document: &Value) -> Vec<AdHocRow> {
    let items = match document {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("rows") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return vec![map.clone()],
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .map(|item| item.as_object().cloned().unwrap_or_default())
        .collect()
}
