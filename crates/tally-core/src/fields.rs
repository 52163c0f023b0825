//! Field resolution for schema-less rows
//!
//! Uploaded tables do not agree on column names. Each logical field is looked
//! up through an ordered list of candidate keys, falling back to a fixed
//! default when none of them holds a usable value.

use serde_json::{Map, Value};

use crate::coerce::coerce_amount;
use crate::models::UNCATEGORIZED;
use crate::money::Money;

/// One row of an uploaded table: column name to cell value
pub type AdHocRow = Map<String, Value>;

/// Candidate keys for the amount column, tried in order
pub const AMOUNT_KEYS: &[&str] = &["amount", "Amount"];

/// Candidate keys for the category column, tried in order
pub const CATEGORY_KEYS: &[&str] = &["category", "Category"];

/// First candidate whose value is not null
///
/// An empty string counts as present here; it coerces to zero later rather
/// than falling through to the next key.
pub fn first_non_null<'a>(row: &'a AdHocRow, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .find(|value| !value.is_null())
}

/// First candidate whose value is usable as a label
pub fn first_truthy<'a>(row: &'a AdHocRow, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .find(|value| is_truthy(value))
}

/// Resolve and coerce the row's amount; missing or garbled amounts are 0
pub fn resolve_amount(row: &AdHocRow) -> Money {
    first_non_null(row, AMOUNT_KEYS)
        .map(coerce_amount)
        .unwrap_or(Money::ZERO)
}

/// Resolve the row's category label, defaulting to [`UNCATEGORIZED`]
///
/// The label is used verbatim: no trimming or case folding.
pub fn resolve_category(row: &AdHocRow) -> String {
    first_truthy(row, CATEGORY_KEYS)
        .map(label_text)
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

/// Null, false, zero and the empty string carry no label
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
