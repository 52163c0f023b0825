//! Best-effort numeric coercion for untrusted amounts
//!
//! Uploaded tables and hand-entered values arrive as JSON numbers, strings
//! with stray formatting, nulls or garbage. Everything here degrades to zero
//! instead of failing, so one bad cell can never abort an aggregation.

use serde_json::Value;

use crate::money::{parse_decimal, Money, CENTS_PER_UNIT};

/// Currency symbols tolerated before or after the digits
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Coerce an arbitrary JSON value into an amount
///
/// Numbers are rounded to the cent (values too large to hold become 0).
/// Strings go through [`parse_amount`]. Null, booleans, arrays and objects
/// yield 0.
pub fn coerce_amount(value: &Value) -> Money {
    let amount = match value {
        Value::Number(n) => match n.as_i64() {
            Some(units) => units.checked_mul(CENTS_PER_UNIT).map(Money::from_cents),
            None => n.as_f64().and_then(Money::from_major),
        },
        Value::String(s) => parse_amount(s),
        _ => None,
    };
    amount.unwrap_or(Money::ZERO)
}

/// Parse a loosely formatted amount string
///
/// Accepts surrounding whitespace, one leading sign (also in front of a
/// currency symbol, as in `-$5`), accounting parentheses for negatives
/// (`(12.50)`), one currency symbol on either side and comma thousands
/// separators in well-formed groups (`1,234.50`). Returns `None` for anything
/// else, including empty input and non-finite results.
pub fn parse_amount(s: &str) -> Option<Money> {
    let mut body = s.trim();
    if body.is_empty() {
        return None;
    }

    let (mut negative, rest) = match body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => take_sign(body),
    };
    body = rest;

    if let Some(rest) = body.strip_prefix(CURRENCY_SYMBOLS) {
        body = rest.trim_start();
        if !negative {
            // "$-5"
            let (sign, rest) = take_sign(body);
            negative = sign;
            body = rest;
        }
    }
    if let Some(rest) = body.strip_suffix(CURRENCY_SYMBOLS) {
        body = rest.trim_end();
    }

    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let digits = strip_thousands_separators(body)?;
    let value = parse_decimal(&digits)?;

    Some(if negative { -value } else { value })
}

fn take_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest.trim_start())
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest.trim_start())
    } else {
        (false, s)
    }
}

/// Remove commas from the integer part when they form valid 3-digit groups.
/// "12,5" is rejected rather than silently read as 125.
fn strip_thousands_separators(s: &str) -> Option<String> {
    if !s.contains(',') {
        return Some(s.to_string());
    }

    let (int_part, frac_part) = match s.find('.') {
        Some(idx) => s.split_at(idx),
        None => (s, ""),
    };
    if frac_part.contains(',') {
        return None;
    }

    let mut groups = int_part.split(',');
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 || !first.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut out = first.to_string();
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        out.push_str(group);
    }
    out.push_str(frac_part);
    Some(out)
}
