//! Fixed-point money amounts
//!
//! Amounts are held as signed integer cents, so sums are exact and do not
//! depend on the order records are added in. Floats and text are converted
//! once at the edge, rounding half away from zero to the nearest cent.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minor units per major unit
pub const CENTS_PER_UNIT: i64 = 100;

/// Number of fractional digits kept
const SCALE: i64 = 2;

/// An amount in minor units (cents). Never float.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whole units, e.g. `Money::from_units(12)` is 12.00
    pub const fn from_units(units: i64) -> Self {
        Self(units * CENTS_PER_UNIT)
    }

    /// Round a float to the nearest cent
    ///
    /// Goes through the float's shortest decimal rendering, so `0.145` rounds
    /// to 15 cents like the literal it was written as. `None` for NaN,
    /// infinities and values too large to hold.
    pub fn from_major(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        parse_decimal(&value.to_string())
    }

    /// Nearest float in major units, for JSON output and percentages
    pub fn to_major(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Parse a plain decimal (`12`, `-0.5`, `.25`, `1e3`) into cents
///
/// Integer math only: the digits are shifted by the exponent and rounded on
/// the first dropped digit. Anything else, including commas or currency
/// symbols, is rejected.
pub(crate) fn parse_decimal(s: &str) -> Option<Money> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(idx) => (&body[..idx], body[idx + 1..].parse::<i32>().ok()?),
        None => (body, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    // Position in the digit string just past the cents digit
    let digits: Vec<i64> = whole
        .bytes()
        .chain(fraction.bytes())
        .map(|b| i64::from(b - b'0'))
        .collect();
    let len = i64::try_from(digits.len()).ok()?;
    let cut = i64::try_from(whole.len()).ok()? + i64::from(exponent) + SCALE;

    let mut cents: i64 = 0;
    for (i, &digit) in (0_i64..).zip(digits.iter()) {
        if i < cut {
            cents = cents.checked_mul(10)?.checked_add(digit)?;
        } else {
            if i == cut && digit >= 5 {
                cents = cents.checked_add(1)?;
            }
            break;
        }
    }
    if cut > len {
        let shift = u32::try_from(cut - len).ok()?;
        cents = cents.checked_mul(10_i64.checked_pow(shift)?)?;
    }

    Some(Money(if negative { -cents } else { cents }))
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        let unit = CENTS_PER_UNIT.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / unit, abs % unit)
    }
}

/// Accepts the same loose formats as uploaded cells (`$1,234.50`, `(12.00)`)
impl FromStr for Money {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        crate::coerce::parse_amount(s).ok_or_else(|| format!("Invalid amount: {}", s))
    }
}

/// Serialized as a plain JSON number in major units
impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Money::from_major(value)
            .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {}", value)))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Option<Money> {
        Some(Money::from_cents(c))
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12"), cents(1200));
        assert_eq!(parse_decimal("12.5"), cents(1250));
        assert_eq!(parse_decimal("-0.07"), cents(-7));
        assert_eq!(parse_decimal(".25"), cents(25));
        assert_eq!(parse_decimal("3."), cents(300));
        assert_eq!(parse_decimal("+4"), cents(400));
        assert_eq!(parse_decimal("1e3"), cents(100_000));
        assert_eq!(parse_decimal("2.5E-1"), cents(25));
    }

    #[test]
    fn test_parse_decimal_rounds_half_away_from_zero() {
        assert_eq!(parse_decimal("0.145"), cents(15));
        assert_eq!(parse_decimal("0.144999"), cents(14));
        assert_eq!(parse_decimal("-2.005"), cents(-201));
        assert_eq!(parse_decimal("5e-3"), cents(1));
        assert_eq!(parse_decimal("4e-3"), cents(0));
        assert_eq!(parse_decimal("1e-9"), cents(0));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        for input in ["", ".", "-", "1.2.3", "1,000", "$5", "e5", "1e", "NaN", "inf", "1e400"] {
            assert_eq!(parse_decimal(input), None, "{:?}", input);
        }
    }

    #[test]
    fn test_from_major() {
        assert_eq!(Money::from_major(55.29), cents(5529));
        assert_eq!(Money::from_major(-0.1), cents(-10));
        assert_eq!(Money::from_major(f64::NAN), None);
        assert_eq!(Money::from_major(f64::INFINITY), None);
        assert_eq!(Money::from_major(1e300), None);
    }

    #[test]
    fn test_sums_are_exact() {
        let amounts: Vec<Money> = ["55.29", "34.57", "67.68", "76.09"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();

        let forward: Money = amounts.iter().sum();
        let backward: Money = amounts.iter().rev().sum();
        assert_eq!(forward, backward);
        assert_eq!(forward, Money::from_cents(23363));
        assert_eq!(forward.to_major(), 233.63);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(123450).to_string(), "1234.50");
        assert_eq!(Money::from_cents(-7).to_string(), "-0.07");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Money::from_cents(1250)).unwrap();
        assert_eq!(json, serde_json::json!(12.5));

        let back: Money = serde_json::from_value(serde_json::json!(12.5)).unwrap();
        assert_eq!(back, Money::from_cents(1250));
        let whole: Money = serde_json::from_value(serde_json::json!(3)).unwrap();
        assert_eq!(whole, Money::from_cents(300));
    }

    #[test]
    fn test_from_str_accepts_loose_formats() {
        assert_eq!("$1,234.50".parse::<Money>(), Ok(Money::from_cents(123450)));
        assert_eq!("(12.00)".parse::<Money>(), Ok(Money::from_cents(-1200)));
        assert!("twelve".parse::<Money>().is_err());
    }
}
