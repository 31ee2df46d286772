use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a decimal amount cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount")]
    Invalid,
    #[error("too many decimals")]
    TooManyDecimals,
    #[error("amount too large")]
    Overflow,
}

/// Money amount represented as **integer cents**.
///
/// Request bodies carry amounts as JSON numbers with at most two decimals; the
/// value is kept in cents on the client so that user input never goes
/// through floating-point arithmetic.
///
/// ```rust
/// use api_types::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Amount>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Amount>().is_err());
/// assert_eq!(Amount::new(1234).to_string(), "12.34");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Number of integer digits plus two decimals, as counted by the server's
    /// `max_digits` rule.
    #[must_use]
    pub fn digits(self) -> usize {
        let whole = self.0.unsigned_abs() / 100;
        whole.to_string().len() + 2
    }

    fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`;
    /// rejects more than two fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim().replace(',', ".");
        if rest.is_empty() {
            return Err(AmountError::Empty);
        }

        let mut parts = rest.split('.');
        let whole_str = parts.next().ok_or(AmountError::Invalid)?;
        let frac_str = parts.next();
        if parts.next().is_some() {
            return Err(AmountError::Invalid);
        }

        if whole_str.is_empty() || !whole_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(AmountError::Invalid);
        }
        let whole: i64 = whole_str.parse().map_err(|_| AmountError::Overflow)?;

        let cents: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac) if !frac.chars().all(|c| c.is_ascii_digit()) => {
                return Err(AmountError::Invalid);
            }
            Some(frac) if frac.len() == 1 => {
                frac.parse::<i64>().map_err(|_| AmountError::Invalid)? * 10
            }
            Some(frac) if frac.len() == 2 => {
                frac.parse::<i64>().map_err(|_| AmountError::Invalid)?
            }
            Some(_) => return Err(AmountError::TooManyDecimals),
        };

        let total = whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(AmountError::Overflow)?;

        Ok(Amount(if negative { -total } else { total }))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
            Raw::Number(value) => Ok(Amount((value * 100.0).round() as i64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Amount::new(0).to_string(), "0.00");
        assert_eq!(Amount::new(1).to_string(), "0.01");
        assert_eq!(Amount::new(1050).to_string(), "10.50");
        assert_eq!(Amount::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<Amount>().unwrap().cents(), -1);
        assert_eq!("  2.30 ".parse::<Amount>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("12.345".parse::<Amount>(), Err(AmountError::TooManyDecimals));
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("1.2.3".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("abc".parse::<Amount>(), Err(AmountError::Invalid));
    }

    #[test]
    fn serializes_as_json_number() {
        let json = serde_json::to_string(&Amount::new(1234)).unwrap();
        assert_eq!(json, "12.34");
        let json = serde_json::to_string(&Amount::new(4000)).unwrap();
        assert_eq!(json, "40.0");
    }

    #[test]
    fn deserializes_server_decimal_strings() {
        let amount: Amount = serde_json::from_str("\"99.90\"").unwrap();
        assert_eq!(amount.cents(), 9990);
        let amount: Amount = serde_json::from_str("12.5").unwrap();
        assert_eq!(amount.cents(), 1250);
    }

    #[test]
    fn digits_counts_integer_part_plus_cents() {
        assert_eq!(Amount::new(1).digits(), 3);
        assert_eq!(Amount::new(123_456).digits(), 6);
    }
}
