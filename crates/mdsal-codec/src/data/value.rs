// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Leaf values of the normalized representation.

use super::identifier::YangInstanceIdentifier;
use crate::error::CodecError;
use crate::model::{BuiltinType, QName};
use base64::Engine;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Fixed-point decimal: an unscaled integer and its fraction digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal64 {
    unscaled: i64,
    fraction_digits: u8,
}

impl Decimal64 {
    pub fn new(unscaled: i64, fraction_digits: u8) -> Self {
        Self {
            unscaled,
            fraction_digits,
        }
    }

    /// Parse `[-]digits[.digits]` at the given scale. More fractional
    /// digits than the scale allows is an error.
    pub fn parse(text: &str, fraction_digits: u8) -> Option<Self> {
        let text = text.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !digits_only(int_part) || !digits_only(frac_part) {
            return None;
        }
        if body.contains('.') && frac_part.is_empty() {
            return None;
        }
        if frac_part.len() > usize::from(fraction_digits) {
            return None;
        }

        // Magnitude in i128 so the negative end of the range fits.
        let scale = 10i128.checked_pow(u32::from(fraction_digits))?;
        let mut magnitude = int_part.parse::<i128>().ok()?.checked_mul(scale)?;
        if !frac_part.is_empty() {
            let pad = 10i128.checked_pow((usize::from(fraction_digits) - frac_part.len()) as u32)?;
            magnitude = magnitude.checked_add(frac_part.parse::<i128>().ok()?.checked_mul(pad)?)?;
        }
        let signed = if negative { -magnitude } else { magnitude };
        Some(Self::new(i64::try_from(signed).ok()?, fraction_digits))
    }

    pub fn unscaled(&self) -> i64 {
        self.unscaled
    }

    pub fn fraction_digits(&self) -> u8 {
        self.fraction_digits
    }
}

impl fmt::Display for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.unscaled.unsigned_abs();
        let sign = if self.unscaled < 0 { "-" } else { "" };
        // Past 10^19 the scale exceeds any i64 magnitude.
        let (int_part, frac_part) = match 10u64.checked_pow(u32::from(self.fraction_digits)) {
            Some(scale) => (magnitude / scale, magnitude % scale),
            None => (0, magnitude),
        };
        if self.fraction_digits == 0 {
            return write!(f, "{}{}.0", sign, int_part);
        }
        let frac = format!(
            "{:0width$}",
            frac_part,
            width = usize::from(self.fraction_digits)
        );
        let trimmed = frac.trim_end_matches('0');
        let frac = if trimmed.is_empty() { "0" } else { trimmed };
        write!(f, "{}{}.{}", sign, int_part, frac)
    }
}

/// Scale taken from the number of fractional digits written.
impl FromStr for Decimal64 {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().split_once('.').map_or(0, |(_, frac)| frac.len());
        u8::try_from(digits)
            .ok()
            .filter(|d| *d <= 18)
            .and_then(|d| Self::parse(s, d))
            .ok_or_else(|| CodecError::invalid_value(format!("'{}' is not a decimal64", s)))
    }
}

/// A leaf or leaf-list value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Decimal64(Decimal64),
    String(String),
    Binary(Vec<u8>),
    Empty,
    /// Names of the set bits.
    Bits(BTreeSet<String>),
    /// YANG name of the enum value.
    Enum(String),
    IdentityRef(QName),
    InstanceIdentifier(YangInstanceIdentifier),
}

impl Value {
    /// Set of bits from names.
    pub fn bits<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::Bits(names.into_iter().map(str::to_string).collect())
    }

    /// Short name of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Int8(_) => "int8",
            Self::Int16(_) => "int16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Uint8(_) => "uint8",
            Self::Uint16(_) => "uint16",
            Self::Uint32(_) => "uint32",
            Self::Uint64(_) => "uint64",
            Self::Decimal64(_) => "decimal64",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::Empty => "empty",
            Self::Bits(_) => "bits",
            Self::Enum(_) => "enumeration",
            Self::IdentityRef(_) => "identityref",
            Self::InstanceIdentifier(_) => "instance-identifier",
        }
    }

    /// Integer and decimal values widened for range checks.
    pub fn as_range_value(&self) -> Option<i128> {
        match *self {
            Self::Int8(v) => Some(v.into()),
            Self::Int16(v) => Some(v.into()),
            Self::Int32(v) => Some(v.into()),
            Self::Int64(v) => Some(v.into()),
            Self::Uint8(v) => Some(v.into()),
            Self::Uint16(v) => Some(v.into()),
            Self::Uint32(v) => Some(v.into()),
            Self::Uint64(v) => Some(v.into()),
            Self::Decimal64(d) => Some(d.unscaled().into()),
            _ => None,
        }
    }

    /// Parse the lexical form of a scalar built-in type.
    ///
    /// Types whose lexical form needs schema context (leafref, identityref,
    /// union, instance-identifier) are rejected; the value codec handles them.
    pub fn parse_literal(builtin: &BuiltinType, text: &str) -> Result<Self, CodecError> {
        let bad = || {
            CodecError::invalid_value(format!("'{}' is not a valid {}", text, builtin.name()))
        };
        let value = match builtin {
            BuiltinType::Boolean => match text {
                "true" => Self::Boolean(true),
                "false" => Self::Boolean(false),
                _ => return Err(bad()),
            },
            BuiltinType::Empty if text.is_empty() => Self::Empty,
            BuiltinType::Empty => return Err(bad()),
            BuiltinType::Int8 => Self::Int8(text.parse().map_err(|_| bad())?),
            BuiltinType::Int16 => Self::Int16(text.parse().map_err(|_| bad())?),
            BuiltinType::Int32 => Self::Int32(text.parse().map_err(|_| bad())?),
            BuiltinType::Int64 => Self::Int64(text.parse().map_err(|_| bad())?),
            BuiltinType::Uint8 => Self::Uint8(text.parse().map_err(|_| bad())?),
            BuiltinType::Uint16 => Self::Uint16(text.parse().map_err(|_| bad())?),
            BuiltinType::Uint32 => Self::Uint32(text.parse().map_err(|_| bad())?),
            BuiltinType::Uint64 => Self::Uint64(text.parse().map_err(|_| bad())?),
            BuiltinType::Decimal64 { fraction_digits } => {
                Self::Decimal64(Decimal64::parse(text, *fraction_digits).ok_or_else(bad)?)
            }
            BuiltinType::String => Self::String(text.to_string()),
            BuiltinType::Binary => Self::Binary(
                base64::engine::general_purpose::STANDARD
                    .decode(text)
                    .map_err(|_| bad())?,
            ),
            BuiltinType::Bits(_) => Self::Bits(text.split_whitespace().map(str::to_string).collect()),
            BuiltinType::Enumeration(_) => Self::Enum(text.to_string()),
            BuiltinType::Identityref(_)
            | BuiltinType::InstanceIdentifier
            | BuiltinType::Leafref(_)
            | BuiltinType::Union(_) => {
                return Err(CodecError::invalid_value(format!(
                    "{} literals need schema context",
                    builtin.name()
                )))
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_parse() {
        assert_eq!(Decimal64::parse("12.5", 2), Some(Decimal64::new(1250, 2)));
        assert_eq!(Decimal64::parse("-0.01", 2), Some(Decimal64::new(-1, 2)));
        assert_eq!(Decimal64::parse("7", 3), Some(Decimal64::new(7000, 3)));
        assert_eq!(Decimal64::parse("1.234", 2), None);
        assert_eq!(Decimal64::parse("1.", 2), None);
        assert_eq!(Decimal64::parse("abc", 2), None);
    }

    #[test]
    fn test_decimal_parse_range_bounds() {
        assert_eq!(
            Decimal64::parse("-922337203685477580.8", 1),
            Some(Decimal64::new(i64::MIN, 1))
        );
        assert_eq!(
            Decimal64::parse("922337203685477580.7", 1),
            Some(Decimal64::new(i64::MAX, 1))
        );
        assert_eq!(
            Decimal64::parse("-9.223372036854775808", 18),
            Some(Decimal64::new(i64::MIN, 18))
        );
        assert_eq!(Decimal64::parse("922337203685477580.8", 1), None);
        assert_eq!(Decimal64::parse("-922337203685477580.9", 1), None);
    }

    #[test]
    fn test_decimal_display_with_wide_scale() {
        assert_eq!(Decimal64::new(i64::MIN, 1).to_string(), "-922337203685477580.8");
        assert_eq!(Decimal64::new(5, 20).to_string(), "0.00000000000000000005");
        assert_eq!(Decimal64::new(-1, 25).to_string(), "-0.0000000000000000000000001");
    }

    #[test]
    fn test_decimal_from_str_keeps_written_scale() {
        let d: Decimal64 = "-12.250".parse().unwrap();
        assert_eq!(d.unscaled(), -12250);
        assert_eq!(d.fraction_digits(), 3);
        assert_eq!("7".parse::<Decimal64>().unwrap(), Decimal64::new(7, 0));
        assert!("1.2.3".parse::<Decimal64>().is_err());
    }

    #[test]
    fn test_decimal_display_is_canonical() {
        assert_eq!(Decimal64::new(1250, 2).to_string(), "12.5");
        assert_eq!(Decimal64::new(-1, 2).to_string(), "-0.01");
        assert_eq!(Decimal64::new(7000, 3).to_string(), "7.0");
        assert_eq!(Decimal64::new(42, 0).to_string(), "42.0");
    }

    #[test]
    fn test_parse_literal_scalars() {
        assert_eq!(
            Value::parse_literal(&BuiltinType::Boolean, "true").unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            Value::parse_literal(&BuiltinType::Uint8, "255").unwrap(),
            Value::Uint8(255)
        );
        assert!(Value::parse_literal(&BuiltinType::Uint8, "256").is_err());
        assert!(Value::parse_literal(&BuiltinType::Boolean, "TRUE").is_err());
        assert_eq!(
            Value::parse_literal(&BuiltinType::Binary, "QUI=").unwrap(),
            Value::Binary(b"AB".to_vec())
        );
        assert_eq!(
            Value::parse_literal(&BuiltinType::bits(&["a", "b"]), "b a").unwrap(),
            Value::bits(["a", "b"])
        );
    }

    #[test]
    fn test_parse_literal_needs_context() {
        let err = Value::parse_literal(&BuiltinType::Identityref(Vec::new()), "x:y").unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue(_)));
    }

    #[test]
    fn test_range_widening() {
        assert_eq!(Value::Uint64(u64::MAX).as_range_value(), Some(u64::MAX as i128));
        assert_eq!(Value::Decimal64(Decimal64::new(-5, 1)).as_range_value(), Some(-5));
        assert_eq!(Value::String("x".into()).as_range_value(), None);
    }
}
