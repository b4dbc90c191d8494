//! Parameterized column type descriptors.
//!
//! A [`Type`] carries every construction parameter of a column, and its
//! canonical [`name`](Type::name) is the textual form the database uses in
//! block headers. Two types are compatible exactly when they compare equal,
//! which is the same as comparing their canonical names.

mod parser;

use std::{fmt, str::FromStr};

use crate::error::{ColumnError, ColumnResult};

/// Largest supported decimal precision.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Largest supported `DateTime64` sub-second precision.
pub const MAX_DATETIME64_PRECISION: u8 = 9;

/// Descriptor of a concrete column type including all of its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    /// Byte string of exactly `N` bytes.
    FixedString(usize),
    /// Days since the epoch stored as `u16`.
    Date,
    /// Days since the epoch stored as `i32`.
    Date32,
    /// Seconds since the epoch stored as `u32`.
    DateTime {
        /// Optional IANA timezone name, carried for presentation only.
        timezone: Option<String>,
    },
    /// Ticks of `10^-precision` seconds since the epoch stored as `i64`.
    DateTime64 {
        /// Number of sub-second decimal digits, `0..=9`.
        precision: u8,
        /// Optional IANA timezone name, carried for presentation only.
        timezone: Option<String>,
    },
    /// Fixed-point number: stored integer scaled by `10^-scale`.
    Decimal {
        /// Total number of decimal digits, `1..=38`.
        precision: u8,
        /// Digits after the decimal point, `<= precision`.
        scale: u8,
    },
    Uuid,
    IPv4,
    IPv6,
    Nullable(Box<Type>),
    Array(Box<Type>),
    Tuple(Vec<Type>),
    LowCardinality(Box<Type>),
}

impl Type {
    /// `FixedString(width)`. The width must be positive.
    pub fn fixed_string(width: usize) -> ColumnResult<Self> {
        if width == 0 {
            return Err(ColumnError::InvalidArgument(
                "FixedString width must be positive".into(),
            ));
        }
        Ok(Type::FixedString(width))
    }

    /// `DateTime` without timezone.
    pub fn datetime() -> Self {
        Type::DateTime { timezone: None }
    }

    /// `DateTime64(precision)`, validating the precision.
    pub fn datetime64(precision: u8) -> ColumnResult<Self> {
        if precision > MAX_DATETIME64_PRECISION {
            return Err(ColumnError::InvalidArgument(format!(
                "DateTime64 precision must be in 0..={MAX_DATETIME64_PRECISION}, got {precision}"
            )));
        }
        Ok(Type::DateTime64 {
            precision,
            timezone: None,
        })
    }

    /// `Decimal(precision, scale)`, validating both parameters.
    pub fn decimal(precision: u8, scale: u8) -> ColumnResult<Self> {
        if precision == 0 || precision > MAX_DECIMAL_PRECISION {
            return Err(ColumnError::InvalidArgument(format!(
                "Decimal precision must be in 1..={MAX_DECIMAL_PRECISION}, got {precision}"
            )));
        }
        if scale > precision {
            return Err(ColumnError::InvalidArgument(format!(
                "Decimal scale {scale} exceeds precision {precision}"
            )));
        }
        Ok(Type::Decimal { precision, scale })
    }

    /// `Nullable(nested)`.
    pub fn nullable(nested: Type) -> Self {
        Type::Nullable(Box::new(nested))
    }

    /// `Array(nested)`.
    pub fn array(nested: Type) -> Self {
        Type::Array(Box::new(nested))
    }

    /// `Tuple(elements...)`.
    pub fn tuple(elements: Vec<Type>) -> Self {
        Type::Tuple(elements)
    }

    /// `LowCardinality(nested)`.
    pub fn low_cardinality(nested: Type) -> Self {
        Type::LowCardinality(Box::new(nested))
    }

    /// Canonical name, e.g. `Array(Nullable(Decimal(10,5)))`.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Bytes each element occupies on the wire, when that is fixed.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            Type::Int8 | Type::UInt8 => Some(1),
            Type::Int16 | Type::UInt16 | Type::Date => Some(2),
            Type::Int32
            | Type::UInt32
            | Type::Float32
            | Type::Date32
            | Type::DateTime { .. }
            | Type::IPv4 => Some(4),
            Type::Int64 | Type::UInt64 | Type::Float64 | Type::DateTime64 { .. } => Some(8),
            Type::Int128 | Type::Uuid | Type::IPv6 => Some(16),
            Type::FixedString(width) => Some(*width),
            Type::Decimal { precision, .. } => Some(decimal_storage_width(*precision)),
            _ => None,
        }
    }

    /// Fewest bytes one element can occupy in a column body.
    pub(crate) fn min_wire_width(&self) -> usize {
        match self {
            Type::String | Type::LowCardinality(_) => 1,
            Type::Nullable(nested) => 1 + nested.min_wire_width(),
            Type::Array(_) => 8,
            Type::Tuple(elements) => elements.iter().map(Type::min_wire_width).sum(),
            other => other.fixed_width().unwrap_or(1),
        }
    }

    /// Whether this type is `Nullable(_)`.
    pub fn is_nullable(&self) -> bool {
        matches!(self, Type::Nullable(_))
    }
}

/// Byte width of the integer that stores a decimal of `precision` digits.
pub(crate) fn decimal_storage_width(precision: u8) -> usize {
    match precision {
        0..=9 => 4,
        10..=18 => 8,
        _ => 16,
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int8 => f.write_str("Int8"),
            Type::Int16 => f.write_str("Int16"),
            Type::Int32 => f.write_str("Int32"),
            Type::Int64 => f.write_str("Int64"),
            Type::Int128 => f.write_str("Int128"),
            Type::UInt8 => f.write_str("UInt8"),
            Type::UInt16 => f.write_str("UInt16"),
            Type::UInt32 => f.write_str("UInt32"),
            Type::UInt64 => f.write_str("UInt64"),
            Type::Float32 => f.write_str("Float32"),
            Type::Float64 => f.write_str("Float64"),
            Type::String => f.write_str("String"),
            Type::FixedString(width) => write!(f, "FixedString({width})"),
            Type::Date => f.write_str("Date"),
            Type::Date32 => f.write_str("Date32"),
            Type::DateTime { timezone: None } => f.write_str("DateTime"),
            Type::DateTime {
                timezone: Some(tz),
            } => write!(f, "DateTime('{tz}')"),
            Type::DateTime64 {
                precision,
                timezone: None,
            } => write!(f, "DateTime64({precision})"),
            Type::DateTime64 {
                precision,
                timezone: Some(tz),
            } => write!(f, "DateTime64({precision}, '{tz}')"),
            Type::Decimal { precision, scale } => write!(f, "Decimal({precision},{scale})"),
            Type::Uuid => f.write_str("UUID"),
            Type::IPv4 => f.write_str("IPv4"),
            Type::IPv6 => f.write_str("IPv6"),
            Type::Nullable(nested) => write!(f, "Nullable({nested})"),
            Type::Array(nested) => write!(f, "Array({nested})"),
            Type::Tuple(elements) => {
                f.write_str("Tuple(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str(")")
            }
            Type::LowCardinality(nested) => write!(f, "LowCardinality({nested})"),
        }
    }
}

impl FromStr for Type {
    type Err = ColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_type(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names() {
        assert_eq!(Type::fixed_string(12).unwrap().name(), "FixedString(12)");
        assert_eq!(Type::decimal(10, 5).unwrap().name(), "Decimal(10,5)");
        assert_eq!(Type::datetime64(3).unwrap().name(), "DateTime64(3)");
        assert_eq!(Type::array(Type::UInt32).name(), "Array(UInt32)");
        assert_eq!(Type::nullable(Type::UInt8).name(), "Nullable(UInt8)");
        assert_eq!(
            Type::tuple(vec![Type::String, Type::Uuid, Type::IPv6]).name(),
            "Tuple(String, UUID, IPv6)"
        );
        assert_eq!(
            Type::low_cardinality(Type::nullable(Type::String)).name(),
            "LowCardinality(Nullable(String))"
        );
        assert_eq!(
            Type::DateTime64 {
                precision: 6,
                timezone: Some("UTC".into())
            }
            .name(),
            "DateTime64(6, 'UTC')"
        );
    }

    #[test]
    fn parameters_take_part_in_equality() {
        assert_ne!(
            Type::fixed_string(12).unwrap(),
            Type::fixed_string(13).unwrap()
        );
        assert_ne!(
            Type::decimal(10, 5).unwrap(),
            Type::decimal(10, 4).unwrap()
        );
        assert_ne!(
            Type::datetime64(3).unwrap(),
            Type::datetime64(6).unwrap()
        );
        assert_eq!(
            Type::array(Type::nullable(Type::Int8)),
            Type::array(Type::nullable(Type::Int8))
        );
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(Type::fixed_string(0).is_err());
        assert!(Type::datetime64(10).is_err());
        assert!(Type::decimal(0, 0).is_err());
        assert!(Type::decimal(39, 2).is_err());
        assert!(Type::decimal(5, 6).is_err());
    }

    #[test]
    fn decimal_storage_follows_precision() {
        assert_eq!(Type::decimal(9, 2).unwrap().fixed_width(), Some(4));
        assert_eq!(Type::decimal(10, 5).unwrap().fixed_width(), Some(8));
        assert_eq!(Type::decimal(38, 10).unwrap().fixed_width(), Some(16));
        assert_eq!(Type::String.fixed_width(), None);
    }
}
