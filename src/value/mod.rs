//! Owned, type-erased element values.
//!
//! [`Value`] is what the dynamic half of the [`Column`](crate::column::Column)
//! contract trades in: `value_at` produces one and `append_value` consumes
//! one. Typed columns also expose inherent `at`/`append` methods that avoid
//! the enum entirely.

mod cast;
mod decimal;
mod uuid;

use std::{
    hash::{Hash, Hasher},
    mem,
    net::{Ipv4Addr, Ipv6Addr},
};

pub use decimal::Decimal;
pub(crate) use decimal::pow10;
pub use uuid::Uuid;

/// A single element of any supported column type.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value of a `Nullable` column.
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Int128(i128),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    /// Contents of a `String` or `FixedString` element. Not required to be
    /// UTF-8.
    String(Vec<u8>),
    /// Days since the epoch.
    Date(u16),
    /// Days since the epoch, extended range.
    Date32(i32),
    /// Seconds since the epoch.
    DateTime(u32),
    /// Ticks since the epoch at the column's precision.
    DateTime64(i64),
    Decimal(Decimal),
    Uuid(Uuid),
    IPv4(Ipv4Addr),
    IPv6(Ipv6Addr),
    Array(Vec<Value>),
    Tuple(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Int8(_) => "Int8",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::Int128(_) => "Int128",
            Value::UInt8(_) => "UInt8",
            Value::UInt16(_) => "UInt16",
            Value::UInt32(_) => "UInt32",
            Value::UInt64(_) => "UInt64",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::String(_) => "String",
            Value::Date(_) => "Date",
            Value::Date32(_) => "Date32",
            Value::DateTime(_) => "DateTime",
            Value::DateTime64(_) => "DateTime64",
            Value::Decimal(_) => "Decimal",
            Value::Uuid(_) => "UUID",
            Value::IPv4(_) => "IPv4",
            Value::IPv6(_) => "IPv6",
            Value::Array(_) => "Array",
            Value::Tuple(_) => "Tuple",
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// Floats compare by bit pattern so that values can key the dictionary of a
// `LowCardinality` column.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int8(a), Value::Int8(b)) => a == b,
            (Value::Int16(a), Value::Int16(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Int128(a), Value::Int128(b)) => a == b,
            (Value::UInt8(a), Value::UInt8(b)) => a == b,
            (Value::UInt16(a), Value::UInt16(b)) => a == b,
            (Value::UInt32(a), Value::UInt32(b)) => a == b,
            (Value::UInt64(a), Value::UInt64(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Date32(a), Value::Date32(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::DateTime64(a), Value::DateTime64(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::IPv4(a), Value::IPv4(b)) => a == b,
            (Value::IPv6(a), Value::IPv6(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Int8(v) => v.hash(state),
            Value::Int16(v) => v.hash(state),
            Value::Int32(v) => v.hash(state),
            Value::Int64(v) => v.hash(state),
            Value::Int128(v) => v.hash(state),
            Value::UInt8(v) => v.hash(state),
            Value::UInt16(v) => v.hash(state),
            Value::UInt32(v) => v.hash(state),
            Value::UInt64(v) => v.hash(state),
            Value::Float32(v) => v.to_bits().hash(state),
            Value::Float64(v) => v.to_bits().hash(state),
            Value::String(v) => v.hash(state),
            Value::Date(v) => v.hash(state),
            Value::Date32(v) => v.hash(state),
            Value::DateTime(v) => v.hash(state),
            Value::DateTime64(v) => v.hash(state),
            Value::Decimal(v) => v.hash(state),
            Value::Uuid(v) => v.hash(state),
            Value::IPv4(v) => v.hash(state),
            Value::IPv6(v) => v.hash(state),
            Value::Array(v) => v.hash(state),
            Value::Tuple(v) => v.hash(state),
        }
    }
}
