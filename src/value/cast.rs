use std::net::{Ipv4Addr, Ipv6Addr};

use super::{Decimal, Uuid, Value};
use crate::error::ColumnError;

macro_rules! implement_value_cast {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$native> for Value {
                fn from(value: $native) -> Self {
                    Value::$variant(value)
                }
            }

            impl TryFrom<Value> for $native {
                type Error = ColumnError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(ColumnError::type_mismatch(
                            stringify!($variant),
                            other.kind(),
                        )),
                    }
                }
            }
        )*
    };
}

implement_value_cast! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    i128 => Int128,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Vec<u8> => String,
    Decimal => Decimal,
    Uuid => Uuid,
    Ipv4Addr => IPv4,
    Ipv6Addr => IPv6,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::String(value.to_vec())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<Value> for String {
    type Error = ColumnError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let bytes = Vec::<u8>::try_from(value)?;
        String::from_utf8(bytes).map_err(|e| ColumnError::InvalidValue(e.to_string()))
    }
}
