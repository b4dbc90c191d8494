use super::{impl_column_common, same_column, Column, ColumnRef, ColumnVector};
use crate::{
    error::{ColumnError, ColumnResult},
    serdes::{Input, Output},
    types::Type,
    value::Value,
};

/// Implements [`Column`] for a wrapper whose rows are one `ColumnVector`
/// word each, surfaced through the given [`Value`] variant.
macro_rules! delegate_to_vector {
    ($column:ident, $variant:ident) => {
        impl Column for $column {
            fn column_type(&self) -> &Type {
                &self.type_
            }

            fn size(&self) -> usize {
                self.data.size()
            }

            fn value_at(&self, index: usize) -> ColumnResult<Value> {
                self.data.at(index).map(Value::$variant)
            }

            fn append_value(&mut self, value: Value) -> ColumnResult<()> {
                match value {
                    Value::$variant(v) => {
                        self.data.append(v);
                        Ok(())
                    }
                    other => Err(ColumnError::type_mismatch(&self.type_, other.kind())),
                }
            }

            fn append_default(&mut self) {
                self.data.append_default();
            }

            fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
                let other = same_column(self, other)?;
                self.data.extend_from(&other.data);
                Ok(())
            }

            fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
                Ok(Box::new(Self {
                    type_: self.type_.clone(),
                    data: self.data.slice_typed(offset, len)?,
                }))
            }

            fn clone_empty(&self) -> ColumnRef {
                Box::new(Self {
                    type_: self.type_.clone(),
                    data: ColumnVector::new(),
                })
            }

            fn clear(&mut self) {
                self.data.clear();
            }

            fn reserve(&mut self, additional: usize) {
                self.data.reserve(additional);
            }

            fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()> {
                self.data.save_words(output)
            }

            fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
                self.data.load_words(input, rows)
            }

            impl_column_common!();
        }
    };
}

/// Days since 1970-01-01 as `u16`.
#[derive(Debug, Clone)]
pub struct ColumnDate {
    type_: Type,
    data: ColumnVector<u16>,
}

impl Default for ColumnDate {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnDate {
    pub fn new() -> Self {
        Self {
            type_: Type::Date,
            data: ColumnVector::new(),
        }
    }

    pub fn append(&mut self, days: u16) {
        self.data.append(days);
    }

    pub fn at(&self, index: usize) -> ColumnResult<u16> {
        self.data.at(index)
    }
}

delegate_to_vector!(ColumnDate, Date);

/// Days since 1970-01-01 as `i32`, covering dates before the epoch.
#[derive(Debug, Clone)]
pub struct ColumnDate32 {
    type_: Type,
    data: ColumnVector<i32>,
}

impl Default for ColumnDate32 {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnDate32 {
    pub fn new() -> Self {
        Self {
            type_: Type::Date32,
            data: ColumnVector::new(),
        }
    }

    pub fn append(&mut self, days: i32) {
        self.data.append(days);
    }

    pub fn at(&self, index: usize) -> ColumnResult<i32> {
        self.data.at(index)
    }
}

delegate_to_vector!(ColumnDate32, Date32);

/// Seconds since the epoch as `u32`.
#[derive(Debug, Clone)]
pub struct ColumnDateTime {
    type_: Type,
    data: ColumnVector<u32>,
}

impl Default for ColumnDateTime {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnDateTime {
    pub fn new() -> Self {
        Self {
            type_: Type::datetime(),
            data: ColumnVector::new(),
        }
    }

    /// `DateTime('timezone')`. The timezone only affects the type name.
    pub fn with_timezone(timezone: impl Into<String>) -> Self {
        Self {
            type_: Type::DateTime {
                timezone: Some(timezone.into()),
            },
            data: ColumnVector::new(),
        }
    }

    pub fn timezone(&self) -> Option<&str> {
        match &self.type_ {
            Type::DateTime { timezone } => timezone.as_deref(),
            _ => None,
        }
    }

    pub fn append(&mut self, seconds: u32) {
        self.data.append(seconds);
    }

    pub fn at(&self, index: usize) -> ColumnResult<u32> {
        self.data.at(index)
    }
}

delegate_to_vector!(ColumnDateTime, DateTime);

/// Ticks of `10^-precision` seconds since the epoch as `i64`.
#[derive(Debug, Clone)]
pub struct ColumnDateTime64 {
    type_: Type,
    data: ColumnVector<i64>,
}

impl ColumnDateTime64 {
    /// `DateTime64(precision)`; `precision` must be in `0..=9`.
    pub fn new(precision: u8) -> ColumnResult<Self> {
        Ok(Self {
            type_: Type::datetime64(precision)?,
            data: ColumnVector::new(),
        })
    }

    /// `DateTime64(precision, 'timezone')`.
    pub fn with_timezone(precision: u8, timezone: impl Into<String>) -> ColumnResult<Self> {
        Type::datetime64(precision)?;
        Ok(Self {
            type_: Type::DateTime64 {
                precision,
                timezone: Some(timezone.into()),
            },
            data: ColumnVector::new(),
        })
    }

    pub fn precision(&self) -> u8 {
        match self.type_ {
            Type::DateTime64 { precision, .. } => precision,
            _ => 0,
        }
    }

    pub fn timezone(&self) -> Option<&str> {
        match &self.type_ {
            Type::DateTime64 { timezone, .. } => timezone.as_deref(),
            _ => None,
        }
    }

    /// Ticks in one second at this column's precision.
    pub fn ticks_per_second(&self) -> i64 {
        10i64.pow(u32::from(self.precision()))
    }

    /// Append a raw tick count.
    pub fn append(&mut self, ticks: i64) {
        self.data.append(ticks);
    }

    /// Append `seconds + nanos / 1e9`, truncated to the column precision.
    pub fn append_timestamp(&mut self, seconds: i64, nanos: u32) -> ColumnResult<()> {
        if nanos >= 1_000_000_000 {
            return Err(ColumnError::InvalidValue(format!(
                "sub-second part {nanos}ns is not below one second"
            )));
        }
        let divisor = 10i64.pow(9 - u32::from(self.precision()));
        let ticks = seconds
            .checked_mul(self.ticks_per_second())
            .and_then(|t| t.checked_add(i64::from(nanos) / divisor))
            .ok_or_else(|| {
                ColumnError::InvalidValue(format!(
                    "{seconds}s does not fit {}",
                    self.type_
                ))
            })?;
        self.data.append(ticks);
        Ok(())
    }

    /// Raw tick count of row `index`.
    pub fn at(&self, index: usize) -> ColumnResult<i64> {
        self.data.at(index)
    }
}

delegate_to_vector!(ColumnDateTime64, DateTime64);
