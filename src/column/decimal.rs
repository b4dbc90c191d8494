use super::{impl_column_common, same_column, Column, ColumnRef, ColumnVector};
use crate::{
    error::{ColumnError, ColumnResult},
    serdes::{Input, Output},
    types::{decimal_storage_width, Type},
    value::{pow10, Decimal, Value},
};

/// Scaled integers in the narrowest word that holds `precision` digits.
#[derive(Debug, Clone)]
enum DecimalData {
    Int32(ColumnVector<i32>),
    Int64(ColumnVector<i64>),
    Int128(ColumnVector<i128>),
}

macro_rules! dispatch {
    ($data:expr, $inner:ident => $body:expr) => {
        match $data {
            DecimalData::Int32($inner) => $body,
            DecimalData::Int64($inner) => $body,
            DecimalData::Int128($inner) => $body,
        }
    };
}

impl DecimalData {
    fn for_precision(precision: u8) -> Self {
        match decimal_storage_width(precision) {
            4 => DecimalData::Int32(ColumnVector::new()),
            8 => DecimalData::Int64(ColumnVector::new()),
            _ => DecimalData::Int128(ColumnVector::new()),
        }
    }

    // Callers have already checked the value against the precision, which
    // guarantees it fits the storage word.
    fn push(&mut self, raw: i128) {
        match self {
            DecimalData::Int32(v) => v.append(raw as i32),
            DecimalData::Int64(v) => v.append(raw as i64),
            DecimalData::Int128(v) => v.append(raw),
        }
    }

    fn get(&self, index: usize) -> ColumnResult<i128> {
        dispatch!(self, v => v.at(index).map(i128::from))
    }

    fn size(&self) -> usize {
        dispatch!(self, v => v.size())
    }

    fn extend_from(&mut self, other: &DecimalData) {
        match (self, other) {
            (DecimalData::Int32(a), DecimalData::Int32(b)) => a.extend_from(b),
            (DecimalData::Int64(a), DecimalData::Int64(b)) => a.extend_from(b),
            (DecimalData::Int128(a), DecimalData::Int128(b)) => a.extend_from(b),
            _ => unreachable!("decimal columns of equal type share storage width"),
        }
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<Self> {
        Ok(match self {
            DecimalData::Int32(v) => DecimalData::Int32(v.slice_typed(offset, len)?),
            DecimalData::Int64(v) => DecimalData::Int64(v.slice_typed(offset, len)?),
            DecimalData::Int128(v) => DecimalData::Int128(v.slice_typed(offset, len)?),
        })
    }
}

/// Fixed-point decimal column, `Decimal(precision, scale)`.
///
/// Rows are stored as integers scaled by `10^scale`: appending `3.14159` to a
/// `Decimal(10,5)` column stores `314159`. The storage word, and therefore the
/// wire width, is 4 bytes up to precision 9, 8 bytes up to 18 and 16 beyond.
#[derive(Debug, Clone)]
pub struct ColumnDecimal {
    type_: Type,
    precision: u8,
    scale: u8,
    data: DecimalData,
}

impl ColumnDecimal {
    pub fn new(precision: u8, scale: u8) -> ColumnResult<Self> {
        Ok(Self {
            type_: Type::decimal(precision, scale)?,
            precision,
            scale,
            data: DecimalData::for_precision(precision),
        })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Append an already scaled integer.
    pub fn append_raw(&mut self, raw: i128) -> ColumnResult<()> {
        let value = Decimal::new(raw, self.scale);
        if value.digits() > u32::from(self.precision) {
            return Err(ColumnError::InvalidValue(format!(
                "{value} has more than {} digits",
                self.precision
            )));
        }
        self.data.push(raw);
        Ok(())
    }

    /// Append `value`, rescaled to the column scale. Fails when rescaling
    /// would drop digits or the result exceeds the precision.
    pub fn append(&mut self, value: Decimal) -> ColumnResult<()> {
        let rescaled = value.rescale(self.scale).ok_or_else(|| {
            ColumnError::InvalidValue(format!("{value} does not fit {}", self.type_))
        })?;
        self.append_raw(rescaled.mantissa())
    }

    /// Append a decimal literal such as `"-12.5"`.
    pub fn append_str(&mut self, literal: &str) -> ColumnResult<()> {
        self.append(literal.parse()?)
    }

    /// Append `value` rounded to the column scale.
    pub fn append_f64(&mut self, value: f64) -> ColumnResult<()> {
        let decimal = Decimal::from_f64(value, self.scale).ok_or_else(|| {
            ColumnError::InvalidValue(format!("{value} does not fit {}", self.type_))
        })?;
        self.append_raw(decimal.mantissa())
    }

    pub fn at(&self, index: usize) -> ColumnResult<Decimal> {
        self.raw_at(index)
            .map(|raw| Decimal::new(raw, self.scale))
    }

    /// Scaled integer of row `index`.
    pub fn raw_at(&self, index: usize) -> ColumnResult<i128> {
        self.data.get(index)
    }

    fn with_data(&self, data: DecimalData) -> Self {
        Self {
            type_: self.type_.clone(),
            precision: self.precision,
            scale: self.scale,
            data,
        }
    }

    fn largest_magnitude(&self) -> i128 {
        pow10(self.precision).map_or(i128::MAX, |p| p - 1)
    }
}

impl Column for ColumnDecimal {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.data.size()
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        self.at(index).map(Value::Decimal)
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        match value {
            Value::Decimal(d) => self.append(d),
            other => Err(ColumnError::type_mismatch(&self.type_, other.kind())),
        }
    }

    fn append_default(&mut self) {
        self.data.push(0);
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from(&other.data);
        Ok(())
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        Ok(Box::new(self.with_data(self.data.slice(offset, len)?)))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(self.with_data(DecimalData::for_precision(self.precision)))
    }

    fn clear(&mut self) {
        dispatch!(&mut self.data, v => v.clear())
    }

    fn reserve(&mut self, additional: usize) {
        dispatch!(&mut self.data, v => v.reserve(additional))
    }

    fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()> {
        dispatch!(&self.data, v => v.save_words(output))
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        let mut staged = DecimalData::for_precision(self.precision);
        dispatch!(&mut staged, v => v.load_words(input, rows))?;

        let limit = self.largest_magnitude();
        for i in 0..rows {
            let raw = staged.get(i)?;
            if raw.unsigned_abs() > limit.unsigned_abs() {
                return Err(crate::error::CodecError::Malformed(format!(
                    "{} exceeds the precision of {}",
                    Decimal::new(raw, self.scale),
                    self.type_
                ))
                .into());
            }
        }
        self.data.extend_from(&staged);
        Ok(())
    }

    impl_column_common!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_on_append() {
        let mut column = ColumnDecimal::new(10, 5).unwrap();
        column.append_f64(3.14159).unwrap();
        column.append_str("2.5").unwrap();
        column.append(Decimal::new(-1, 0)).unwrap();

        assert_eq!(column.raw_at(0).unwrap(), 314159);
        assert_eq!(column.raw_at(1).unwrap(), 250000);
        assert_eq!(column.at(2).unwrap(), Decimal::new(-100000, 5));
        assert_eq!(column.at(0).unwrap().to_string(), "3.14159");
    }

    #[test]
    fn rejects_lossy_or_oversized_values() {
        let mut column = ColumnDecimal::new(4, 2).unwrap();
        assert!(column.append_str("1.234").is_err());
        assert!(column.append_str("100.00").is_err());
        assert!(column.append_raw(-10_000).is_err());
        column.append_raw(-9_999).unwrap();
        assert_eq!(column.size(), 1);
    }

    #[test]
    fn storage_width_follows_precision() {
        for (precision, width) in [(9, 4), (18, 8), (38, 16)] {
            let mut column = ColumnDecimal::new(precision, 2).unwrap();
            column.append_raw(123).unwrap();
            let mut buf = Vec::new();
            column.save(&mut buf).unwrap();
            assert_eq!(buf.len(), width);

            let mut loaded = ColumnDecimal::new(precision, 2).unwrap();
            loaded.load(&mut buf.as_slice(), 1).unwrap();
            assert_eq!(loaded.raw_at(0).unwrap(), 123);
        }
    }

    #[test]
    fn load_rejects_values_beyond_precision() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&99i32.to_le_bytes());
        buf.extend_from_slice(&1_000i32.to_le_bytes());

        let mut column = ColumnDecimal::new(3, 0).unwrap();
        assert!(column.load(&mut buf.as_slice(), 2).is_err());
        assert_eq!(column.size(), 0);
    }

    #[test]
    fn parameters_fixed_by_constructor() {
        assert!(ColumnDecimal::new(0, 0).is_err());
        assert!(ColumnDecimal::new(5, 6).is_err());
        let a = ColumnDecimal::new(10, 5).unwrap();
        let mut b = ColumnDecimal::new(10, 4).unwrap();
        assert!(b.append_column(&a).is_err());
    }
}
