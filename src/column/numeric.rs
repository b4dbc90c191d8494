use std::fmt;

use super::{check_rows_fit, impl_column_common, same_column, Column, ColumnRef};
use crate::{
    error::{check_index, check_slice, ColumnResult},
    serdes::{Input, Output},
    types::Type,
    value::Value,
};

/// Fixed-width machine words stored by [`ColumnVector`].
pub trait Primitive: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Descriptor of a column of this primitive.
    fn column_type() -> Type;

    fn into_value(self) -> Value;

    fn try_from_value(value: Value) -> ColumnResult<Self>;

    /// Write the little-endian form into `out[..WIDTH]`.
    fn write_le(&self, out: &mut [u8]);

    /// Read the little-endian form from `bytes[..WIDTH]`.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! implement_primitive {
    ($($native:ty => $ty:ident),* $(,)?) => {
        $(
            impl Primitive for $native {
                const WIDTH: usize = std::mem::size_of::<$native>();

                fn column_type() -> Type {
                    Type::$ty
                }

                fn into_value(self) -> Value {
                    Value::$ty(self)
                }

                fn try_from_value(value: Value) -> ColumnResult<Self> {
                    <$native>::try_from(value)
                }

                fn write_le(&self, out: &mut [u8]) {
                    out[..Self::WIDTH].copy_from_slice(&self.to_le_bytes());
                }

                fn read_le(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$native>()];
                    buf.copy_from_slice(&bytes[..Self::WIDTH]);
                    <$native>::from_le_bytes(buf)
                }
            }
        )*
    };
}

implement_primitive! {
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
}

/// Column of fixed-width numbers, stored as a flat `Vec<T>`.
///
/// Wire format: `size() * T::WIDTH` little-endian bytes.
#[derive(Debug, Clone)]
pub struct ColumnVector<T: Primitive> {
    type_: Type,
    data: Vec<T>,
}

pub type ColumnInt8 = ColumnVector<i8>;
pub type ColumnInt16 = ColumnVector<i16>;
pub type ColumnInt32 = ColumnVector<i32>;
pub type ColumnInt64 = ColumnVector<i64>;
pub type ColumnInt128 = ColumnVector<i128>;
pub type ColumnUInt8 = ColumnVector<u8>;
pub type ColumnUInt16 = ColumnVector<u16>;
pub type ColumnUInt32 = ColumnVector<u32>;
pub type ColumnUInt64 = ColumnVector<u64>;
pub type ColumnFloat32 = ColumnVector<f32>;
pub type ColumnFloat64 = ColumnVector<f64>;

impl<T: Primitive> Default for ColumnVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Primitive> From<Vec<T>> for ColumnVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            type_: T::column_type(),
            data,
        }
    }
}

impl<T: Primitive> ColumnVector<T> {
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    pub fn append(&mut self, value: T) {
        self.data.push(value);
    }

    pub fn at(&self, index: usize) -> ColumnResult<T> {
        check_index(index, self.data.len())?;
        Ok(self.data[index])
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }

    pub(crate) fn slice_typed(&self, offset: usize, len: usize) -> ColumnResult<Self> {
        check_slice(offset, len, self.data.len())?;
        Ok(Self {
            type_: self.type_.clone(),
            data: self.data[offset..offset + len].to_vec(),
        })
    }

    pub(crate) fn extend_from(&mut self, other: &Self) {
        self.data.extend_from_slice(&other.data);
    }

    pub(crate) fn save_words(&self, output: &mut dyn Output) -> ColumnResult<()> {
        let mut buf = vec![0u8; self.data.len() * T::WIDTH];
        for (value, chunk) in self.data.iter().zip(buf.chunks_exact_mut(T::WIDTH)) {
            value.write_le(chunk);
        }
        output.write_bytes(&buf)?;
        Ok(())
    }

    pub(crate) fn load_words(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        check_rows_fit(input, rows, &T::column_type())?;
        let mut buf = vec![0u8; rows * T::WIDTH];
        input.read_bytes(&mut buf)?;
        self.data.extend(buf.chunks_exact(T::WIDTH).map(T::read_le));
        Ok(())
    }
}

impl<T: Primitive> Column for ColumnVector<T> {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        self.at(index).map(T::into_value)
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        self.data.push(T::try_from_value(value)?);
        Ok(())
    }

    fn append_default(&mut self) {
        self.data.push(T::default());
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from_slice(&other.data);
        Ok(())
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        Ok(Box::new(self.slice_typed(offset, len)?))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self::new())
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()> {
        self.save_words(output)
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        self.load_words(input, rows)
    }

    impl_column_common!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CodecError, ColumnError};

    #[test]
    fn append_and_read_back() {
        let mut column = ColumnUInt32::new();
        for v in [1, 2, 3] {
            column.append(v);
        }
        assert_eq!(column.size(), 3);
        assert_eq!(column.at(1).unwrap(), 2);
        assert_eq!(column.value_at(2).unwrap(), Value::UInt32(3));
        assert_eq!(
            column.at(3),
            Err(ColumnError::OutOfRange { index: 3, size: 3 })
        );
    }

    #[test]
    fn wire_is_little_endian_words() {
        let column = ColumnInt16::from(vec![1, -2, 0x0102]);
        let mut buf = Vec::new();
        column.save(&mut buf).unwrap();
        assert_eq!(buf, vec![1, 0, 0xfe, 0xff, 2, 1]);

        let mut loaded = ColumnInt16::new();
        loaded.load(&mut buf.as_slice(), 3).unwrap();
        assert_eq!(loaded.data(), column.data());
    }

    #[test]
    fn truncated_load_leaves_column_untouched() {
        let mut column = ColumnUInt64::from(vec![7]);
        let bytes = [0u8; 12];
        let err = column.load(&mut &bytes[..], 2).unwrap_err();
        assert_eq!(
            err,
            ColumnError::Codec(CodecError::Truncated {
                needed: 16,
                remaining: 12
            })
        );
        assert_eq!(column.data(), &[7]);
    }

    #[test]
    fn slice_is_a_copy() {
        let mut column = ColumnFloat64::from(vec![0.5, 1.5, 2.5, 3.5]);
        let slice = column.slice(1, 2).unwrap();
        column.append(4.5);
        column.clear();

        let slice = slice.as_strict::<ColumnFloat64>().unwrap();
        assert_eq!(slice.data(), &[1.5, 2.5]);
        assert!(column.slice(3, 2).is_err());
    }

    #[test]
    fn append_value_checks_variant() {
        let mut column = ColumnInt128::new();
        column.append_value(Value::Int128(-5)).unwrap();
        assert!(column.append_value(Value::Int64(5)).is_err());
        assert_eq!(column.data(), &[-5]);
    }
}
