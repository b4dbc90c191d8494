//! Export of columns as Arrow arrays.
//!
//! | Column | Arrow |
//! |---|---|
//! | integers, floats | primitive array of the same width (`Int128` as `Decimal128(38, 0)`) |
//! | `String` / `FixedString(N)` | `Binary` / `FixedSizeBinary(N)` |
//! | `Date`, `Date32` | `Date32` |
//! | `DateTime`, `DateTime64(P)` | `Timestamp` at the coarsest unit that holds `P` |
//! | `Decimal(P,S)` | `Decimal128(P, S)` |
//! | `UUID`, `IPv6` / `IPv4` | `FixedSizeBinary(16)` / `UInt32` |
//! | `Nullable` | validity bitmap on the nested array |
//! | `Array`, `Tuple` | `List`, `Struct` |
//! | `LowCardinality` | `Dictionary(UInt64, _)` |

use std::sync::Arc;

use ::arrow::{
    array::{
        make_array, Array, ArrayRef, BinaryArray, Date32Array, Decimal128Array, DictionaryArray,
        FixedSizeBinaryArray, ListArray, PrimitiveArray, StructArray, TimestampMicrosecondArray,
        TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray, UInt32Array,
        UInt64Array,
    },
    buffer::{Buffer, NullBuffer, OffsetBuffer, ScalarBuffer},
    datatypes::{
        Field, Fields, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
        UInt16Type, UInt32Type, UInt64Type, UInt8Type,
    },
    error::ArrowError,
};

use crate::{
    column::{
        Column, ColumnArray, ColumnDate, ColumnDate32, ColumnDateTime, ColumnDateTime64,
        ColumnDecimal, ColumnFixedString, ColumnIPv4, ColumnIPv6, ColumnLowCardinality,
        ColumnNullable, ColumnString, ColumnTuple, ColumnUuid, ColumnVector,
    },
    error::{ColumnError, ColumnResult},
    types::Type,
};

fn arrow_error(err: ArrowError) -> ColumnError {
    ColumnError::InvalidValue(err.to_string())
}

macro_rules! primitive_array {
    ($column:expr, $native:ty, $arrow:ty) => {
        Arc::new(PrimitiveArray::<$arrow>::from(
            $column.as_strict::<ColumnVector<$native>>()?.data().to_vec(),
        )) as ArrayRef
    };
}

/// Copy `column` into an Arrow array of the matching logical type.
pub fn to_arrow(column: &dyn Column) -> ColumnResult<ArrayRef> {
    let array: ArrayRef = match column.column_type() {
        Type::Int8 => primitive_array!(column, i8, Int8Type),
        Type::Int16 => primitive_array!(column, i16, Int16Type),
        Type::Int32 => primitive_array!(column, i32, Int32Type),
        Type::Int64 => primitive_array!(column, i64, Int64Type),
        Type::UInt8 => primitive_array!(column, u8, UInt8Type),
        Type::UInt16 => primitive_array!(column, u16, UInt16Type),
        Type::UInt32 => primitive_array!(column, u32, UInt32Type),
        Type::UInt64 => primitive_array!(column, u64, UInt64Type),
        Type::Float32 => primitive_array!(column, f32, Float32Type),
        Type::Float64 => primitive_array!(column, f64, Float64Type),
        Type::Int128 => {
            let values = column.as_strict::<ColumnVector<i128>>()?.data().to_vec();
            Arc::new(
                Decimal128Array::from(values)
                    .with_precision_and_scale(38, 0)
                    .map_err(arrow_error)?,
            )
        }
        Type::String => Arc::new(BinaryArray::from_iter_values(
            column.as_strict::<ColumnString>()?.iter(),
        )),
        Type::FixedString(width) => {
            let column = column.as_strict::<ColumnFixedString>()?;
            fixed_size_binary(*width, column.iter().flatten().copied().collect())?
        }
        Type::Date => {
            let column = column.as_strict::<ColumnDate>()?;
            let days = (0..column.size())
                .map(|i| column.at(i).map(i32::from))
                .collect::<ColumnResult<Vec<_>>>()?;
            Arc::new(Date32Array::from(days))
        }
        Type::Date32 => {
            let column = column.as_strict::<ColumnDate32>()?;
            let days = (0..column.size())
                .map(|i| column.at(i))
                .collect::<ColumnResult<Vec<_>>>()?;
            Arc::new(Date32Array::from(days))
        }
        Type::DateTime { timezone } => {
            let column = column.as_strict::<ColumnDateTime>()?;
            let seconds = (0..column.size())
                .map(|i| column.at(i).map(i64::from))
                .collect::<ColumnResult<Vec<_>>>()?;
            Arc::new(TimestampSecondArray::from(seconds).with_timezone_opt(timezone.clone()))
        }
        Type::DateTime64 {
            precision,
            timezone,
        } => datetime64(column.as_strict::<ColumnDateTime64>()?, *precision, timezone)?,
        Type::Decimal { precision, scale } => {
            let column = column.as_strict::<ColumnDecimal>()?;
            let values = (0..column.size())
                .map(|i| column.raw_at(i))
                .collect::<ColumnResult<Vec<_>>>()?;
            Arc::new(
                Decimal128Array::from(values)
                    .with_precision_and_scale(*precision, *scale as i8)
                    .map_err(arrow_error)?,
            )
        }
        Type::Uuid => {
            let column = column.as_strict::<ColumnUuid>()?;
            let bytes = column
                .iter()
                .flat_map(|uuid| uuid.as_u128().to_be_bytes())
                .collect();
            fixed_size_binary(16, bytes)?
        }
        Type::IPv4 => {
            let column = column.as_strict::<ColumnIPv4>()?;
            let addrs = (0..column.size())
                .map(|i| column.at(i).map(u32::from))
                .collect::<ColumnResult<Vec<_>>>()?;
            Arc::new(UInt32Array::from(addrs))
        }
        Type::IPv6 => {
            let column = column.as_strict::<ColumnIPv6>()?;
            let mut bytes = Vec::with_capacity(column.size() * 16);
            for i in 0..column.size() {
                bytes.extend_from_slice(&column.at(i)?.octets());
            }
            fixed_size_binary(16, bytes)?
        }
        Type::Nullable(_) => {
            let column = column.as_strict::<ColumnNullable>()?;
            let values = to_arrow(column.nested())?;
            let validity = NullBuffer::from(
                column
                    .nulls()
                    .iter()
                    .map(|flag| *flag == 0)
                    .collect::<Vec<_>>(),
            );
            let data = values
                .to_data()
                .into_builder()
                .nulls(Some(validity))
                .build()
                .map_err(arrow_error)?;
            make_array(data)
        }
        Type::Array(_) => {
            let column = column.as_strict::<ColumnArray>()?;
            let values = to_arrow(column.nested())?;
            let offsets = std::iter::once(Ok(0))
                .chain(column.offsets().iter().map(|end| i32::try_from(*end)))
                .collect::<Result<Vec<i32>, _>>()
                .map_err(|_| {
                    ColumnError::InvalidValue("array offsets exceed i32::MAX".into())
                })?;
            let field = Arc::new(Field::new("item", values.data_type().clone(), true));
            Arc::new(
                ListArray::try_new(
                    field,
                    OffsetBuffer::new(ScalarBuffer::from(offsets)),
                    values,
                    None,
                )
                .map_err(arrow_error)?,
            )
        }
        Type::Tuple(_) => {
            let column = column.as_strict::<ColumnTuple>()?;
            let arrays = column
                .columns()
                .map(|element| to_arrow(element))
                .collect::<ColumnResult<Vec<_>>>()?;
            let fields = arrays
                .iter()
                .enumerate()
                .map(|(i, array)| Field::new(format!("{}", i + 1), array.data_type().clone(), true))
                .collect::<Fields>();
            Arc::new(StructArray::try_new(fields, arrays, None).map_err(arrow_error)?)
        }
        Type::LowCardinality(_) => {
            let column = column.as_strict::<ColumnLowCardinality>()?;
            let values = to_arrow(column.dictionary())?;
            let validity = column.is_nullable().then(|| {
                NullBuffer::from(column.indices().iter().map(|slot| *slot != 0).collect::<Vec<_>>())
            });
            let keys = UInt64Array::new(ScalarBuffer::from(column.indices().to_vec()), validity);
            Arc::new(DictionaryArray::try_new(keys, values).map_err(arrow_error)?)
        }
    };
    Ok(array)
}

fn fixed_size_binary(width: usize, bytes: Vec<u8>) -> ColumnResult<ArrayRef> {
    let width = i32::try_from(width)
        .map_err(|_| ColumnError::InvalidValue(format!("width {width} exceeds i32::MAX")))?;
    Ok(Arc::new(
        FixedSizeBinaryArray::try_new(width, Buffer::from_vec(bytes), None)
            .map_err(arrow_error)?,
    ))
}

fn datetime64(
    column: &ColumnDateTime64,
    precision: u8,
    timezone: &Option<String>,
) -> ColumnResult<ArrayRef> {
    // Smallest Arrow unit exponent that is at least `precision`.
    let unit = match precision {
        0 => 0,
        1..=3 => 3,
        4..=6 => 6,
        _ => 9,
    };
    let factor = 10i64.pow(u32::from(unit - precision));
    let ticks = (0..column.size())
        .map(|i| {
            let tick = column.at(i)?;
            tick.checked_mul(factor).ok_or_else(|| {
                ColumnError::InvalidValue(format!("{tick} overflows a {unit}-digit timestamp"))
            })
        })
        .collect::<ColumnResult<Vec<_>>>()?;
    let timezone = timezone.clone();
    Ok(match unit {
        0 => Arc::new(TimestampSecondArray::from(ticks).with_timezone_opt(timezone)),
        3 => Arc::new(TimestampMillisecondArray::from(ticks).with_timezone_opt(timezone)),
        6 => Arc::new(TimestampMicrosecondArray::from(ticks).with_timezone_opt(timezone)),
        _ => Arc::new(TimestampNanosecondArray::from(ticks).with_timezone_opt(timezone)),
    })
}

#[cfg(test)]
mod tests {
    use ::arrow::{
        array::{Array, AsArray},
        datatypes::{DataType, TimeUnit},
    };

    use super::*;
    use crate::{column::create_column, value::Value};

    fn column_of(name: &str, values: Vec<Value>) -> Box<dyn Column> {
        let mut column = create_column(&name.parse().unwrap()).unwrap();
        for value in values {
            column.append_value(value).unwrap();
        }
        column
    }

    #[test]
    fn nullable_strings_become_binary_with_nulls() {
        let column = column_of(
            "Nullable(String)",
            vec![Value::from("a"), Value::Null, Value::from("c")],
        );
        let array = to_arrow(&*column).unwrap();
        assert_eq!(array.data_type(), &DataType::Binary);
        assert_eq!(array.null_count(), 1);
        assert!(array.is_null(1));
        assert_eq!(array.as_binary::<i32>().value(2), b"c");
    }

    #[test]
    fn datetime64_widens_to_arrow_unit() {
        let mut column = ColumnDateTime64::new(2).unwrap();
        column.append(150);
        let array = to_arrow(&column).unwrap();
        assert_eq!(
            array.data_type(),
            &DataType::Timestamp(TimeUnit::Millisecond, None)
        );
        let values = array.as_primitive::<::arrow::datatypes::TimestampMillisecondType>();
        assert_eq!(values.value(0), 1_500);
    }

    #[test]
    fn nested_types() {
        let column = column_of(
            "Array(Tuple(UInt8, Decimal(10,5)))",
            vec![Value::Array(vec![Value::Tuple(vec![
                Value::UInt8(1),
                Value::Decimal("3.14159".parse().unwrap()),
            ])])],
        );
        let array = to_arrow(&*column).unwrap();
        let list = array.as_list::<i32>();
        assert_eq!(list.value_length(0), 1);
        let tuple = list.values().as_struct();
        assert_eq!(tuple.num_columns(), 2);
        assert_eq!(
            tuple.column(1).data_type(),
            &DataType::Decimal128(10, 5)
        );
    }

    #[test]
    fn low_cardinality_becomes_dictionary() {
        let column = column_of(
            "LowCardinality(Nullable(String))",
            vec![Value::from("x"), Value::Null, Value::from("x")],
        );
        let array = to_arrow(&*column).unwrap();
        assert!(matches!(array.data_type(), DataType::Dictionary(_, _)));
        assert_eq!(array.null_count(), 1);
    }
}
