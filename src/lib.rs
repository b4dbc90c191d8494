//! Typed in-memory columns for the ClickHouse native block format.
//!
//! Each column holds an ordered run of values of one parameterized [`Type`]
//! and reads or writes itself byte-exactly in the native layout. Scalar,
//! string, date/time and decimal columns store flat buffers; `Nullable`,
//! `Array`, `Tuple` and `LowCardinality` own their inner columns through
//! [`ColumnRef`], so any nesting the type grammar allows can be built, either
//! by hand or with [`create_column`].
//!
//! ```
//! use chcolumn::{Column, ColumnNullable, ColumnString, Value};
//!
//! let mut column = ColumnNullable::new(Box::new(ColumnString::new()));
//! column.append_value(Value::from("foo")).unwrap();
//! column.append_null();
//!
//! let mut block = Vec::new();
//! column.save(&mut block).unwrap();
//!
//! let mut loaded = ColumnNullable::new(Box::new(ColumnString::new()));
//! loaded.load(&mut block.as_slice(), 2).unwrap();
//! assert_eq!(loaded.value_at(1).unwrap(), Value::Null);
//! ```

/// Columns and the [`Column`] contract.
pub mod column;

/// Column and codec errors.
pub mod error;

mod observability;

/// Options for building columns from type descriptors.
pub mod option;

/// Byte-level reader/writer and primitive codecs.
pub mod serdes;

/// Type descriptors and canonical names.
pub mod types;

/// Dynamically typed element values.
pub mod value;

/// Conversion of columns into Arrow arrays.
#[cfg(feature = "arrow")]
pub mod arrow;

pub use crate::{
    column::{
        create_column, create_column_with, Column, ColumnArray, ColumnDate, ColumnDate32,
        ColumnDateTime, ColumnDateTime64, ColumnDecimal, ColumnFixedString, ColumnIPv4,
        ColumnIPv6, ColumnLowCardinality, ColumnNullable, ColumnRef, ColumnString, ColumnTuple,
        ColumnUuid, ColumnVector,
    },
    error::{CodecError, ColumnError, ColumnResult},
    option::ColumnOptions,
    serdes::{Decode, Encode, Input, Output},
    types::Type,
    value::{Decimal, Uuid, Value},
};
