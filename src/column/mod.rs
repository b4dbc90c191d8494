//! Typed columns and the contract they share.
//!
//! Every concrete column implements [`Column`]. Composite columns own their
//! inner columns through [`ColumnRef`], so any nesting the type grammar
//! allows is expressible, and callers recover the concrete type with
//! [`as_strict`](dyn Column::as_strict).
//!
//! Loading is all-or-nothing: when [`Column::load`] fails the column still
//! holds exactly the rows it held before the call. Bytes already consumed
//! from the input are not given back.

mod array;
mod date;
mod decimal;
mod factory;
mod ip;
mod lowcardinality;
mod nullable;
mod numeric;
mod string;
mod tuple;
mod uuid;

use std::{any::Any, fmt, mem};

pub use array::ColumnArray;
pub use date::{ColumnDate, ColumnDate32, ColumnDateTime, ColumnDateTime64};
pub use decimal::ColumnDecimal;
pub use factory::{create_column, create_column_with};
pub use ip::{ColumnIPv4, ColumnIPv6};
pub use lowcardinality::ColumnLowCardinality;
pub use nullable::ColumnNullable;
pub use numeric::*;
pub use string::{ColumnFixedString, ColumnString};
pub use tuple::ColumnTuple;
pub use uuid::ColumnUuid;

use crate::{
    error::{ColumnError, ColumnResult},
    observability::log_debug,
    serdes::{Input, Output},
    types::Type,
    value::Value,
};

/// Owned handle to a column of any concrete type.
pub type ColumnRef = Box<dyn Column>;

/// Capabilities shared by every column.
pub trait Column: fmt::Debug + Send + Sync + 'static {
    /// Descriptor of this column, fixed for its lifetime.
    fn column_type(&self) -> &Type;

    /// Number of rows.
    fn size(&self) -> usize;

    /// Whether the column holds no rows.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Element at `index` as a [`Value`].
    fn value_at(&self, index: usize) -> ColumnResult<Value>;

    /// Append one element given as a [`Value`].
    fn append_value(&mut self, value: Value) -> ColumnResult<()>;

    /// Append the type's default element (zero, empty string, ...).
    fn append_default(&mut self);

    /// Append every row of `other`, which must have the same type.
    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()>;

    /// Independent copy of rows `[offset, offset + len)`.
    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef>;

    /// New empty column with the same type.
    fn clone_empty(&self) -> ColumnRef;

    /// Remove all rows, keeping the type.
    fn clear(&mut self);

    /// Reserve room for `additional` more rows.
    fn reserve(&mut self, additional: usize);

    /// Exchange contents with `other`, which must have the same type.
    fn swap(&mut self, other: &mut dyn Column) -> ColumnResult<()>;

    /// Write the state prefix that precedes column bodies in a block.
    fn save_prefix(&self, _output: &mut dyn Output) -> ColumnResult<()> {
        Ok(())
    }

    /// Read the state prefix written by [`save_prefix`](Column::save_prefix).
    fn load_prefix(&mut self, _input: &mut dyn Input, _rows: usize) -> ColumnResult<()> {
        Ok(())
    }

    /// Write every row in the native format.
    fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()>;

    /// Decode and append exactly `rows` rows. On failure the column is left
    /// as it was.
    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()>;

    /// Prefix followed by body.
    fn save(&self, output: &mut dyn Output) -> ColumnResult<()> {
        self.save_prefix(output)?;
        self.save_body(output)
    }

    /// Prefix followed by body; see [`load_body`](Column::load_body).
    fn load(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        let result = self
            .load_prefix(input, rows)
            .and_then(|_| self.load_body(input, rows));
        if let Err(err) = &result {
            log_debug!(
                component = "column",
                event = "load_failed",
                column_type = %self.column_type(),
                rows,
                error = %err,
            );
        }
        result
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn Column {
    /// Downcast to `T`, or `None` for any other concrete type.
    pub fn as_typed<T: Column>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutable variant of [`as_typed`](Self::as_typed).
    pub fn as_typed_mut<T: Column>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Downcast to `T`, failing with [`ColumnError::TypeMismatch`].
    pub fn as_strict<T: Column>(&self) -> ColumnResult<&T> {
        let actual = self.column_type().name();
        self.as_typed::<T>()
            .ok_or_else(|| ColumnError::type_mismatch(short_type_name::<T>(), actual))
    }

    /// Mutable variant of [`as_strict`](Self::as_strict).
    pub fn as_strict_mut<T: Column>(&mut self) -> ColumnResult<&mut T> {
        let actual = self.column_type().name();
        self.as_typed_mut::<T>()
            .ok_or_else(|| ColumnError::type_mismatch(short_type_name::<T>(), actual))
    }

    /// Owning variant of [`as_strict`](Self::as_strict).
    pub fn into_strict<T: Column>(self: Box<Self>) -> ColumnResult<Box<T>> {
        let actual = self.column_type().name();
        self.into_any()
            .downcast::<T>()
            .map_err(|_| ColumnError::type_mismatch(short_type_name::<T>(), actual))
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Checks that `other` has `this`'s type and returns it downcast.
pub(crate) fn same_column<'a, C: Column>(this: &C, other: &'a dyn Column) -> ColumnResult<&'a C> {
    if this.column_type() != other.column_type() {
        return Err(ColumnError::type_mismatch(
            this.column_type(),
            other.column_type(),
        ));
    }
    other
        .as_typed::<C>()
        .ok_or_else(|| ColumnError::type_mismatch(this.column_type(), other.column_type()))
}

pub(crate) fn swap_column<C: Column>(this: &mut C, other: &mut dyn Column) -> ColumnResult<()> {
    if this.column_type() != other.column_type() {
        return Err(ColumnError::type_mismatch(
            this.column_type(),
            other.column_type(),
        ));
    }
    let expected = this.column_type().clone();
    let actual = other.column_type().clone();
    let other = other
        .as_typed_mut::<C>()
        .ok_or_else(|| ColumnError::type_mismatch(expected, actual))?;
    mem::swap(this, other);
    Ok(())
}

/// Rejects a row count whose smallest possible encoding exceeds the input.
pub(crate) fn check_rows_fit(
    input: &mut dyn Input,
    rows: usize,
    ty: &Type,
) -> ColumnResult<()> {
    let needed = rows.checked_mul(ty.min_wire_width()).ok_or_else(|| {
        crate::error::CodecError::Malformed(format!("{rows} rows of {ty} overflow usize"))
    })?;
    input.ensure(needed)?;
    Ok(())
}

/// `Any` plumbing and `swap`, identical for every column.
macro_rules! impl_column_common {
    () => {
        fn swap(
            &mut self,
            other: &mut dyn $crate::column::Column,
        ) -> $crate::error::ColumnResult<()> {
            $crate::column::swap_column(self, other)
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }

        fn into_any(self: Box<Self>) -> Box<dyn ::std::any::Any> {
            self
        }
    };
}

pub(crate) use impl_column_common;
