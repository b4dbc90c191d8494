use super::{impl_column_common, same_column, Column, ColumnRef};
use crate::{
    error::{check_index, ColumnError, ColumnResult},
    serdes::{Input, Output},
    types::Type,
    value::Value,
};

/// `Tuple(T1, T2, ...)`: one column per element, all of the same size.
///
/// Wire format: the element bodies in declared order.
#[derive(Debug)]
pub struct ColumnTuple {
    type_: Type,
    columns: Vec<ColumnRef>,
}

impl ColumnTuple {
    /// Fails when `columns` is empty or their sizes differ.
    pub fn new(columns: Vec<ColumnRef>) -> ColumnResult<Self> {
        let Some(first) = columns.first() else {
            return Err(ColumnError::InvalidArgument(
                "a tuple needs at least one element".into(),
            ));
        };
        let rows = first.size();
        if let Some(column) = columns.iter().find(|c| c.size() != rows) {
            return Err(ColumnError::InvalidArgument(format!(
                "tuple element {} has {} rows, expected {rows}",
                column.column_type(),
                column.size()
            )));
        }
        Ok(Self {
            type_: Type::tuple(columns.iter().map(|c| c.column_type().clone()).collect()),
            columns,
        })
    }

    /// Number of elements per row.
    pub fn tuple_size(&self) -> usize {
        self.columns.len()
    }

    /// Column of element `index`.
    pub fn column_at(&self, index: usize) -> ColumnResult<&dyn Column> {
        check_index(index, self.columns.len())?;
        Ok(&*self.columns[index])
    }

    pub fn columns(&self) -> impl Iterator<Item = &dyn Column> + '_ {
        self.columns.iter().map(|c| &**c)
    }

    fn with_columns(&self, columns: Vec<ColumnRef>) -> Self {
        Self {
            type_: self.type_.clone(),
            columns,
        }
    }

    fn empty_columns(&self) -> Vec<ColumnRef> {
        self.columns.iter().map(|c| c.clone_empty()).collect()
    }

    // Same-typed staging columns, so the appends cannot fail.
    fn commit(&mut self, staged: &[ColumnRef]) -> ColumnResult<()> {
        for (column, rows) in self.columns.iter_mut().zip(staged) {
            column.append_column(&**rows)?;
        }
        Ok(())
    }
}

impl Column for ColumnTuple {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.columns[0].size()
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        self.columns
            .iter()
            .map(|c| c.value_at(index))
            .collect::<ColumnResult<Vec<_>>>()
            .map(Value::Tuple)
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        let items = match value {
            Value::Tuple(items) if items.len() == self.columns.len() => items,
            Value::Tuple(items) => {
                return Err(ColumnError::type_mismatch(
                    &self.type_,
                    format!("Tuple of {} elements", items.len()),
                ))
            }
            other => return Err(ColumnError::type_mismatch(&self.type_, other.kind())),
        };
        let mut staged = self.empty_columns();
        for (column, item) in staged.iter_mut().zip(items) {
            column.append_value(item)?;
        }
        self.commit(&staged)
    }

    fn append_default(&mut self) {
        for column in &mut self.columns {
            column.append_default();
        }
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        self.commit(&other.columns)
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        let columns = self
            .columns
            .iter()
            .map(|c| c.slice(offset, len))
            .collect::<ColumnResult<Vec<_>>>()?;
        Ok(Box::new(self.with_columns(columns)))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(self.with_columns(self.empty_columns()))
    }

    fn clear(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
    }

    fn reserve(&mut self, additional: usize) {
        for column in &mut self.columns {
            column.reserve(additional);
        }
    }

    fn save_prefix(&self, output: &mut dyn Output) -> ColumnResult<()> {
        self.columns.iter().try_for_each(|c| c.save_prefix(output))
    }

    fn load_prefix(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        self.columns
            .iter_mut()
            .try_for_each(|c| c.load_prefix(input, rows))
    }

    fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()> {
        self.columns.iter().try_for_each(|c| c.save_body(output))
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        let mut staged = self.empty_columns();
        for column in &mut staged {
            column.load_body(input, rows)?;
        }
        self.commit(&staged)
    }

    impl_column_common!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnString, ColumnUInt64};

    fn pair() -> ColumnTuple {
        ColumnTuple::new(vec![
            Box::new(ColumnUInt64::new()),
            Box::new(ColumnString::new()),
        ])
        .unwrap()
    }

    #[test]
    fn type_lists_elements() {
        let column = pair();
        assert_eq!(column.column_type().name(), "Tuple(UInt64, String)");
        assert_eq!(column.tuple_size(), 2);
        assert!(column.column_at(2).is_err());
    }

    #[test]
    fn construction_checks_sizes() {
        assert!(ColumnTuple::new(Vec::new()).is_err());
        let result = ColumnTuple::new(vec![
            Box::new(ColumnUInt64::from(vec![1])),
            Box::new(ColumnString::new()),
        ]);
        assert!(matches!(result, Err(ColumnError::InvalidArgument(_))));
    }

    #[test]
    fn append_is_staged_across_fields() {
        let mut column = pair();
        column
            .append_value(Value::Tuple(vec![Value::UInt64(1), Value::from("one")]))
            .unwrap();

        let arity = Value::Tuple(vec![Value::UInt64(2)]);
        assert!(column.append_value(arity).is_err());
        let second_field = Value::Tuple(vec![Value::UInt64(2), Value::UInt8(2)]);
        assert!(column.append_value(second_field).is_err());

        assert_eq!(column.size(), 1);
        assert!(column.columns().all(|c| c.size() == 1));
    }

    #[test]
    fn elements_saved_in_order() {
        let mut column = pair();
        column
            .append_value(Value::Tuple(vec![Value::UInt64(3), Value::from("ab")]))
            .unwrap();

        let mut buf = Vec::new();
        column.save(&mut buf).unwrap();
        assert_eq!(buf, vec![3, 0, 0, 0, 0, 0, 0, 0, 2, b'a', b'b']);

        let mut loaded = pair();
        loaded.load(&mut buf.as_slice(), 1).unwrap();
        assert_eq!(loaded.value_at(0).unwrap(), column.value_at(0).unwrap());

        let short = &buf[..9];
        assert!(loaded.load(&mut &short[..], 1).is_err());
        assert!(loaded.columns().all(|c| c.size() == 1));
    }
}
