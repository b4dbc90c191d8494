use super::{check_rows_fit, impl_column_common, same_column, Column, ColumnRef};
use crate::{
    error::{check_index, check_slice, CodecError, ColumnResult},
    serdes::{Input, Output},
    types::Type,
    value::Value,
};

/// `Nullable(T)`: a nested column plus one null flag per row.
///
/// A null row still occupies a slot in the nested column, holding the nested
/// type's default value, so row `i` of the mask always lines up with row `i`
/// of the nested column. Wire format: `size()` mask bytes (1 = null), then
/// the nested body.
#[derive(Debug)]
pub struct ColumnNullable {
    type_: Type,
    nested: ColumnRef,
    nulls: Vec<u8>,
}

impl ColumnNullable {
    /// Wrap `nested`. Rows it already holds are marked non-null.
    pub fn new(nested: ColumnRef) -> Self {
        Self {
            type_: Type::nullable(nested.column_type().clone()),
            nulls: vec![0; nested.size()],
            nested,
        }
    }

    /// Append a null row.
    pub fn append_null(&mut self) {
        self.nested.append_default();
        self.nulls.push(1);
    }

    pub fn is_null(&self, index: usize) -> ColumnResult<bool> {
        check_index(index, self.nulls.len())?;
        Ok(self.nulls[index] != 0)
    }

    /// Row `index`, or `None` when it is null.
    pub fn at(&self, index: usize) -> ColumnResult<Option<Value>> {
        if self.is_null(index)? {
            return Ok(None);
        }
        self.nested.value_at(index).map(Some)
    }

    /// The inner column, null rows included as default values.
    pub fn nested(&self) -> &dyn Column {
        &*self.nested
    }

    /// Null mask, one byte per row.
    pub fn nulls(&self) -> &[u8] {
        &self.nulls
    }

    /// Drop the mask and keep the inner column.
    pub fn into_nested(self) -> ColumnRef {
        self.nested
    }
}

impl Column for ColumnNullable {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.nulls.len()
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        Ok(self.at(index)?.unwrap_or(Value::Null))
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        if value.is_null() {
            self.append_null();
            return Ok(());
        }
        self.nested.append_value(value)?;
        self.nulls.push(0);
        Ok(())
    }

    fn append_default(&mut self) {
        self.append_null();
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        self.nested.append_column(&*other.nested)?;
        self.nulls.extend_from_slice(&other.nulls);
        Ok(())
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        check_slice(offset, len, self.size())?;
        Ok(Box::new(Self {
            type_: self.type_.clone(),
            nested: self.nested.slice(offset, len)?,
            nulls: self.nulls[offset..offset + len].to_vec(),
        }))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self {
            type_: self.type_.clone(),
            nested: self.nested.clone_empty(),
            nulls: Vec::new(),
        })
    }

    fn clear(&mut self) {
        self.nested.clear();
        self.nulls.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.nested.reserve(additional);
        self.nulls.reserve(additional);
    }

    fn save_prefix(&self, output: &mut dyn Output) -> ColumnResult<()> {
        self.nested.save_prefix(output)
    }

    fn load_prefix(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        self.nested.load_prefix(input, rows)
    }

    fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()> {
        output.write_bytes(&self.nulls)?;
        self.nested.save_body(output)
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        check_rows_fit(input, rows, &self.type_)?;
        let mut mask = vec![0u8; rows];
        input.read_bytes(&mut mask)?;
        if let Some(flag) = mask.iter().find(|flag| **flag > 1) {
            let message = format!("null flag {flag} is neither 0 nor 1");
            return Err(CodecError::Malformed(message).into());
        }

        let mut staged = self.nested.clone_empty();
        staged.load_body(input, rows)?;
        self.nested.append_column(&*staged)?;
        self.nulls.extend_from_slice(&mask);
        Ok(())
    }

    impl_column_common!();
}
