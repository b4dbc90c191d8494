use super::{check_rows_fit, impl_column_common, same_column, Column, ColumnRef, ColumnUInt64};
use crate::{
    error::{check_index, check_slice, CodecError, ColumnError, ColumnResult},
    serdes::{Input, Output},
    types::Type,
    value::Value,
};

/// `Array(T)`: variable-length runs of a nested column.
///
/// `offsets[i]` is the cumulative end position of row `i` in the nested
/// column. Wire format: `size()` little-endian `u64` offsets, then the nested
/// body for `offsets[size() - 1]` elements.
#[derive(Debug)]
pub struct ColumnArray {
    type_: Type,
    nested: ColumnRef,
    offsets: ColumnUInt64,
}

impl ColumnArray {
    /// Empty array column whose elements have `nested`'s type. Rows already
    /// in `nested` are discarded.
    pub fn new(mut nested: ColumnRef) -> Self {
        nested.clear();
        Self {
            type_: Type::array(nested.column_type().clone()),
            nested,
            offsets: ColumnUInt64::new(),
        }
    }

    /// Append one row whose elements are every row of `elements`.
    pub fn append_as_column(&mut self, elements: &dyn Column) -> ColumnResult<()> {
        self.nested.append_column(elements)?;
        self.offsets.append(self.nested.size() as u64);
        Ok(())
    }

    /// Elements of row `index` as a standalone column.
    pub fn at(&self, index: usize) -> ColumnResult<ColumnRef> {
        let (start, end) = self.bounds(index)?;
        self.nested.slice(start, end - start)
    }

    /// Number of elements in row `index`.
    pub fn size_at(&self, index: usize) -> ColumnResult<usize> {
        let (start, end) = self.bounds(index)?;
        Ok(end - start)
    }

    /// Every element of every row.
    pub fn nested(&self) -> &dyn Column {
        &*self.nested
    }

    pub fn offsets(&self) -> &[u64] {
        self.offsets.data()
    }

    fn end_offset(&self) -> u64 {
        self.offsets.data().last().copied().unwrap_or(0)
    }

    fn bounds(&self, index: usize) -> ColumnResult<(usize, usize)> {
        check_index(index, self.size())?;
        let offsets = self.offsets.data();
        let start = if index == 0 { 0 } else { offsets[index - 1] };
        Ok((start as usize, offsets[index] as usize))
    }
}

impl Column for ColumnArray {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.offsets.size()
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        let (start, end) = self.bounds(index)?;
        (start..end)
            .map(|i| self.nested.value_at(i))
            .collect::<ColumnResult<Vec<_>>>()
            .map(Value::Array)
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(ColumnError::type_mismatch(&self.type_, other.kind())),
        };
        let mut staged = self.nested.clone_empty();
        staged.reserve(items.len());
        for item in items {
            staged.append_value(item)?;
        }
        self.append_as_column(&*staged)
    }

    fn append_default(&mut self) {
        self.offsets.append(self.end_offset());
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        let base = self.end_offset();
        self.nested.append_column(&*other.nested)?;
        for end in other.offsets.iter() {
            self.offsets.append(base + end);
        }
        Ok(())
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        check_slice(offset, len, self.size())?;
        let offsets = self.offsets.data();
        let start = if offset == 0 { 0 } else { offsets[offset - 1] };
        let end = if len == 0 { start } else { offsets[offset + len - 1] };
        Ok(Box::new(Self {
            type_: self.type_.clone(),
            nested: self
                .nested
                .slice(start as usize, (end - start) as usize)?,
            offsets: offsets[offset..offset + len]
                .iter()
                .map(|e| e - start)
                .collect::<Vec<_>>()
                .into(),
        }))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self {
            type_: self.type_.clone(),
            nested: self.nested.clone_empty(),
            offsets: ColumnUInt64::new(),
        })
    }

    fn clear(&mut self) {
        self.nested.clear();
        self.offsets.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.offsets.reserve(additional);
    }

    fn save_prefix(&self, output: &mut dyn Output) -> ColumnResult<()> {
        self.nested.save_prefix(output)
    }

    fn load_prefix(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        self.nested.load_prefix(input, rows)
    }

    fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()> {
        self.offsets.save_words(output)?;
        self.nested.save_body(output)
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        let mut offsets = ColumnUInt64::new();
        offsets.load_words(input, rows)?;

        let mut previous = 0;
        for end in offsets.iter() {
            if end < previous {
                return Err(CodecError::Malformed(format!(
                    "array offsets decrease from {previous} to {end}"
                ))
                .into());
            }
            previous = end;
        }
        let elements = usize::try_from(previous).map_err(|_| {
            CodecError::Malformed(format!("{previous} array elements overflow usize"))
        })?;
        check_rows_fit(input, elements, self.nested.column_type())?;

        let mut staged = self.nested.clone_empty();
        staged.load_body(input, elements)?;
        let base = self.end_offset();
        self.nested.append_column(&*staged)?;
        for end in offsets.iter() {
            self.offsets.append(base + end);
        }
        Ok(())
    }

    impl_column_common!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnString, ColumnUInt8};

    fn array_of_u8(rows: &[&[u8]]) -> ColumnArray {
        let mut column = ColumnArray::new(Box::new(ColumnUInt8::new()));
        for row in rows {
            column
                .append_as_column(&ColumnUInt8::from(row.to_vec()))
                .unwrap();
        }
        column
    }

    #[test]
    fn offsets_are_cumulative() {
        let column = array_of_u8(&[&[1, 2], &[], &[3]]);
        assert_eq!(column.offsets(), &[2, 2, 3]);
        assert_eq!(column.size_at(1).unwrap(), 0);

        let row = column.at(0).unwrap();
        assert_eq!(row.as_strict::<ColumnUInt8>().unwrap().data(), &[1, 2]);
        assert_eq!(
            column.value_at(2).unwrap(),
            Value::Array(vec![Value::UInt8(3)])
        );
        assert!(column.at(3).is_err());
    }

    #[test]
    fn wire_is_offsets_then_elements() {
        let column = array_of_u8(&[&[7], &[8, 9]]);
        let mut buf = Vec::new();
        column.save(&mut buf).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.extend_from_slice(&3u64.to_le_bytes());
        expected.extend_from_slice(&[7, 8, 9]);
        assert_eq!(buf, expected);

        let mut loaded = array_of_u8(&[&[1]]);
        loaded.load(&mut buf.as_slice(), 2).unwrap();
        assert_eq!(loaded.offsets(), &[1, 2, 4]);
        assert_eq!(
            loaded.value_at(2).unwrap(),
            Value::Array(vec![Value::UInt8(8), Value::UInt8(9)])
        );
    }

    #[test]
    fn load_rejects_decreasing_offsets() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&2u64.to_le_bytes());
        buf.extend_from_slice(&1u64.to_le_bytes());
        buf.extend_from_slice(&[0, 0]);

        let mut column = array_of_u8(&[]);
        let err = column.load(&mut buf.as_slice(), 2).unwrap_err();
        assert!(matches!(err, ColumnError::Codec(CodecError::Malformed(_))));
        assert_eq!(column.size(), 0);
    }

    #[test]
    fn load_rejects_element_count_beyond_input() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&u64::MAX.to_le_bytes());

        let mut column = ColumnArray::new(Box::new(ColumnString::new()));
        assert!(column.load(&mut buf.as_slice(), 1).is_err());
        assert_eq!(column.nested().size(), 0);
    }

    #[test]
    fn slice_rebases_offsets() {
        let column = array_of_u8(&[&[1], &[2, 3], &[4, 5, 6]]);
        let slice = column.slice(1, 2).unwrap();
        let slice = slice.as_strict::<ColumnArray>().unwrap();
        assert_eq!(slice.offsets(), &[2, 5]);
        assert_eq!(slice.nested().size(), 5);
        assert_eq!(column.slice(3, 0).unwrap().size(), 0);
    }

    #[test]
    fn append_value_is_staged() {
        let mut column = array_of_u8(&[&[1]]);
        let bad = Value::Array(vec![Value::UInt8(2), Value::from("x")]);
        assert!(column.append_value(bad).is_err());
        assert_eq!(column.nested().size(), 1);

        column.append_default();
        assert_eq!(column.offsets(), &[1, 1]);
    }
}
