use super::{impl_column_common, same_column, Column, ColumnRef};
use crate::{
    column::ColumnUInt64,
    error::{check_index, check_slice, ColumnResult},
    serdes::{Input, Output},
    types::Type,
    value::{Uuid, Value},
};

/// Column of UUIDs.
///
/// Stored as interleaved `u64` halves, `high` then `low`, which is exactly
/// the native wire layout.
#[derive(Debug, Clone)]
pub struct ColumnUuid {
    type_: Type,
    data: ColumnUInt64,
}

impl Default for ColumnUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnUuid {
    pub fn new() -> Self {
        Self {
            type_: Type::Uuid,
            data: ColumnUInt64::new(),
        }
    }

    pub fn append(&mut self, value: Uuid) {
        self.data.append(value.high);
        self.data.append(value.low);
    }

    pub fn at(&self, index: usize) -> ColumnResult<Uuid> {
        check_index(index, self.size())?;
        let words = self.data.data();
        Ok(Uuid::new(words[index * 2], words[index * 2 + 1]))
    }

    pub fn iter(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.data
            .data()
            .chunks_exact(2)
            .map(|pair| Uuid::new(pair[0], pair[1]))
    }
}

impl Column for ColumnUuid {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.data.size() / 2
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        self.at(index).map(Value::Uuid)
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        self.append(Uuid::try_from(value)?);
        Ok(())
    }

    fn append_default(&mut self) {
        self.append(Uuid::default());
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from(&other.data);
        Ok(())
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        check_slice(offset, len, self.size())?;
        Ok(Box::new(Self {
            type_: self.type_.clone(),
            data: self.data.slice_typed(offset * 2, len * 2)?,
        }))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self::new())
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional * 2);
    }

    fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()> {
        self.data.save_words(output)
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        let words = rows
            .checked_mul(2)
            .ok_or_else(|| crate::error::CodecError::Malformed(format!("{rows} uuids")))?;
        self.data.load_words(input, words)
    }

    impl_column_common!();
}
