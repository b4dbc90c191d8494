use std::{collections::HashMap, ops::Range};

use super::{check_rows_fit, impl_column_common, same_column, Column, ColumnNullable, ColumnRef};
use crate::{
    error::{check_index, check_slice, CodecError, ColumnError, ColumnResult},
    observability::log_warn,
    serdes::{Decode, Encode, Input, Output},
    types::Type,
    value::Value,
};

/// Shared dictionaries with additional keys, the only key version the
/// native protocol sends.
const KEY_VERSION: u64 = 1;

const INDEX_WIDTH_MASK: u64 = 0xff;
const NEED_GLOBAL_DICTIONARY: u64 = 1 << 8;
const HAS_ADDITIONAL_KEYS: u64 = 1 << 9;

/// `LowCardinality(T)`: a dictionary of distinct values and one index per row.
///
/// Slot 0 of the dictionary holds the default value of `T`. For
/// `LowCardinality(Nullable(T))` slot 0 stands for null and slot 1 holds the
/// default. The dictionary itself is a plain `T` column and only grows until
/// [`clear`](Column::clear).
///
/// Wire format, after the `u64` key version prefix: `u64` serialization type
/// (index width code in the low byte plus flags), `u64` key count, the
/// dictionary body, `u64` row count and the indices at the coded width.
#[derive(Debug)]
pub struct ColumnLowCardinality {
    type_: Type,
    nullable: bool,
    default_value: Value,
    dictionary: ColumnRef,
    lookup: HashMap<Value, u64>,
    indices: Vec<u64>,
}

impl ColumnLowCardinality {
    /// Empty column whose dictionary has `dictionary`'s type. A
    /// `Nullable(T)` column makes a `LowCardinality(Nullable(T))` column
    /// backed by a plain `T` dictionary. Rows already in `dictionary` are
    /// discarded.
    pub fn new(dictionary: ColumnRef) -> ColumnResult<Self> {
        let type_ = Type::low_cardinality(dictionary.column_type().clone());
        let nullable = dictionary.column_type().is_nullable();
        let dictionary = if nullable {
            dictionary.into_strict::<ColumnNullable>()?.into_nested()
        } else {
            dictionary
        };
        if let Type::Nullable(_) | Type::Array(_) | Type::Tuple(_) | Type::LowCardinality(_) =
            dictionary.column_type()
        {
            return Err(ColumnError::InvalidArgument(format!(
                "{} cannot back a LowCardinality column",
                dictionary.column_type()
            )));
        }

        let mut probe = dictionary.clone_empty();
        probe.append_default();
        let default_value = probe.value_at(0)?;

        let mut column = Self {
            type_,
            nullable,
            default_value,
            dictionary,
            lookup: HashMap::new(),
            indices: Vec::new(),
        };
        column.reset_dictionary();
        Ok(column)
    }

    /// Whether null rows are allowed.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Distinct values, reserved slots included.
    pub fn dictionary(&self) -> &dyn Column {
        &*self.dictionary
    }

    /// Dictionary slot of every row.
    pub fn indices(&self) -> &[u64] {
        &self.indices
    }

    /// Dictionary slot of row `index`.
    pub fn index_at(&self, index: usize) -> ColumnResult<u64> {
        check_index(index, self.indices.len())?;
        Ok(self.indices[index])
    }

    pub fn at(&self, index: usize) -> ColumnResult<Value> {
        self.slot_value(self.index_at(index)?)
    }

    pub fn append(&mut self, value: impl Into<Value>) -> ColumnResult<()> {
        self.append_value(value.into())
    }

    fn empty(&self) -> Self {
        let mut column = Self {
            type_: self.type_.clone(),
            nullable: self.nullable,
            default_value: self.default_value.clone(),
            dictionary: self.dictionary.clone_empty(),
            lookup: HashMap::new(),
            indices: Vec::new(),
        };
        column.reset_dictionary();
        column
    }

    fn reset_dictionary(&mut self) {
        self.dictionary.clear();
        self.lookup.clear();
        if self.nullable {
            self.dictionary.append_default();
            self.lookup.insert(Value::Null, 0);
        }
        self.dictionary.append_default();
        self.lookup
            .insert(self.default_value.clone(), self.dictionary.size() as u64 - 1);
    }

    fn slot_value(&self, slot: u64) -> ColumnResult<Value> {
        if self.nullable && slot == 0 {
            return Ok(Value::Null);
        }
        self.dictionary.value_at(slot as usize)
    }

    /// Dictionary slot holding `value`, adding it when absent.
    fn intern(&mut self, value: Value) -> ColumnResult<u64> {
        if let Some(slot) = self.lookup.get(&value) {
            return Ok(*slot);
        }
        // The column may normalize the value (padding, rescaling), so the
        // key is whatever it reads back as.
        let mut probe = self.dictionary.clone_empty();
        probe.append_value(value)?;
        let key = probe.value_at(0)?;
        if let Some(slot) = self.lookup.get(&key) {
            return Ok(*slot);
        }
        self.dictionary.append_column(&*probe)?;
        let slot = self.dictionary.size() as u64 - 1;
        self.lookup.insert(key, slot);
        Ok(slot)
    }

    fn append_rows(&mut self, other: &Self, rows: Range<usize>) -> ColumnResult<()> {
        let mut translated: Vec<Option<u64>> = vec![None; other.dictionary.size()];
        let mut staged = Vec::with_capacity(rows.len());
        for &slot in &other.indices[rows] {
            let local = match translated[slot as usize] {
                Some(local) => local,
                None => {
                    let local = self.intern(other.slot_value(slot)?)?;
                    translated[slot as usize] = Some(local);
                    local
                }
            };
            staged.push(local);
        }
        self.indices.extend(staged);
        Ok(())
    }

    fn index_width(&self) -> (u64, usize) {
        match self.dictionary.size().saturating_sub(1) {
            n if n <= u8::MAX as usize => (0, 1),
            n if n <= u16::MAX as usize => (1, 2),
            n if n <= u32::MAX as usize => (2, 4),
            _ => (3, 8),
        }
    }

    fn read_header(&self, input: &mut dyn Input) -> ColumnResult<usize> {
        let serialization_type = u64::decode(input)?;
        if serialization_type & NEED_GLOBAL_DICTIONARY != 0 {
            log_warn!(
                component = "low_cardinality",
                event = "global_dictionary_rejected",
                column_type = %self.type_,
                serialization_type,
            );
            let message = "global dictionaries are not supported".into();
            return Err(CodecError::Malformed(message).into());
        }
        if serialization_type & HAS_ADDITIONAL_KEYS == 0 {
            log_warn!(
                component = "low_cardinality",
                event = "missing_additional_keys",
                column_type = %self.type_,
                serialization_type,
            );
            return Err(CodecError::Malformed("block carries no dictionary keys".into()).into());
        }
        match serialization_type & INDEX_WIDTH_MASK {
            0 => Ok(1),
            1 => Ok(2),
            2 => Ok(4),
            3 => Ok(8),
            code => Err(CodecError::Malformed(format!("unknown index width code {code}")).into()),
        }
    }
}

fn read_count(input: &mut dyn Input, what: &str) -> ColumnResult<usize> {
    let count = u64::decode(input)?;
    usize::try_from(count)
        .map_err(|_| CodecError::Malformed(format!("{what} count {count} overflows usize")).into())
}

impl Column for ColumnLowCardinality {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.indices.len()
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        self.at(index)
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        let slot = self.intern(value)?;
        self.indices.push(slot);
        Ok(())
    }

    fn append_default(&mut self) {
        self.indices.push(0);
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        self.append_rows(other, 0..other.size())
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        check_slice(offset, len, self.size())?;
        let mut sliced = self.empty();
        sliced.append_rows(self, offset..offset + len)?;
        Ok(Box::new(sliced))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(self.empty())
    }

    fn clear(&mut self) {
        self.indices.clear();
        self.reset_dictionary();
    }

    fn reserve(&mut self, additional: usize) {
        self.indices.reserve(additional);
    }

    fn save_prefix(&self, output: &mut dyn Output) -> ColumnResult<()> {
        KEY_VERSION.encode(output)?;
        Ok(())
    }

    fn load_prefix(&mut self, input: &mut dyn Input, _rows: usize) -> ColumnResult<()> {
        let version = u64::decode(input)?;
        if version != KEY_VERSION {
            return Err(CodecError::Malformed(format!(
                "unsupported dictionary key version {version}"
            ))
            .into());
        }
        Ok(())
    }

    fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()> {
        let (code, width) = self.index_width();
        (code | HAS_ADDITIONAL_KEYS).encode(output)?;
        (self.dictionary.size() as u64).encode(output)?;
        self.dictionary.save_body(output)?;
        (self.indices.len() as u64).encode(output)?;

        let mut buf = vec![0u8; self.indices.len() * width];
        for (slot, chunk) in self.indices.iter().zip(buf.chunks_exact_mut(width)) {
            chunk.copy_from_slice(&slot.to_le_bytes()[..width]);
        }
        output.write_bytes(&buf)?;
        Ok(())
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        let width = self.read_header(input)?;

        let keys = read_count(input, "dictionary key")?;
        check_rows_fit(input, keys, self.dictionary.column_type())?;
        let mut incoming = self.dictionary.clone_empty();
        incoming.load_body(input, keys)?;

        let declared = read_count(input, "row")?;
        if declared != rows {
            return Err(CodecError::Malformed(format!(
                "block declares {declared} rows, expected {rows}"
            ))
            .into());
        }
        let len = rows.checked_mul(width).ok_or_else(|| {
            CodecError::Malformed(format!("{rows} indices overflow usize"))
        })?;
        input.ensure(len)?;
        let mut buf = vec![0u8; len];
        input.read_bytes(&mut buf)?;

        let mut slots = Vec::with_capacity(rows);
        for chunk in buf.chunks_exact(width) {
            let mut word = [0u8; 8];
            word[..width].copy_from_slice(chunk);
            let slot = u64::from_le_bytes(word);
            if slot >= keys as u64 {
                return Err(CodecError::Malformed(format!(
                    "dictionary index {slot} out of range for {keys} keys"
                ))
                .into());
            }
            slots.push(slot);
        }

        let mut translated: Vec<Option<u64>> = vec![None; keys];
        let mut staged = Vec::with_capacity(rows);
        for slot in slots {
            let local = match translated[slot as usize] {
                Some(local) => local,
                None => {
                    let value = if self.nullable && slot == 0 {
                        Value::Null
                    } else {
                        incoming.value_at(slot as usize)?
                    };
                    let local = self.intern(value)?;
                    translated[slot as usize] = Some(local);
                    local
                }
            };
            staged.push(local);
        }
        self.indices.extend(staged);
        Ok(())
    }

    impl_column_common!();
}
