use super::{check_rows_fit, impl_column_common, same_column, Column, ColumnRef};
use crate::{
    error::{check_index, check_slice, ColumnError, ColumnResult},
    serdes::{Decode, Encode, Input, Output},
    types::Type,
    value::Value,
};

/// Column of variable-length byte strings.
///
/// Rows live back to back in one buffer; `ends[i]` is the end offset of row
/// `i`. Wire format per row: varint length followed by the raw bytes.
#[derive(Debug, Clone)]
pub struct ColumnString {
    type_: Type,
    data: Vec<u8>,
    ends: Vec<usize>,
}

impl Default for ColumnString {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnString {
    pub fn new() -> Self {
        Self {
            type_: Type::String,
            data: Vec::new(),
            ends: Vec::new(),
        }
    }

    pub fn append(&mut self, value: impl AsRef<[u8]>) {
        self.data.extend_from_slice(value.as_ref());
        self.ends.push(self.data.len());
    }

    /// Bytes of row `index`, borrowed from the column.
    pub fn at(&self, index: usize) -> ColumnResult<&[u8]> {
        check_index(index, self.ends.len())?;
        Ok(self.row(index))
    }

    /// Row `index` as UTF-8.
    pub fn at_str(&self, index: usize) -> ColumnResult<&str> {
        std::str::from_utf8(self.at(index)?)
            .map_err(|e| ColumnError::InvalidValue(e.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.ends.len()).map(|i| self.row(i))
    }

    fn start(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.ends[index - 1]
        }
    }

    fn row(&self, index: usize) -> &[u8] {
        &self.data[self.start(index)..self.ends[index]]
    }
}

impl Column for ColumnString {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.ends.len()
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        self.at(index).map(|bytes| Value::String(bytes.to_vec()))
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        self.append(Vec::<u8>::try_from(value)?);
        Ok(())
    }

    fn append_default(&mut self) {
        self.ends.push(self.data.len());
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        let base = self.data.len();
        self.data.extend_from_slice(&other.data);
        self.ends.extend(other.ends.iter().map(|end| end + base));
        Ok(())
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        check_slice(offset, len, self.size())?;
        let mut sliced = Self::new();
        if len > 0 {
            let start = self.start(offset);
            let end = self.ends[offset + len - 1];
            sliced.data = self.data[start..end].to_vec();
            sliced.ends = self.ends[offset..offset + len]
                .iter()
                .map(|e| e - start)
                .collect();
        }
        Ok(Box::new(sliced))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self::new())
    }

    fn clear(&mut self) {
        self.data.clear();
        self.ends.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.ends.reserve(additional);
    }

    fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()> {
        for row in self.iter() {
            row.encode(output)?;
        }
        Ok(())
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        check_rows_fit(input, rows, &self.type_)?;
        let (data_len, rows_len) = (self.data.len(), self.ends.len());
        self.ends.reserve(rows);
        for _ in 0..rows {
            match Vec::<u8>::decode(input) {
                Ok(bytes) => self.append(bytes),
                Err(err) => {
                    self.data.truncate(data_len);
                    self.ends.truncate(rows_len);
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    impl_column_common!();
}

/// Column of byte strings of exactly `width` bytes.
///
/// Shorter values are padded with zero bytes. Wire format: `width` raw bytes
/// per row, no length prefix.
#[derive(Debug, Clone)]
pub struct ColumnFixedString {
    type_: Type,
    width: usize,
    rows: usize,
    data: Vec<u8>,
}

impl ColumnFixedString {
    /// Empty column of `width`-byte rows. A zero width is rejected.
    pub fn new(width: usize) -> ColumnResult<Self> {
        Ok(Self {
            type_: Type::fixed_string(width)?,
            width,
            rows: 0,
            data: Vec::new(),
        })
    }

    fn empty(&self) -> Self {
        Self {
            type_: self.type_.clone(),
            width: self.width,
            rows: 0,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Append `value`, zero padded to the column width.
    pub fn append(&mut self, value: impl AsRef<[u8]>) -> ColumnResult<()> {
        let value = value.as_ref();
        if value.len() > self.width {
            return Err(ColumnError::InvalidWidth {
                width: self.width,
                actual: value.len(),
            });
        }
        self.data.extend_from_slice(value);
        self.data
            .resize(self.data.len() + self.width - value.len(), 0);
        self.rows += 1;
        Ok(())
    }

    /// All `width` bytes of row `index`, padding included.
    pub fn at(&self, index: usize) -> ColumnResult<&[u8]> {
        check_index(index, self.rows)?;
        let start = index * self.width;
        Ok(&self.data[start..start + self.width])
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.rows).map(|i| &self.data[i * self.width..(i + 1) * self.width])
    }
}

impl Column for ColumnFixedString {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.rows
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        self.at(index).map(|bytes| Value::String(bytes.to_vec()))
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        self.append(Vec::<u8>::try_from(value)?)
    }

    fn append_default(&mut self) {
        self.data.resize(self.data.len() + self.width, 0);
        self.rows += 1;
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from_slice(&other.data);
        self.rows += other.rows;
        Ok(())
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        check_slice(offset, len, self.rows)?;
        let mut sliced = self.empty();
        sliced.data = self.data[offset * self.width..(offset + len) * self.width].to_vec();
        sliced.rows = len;
        Ok(Box::new(sliced))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(self.empty())
    }

    fn clear(&mut self) {
        self.data.clear();
        self.rows = 0;
    }

    fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional * self.width);
    }

    fn save_body(&self, output: &mut dyn Output) -> ColumnResult<()> {
        output.write_bytes(&self.data)?;
        Ok(())
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        check_rows_fit(input, rows, &self.type_)?;
        let start = self.data.len();
        self.data.resize(start + rows * self.width, 0);
        if let Err(err) = input.read_bytes(&mut self.data[start..]) {
            self.data.truncate(start);
            return Err(err.into());
        }
        self.rows += rows;
        Ok(())
    }

    impl_column_common!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    #[test]
    fn string_wire_format() {
        let mut column = ColumnString::new();
        column.append("foo");
        column.append("");
        column.append(vec![b'x'; 200]);

        let mut buf = Vec::new();
        column.save(&mut buf).unwrap();
        assert_eq!(&buf[..4], &[3, b'f', b'o', b'o']);
        assert_eq!(buf[4], 0);
        assert_eq!(&buf[5..7], &[0xc8, 0x01]);
        assert_eq!(buf.len(), 7 + 200);

        let mut loaded = ColumnString::new();
        loaded.load(&mut buf.as_slice(), 3).unwrap();
        assert_eq!(loaded.at_str(0).unwrap(), "foo");
        assert_eq!(loaded.at(1).unwrap(), b"");
        assert_eq!(loaded.at(2).unwrap().len(), 200);
    }

    #[test]
    fn string_load_failure_rolls_back() {
        let mut column = ColumnString::new();
        column.append("keep");

        let buf = [3u8, b'a', b'b', b'c', 4, b'd'];
        let err = column.load(&mut &buf[..], 2).unwrap_err();
        assert!(matches!(
            err,
            ColumnError::Codec(CodecError::Truncated { .. })
        ));
        assert_eq!(column.size(), 1);
        assert_eq!(column.at(0).unwrap(), b"keep");

        column.append("next");
        assert_eq!(column.at_str(1).unwrap(), "next");
    }

    #[test]
    fn string_slice_rebases_offsets() {
        let mut column = ColumnString::new();
        for s in ["a", "bb", "ccc", "dddd"] {
            column.append(s);
        }
        let slice = column.slice(1, 2).unwrap();
        let slice = slice.as_strict::<ColumnString>().unwrap();
        assert_eq!(slice.iter().collect::<Vec<_>>(), vec![&b"bb"[..], b"ccc"]);
        assert_eq!(column.slice(4, 0).unwrap().size(), 0);
    }

    #[test]
    fn fixed_string_pads_and_rejects() {
        let mut column = ColumnFixedString::new(12).unwrap();
        column.append("foobar").unwrap();
        assert_eq!(column.at(0).unwrap(), b"foobar\0\0\0\0\0\0");

        let err = column.append("thirteen char").unwrap_err();
        assert_eq!(
            err,
            ColumnError::InvalidWidth {
                width: 12,
                actual: 13
            }
        );
        assert_eq!(column.size(), 1);

        let mut buf = Vec::new();
        column.save(&mut buf).unwrap();
        assert_eq!(buf.len(), 12);
        assert_eq!(&buf[6..], &[0u8; 6]);
    }

    #[test]
    fn fixed_string_needs_positive_width() {
        assert!(matches!(
            ColumnFixedString::new(0),
            Err(ColumnError::InvalidArgument(_))
        ));
        assert_eq!(ColumnFixedString::new(1).unwrap().width(), 1);
    }

    #[test]
    fn fixed_string_truncated_load() {
        let mut column = ColumnFixedString::new(4).unwrap();
        let buf = [1u8, 2, 3, 4, 5, 6];
        assert!(column.load(&mut &buf[..], 2).is_err());
        assert_eq!(column.size(), 0);
        column.load(&mut &buf[..], 1).unwrap();
        assert_eq!(column.at(0).unwrap(), &[1, 2, 3, 4]);
    }
}
