use std::net::{Ipv4Addr, Ipv6Addr};

use super::{check_rows_fit, impl_column_common, same_column, Column, ColumnRef};
use crate::{
    column::ColumnUInt32,
    error::{check_index, check_slice, ColumnResult},
    serdes::{Input, Output},
    types::Type,
    value::Value,
};

/// Column of IPv4 addresses.
///
/// The database stores IPv4 as a `UInt32` holding the numeric address, so
/// `1.2.3.4` goes on the wire as `04 03 02 01`.
#[derive(Debug, Clone)]
pub struct ColumnIPv4 {
    type_: Type,
    data: ColumnUInt32,
}

impl Default for ColumnIPv4 {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnIPv4 {
    pub fn new() -> Self {
        Self {
            type_: Type::IPv4,
            data: ColumnUInt32::new(),
        }
    }

    pub fn append(&mut self, addr: Ipv4Addr) {
        self.data.append(u32::from(addr));
    }

    pub fn at(&self, index: usize) -> ColumnResult<Ipv4Addr> {
        self.data.at(index).map(Ipv4Addr::from)
    }
}

impl Column for ColumnIPv4 {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.data.size()
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        self.at(index).map(Value::IPv4)
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        self.append(Ipv4Addr::try_from(value)?);
        Ok(())
    }

    fn append_default(&mut self) {
        self.data.append(0);
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from(&other.data);
        Ok(())
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        Ok(Box::new(Self {
            type_: self.type_.clone(),
            data: self.data.slice_typed(offset, len)?,
        }))
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
        self.data.save_words(output)
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        self.data.load_words(input, rows)
    }

    impl_column_common!();
}

/// Column of IPv6 addresses, 16 bytes each in network order.
#[derive(Debug, Clone)]
pub struct ColumnIPv6 {
    type_: Type,
    data: Vec<Ipv6Addr>,
}

impl Default for ColumnIPv6 {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnIPv6 {
    pub fn new() -> Self {
        Self {
            type_: Type::IPv6,
            data: Vec::new(),
        }
    }

    pub fn append(&mut self, addr: Ipv6Addr) {
        self.data.push(addr);
    }

    pub fn at(&self, index: usize) -> ColumnResult<Ipv6Addr> {
        check_index(index, self.data.len())?;
        Ok(self.data[index])
    }
}

impl Column for ColumnIPv6 {
    fn column_type(&self) -> &Type {
        &self.type_
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn value_at(&self, index: usize) -> ColumnResult<Value> {
        self.at(index).map(Value::IPv6)
    }

    fn append_value(&mut self, value: Value) -> ColumnResult<()> {
        self.append(Ipv6Addr::try_from(value)?);
        Ok(())
    }

    fn append_default(&mut self) {
        self.data.push(Ipv6Addr::UNSPECIFIED);
    }

    fn append_column(&mut self, other: &dyn Column) -> ColumnResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from_slice(&other.data);
        Ok(())
    }

    fn slice(&self, offset: usize, len: usize) -> ColumnResult<ColumnRef> {
        check_slice(offset, len, self.data.len())?;
        Ok(Box::new(Self {
            type_: self.type_.clone(),
            data: self.data[offset..offset + len].to_vec(),
        }))
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
        let mut buf = Vec::with_capacity(self.data.len() * 16);
        for addr in &self.data {
            buf.extend_from_slice(&addr.octets());
        }
        output.write_bytes(&buf)?;
        Ok(())
    }

    fn load_body(&mut self, input: &mut dyn Input, rows: usize) -> ColumnResult<()> {
        check_rows_fit(input, rows, &self.type_)?;
        let mut buf = vec![0u8; rows * 16];
        input.read_bytes(&mut buf)?;
        self.data.extend(buf.chunks_exact(16).map(|chunk| {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(chunk);
            Ipv6Addr::from(octets)
        }));
        Ok(())
    }

    impl_column_common!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_is_numeric_little_endian() {
        let mut column = ColumnIPv4::new();
        column.append(Ipv4Addr::new(1, 2, 3, 4));
        column.append(Ipv4Addr::LOCALHOST);

        let mut buf = Vec::new();
        column.save(&mut buf).unwrap();
        assert_eq!(&buf[..4], &[4, 3, 2, 1]);

        let mut loaded = ColumnIPv4::new();
        loaded.load(&mut buf.as_slice(), 2).unwrap();
        assert_eq!(loaded.at(1).unwrap(), Ipv4Addr::LOCALHOST);
    }

    #[test]
    fn ipv6_is_network_order() {
        let addr: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let mut column = ColumnIPv6::new();
        column.append(addr);

        let mut buf = Vec::new();
        column.save(&mut buf).unwrap();
        assert_eq!(buf, addr.octets().to_vec());

        let mut loaded = ColumnIPv6::new();
        assert!(loaded.load(&mut &buf[..15], 1).is_err());
        assert_eq!(loaded.size(), 0);
        loaded.load(&mut buf.as_slice(), 1).unwrap();
        assert_eq!(loaded.value_at(0).unwrap(), Value::IPv6(addr));
    }
}
