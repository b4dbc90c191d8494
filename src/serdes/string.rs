use super::{varint::varint_len, Decode, Encode, Input, Output};
use crate::error::CodecError;

impl Encode for [u8] {
    fn encode<W>(&self, writer: &mut W) -> Result<(), CodecError>
    where
        W: Output + ?Sized,
    {
        writer.write_varint(self.len() as u64)?;
        writer.write_bytes(self)
    }

    fn size(&self) -> usize {
        varint_len(self.len() as u64) + self.len()
    }
}

impl Decode for Vec<u8> {
    fn decode<R>(reader: &mut R) -> Result<Self, CodecError>
    where
        R: Input + ?Sized,
    {
        let len = reader.read_varint()?;
        let len = usize::try_from(len)
            .map_err(|_| CodecError::Malformed(format!("string length {len} too large")))?;
        // Checked before allocating.
        reader.ensure(len)?;
        let mut buf = vec![0u8; len];
        reader.read_bytes(&mut buf)?;

        Ok(buf)
    }
}
