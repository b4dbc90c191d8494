//! Byte-level codec shared by every column.
//!
//! [`Input`] and [`Output`] are the boundary the transport layer plugs into.
//! Both are implemented for every [`bytes::Buf`] / [`bytes::BufMut`], so plain
//! slices, `Vec<u8>`, `Bytes` and `BytesMut` work out of the box. All
//! multi-byte scalars are little-endian.

mod num;
mod string;
pub mod varint;

use bytes::{Buf, BufMut};

use crate::error::CodecError;

/// Sequential, bounded source of bytes.
pub trait Input {
    /// Number of bytes that can still be read.
    fn remaining(&self) -> usize;

    /// Fill `buf` completely. Consumes nothing when fewer than `buf.len()`
    /// bytes remain.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), CodecError>;

    /// Discard exactly `n` bytes.
    fn skip(&mut self, n: usize) -> Result<(), CodecError>;

    /// Fail with [`CodecError::Truncated`] unless `needed` bytes remain.
    fn ensure(&mut self, needed: usize) -> Result<(), CodecError> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(CodecError::Truncated { needed, remaining });
        }
        Ok(())
    }

    /// Read one unsigned LEB128 varint.
    fn read_varint(&mut self) -> Result<u64, CodecError> {
        let mut value = 0u64;
        for i in 0..varint::MAX_VARINT_LEN {
            let mut byte = [0u8; 1];
            self.read_bytes(&mut byte)?;
            let byte = byte[0];
            let payload = u64::from(byte & 0x7f);
            if i == varint::MAX_VARINT_LEN - 1 && payload > 1 {
                return Err(CodecError::Malformed("varint overflows u64".into()));
            }
            value |= payload << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::Malformed("varint longer than 10 bytes".into()))
    }
}

/// Sequential sink of bytes.
pub trait Output {
    /// Append all of `data`, or nothing when a bounded sink lacks room.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), CodecError>;

    /// Write one unsigned LEB128 varint.
    fn write_varint(&mut self, value: u64) -> Result<(), CodecError> {
        let mut buf = [0u8; varint::MAX_VARINT_LEN];
        let len = varint::encode_varint(value, &mut buf);
        self.write_bytes(&buf[..len])
    }
}

impl<B> Input for B
where
    B: Buf + ?Sized,
{
    fn remaining(&self) -> usize {
        Buf::remaining(self)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), CodecError> {
        self.ensure(buf.len())?;
        self.copy_to_slice(buf);
        Ok(())
    }

    fn skip(&mut self, n: usize) -> Result<(), CodecError> {
        self.ensure(n)?;
        self.advance(n);
        Ok(())
    }
}

impl<B> Output for B
where
    B: BufMut + ?Sized,
{
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), CodecError> {
        let remaining = self.remaining_mut();
        if remaining < data.len() {
            return Err(CodecError::Overflow {
                needed: data.len(),
                remaining,
            });
        }
        self.put_slice(data);
        Ok(())
    }
}

/// Values with a fixed binary representation.
pub trait Encode {
    /// Write `self` to `writer`.
    fn encode<W>(&self, writer: &mut W) -> Result<(), CodecError>
    where
        W: Output + ?Sized;

    /// Encoded length in bytes.
    fn size(&self) -> usize;
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<W>(&self, writer: &mut W) -> Result<(), CodecError>
    where
        W: Output + ?Sized,
    {
        Encode::encode(*self, writer)
    }

    fn size(&self) -> usize {
        Encode::size(*self)
    }
}

/// Values that can be read back from their [`Encode`] form.
pub trait Decode: Sized {
    /// Read one value from `reader`.
    fn decode<R>(reader: &mut R) -> Result<Self, CodecError>
    where
        R: Input + ?Sized;
}
