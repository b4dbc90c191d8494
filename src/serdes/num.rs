use std::mem::size_of;

use super::{Decode, Encode, Input, Output};
use crate::error::CodecError;

macro_rules! implement_encode_decode {
    ($struct_name:ty) => {
        impl Encode for $struct_name {
            fn encode<W>(&self, writer: &mut W) -> Result<(), CodecError>
            where
                W: Output + ?Sized,
            {
                writer.write_bytes(&self.to_le_bytes())
            }

            fn size(&self) -> usize {
                size_of::<Self>()
            }
        }

        impl Decode for $struct_name {
            fn decode<R>(reader: &mut R) -> Result<Self, CodecError>
            where
                R: Input + ?Sized,
            {
                let buf = {
                    let mut buf = [0; size_of::<Self>()];
                    reader.read_bytes(&mut buf)?;
                    buf
                };

                Ok(Self::from_le_bytes(buf))
            }
        }
    };
}

implement_encode_decode!(i8);
implement_encode_decode!(i16);
implement_encode_decode!(i32);
implement_encode_decode!(i64);
implement_encode_decode!(i128);
implement_encode_decode!(u8);
implement_encode_decode!(u16);
implement_encode_decode!(u32);
implement_encode_decode!(u64);
implement_encode_decode!(u128);
implement_encode_decode!(f32);
implement_encode_decode!(f64);
