//! Unsigned LEB128 varints: 7 payload bits per byte, least significant group
//! first, high bit set on every byte but the last.

/// Longest encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes `value` occupies once encoded.
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Encode `value` into the front of `buf`, returning the bytes written.
///
/// `buf` must hold at least [`varint_len`] bytes.
pub fn encode_varint(mut value: u64, buf: &mut [u8]) -> usize {
    let mut i = 0;
    while value >= 0x80 {
        buf[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    i + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_lengths() {
        assert_eq!(varint_len(0), 1);
        assert_eq!(varint_len(127), 1);
        assert_eq!(varint_len(128), 2);
        assert_eq!(varint_len(16_383), 2);
        assert_eq!(varint_len(16_384), 3);
        assert_eq!(varint_len(u64::MAX), MAX_VARINT_LEN);
    }

    #[test]
    fn known_encodings() {
        let mut buf = [0u8; MAX_VARINT_LEN];

        assert_eq!(encode_varint(6, &mut buf), 1);
        assert_eq!(buf[0], 6);

        assert_eq!(encode_varint(300, &mut buf), 2);
        assert_eq!(&buf[..2], &[0xac, 0x02]);

        let written = encode_varint(u64::MAX, &mut buf);
        assert_eq!(written, MAX_VARINT_LEN);
        assert_eq!(&buf[..9], &[0xff; 9]);
        assert_eq!(buf[9], 0x01);
    }
}
