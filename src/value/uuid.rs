use std::{fmt, str::FromStr};

use crate::error::ColumnError;

/// 128-bit UUID split into the two halves the native format transmits.
///
/// On the wire each half is a little-endian `u64`, `high` first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uuid {
    /// First 8 bytes of the textual form.
    pub high: u64,
    /// Last 8 bytes of the textual form.
    pub low: u64,
}

impl Uuid {
    pub const fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    pub const fn from_u128(value: u128) -> Self {
        Self {
            high: (value >> 64) as u64,
            low: value as u64,
        }
    }

    pub const fn as_u128(&self) -> u128 {
        ((self.high as u128) << 64) | self.low as u128
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.as_u128();
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            (v >> 96) as u32,
            (v >> 80) as u16,
            (v >> 64) as u16,
            (v >> 48) as u16,
            v & 0xffff_ffff_ffff
        )
    }
}

impl FromStr for Uuid {
    type Err = ColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex: String = s.chars().filter(|c| *c != '-').collect();
        if hex.len() != 32 {
            return Err(ColumnError::InvalidValue(format!("invalid uuid {s:?}")));
        }
        u128::from_str_radix(&hex, 16)
            .map(Uuid::from_u128)
            .map_err(|_| ColumnError::InvalidValue(format!("invalid uuid {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trip() {
        let text = "61f0c404-5cb3-11e7-907b-a6006ad3dba0";
        let uuid: Uuid = text.parse().unwrap();
        assert_eq!(uuid.high, 0x61f0c4045cb311e7);
        assert_eq!(uuid.low, 0x907ba6006ad3dba0);
        assert_eq!(uuid.to_string(), text);
        assert!("61f0c404".parse::<Uuid>().is_err());
    }
}
