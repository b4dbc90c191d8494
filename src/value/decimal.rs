use std::{fmt, str::FromStr};

use crate::error::ColumnError;

/// Exact fixed-point number: `mantissa * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u8,
}

pub(crate) fn pow10(exp: u8) -> Option<i128> {
    10i128.checked_pow(u32::from(exp))
}

impl Decimal {
    /// Build from an already scaled integer.
    pub const fn new(mantissa: i128, scale: u8) -> Self {
        Self { mantissa, scale }
    }

    /// Raw scaled integer.
    pub const fn mantissa(&self) -> i128 {
        self.mantissa
    }

    /// Digits after the decimal point.
    pub const fn scale(&self) -> u8 {
        self.scale
    }

    /// Number of decimal digits in the mantissa (at least one).
    pub fn digits(&self) -> u32 {
        let mut magnitude = self.mantissa.unsigned_abs();
        let mut digits = 1;
        while magnitude >= 10 {
            magnitude /= 10;
            digits += 1;
        }
        digits
    }

    /// Same value at another scale. `None` when digits would be dropped or the
    /// mantissa overflows.
    pub fn rescale(&self, scale: u8) -> Option<Decimal> {
        if scale >= self.scale {
            let factor = pow10(scale - self.scale)?;
            let mantissa = self.mantissa.checked_mul(factor)?;
            Some(Decimal::new(mantissa, scale))
        } else {
            let factor = pow10(self.scale - scale)?;
            if self.mantissa % factor != 0 {
                return None;
            }
            Some(Decimal::new(self.mantissa / factor, scale))
        }
    }

    /// Round `value` to `scale` digits. `None` for non-finite or oversized input.
    pub fn from_f64(value: f64, scale: u8) -> Option<Decimal> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * 10f64.powi(i32::from(scale))).round();
        if scaled.abs() >= 1e38 {
            return None;
        }
        Some(Decimal::new(scaled as i128, scale))
    }

    /// Nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(i32::from(self.scale))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let scale = usize::from(self.scale);
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int, frac) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int}.{frac}")
    }
}

impl FromStr for Decimal {
    type Err = ColumnError;

    /// Parses `[-+]digits[.digits]`; the scale is the number of fraction digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColumnError::InvalidValue(format!("invalid decimal literal {s:?}"));
        let trimmed = s.trim();
        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (int, frac) = body.split_once('.').unwrap_or((body, ""));
        if int.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let scale = u8::try_from(frac.len()).map_err(|_| invalid())?;

        let mut mantissa: i128 = 0;
        for b in int.bytes().chain(frac.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(b - b'0')))
                .ok_or_else(invalid)?;
        }
        if negative {
            mantissa = -mantissa;
        }
        Ok(Decimal::new(mantissa, scale))
    }
}
