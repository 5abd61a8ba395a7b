//! IEEE 754-2008 128-bit decimal (binary integer decimal encoding).
//!
//! Only the conversion to a string is implemented: values are carried as
//! raw bytes and formatted with the "to-scientific-string" rules of the
//! General Decimal Arithmetic specification.
use std::fmt;

const EXPONENT_BIAS: i32 = 6176;
const EXPONENT_MASK: u64 = 0x3FFF;

const NAN_MASK: u64 = 0x7C00_0000_0000_0000;
const INFINITY_MASK: u64 = 0x7800_0000_0000_0000;
const LARGE_COEFFICIENT_MASK: u64 = 0x6000_0000_0000_0000;
const HIGH_COEFFICIENT_MASK: u64 = 0x0001_FFFF_FFFF_FFFF;

/// 10^34 - 1. Coefficients above it are non-canonical and read as zero.
const MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999;

/// Adjusted exponents below this switch to scientific notation.
const MIN_PLAIN_ADJUSTED_EXPONENT: i32 = -6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal128 {
    bytes: [u8; 16],
}

impl Decimal128 {
    /// Builds a value from its little-endian wire bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub fn bytes(&self) -> [u8; 16] {
        self.bytes
    }

    fn halves(&self) -> (u64, u64) {
        let mut low = [0; 8];
        let mut high = [0; 8];
        low.copy_from_slice(&self.bytes[..8]);
        high.copy_from_slice(&self.bytes[8..]);
        (u64::from_le_bytes(high), u64::from_le_bytes(low))
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (high, low) = self.halves();
        let negative = high >> 63 == 1;

        if high & NAN_MASK == NAN_MASK {
            return f.write_str("NaN");
        }

        if negative {
            f.write_str("-")?;
        }

        if high & INFINITY_MASK == INFINITY_MASK {
            return f.write_str("Infinity");
        }

        let (biased_exponent, coefficient) =
            if high & LARGE_COEFFICIENT_MASK == LARGE_COEFFICIENT_MASK {
                // The implicit `100` prefix always overflows the 34 digits.
                ((high >> 47) & EXPONENT_MASK, 0)
            } else {
                let coefficient = (u128::from(high & HIGH_COEFFICIENT_MASK) << 64) | u128::from(low);
                let coefficient = if coefficient > MAX_COEFFICIENT {
                    0
                } else {
                    coefficient
                };
                ((high >> 49) & EXPONENT_MASK, coefficient)
            };

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let exponent = biased_exponent as i32 - EXPONENT_BIAS;

        f.write_str(&scientific_string(&coefficient.to_string(), exponent))
    }
}

/// Formats an unsigned coefficient and exponent.
fn scientific_string(digits: &str, exponent: i32) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let num_digits = digits.len() as i32;
    let adjusted_exponent = exponent + num_digits - 1;

    if exponent <= 0 && adjusted_exponent >= MIN_PLAIN_ADJUSTED_EXPONENT {
        if exponent == 0 {
            return digits.to_string();
        }

        let point = num_digits + exponent;

        if point > 0 {
            #[allow(clippy::cast_sign_loss)]
            let (integer, fraction) = digits.split_at(point as usize);
            return format!("{integer}.{fraction}");
        }

        #[allow(clippy::cast_sign_loss)]
        let zeros = "0".repeat((-point) as usize);
        return format!("0.{zeros}{digits}");
    }

    let (first, rest) = digits.split_at(1);
    let mut output = first.to_string();

    if !rest.is_empty() {
        output.push('.');
        output.push_str(rest);
    }

    let sign = if adjusted_exponent >= 0 { '+' } else { '-' };
    output.push_str(&format!("E{sign}{}", adjusted_exponent.abs()));

    output
}
