//! Conversion between [`rust_decimal::Decimal`] and BSON `Decimal128`.
//!
//! Prices are stored as IEEE 754-2008 decimal128 values in the binary integer
//! decimal (BID) encoding, which is what the BSON spec mandates. Only the
//! "small coefficient" form is produced here: a 96-bit `Decimal` mantissa
//! always fits in the 113 coefficient bits.
//!
//! Layout of the 128-bit value (little-endian on the wire):
//!
//! ```text
//! bit 127       sign
//! bits 113..127 biased exponent (bias 6176)
//! bits 0..113   coefficient
//! ```

use bson::Decimal128;
use rust_decimal::Decimal;

const EXPONENT_BIAS: i32 = 6176;
const EXPONENT_SHIFT: u32 = 113;
const EXPONENT_MASK: u128 = 0x3FFF;
const COEFFICIENT_MASK: u128 = (1 << EXPONENT_SHIFT) - 1;
const SIGN_BIT: u128 = 1 << 127;

/// Encode a decimal, keeping its scale (`12.30` stays `12.30`).
pub fn to_decimal128(value: Decimal) -> Decimal128 {
    let mantissa = value.mantissa();
    let exponent = EXPONENT_BIAS - value.scale() as i32;

    let mut bits = mantissa.unsigned_abs() & COEFFICIENT_MASK;
    bits |= (exponent as u128 & EXPONENT_MASK) << EXPONENT_SHIFT;
    if mantissa < 0 {
        bits |= SIGN_BIT;
    }

    Decimal128::from_bytes(bits.to_le_bytes())
}

/// Decode a decimal128 value.
///
/// Returns `None` for NaN, infinities, the large-coefficient form and any
/// value outside `Decimal`'s 96-bit / scale-28 range.
pub fn from_decimal128(value: &Decimal128) -> Option<Decimal> {
    let bits = u128::from_le_bytes(value.bytes());

    // Combination field `11xxx` marks infinity, NaN or a coefficient wider
    // than 113 bits (non-canonical for decimal128).
    if (bits >> 125) & 0b11 == 0b11 {
        return None;
    }

    let negative = bits & SIGN_BIT != 0;
    let exponent = ((bits >> EXPONENT_SHIFT) & EXPONENT_MASK) as i32 - EXPONENT_BIAS;
    let coefficient = i128::try_from(bits & COEFFICIENT_MASK).ok()?;
    let signed = if negative { -coefficient } else { coefficient };

    if exponent <= 0 {
        let scale = u32::try_from(-exponent).ok()?;
        return Decimal::try_from_i128_with_scale(signed, scale).ok();
    }

    let mut decimal = Decimal::try_from_i128_with_scale(signed, 0).ok()?;
    for _ in 0..exponent {
        decimal = decimal.checked_mul(Decimal::TEN)?;
    }
    Some(decimal)
}
