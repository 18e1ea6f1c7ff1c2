//! Input rules shared by every write path.
//!
//! Validation is pure and runs before the store or blob store is touched, so a
//! rejected request never leaves a partial write behind.

use std::str::FromStr;

use bson::oid::ObjectId;
use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Most fractional digits a price may carry.
pub const MAX_PRICE_SCALE: usize = 2;

/// Parse a (trimmed) price string.
///
/// A string with exactly one `.` whose fractional part is longer than
/// [`MAX_PRICE_SCALE`] is rejected outright; anything else must be a plain
/// decimal. Exponent notation is refused so no accepted price carries more
/// than [`MAX_PRICE_SCALE`] fractional digits. The empty string is accepted
/// and yields `None`, meaning "no price to store".
///
/// Negative zero is not kept: `"-0"` parses to `0`.
pub fn parse_price(raw: &str) -> Result<Option<Decimal>, ValidationError> {
    let invalid = || ValidationError::InvalidPrice(raw.to_string());

    if raw.contains(|c: char| c.eq_ignore_ascii_case(&'e')) {
        return Err(invalid());
    }

    let mut tokens = raw.split('.');
    if let (Some(_), Some(fraction), None) = (tokens.next(), tokens.next(), tokens.next()) {
        if fraction.chars().count() > MAX_PRICE_SCALE {
            return Err(invalid());
        }
    }

    if raw.is_empty() {
        return Ok(None);
    }

    let price = Decimal::from_str(raw).map_err(|_| invalid())?;
    if price.scale() as usize > MAX_PRICE_SCALE {
        return Err(invalid());
    }
    Ok(Some(price))
}

/// Parse a record identifier: exactly 24 hex characters.
pub fn parse_id(raw: &str) -> Result<ObjectId, ValidationError> {
    ObjectId::parse_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_string()))
}

/// Unwrap a required form value or report which one was absent.
pub fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    value.ok_or(ValidationError::MissingParameter(field))
}
