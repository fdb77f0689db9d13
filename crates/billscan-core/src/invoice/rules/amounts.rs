//! Quantity and unit price extraction.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::trace;

use super::patterns::{QUANTITY, UNIT_PRICE};
use super::FieldExtractor;

/// Extracts a standalone one or two digit quantity.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuantityExtractor;

impl FieldExtractor for QuantityExtractor {
    type Output = u32;

    fn extract(&self, token: &str) -> Option<u32> {
        let caps = QUANTITY.captures(token)?;
        caps[1].parse().ok()
    }
}

/// Extracts the first `digits.digits` value of a token as a decimal.
///
/// A value that matches the shape but does not fit a [`Decimal`] (OCR can
/// merge long digit runs) yields `None`, so a caller scanning a window moves
/// on to the next token.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnitPriceExtractor;

impl FieldExtractor for UnitPriceExtractor {
    type Output = Decimal;

    fn extract(&self, token: &str) -> Option<Decimal> {
        let caps = UNIT_PRICE.captures(token)?;
        match Decimal::from_str(&caps[1]) {
            Ok(price) => Some(price),
            Err(e) => {
                trace!("Discarding unconvertible price {:?}: {}", &caps[1], e);
                None
            }
        }
    }
}
