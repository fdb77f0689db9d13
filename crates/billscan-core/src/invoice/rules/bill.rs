//! Bill date and invoice number extraction.

use super::patterns::{BILL_DATE, BILL_NO};
use super::FieldExtractor;

/// Extracts a `DD/MM/YYYY` substring.
#[derive(Debug, Default, Clone, Copy)]
pub struct BillDateExtractor;

impl FieldExtractor for BillDateExtractor {
    type Output = String;

    fn extract(&self, token: &str) -> Option<String> {
        BILL_DATE.find(token).map(|m| m.as_str().to_string())
    }
}

/// Extracts an invoice number substring (nine digits, hyphen, one to six digits).
#[derive(Debug, Default, Clone, Copy)]
pub struct BillNoExtractor;

impl FieldExtractor for BillNoExtractor {
    type Output = String;

    fn extract(&self, token: &str) -> Option<String> {
        BILL_NO.find(token).map(|m| m.as_str().to_string())
    }
}
