//! Compiled token patterns for invoice line-item extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Bill date, e.g. 01/02/2023. Shape only, calendar validity is not checked.
    pub static ref BILL_DATE: Regex = Regex::new(
        r"\d{2}/\d{2}/\d{4}"
    ).unwrap();

    // Invoice number: nine digits, hyphen, one to six digits.
    pub static ref BILL_NO: Regex = Regex::new(
        r"\d{9}-\d{1,6}"
    ).unwrap();

    // Standalone one or two digit integer.
    pub static ref QUANTITY: Regex = Regex::new(
        r"\b(\d{1,2})\b"
    ).unwrap();

    // Decimal value with a dot separator.
    pub static ref UNIT_PRICE: Regex = Regex::new(
        r"\b(\d+\.\d+)\b"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_date_pattern() {
        assert!(BILL_DATE.is_match("01/02/2023"));
        assert!(BILL_DATE.is_match("Date: 15/08/2022 10:31"));
        assert!(!BILL_DATE.is_match("1/2/2023"));
        assert!(!BILL_DATE.is_match("01-02-2023"));
    }

    #[test]
    fn test_bill_no_pattern() {
        assert!(BILL_NO.is_match("123456789-1"));
        assert!(BILL_NO.is_match("Invoice No 987654321-123456"));
        assert!(!BILL_NO.is_match("12345678-1"));
        assert!(!BILL_NO.is_match("123456789-"));
    }

    #[test]
    fn test_quantity_needs_word_boundaries() {
        assert!(QUANTITY.is_match("5"));
        assert!(QUANTITY.is_match("qty 12 pcs"));
        assert!(!QUANTITY.is_match("123"));
        assert!(!QUANTITY.is_match("abc"));
    }

    #[test]
    fn test_unit_price_pattern() {
        assert!(UNIT_PRICE.is_match("10.50"));
        assert!(UNIT_PRICE.is_match("Rs 1250.00"));
        assert!(!UNIT_PRICE.is_match("10,50"));
        assert!(!UNIT_PRICE.is_match("10."));
    }
}
