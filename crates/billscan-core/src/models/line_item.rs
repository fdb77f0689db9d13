//! Invoice line-item record produced by the token parser.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Column names of the line-item table, in record order.
pub const COLUMN_NAMES: [&str; 5] = [
    "Bill_Date",
    "Bill_No",
    "Bill_Product",
    "Bill_Quantity",
    "Unit_Price",
];

/// A single invoice line item reconstructed from the token stream.
///
/// `bill_date` and `bill_no` hold whatever value was carried at the time the
/// product token was scanned, so they may be `None` for items that precede
/// any date or invoice-number token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// Most recent `DD/MM/YYYY` token at or before this item.
    #[serde(rename = "Bill_Date")]
    pub bill_date: Option<String>,

    /// Most recent invoice number (`9 digits - 1..6 digits`) at or before this item.
    #[serde(rename = "Bill_No")]
    pub bill_no: Option<String>,

    /// Matched product-shape substring.
    #[serde(rename = "Bill_Product")]
    pub product: String,

    /// Quantity found right after the product token, `0` when absent.
    #[serde(rename = "Bill_Quantity")]
    pub quantity: u32,

    /// First decimal value within the price window.
    #[serde(rename = "Unit_Price")]
    pub unit_price: Option<Decimal>,
}

impl InvoiceLineItem {
    /// Create an item with no carried context, quantity or price.
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            bill_date: None,
            bill_no: None,
            product: product.into(),
            quantity: 0,
            unit_price: None,
        }
    }

    /// Interpret `bill_date` as a calendar date.
    ///
    /// The parser only matches the `DD/MM/YYYY` shape, so OCR noise such as
    /// `45/13/2023` is carried as-is; this returns `None` for those.
    pub fn bill_date_parsed(&self) -> Option<NaiveDate> {
        self.bill_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%d/%m/%Y").ok())
    }

    /// Field values as strings, in [`COLUMN_NAMES`] order. Missing values are empty.
    pub fn to_row(&self) -> [String; 5] {
        [
            self.bill_date.clone().unwrap_or_default(),
            self.bill_no.clone().unwrap_or_default(),
            self.product.clone(),
            self.quantity.to_string(),
            self.unit_price.map(|p| p.to_string()).unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_serializes_with_table_column_names() {
        let item = InvoiceLineItem {
            bill_date: Some("01/02/2023".to_string()),
            bill_no: Some("123456789-1".to_string()),
            product: "ABC XYZ-1abc".to_string(),
            quantity: 5,
            unit_price: Some(Decimal::from_str("10.50").unwrap()),
        };

        let json = serde_json::to_value(&item).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for column in COLUMN_NAMES {
            assert!(keys.contains(&column), "missing column {}", column);
        }
        assert_eq!(json["Bill_Quantity"], 5);
        assert_eq!(json["Unit_Price"].as_f64(), Some(10.5));
    }

    #[test]
    fn test_missing_fields_serialize_as_null() {
        let json = serde_json::to_value(InvoiceLineItem::new("ABC XYZ-1abc")).unwrap();
        assert!(json["Bill_Date"].is_null());
        assert!(json["Bill_No"].is_null());
        assert!(json["Unit_Price"].is_null());
        assert_eq!(json["Bill_Quantity"], 0);
    }

    #[test]
    fn test_bill_date_parsed() {
        let mut item = InvoiceLineItem::new("X");
        item.bill_date = Some("10/10/2023".to_string());
        assert_eq!(item.bill_date_parsed(), NaiveDate::from_ymd_opt(2023, 10, 10));

        item.bill_date = Some("45/13/2023".to_string());
        assert_eq!(item.bill_date_parsed(), None);
    }

    #[test]
    fn test_to_row() {
        let mut item = InvoiceLineItem::new("AAA BBB-1x");
        item.quantity = 2;
        item.unit_price = Some(Decimal::from_str("1.00").unwrap());

        assert_eq!(
            item.to_row(),
            [
                String::new(),
                String::new(),
                "AAA BBB-1x".to_string(),
                "2".to_string(),
                "1.00".to_string(),
            ]
        );
    }
}
