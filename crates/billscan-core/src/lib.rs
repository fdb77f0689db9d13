//! Core library for invoice line-item extraction.
//!
//! This crate provides:
//! - A forward-scanning token parser that rebuilds invoice line items
//!   (date, invoice number, product, quantity, unit price) from a flat
//!   OCR token stream
//! - Configurable product-shape matchers for OCR-garbled product codes
//! - An OCR adapter that flattens recognized text boxes into tokens
//! - A SQLite sink with replace-write and liveness probe

pub mod error;
pub mod models;
pub mod ocr;
pub mod invoice;
#[cfg(feature = "sqlite")]
pub mod sink;

pub use error::{BillscanError, Result};
pub use models::config::BillscanConfig;
pub use models::line_item::InvoiceLineItem;
pub use ocr::{flatten_tokens, OcrPage, OcrProvider, OcrResult, TextBox};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use invoice::{parse_tokens, ExtractionResult, ProductShape, ShapeSet, TokenParser};
#[cfg(feature = "sqlite")]
pub use sink::{SqliteSink, TableSink};
