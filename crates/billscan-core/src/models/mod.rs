//! Data models for extracted line items and configuration.

pub mod config;
pub mod line_item;

pub use config::{BillscanConfig, ExtractionConfig, OcrConfig, ShapeConfig, SinkConfig};
pub use line_item::{InvoiceLineItem, COLUMN_NAMES};
