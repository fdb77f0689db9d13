//! Forward-scanning token parser.
//!
//! The parser walks the token stream once. Date and invoice-number tokens
//! update two carried registers; every token matching a product shape emits
//! one line item, with quantity and unit price looked up in small windows of
//! the tokens that follow it. Lookahead never moves the scan pointer, so a
//! token read as a price can still be classified on its own turn.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::error::Result;
use crate::models::config::ExtractionConfig;
use crate::models::line_item::InvoiceLineItem;

use super::rules::{
    BillDateExtractor, BillNoExtractor, FieldExtractor, QuantityExtractor, UnitPriceExtractor,
};
use super::shapes::ShapeSet;

/// Result of a detailed parse.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted line items, in scan order.
    pub items: Vec<InvoiceLineItem>,
    /// Number of tokens scanned.
    pub token_count: usize,
    /// Product matches per shape name, in shape order.
    pub shape_hits: Vec<(String, usize)>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Bill date and invoice number remembered across scan steps.
#[derive(Debug, Default)]
struct CarriedContext {
    bill_date: Option<String>,
    bill_no: Option<String>,
}

impl CarriedContext {
    /// Apply every carried-field match in `token`; the checks are independent.
    fn observe(&mut self, token: &str) {
        if let Some(date) = BillDateExtractor.extract(token) {
            trace!("Bill date -> {}", date);
            self.bill_date = Some(date);
        }
        if let Some(bill_no) = BillNoExtractor.extract(token) {
            trace!("Bill number -> {}", bill_no);
            self.bill_no = Some(bill_no);
        }
    }
}

/// Token parser with configurable product shapes and lookahead windows.
#[derive(Debug, Clone)]
pub struct TokenParser {
    shapes: ShapeSet,
    quantity_window: usize,
    price_window: usize,
    default_quantity: u32,
}

impl TokenParser {
    /// Create a parser with the built-in shapes and default windows.
    pub fn new() -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            shapes: ShapeSet::default(),
            quantity_window: defaults.quantity_window,
            price_window: defaults.price_window,
            default_quantity: defaults.default_quantity,
        }
    }

    /// Build a parser from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            shapes: ShapeSet::from_config(&config.product_shapes)?,
            quantity_window: config.quantity_window,
            price_window: config.price_window,
            default_quantity: config.default_quantity,
        })
    }

    /// Replace the product shapes.
    pub fn with_shapes(mut self, shapes: ShapeSet) -> Self {
        self.shapes = shapes;
        self
    }

    /// Set how many following tokens are searched for a unit price.
    pub fn with_price_window(mut self, window: usize) -> Self {
        self.price_window = window;
        self
    }

    /// Set how many following tokens are searched for a quantity.
    pub fn with_quantity_window(mut self, window: usize) -> Self {
        self.quantity_window = window;
        self
    }

    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    /// Parse tokens into line items.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<InvoiceLineItem> {
        self.parse_detailed(tokens).items
    }

    /// Parse tokens and report per-shape statistics and warnings.
    pub fn parse_detailed<S: AsRef<str>>(&self, tokens: &[S]) -> ExtractionResult {
        let start = Instant::now();
        let mut context = CarriedContext::default();
        let mut items = Vec::new();
        let mut hits = vec![0usize; self.shapes.len()];
        let mut warnings = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            context.observe(token);

            let Some(product) = self.shapes.find(token) else {
                continue;
            };
            hits[product.shape_index] += 1;

            let quantity = self.quantity_after(tokens, i);
            let unit_price = self.price_after(tokens, i);

            trace!(
                "Token {}: product {:?} qty={:?} price={:?}",
                i, product.text, quantity, unit_price
            );

            if unit_price.is_none() {
                warnings.push(format!(
                    "token {}: no unit price within {} tokens of {:?}",
                    i, self.price_window, product.text
                ));
            }
            if context.bill_date.is_none() || context.bill_no.is_none() {
                warnings.push(format!(
                    "token {}: {:?} precedes a bill date or invoice number",
                    i, product.text
                ));
            }

            items.push(InvoiceLineItem {
                bill_date: context.bill_date.clone(),
                bill_no: context.bill_no.clone(),
                product: product.text.to_string(),
                quantity: quantity.unwrap_or(self.default_quantity),
                unit_price,
            });
        }

        if items.is_empty() && !tokens.is_empty() {
            warnings.push("no token matched a product shape".to_string());
        }

        debug!(
            "Extracted {} line items from {} tokens",
            items.len(),
            tokens.len()
        );

        let shape_hits = self
            .shapes
            .shapes()
            .iter()
            .zip(hits)
            .map(|(shape, n)| (shape.name().to_string(), n))
            .collect();

        ExtractionResult {
            items,
            token_count: tokens.len(),
            shape_hits,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn quantity_after<S: AsRef<str>>(&self, tokens: &[S], index: usize) -> Option<u32> {
        tokens
            .iter()
            .skip(index + 1)
            .take(self.quantity_window)
            .find_map(|t| QuantityExtractor.extract(t.as_ref()))
    }

    fn price_after<S: AsRef<str>>(&self, tokens: &[S], index: usize) -> Option<Decimal> {
        tokens
            .iter()
            .skip(index + 1)
            .take(self.price_window)
            .find_map(|t| UnitPriceExtractor.extract(t.as_ref()))
    }
}

impl Default for TokenParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse tokens with the built-in shapes and default windows.
pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<InvoiceLineItem> {
    TokenParser::new().parse(tokens)
}
