//! Rule-based field extractors for invoice tokens.

pub mod amounts;
pub mod bill;
pub mod patterns;

pub use amounts::{QuantityExtractor, UnitPriceExtractor};
pub use bill::{BillDateExtractor, BillNoExtractor};
pub use patterns::*;

/// Trait for single-token field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from a token, `None` when it does not match or
    /// does not convert.
    fn extract(&self, token: &str) -> Option<Self::Output>;
}
