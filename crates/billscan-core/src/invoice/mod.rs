//! Invoice line-item extraction from OCR token streams.

mod parser;
pub mod rules;
pub mod shapes;

pub use parser::{parse_tokens, ExtractionResult, TokenParser};
pub use shapes::{ProductShape, ShapeMatch, ShapeSet, DEFAULT_SHAPES};
