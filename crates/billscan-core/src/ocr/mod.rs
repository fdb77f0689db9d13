//! OCR adapter: turns recognized text boxes into the flat token stream.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Anything that can recognize text boxes in an image.
pub trait OcrProvider {
    /// Recognize text in `image`, boxes in reading order.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content. One box is one token.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Detected and recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Create an empty result.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            boxes: Vec::new(),
            processing_time_ms: 0,
            image_size: (width, height),
        }
    }

    /// Sort boxes top-to-bottom, then left-to-right within rows of
    /// `row_tolerance` pixels.
    pub fn sort_by_reading_order(&mut self, row_tolerance: f32) {
        let tolerance = row_tolerance.max(1.0);
        self.boxes.sort_by(|a, b| {
            let (ax, ay, _, _) = a.rect();
            let (bx, by, _, _) = b.rect();

            let row_a = (ay / tolerance) as i32;
            let row_b = (by / tolerance) as i32;

            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });
    }

    /// Box texts in current order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.boxes.iter().map(|b| b.text.as_str())
    }
}

/// OCR output for one uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrPage {
    /// Where the image came from (file name).
    pub source: String,

    /// Recognized boxes.
    pub result: OcrResult,
}

/// Flatten pages into one token stream: page order, then box order.
///
/// Every box becomes a token, blank ones included, since each occupies a
/// slot in the quantity and price windows.
pub fn flatten_tokens(pages: &[OcrPage]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|page| page.result.tokens())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_box(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    fn page(source: &str, boxes: Vec<TextBox>) -> OcrPage {
        OcrPage {
            source: source.to_string(),
            result: OcrResult {
                boxes,
                processing_time_ms: 0,
                image_size: (800, 600),
            },
        }
    }

    #[test]
    fn test_reading_order() {
        let mut result = OcrResult::empty(800, 600);
        result.boxes = vec![
            text_box("5", 300.0, 105.0),
            text_box("ABC XYZ-1abc", 20.0, 100.0),
            text_box("01/02/2023", 20.0, 10.0),
        ];
        result.sort_by_reading_order(20.0);

        let tokens: Vec<&str> = result.tokens().collect();
        assert_eq!(tokens, vec!["01/02/2023", "ABC XYZ-1abc", "5"]);
    }

    #[test]
    fn test_flatten_keeps_page_order() {
        let pages = vec![
            page("a.jpeg", vec![text_box("01/02/2023", 0.0, 0.0), text_box("", 0.0, 20.0)]),
            page("b.jpeg", vec![text_box("AAA BBB-1x", 0.0, 0.0), text_box("2", 60.0, 0.0)]),
        ];
        assert_eq!(
            flatten_tokens(&pages),
            vec!["01/02/2023", "", "AAA BBB-1x", "2"]
        );
    }

    #[test]
    fn test_carried_state_flows_across_pages() {
        let pages = vec![
            page("a.jpeg", vec![text_box("10/10/2023", 0.0, 0.0)]),
            page("b.jpeg", vec![text_box("AAA BBB-1x", 0.0, 0.0)]),
        ];
        let items = crate::invoice::parse_tokens(&flatten_tokens(&pages));
        assert_eq!(items[0].bill_date.as_deref(), Some("10/10/2023"));
    }
}
