//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::invoice::shapes::DEFAULT_SHAPES;

/// Main configuration for billscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillscanConfig {
    /// OCR adapter configuration.
    pub ocr: OcrConfig,

    /// Token parser configuration.
    pub extraction: ExtractionConfig,

    /// Line-item table configuration.
    pub sink: SinkConfig,
}

/// OCR adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers emitted by the recognizer instead of blanking them.
    pub keep_unk: bool,

    /// Vertical bucket size (pixels) used to group boxes into reading rows.
    pub row_tolerance: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            row_tolerance: 20.0,
        }
    }
}

impl OcrConfig {
    /// Full path to a model file inside `model_dir`.
    pub fn model_path(&self, file_name: &str) -> PathBuf {
        self.model_dir.join(file_name)
    }

    /// Whether both detection and recognition models are present.
    pub fn models_available(&self) -> bool {
        self.model_path(&self.detection_model).exists()
            && self.model_path(&self.recognition_model).exists()
    }
}

/// A named product-shape pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Shape identifier, reported in extraction statistics.
    pub name: String,

    /// Regular expression (Rust `regex` syntax).
    pub pattern: String,
}

impl ShapeConfig {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Token parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Number of tokens after a product searched for a quantity.
    pub quantity_window: usize,

    /// Number of tokens after a product searched for a unit price.
    pub price_window: usize,

    /// Quantity recorded when none is found.
    pub default_quantity: u32,

    /// Ordered product shapes; earlier shapes win ties at the same offset.
    pub product_shapes: Vec<ShapeConfig>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            quantity_window: 1,
            price_window: 3,
            default_quantity: 0,
            product_shapes: DEFAULT_SHAPES
                .iter()
                .map(|(name, pattern)| ShapeConfig::new(*name, *pattern))
                .collect(),
        }
    }
}

/// Line-item table configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// SQLite database file.
    pub database: Option<PathBuf>,

    /// Table that receives the line items (replaced on every write).
    pub table: Option<String>,
}

impl BillscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
