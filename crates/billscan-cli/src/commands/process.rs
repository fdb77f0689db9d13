//! Process command - OCR invoice images and extract line items.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use billscan_core::invoice::TokenParser;
use billscan_core::ocr::{flatten_tokens, OcrPage, OcrProvider, PureOcrEngine};

use super::{emit, load_config, OutputArgs};

const IMAGE_EXTENSIONS: [&str; 6] = ["jpeg", "jpg", "png", "tiff", "tif", "bmp"];

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Image files or glob patterns, processed in the given order
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Write the flattened token stream as JSON
    #[arg(long)]
    dump_tokens: Option<PathBuf>,

    /// Continue when an image cannot be read or recognized
    #[arg(long)]
    continue_on_error: bool,

    #[command(flatten)]
    output: OutputArgs,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No image files matched: {}", args.inputs.join(" "));
    }

    if !config.ocr.models_available() {
        anyhow::bail!(
            "OCR models not found in {}. Expected {} and {}.",
            config.ocr.model_dir.display(),
            config.ocr.detection_model,
            config.ocr.recognition_model
        );
    }

    // Fail on bad shape configuration before spending time on OCR.
    let parser = TokenParser::from_config(&config.extraction)?;
    let engine = PureOcrEngine::from_config(config.ocr.clone())?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let mut pages = Vec::with_capacity(files.len());
    for path in &files {
        pb.set_message(path.display().to_string());

        let recognized = image::open(path)
            .map_err(anyhow::Error::from)
            .and_then(|image| engine.recognize(&image).map_err(anyhow::Error::from));

        match recognized {
            Ok(result) => {
                debug!("{}: {} text boxes", path.display(), result.boxes.len());
                pages.push(OcrPage {
                    source: path.display().to_string(),
                    result,
                });
            }
            Err(e) if args.continue_on_error => {
                warn!("Skipping {}: {}", path.display(), e);
            }
            Err(e) => {
                pb.abandon();
                anyhow::bail!("Failed to process {}: {}", path.display(), e);
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("OCR done");

    let tokens = flatten_tokens(&pages);
    info!("{} tokens from {} images", tokens.len(), pages.len());

    if let Some(dump_path) = &args.dump_tokens {
        std::fs::write(dump_path, serde_json::to_string_pretty(&tokens)?)?;
        eprintln!(
            "{} Tokens written to {}",
            style("✓").green(),
            dump_path.display()
        );
    }

    let items = parser.parse(&tokens);
    emit(&items, &args.output, &config)?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Expand paths and glob patterns, keeping argument order.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let direct = PathBuf::from(input);
        if direct.is_file() {
            files.push(direct);
            continue;
        }

        let mut matched: Vec<PathBuf> = glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| is_image(p))
            .collect();
        matched.sort();
        files.extend(matched);
    }

    Ok(files)
}

fn is_image(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
