//! Parse command - rebuild line items from a token file.

use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use billscan_core::invoice::TokenParser;

use super::{emit, load_config, OutputArgs};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Token file (JSON array of strings or one token per line), `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// How to read the token file
    #[arg(long, value_enum, default_value = "auto")]
    input_format: InputFormat,

    #[command(flatten)]
    output: OutputArgs,

    /// Print per-shape statistics and warnings to stderr
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// JSON if the content starts with `[`, lines otherwise
    Auto,
    /// JSON array of strings
    Json,
    /// One token per line
    Lines,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let content = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        if !args.input.exists() {
            anyhow::bail!("Input file not found: {}", args.input.display());
        }
        std::fs::read_to_string(&args.input)?
    };

    let tokens = read_tokens(&content, args.input_format)?;
    info!("Read {} tokens", tokens.len());

    let parser = TokenParser::from_config(&config.extraction)?;
    let result = parser.parse_detailed(&tokens);

    if args.stats {
        eprintln!(
            "{} {} tokens, {} line items",
            style("ℹ").blue(),
            result.token_count,
            result.items.len()
        );
        for (shape, hits) in &result.shape_hits {
            eprintln!("  {:<24} {}", shape, hits);
        }
        for warning in &result.warnings {
            eprintln!("  {} {}", style("!").yellow(), warning);
        }
    }

    emit(&result.items, &args.output, &config)?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Split file content into tokens.
pub fn read_tokens(content: &str, format: InputFormat) -> anyhow::Result<Vec<String>> {
    let format = match format {
        InputFormat::Auto if content.trim_start().starts_with('[') => InputFormat::Json,
        InputFormat::Auto => InputFormat::Lines,
        other => other,
    };

    match format {
        InputFormat::Json => serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Token file is not a JSON array of strings: {}", e)),
        _ => Ok(content.lines().map(str::to_string).collect()),
    }
}
