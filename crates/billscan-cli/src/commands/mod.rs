//! Subcommands and the output handling they share.

pub mod check;
pub mod config;
pub mod parse;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::debug;

use billscan_core::models::config::BillscanConfig;
use billscan_core::models::line_item::{InvoiceLineItem, COLUMN_NAMES};
use billscan_core::sink::{SqliteSink, TableSink};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("billscan")
        .join("config.json")
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BillscanConfig> {
    if let Some(path) = config_path {
        return Ok(BillscanConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(BillscanConfig::from_file(&path)?)
    } else {
        Ok(BillscanConfig::default())
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

/// Output and persistence options shared by `parse` and `process`.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// SQLite database receiving the line items
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Table to replace with the line items
    #[arg(long)]
    pub table: Option<String>,
}

/// Database and table to write to, from flags first and config second.
pub fn sink_target(
    args_database: Option<&Path>,
    args_table: Option<&str>,
    config: &BillscanConfig,
) -> anyhow::Result<Option<(PathBuf, String)>> {
    let database = args_database
        .map(Path::to_path_buf)
        .or_else(|| config.sink.database.clone());
    let table = args_table
        .map(str::to_string)
        .or_else(|| config.sink.table.clone());

    match (database, table) {
        (Some(database), Some(table)) => Ok(Some((database, table))),
        (None, None) => Ok(None),
        (Some(_), None) => anyhow::bail!("A database was given without --table"),
        (None, Some(_)) => anyhow::bail!("A table was given without --database"),
    }
}

/// Write items in the requested format and, if configured, replace the table.
pub fn emit(
    items: &[InvoiceLineItem],
    args: &OutputArgs,
    config: &BillscanConfig,
) -> anyhow::Result<()> {
    let output = format_items(items, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some((database, table)) = sink_target(args.database.as_deref(), args.table.as_deref(), config)? {
        let mut sink = SqliteSink::open(&database)?;
        let written = sink.replace(&table, items)?;
        eprintln!(
            "{} Wrote {} rows to table '{}' in {}",
            style("✓").green(),
            written,
            table,
            database.display()
        );
    }

    Ok(())
}

pub fn format_items(items: &[InvoiceLineItem], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Csv => format_csv(items),
        OutputFormat::Text => Ok(format_text(items)),
    }
}

fn format_csv(items: &[InvoiceLineItem]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(COLUMN_NAMES)?;
    for item in items {
        wtr.write_record(item.to_row())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(items: &[InvoiceLineItem]) -> String {
    if items.is_empty() {
        return "No line items found.".to_string();
    }

    let rows: Vec<[String; 5]> = items.iter().map(InvoiceLineItem::to_row).collect();
    let mut widths = COLUMN_NAMES.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut output = String::new();
    output.push_str(&render(&COLUMN_NAMES[..]));
    output.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        output.push_str(&render(&cells[..]));
        output.push('\n');
    }
    output.push_str(&format!("\n{} line items", items.len()));

    output
}
