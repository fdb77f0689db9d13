//! Check command - probe the line-item table.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use billscan_core::sink::{SqliteSink, TableSink};

use super::{format_items, load_config, sink_target, OutputFormat};

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Table to probe
    #[arg(long)]
    table: Option<String>,

    /// Print the stored rows
    #[arg(long)]
    show: bool,
}

pub async fn run(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let Some((database, table)) =
        sink_target(args.database.as_deref(), args.table.as_deref(), &config)?
    else {
        anyhow::bail!("Nothing to check: pass --database and --table or set them in the config");
    };

    debug!("Probing table '{}' in {}", table, database.display());

    let probe = SqliteSink::open_existing(&database).and_then(|sink| {
        let has_rows = sink.probe(&table)?;
        Ok((sink, has_rows))
    });

    let (sink, has_rows) = match probe {
        Ok(probe) => probe,
        Err(e) => {
            eprintln!(
                "{} Unable to reach table '{}' in {}: {}",
                style("✗").red(),
                table,
                database.display(),
                e
            );
            anyhow::bail!("check failed");
        }
    };

    if has_rows {
        println!("{} Table '{}' holds line items.", style("✓").green(), table);
    } else {
        println!("{} Table '{}' exists but is empty.", style("ℹ").blue(), table);
    }

    if args.show {
        let items = sink.read_back(&table)?;
        println!("{}", format_items(&items, OutputFormat::Text)?);
    }

    Ok(())
}
