//! Inventory commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

use crate::cli::Invocation;
use crate::cli::output::{OutputFormat, fit, format_size, print_formatted, print_success};
use crate::inventory::{self, SortDirection, SortKey, ViewState};
use crate::model::{ExportRecord, InventoryItem};

#[derive(Subcommand, Debug)]
pub enum InventoryCommands {
    /// List catalog items, sorted and filtered like the inventory tab
    List {
        /// Sort column (ean, author, title, release_date, exists)
        #[arg(long, default_value = "author")]
        sort: SortKey,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Case-insensitive match on title, author or EAN
        #[arg(long)]
        filter: Option<String>,

        /// Print every matching item instead of the first 100
        #[arg(long)]
        all: bool,
    },

    /// Download the inventory export as JSON
    Export {
        /// Destination file
        #[arg(short, long, default_value = "inventory_export.json")]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct ListResult<'a> {
    view: &'a ViewState,
    total_count: usize,
    filtered_count: usize,
    shown: usize,
    items: Vec<&'a InventoryItem>,
}

#[derive(Serialize)]
struct ExportResult {
    path: String,
    bytes: u64,
    records: Option<usize>,
}

pub async fn run(command: InventoryCommands, invocation: &Invocation) -> Result<()> {
    match command {
        InventoryCommands::List {
            sort,
            desc,
            filter,
            all,
        } => {
            let view = ViewState {
                sort_key: sort,
                direction: if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
                filter: filter.unwrap_or_default(),
            };
            list(view, all, invocation).await
        }
        InventoryCommands::Export { output } => export(output, invocation).await,
    }
}

async fn list(view: ViewState, all: bool, invocation: &Invocation) -> Result<()> {
    let items = invocation
        .client()?
        .inventory()
        .await
        .context("Failed to fetch inventory")?;

    let (rows, filtered_count) = if all {
        let rows = inventory::sorted_filtered(&items, &view);
        let count = rows.len();
        (rows, count)
    } else {
        let projection = inventory::project(&items, &view);
        (projection.rows, projection.filtered_count)
    };

    if invocation.format == OutputFormat::Json {
        let result = ListResult {
            view: &view,
            total_count: items.len(),
            filtered_count,
            shown: rows.len(),
            items: rows,
        };
        print_formatted(&result, invocation.format, |_| String::new());
        return Ok(());
    }

    if rows.is_empty() {
        if items.is_empty() {
            println!("The inventory is empty.");
        } else {
            println!("No items match \"{}\".", view.filter);
        }
        return Ok(());
    }

    println!(
        "{}  {}  {}  {}  {}",
        fit("EAN", 14),
        fit("AUTHOR", 24),
        fit("TITLE", 36),
        fit("DATE", 10),
        "STATUS"
    );
    for item in &rows {
        println!(
            "{}  {}  {}  {}  {}",
            fit(&item.ean, 14),
            fit(item.author.as_deref().unwrap_or("-"), 24),
            fit(item.title.as_deref().unwrap_or("-"), 36),
            fit(item.release_date.as_deref().unwrap_or("-"), 10),
            item.presence()
        );
    }

    let remaining = filtered_count - rows.len();
    if remaining > 0 {
        println!(
            "\nShowing first {} of {} results ({} more). Use --filter to narrow or --all to list everything.",
            rows.len(),
            filtered_count,
            remaining
        );
    } else if !invocation.quiet {
        println!("\n{} of {} items", filtered_count, items.len());
    }
    Ok(())
}

async fn export(output: PathBuf, invocation: &Invocation) -> Result<()> {
    let bytes = invocation
        .client()?
        .download_export(&output)
        .await
        .with_context(|| format!("Failed to export inventory to {}", output.display()))?;

    let result = ExportResult {
        path: output.display().to_string(),
        bytes,
        records: count_records(&output),
    };
    match invocation.format {
        OutputFormat::Json => print_formatted(&result, invocation.format, |_| String::new()),
        OutputFormat::Text => {
            let rows = result
                .records
                .map(|n| format!("{} records, ", n))
                .unwrap_or_default();
            print_success(
                &format!("Exported {}{} to {}", rows, format_size(result.bytes), result.path),
                invocation.quiet,
            )
        }
    }
    Ok(())
}

/// Rows in a downloaded export; `None` when the file is not the expected JSON array
fn count_records(path: &Path) -> Option<usize> {
    let bytes = std::fs::read(path).ok()?;
    match serde_json::from_slice::<Vec<ExportRecord>>(&bytes) {
        Ok(records) => Some(records.len()),
        Err(e) => {
            tracing::warn!("Export at {} is not a record list: {}", path.display(), e);
            None
        }
    }
}
