//! toolcat: a shared catalog of tools backed by a flat CSV file.
//!
//! Records are appended by independent contributors, read back in bulk for
//! display, and never deleted.
//!
//! # Architecture
//!
//! - **Schema**: canonical ordered column set, upgraded in place on older
//!   files (`core::schemas`, `core::migration`)
//! - **Repository**: whole-file read-modify-write with atomic replace
//!   (`core::repository`)
//! - **Catalog**: validation, serial allocation, and a read cache dropped on
//!   every successful append (`core::store`)
//!
//! The store does no locking. Two processes appending at the same moment can
//! lose one of the writes.
//!
//! # Examples
//!
//! ```bash
//! # Create (or upgrade) the catalog file
//! toolcat init
//!
//! # Add a tool
//! toolcat add --name Claude --link https://claude.ai --category Chatbots \
//!     --uploaded-by Rayna --purpose "Draft marketing copy"
//!
//! # Browse and download
//! toolcat list --category Chatbots --limit 10
//! toolcat export --out tools.csv
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: record model, storage, validation, caching, configuration
//! - [`plugins`]: CSV export and catalog statistics

pub mod core;
pub mod plugins;

use crate::core::{
    config::{self, CatalogConfig},
    error, logging, migration, output,
    record::ToolDraft,
    schemas,
    store::Catalog,
};
use plugins::{export, stats};

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "toolcat",
    version = env!("CARGO_PKG_VERSION"),
    about = "Shared catalog of tools backed by a CSV file"
)]
struct Cli {
    /// Config file (defaults to ./toolcat.toml when present).
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct AddCli {
    /// Tool name (at least 2 characters).
    #[clap(long)]
    name: String,
    /// Link to the tool (http:// or https://).
    #[clap(long, default_value = "")]
    link: String,
    /// One of the configured categories (see `toolcat categories`).
    #[clap(long)]
    category: String,
    /// Who is adding the tool.
    #[clap(long)]
    uploaded_by: String,
    /// What the tool is used for (at least 5 characters).
    #[clap(long)]
    purpose: String,
}

#[derive(clap::Args, Debug)]
struct ListCli {
    /// Only show tools in these categories (repeatable).
    #[clap(long)]
    category: Vec<String>,
    /// Show at most this many tools.
    #[clap(long)]
    limit: Option<usize>,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    format: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the catalog file, or upgrade an older one
    #[clap(name = "init", visible_alias = "i")]
    Init,

    /// Validate and append a new tool
    #[clap(name = "add", visible_alias = "a")]
    Add(AddCli),

    /// List tools, most recent first
    #[clap(name = "list", visible_alias = "ls")]
    List(ListCli),

    /// Totals, per-category counts, and growth over time
    #[clap(name = "stats")]
    Stats {
        /// Output format: 'text' or 'json'.
        #[clap(long, default_value = "text")]
        format: String,
    },

    /// Download the full catalog as CSV
    #[clap(name = "export")]
    Export {
        /// Write to this file instead of stdout.
        #[clap(long)]
        out: Option<PathBuf>,
    },

    /// Show the configured categories
    #[clap(name = "categories")]
    Categories,

    /// Describe the catalog layout and subsystems as JSON
    #[clap(name = "schema")]
    Schema,

    /// Show version information
    #[clap(name = "version")]
    Version,
}

fn resolve_config(explicit: Option<PathBuf>) -> Result<CatalogConfig, error::CatalogError> {
    match explicit {
        Some(path) => config::load_config_file_with_env(&path),
        None => config::load_config(&std::env::current_dir()?),
    }
}

/// Machine-readable description of the catalog file and the plugins.
pub fn schema_json(config: &CatalogConfig) -> serde_json::Value {
    serde_json::json!({
        "name": "toolcat",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog": {
            "schema_version": migration::SCHEMA_VERSION,
            "columns": config.schema().header(),
            "date_time_format": schemas::DATE_TIME_FORMAT,
            "storage": [config.data_path().display().to_string()],
            "migrations": migration::MIGRATIONS
                .iter()
                .map(|m| serde_json::json!({ "version": m.version, "description": m.description }))
                .collect::<Vec<_>>(),
        },
        "plugins": [export::schema(), stats::schema()],
    })
}

pub fn run() -> Result<(), error::CatalogError> {
    let cli = Cli::parse();

    let command = match cli.command {
        Command::Version => {
            // Version command - simple output for scripts/parsing
            println!("v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        other => other,
    };

    let config = resolve_config(cli.config)?;
    if let Err(e) = logging::init_logging(&config.logging.level) {
        eprintln!("{} {}", "warning:".yellow(), e);
    }

    match command {
        Command::Version => {}
        Command::Categories => {
            for category in &config.categories {
                println!("{}", category);
            }
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&schema_json(&config))?);
        }
        Command::Init => {
            let outcome = migration::upgrade_file(&config.data_path(), &config.schema())?;
            println!("{}", output::render_upgrade(&outcome, &config.data_path()));
        }
        Command::Add(add) => {
            let catalog = Catalog::from_config(&config);
            let draft = ToolDraft::new(add.name, add.link, add.category, add.uploaded_by, add.purpose);
            let stored = catalog.submit(&draft)?;
            println!(
                "{} Added {} as #{}",
                "✓".bright_green(),
                stored.name.bright_white().bold(),
                stored.serial_number.unwrap_or_default()
            );
        }
        Command::List(list) => {
            let catalog = Catalog::from_config(&config);
            let records = catalog.try_load()?;
            let filtered = stats::filter_by_categories(&records, &list.category);
            let shown = &filtered[..list.limit.unwrap_or(filtered.len()).min(filtered.len())];
            if list.format == "json" {
                println!("{}", serde_json::to_string_pretty(shown)?);
            } else if records.is_empty() {
                println!("No tools in the catalog yet.");
            } else if shown.is_empty() {
                println!("No matching tools ({} in the catalog).", records.len());
            } else {
                println!("Showing {} of {} tools", shown.len(), records.len());
                for record in shown {
                    println!("{}", output::render_record(record));
                }
            }
        }
        Command::Stats { format } => {
            let catalog = Catalog::from_config(&config);
            let records = catalog.try_load()?;
            let summary = stats::summarize(&records, crate::core::time::now_local());
            let by_category = stats::category_counts(&records);
            let growth = stats::growth_timeline(&records);
            if format == "json" {
                let body = serde_json::json!({
                    "summary": summary,
                    "categories": by_category,
                    "growth": growth,
                    "recent": stats::recent(&records, 10),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{:>16} {}", "Total tools:".bold(), summary.total_tools);
                println!("{:>16} {}", "Categories:".bold(), summary.categories);
                println!("{:>16} {}", "This week:".bold(), summary.added_this_week);
                println!("{:>16} {}", "Contributors:".bold(), summary.contributors);
                if !by_category.is_empty() {
                    println!();
                    for c in &by_category {
                        println!("  {:<28} {}", c.category, c.count);
                    }
                }
            }
        }
        Command::Export { out } => {
            let catalog = Catalog::from_config(&config);
            let snapshot = export::export_catalog(&catalog)?;
            match out {
                Some(path) => {
                    fs::write(&path, &snapshot.bytes)?;
                    println!(
                        "{} Exported {} bytes ({}) to {}",
                        "✓".bright_green(),
                        snapshot.bytes.len(),
                        snapshot.mime,
                        path.display()
                    );
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&snapshot.bytes)?;
                    stdout.flush()?;
                }
            }
        }
    }

    Ok(())
}

/// Human-readable lines for an error returned by [`run`].
pub fn render_error(err: &error::CatalogError) -> String {
    match err {
        error::CatalogError::ValidationError(messages) => output::render_messages(messages),
        other => format!("{} {}", "Error:".red().bold(), other),
    }
}
