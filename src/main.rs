//! symdex CLI
//!
//! Usage:
//!   symdex build records.json -o docs/search/index.json --search-data docs/search/all.js
//!   symdex query docs/search/index.json push_back --limit 5
//!   symdex export docs/search/index.json -o docs/search/all.js

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use symdex_lib::config::{default_config_path, load_config};
use symdex_lib::symbol_index::{
    load_index, load_records, parse_limit, save_index, write_search_data, IndexBuilder,
    QueryEngine, SearchQuery, SymbolKind,
};

/// Log filter used when `RUST_LOG` is unset or unparsable
const DEFAULT_LOG_FILTER: &str = "warn";

/// Symbol search index for generated API documentation
#[derive(Parser, Debug)]
#[command(name = "symdex")]
#[command(about = "Build and query symbol search indexes")]
struct Args {
    /// Config file (defaults to $SYMDEX_CONFIG or the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an index from extracted symbol records
    Build {
        /// JSON array of symbol records
        records: PathBuf,

        /// Where to write the index
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Also write a Doxygen-style searchData table
        #[arg(long)]
        search_data: Option<PathBuf>,

        /// Fail on the first malformed record
        #[arg(long)]
        strict: bool,
    },

    /// Query a built index and print the result groups as JSON
    Query {
        index: PathBuf,

        text: String,

        /// Maximum number of groups
        #[arg(long, short = 'l', allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Only include entries of this kind (repeatable)
        #[arg(long, short = 'k')]
        kind: Vec<String>,
    },

    /// Render a built index as a Doxygen-style searchData table
    Export {
        index: PathBuf,

        #[arg(long, short = 'o')]
        output: PathBuf,
    },
}

/// `RUST_LOG` directives win outright; without them only warnings are shown
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(default_config_path);
    let mut config = load_config(&config_path)?;

    match args.command {
        Command::Build {
            records,
            output,
            search_data,
            strict,
        } => {
            config.strict |= strict;
            let records = load_records(&records)?;
            let built = IndexBuilder::new(config).build(records)?;
            save_index(&built.index, &output)?;
            if let Some(path) = search_data {
                write_search_data(&built.index, &path)?;
            }
            info!(
                keys = built.index.len(),
                entries = built.index.entry_count(),
                skipped = built.warnings.len(),
                "wrote {}",
                output.display()
            );
        }
        Command::Query {
            index,
            text,
            limit,
            kind,
        } => {
            let index = load_index(&index)?;
            let engine = QueryEngine::with_config(Arc::new(index), &config);

            let mut query = SearchQuery::text(&text);
            if let Some(limit) = limit {
                query = query.with_limit(parse_limit(limit)?);
            }
            if !kind.is_empty() {
                let kinds = kind
                    .iter()
                    .map(|k| k.parse::<SymbolKind>())
                    .collect::<Result<Vec<_>, _>>()?;
                query = query.with_kinds(kinds);
            }

            let groups = engine.search(&query);
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        Command::Export { index, output } => {
            let index = load_index(&index)?;
            write_search_data(&index, &output)?;
        }
    }

    Ok(())
}
