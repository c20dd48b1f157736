//! Argument parsing and output rendering for the `opsdesk` binary.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use opsdesk_core::{Category, QueryOutcome};

#[derive(Debug, Parser)]
#[command(name = "opsdesk", about = "Query the dashboard's global search index")]
pub struct Args {
    /// Directory holding `<category>.json` snapshots (defaults to `data.snapshot_dir`).
    #[arg(long, env = "OPSDESK_SNAPSHOTS")]
    pub snapshots: Option<String>,

    /// Print hits as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a single query.
    Query { term: String },
    /// Read one query per line from stdin.
    Interactive,
    /// Show how many records each category holds.
    Categories,
}

/// Logs go to stderr so stdout stays machine readable. `RUST_LOG` wins
/// over the `warn` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

pub fn render_outcome(outcome: &QueryOutcome, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&outcome.hits)?);
    }
    if outcome.hits.is_empty() {
        return Ok(format!("no results for '{}'\n", outcome.term));
    }
    let width = outcome.hits.iter().map(|h| h.title.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for hit in &outcome.hits {
        let category = format!("[{}]", hit.category.label());
        writeln!(out, "{:<width$}  {:<15}  {}", hit.title, category, hit.path)?;
    }
    if outcome.is_truncated() {
        writeln!(out, "showing {} of {}", outcome.hits.len(), outcome.total_matches)?;
    }
    Ok(out)
}

pub fn render_counts(counts: &[(Category, usize)]) -> anyhow::Result<String> {
    let mut out = String::new();
    for (category, n) in counts {
        writeln!(out, "{:<15} {n}", category.as_str())?;
    }
    Ok(out)
}

pub fn resolve_snapshot_dir(flag: Option<String>, configured: Option<String>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    flag.or(configured).map(|p| opsdesk_core::config::resolve_with_base(&cwd, p))
}
