use clap::Parser;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::warn;

use opsdesk_cli::{init_tracing, render_counts, render_outcome, resolve_snapshot_dir, Args, Command};
use opsdesk_core::config::Config;
use opsdesk_producers::populate;
use opsdesk_search::{QueryPolicy, SearchIndexStore};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = Config::load()?;
    let policy = QueryPolicy::from_settings(&config.search_settings()?)?;
    let snapshot_dir = resolve_snapshot_dir(args.snapshots.clone(), config.snapshot_dir());

    let store = Arc::new(SearchIndexStore::with_policy(policy));
    let report = tokio::runtime::Runtime::new()?.block_on(populate(&store, snapshot_dir.as_deref()))?;
    for (category, error) in &report.failed {
        warn!(%category, %error, "category left empty");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.command {
        Command::Query { term } => {
            // Too-short terms get no result surface at all.
            if store.policy().needle(&term).is_some() || args.json {
                write!(out, "{}", render_outcome(&store.search(&term), args.json)?)?;
            }
        }
        Command::Interactive => {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let term = line?;
                if term.trim() == ":q" {
                    break;
                }
                if store.policy().needle(&term).is_none() {
                    continue;
                }
                write!(out, "{}", render_outcome(&store.search(&term), args.json)?)?;
                out.flush()?;
            }
        }
        Command::Categories => {
            write!(out, "{}", render_counts(&store.counts())?)?;
        }
    }
    Ok(())
}
