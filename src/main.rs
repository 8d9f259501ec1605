//! Operator binary for the price consolidation pipeline.
//!
//! Two verbs wrap the library:
//!
//! - `ingest`: persist one scraping run's record lists for a site into the
//!   snapshot store (one timestamped JSON snapshot, appended file by file)
//! - `report`: read the article list, build one table per site from its
//!   current snapshot, union them, and write the consolidated workbook
//!
//! ## Usage
//!
//! ```sh
//! price_sweep ingest --site ChipDip --records chipdip_run.json
//! price_sweep report -i articles.xlsx -o report.xlsx
//! ```
//!
//! Error policy at this layer: per-site and per-file problems are logged and
//! the pipeline continues; only a missing article list or a blocked save of
//! the report itself ends the run with a failure.

use clap::Parser;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use price_sweep::cli::{Cli, Command};
use price_sweep::models::Entry;
use price_sweep::snapshot::SnapshotStore;
use price_sweep::{aggregate, articles, outputs, sheet, Error, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("price_sweep starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let result = match args.command {
        Command::Ingest {
            site,
            records,
            data_dir,
        } => ingest(&site, &records, &data_dir).await,
        Command::Report {
            input,
            output,
            data_dir,
            site,
        } => report(&input, &output, &data_dir, site).await,
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    result
}

/// Persist one run's extractor output for `site` into the snapshot store.
///
/// All record files are appended into one snapshot through one session, so
/// the resulting file holds the union of everything given, in order.
/// Unreadable record files are logged and skipped; a failed disk write is
/// fatal for the site's run.
async fn ingest(site: &str, records: &[std::path::PathBuf], data_dir: &Path) -> Result<()> {
    let store = SnapshotStore::new(data_dir);
    let mut session = store.session(site);
    let mut ingested = 0usize;

    for path in records {
        let entries = match load_entries(path).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Skipping unreadable records file");
                continue;
            }
        };
        info!(path = %path.display(), count = entries.len(), "Loaded extractor records");
        ingested += entries.len();

        if let Err(e) = session.append(entries).await {
            error!(site, error = %e, "Snapshot write failed; aborting this site's run");
            return Err(e);
        }
    }

    match session.path() {
        Some(path) => {
            info!(site, total = ingested, snapshot = %path.display(), "Ingest complete")
        }
        None => warn!(site, "Nothing ingested; no snapshot was created"),
    }
    Ok(())
}

/// Read one extractor output file: a JSON list of single-key entry objects.
async fn load_entries(path: &Path) -> Result<Vec<Entry>> {
    if !path.exists() {
        return Err(Error::NotFound {
            what: "records file".to_string(),
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| Error::decode(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::decode(path, e))
}

/// Consolidate current snapshots into the report workbook.
async fn report(
    input: &Path,
    output: &Path,
    data_dir: &Path,
    requested_sites: Vec<String>,
) -> Result<()> {
    let articles = match articles::load(input) {
        Ok(articles) => articles,
        Err(e) => {
            error!(path = %input.display(), error = %e, "Cannot load article list; nothing to report on");
            return Err(e);
        }
    };
    if articles.is_empty() {
        warn!(path = %input.display(), "Article list is empty; the report will be too");
    }

    let store = SnapshotStore::new(data_dir);
    let sites = if requested_sites.is_empty() {
        let discovered = store.discover_sites().await;
        info!(sites = ?discovered, "Discovered sites from snapshot store");
        discovered
    } else {
        requested_sites
    };
    if sites.is_empty() {
        warn!(data_dir = %data_dir.display(), "No sites with snapshot data");
    }

    let mut tables = Vec::with_capacity(sites.len());
    for site in &sites {
        // A site with missing or corrupt data yields an all-empty table and
        // the run keeps going; build() logs the details.
        tables.push(sheet::build(&store, site, &articles).await);
    }

    let unified = aggregate::aggregate(&articles, &tables);

    if let Err(e) = outputs::xlsx::write_report(output, &tables, &unified) {
        error!(
            path = %output.display(),
            error = %e,
            "Failed to save report (close it if it is open in another program)"
        );
        return Err(e);
    }

    info!(
        path = %output.display(),
        articles = articles.len(),
        sites = sites.len(),
        "Report written"
    );
    Ok(())
}
