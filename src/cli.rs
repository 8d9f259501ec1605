//! Command-line interface definitions.
//!
//! Two operator verbs: `ingest` persists extractor output into the snapshot
//! store, `report` consolidates current snapshots into the price workbook.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for price_sweep.
///
/// # Examples
///
/// ```sh
/// # Persist one run's scraped records for a site
/// price_sweep ingest --site ChipDip --records chipdip_run.json
///
/// # Consolidate all known sites into a report
/// price_sweep report -i articles.xlsx -o report.xlsx
///
/// # Only specific sites, explicit snapshot root
/// price_sweep report -i articles.xlsx -o report.xlsx -d data/JSON -s ChipDip -s eBay
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Append extractor record lists to a new snapshot for one site
    Ingest {
        /// Site the records were scraped from (names the snapshot directory)
        #[arg(short, long)]
        site: String,

        /// JSON files holding entry lists: [{"<article>": {…}}, …].
        /// All files go into one snapshot, in the order given.
        #[arg(short, long, required = true, num_args = 1..)]
        records: Vec<PathBuf>,

        /// Snapshot store root directory
        #[arg(short, long, default_value = "data/JSON")]
        data_dir: PathBuf,
    },

    /// Build per-site tables from current snapshots and write the report
    Report {
        /// Input workbook; articles come from the first column of the first sheet
        #[arg(short, long)]
        input: PathBuf,

        /// Output workbook for the consolidated report
        #[arg(short, long)]
        output: PathBuf,

        /// Snapshot store root directory
        #[arg(short, long, default_value = "data/JSON")]
        data_dir: PathBuf,

        /// Sites to include, in sheet order; defaults to every site with
        /// snapshot data
        #[arg(short, long)]
        site: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_report_parsing() {
        let cli = Cli::parse_from([
            "price_sweep",
            "report",
            "--input",
            "articles.xlsx",
            "--output",
            "report.xlsx",
            "-s",
            "ChipDip",
            "-s",
            "eBay",
        ]);

        match cli.command {
            Command::Report {
                input,
                output,
                data_dir,
                site,
            } => {
                assert_eq!(input, PathBuf::from("articles.xlsx"));
                assert_eq!(output, PathBuf::from("report.xlsx"));
                assert_eq!(data_dir, PathBuf::from("data/JSON"));
                assert_eq!(site, vec!["ChipDip", "eBay"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_ingest_collects_record_files() {
        let cli = Cli::parse_from([
            "price_sweep",
            "ingest",
            "--site",
            "eBay",
            "--records",
            "run1.json",
            "run2.json",
        ]);

        match cli.command {
            Command::Ingest { site, records, .. } => {
                assert_eq!(site, "eBay");
                assert_eq!(
                    records,
                    vec![PathBuf::from("run1.json"), PathBuf::from("run2.json")]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
