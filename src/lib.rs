//! # price_sweep
//!
//! Consolidates per-site product listings for a list of search terms
//! ("articles") into one price spreadsheet.
//!
//! The scraping collaborators deliver, per site and per run, a list of
//! records keyed by article. This crate owns everything downstream of that
//! contract:
//!
//! 1. **Snapshot store** ([`snapshot`]): one timestamped JSON file per site
//!    per run; appends accrue within a run, the most recently modified file
//!    is a site's current truth.
//! 2. **Per-site sheet builder** ([`sheet`]): the current snapshot collated
//!    into a table with exactly one row per input article, in input order.
//! 3. **Aggregator** ([`aggregate`]): all per-site tables unioned into one
//!    article-keyed table, placeholders where a site came up empty, never
//!    deduplicated, idempotent over static inputs.
//! 4. **Spreadsheet glue** ([`articles`], [`outputs`]): article list in,
//!    consolidated workbook out.
//!
//! Failures are typed ([`error::Error`]): missing sources and decode failures
//! degrade to empty data for that unit of work, write failures surface to the
//! operator. One article's or one site's trouble never aborts a whole run.

pub mod aggregate;
pub mod articles;
pub mod cli;
pub mod error;
pub mod models;
pub mod outputs;
pub mod sheet;
pub mod snapshot;
pub mod utils;

pub use error::{Error, Result};
