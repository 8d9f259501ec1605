//! Per-site sheet building: one site's latest snapshot, keyed by article.

use crate::models::{ArticleRecords, SiteTable, Snapshot};
use crate::snapshot::SnapshotStore;
use tracing::{error, info, instrument, warn};

/// Collate a snapshot into a table keyed by the given articles, in order.
///
/// For each article, every entry whose key equals that article contributes
/// its record, in snapshot order. Duplicates stay: repeated page loads may
/// legitimately produce the same listing twice and the engine never dedups.
/// Entries for articles outside the input list are ignored.
pub fn collate(site: &str, articles: &[String], snapshot: &Snapshot) -> SiteTable {
    let rows = articles
        .iter()
        .map(|article| ArticleRecords {
            article: article.clone(),
            records: snapshot
                .entries
                .iter()
                .filter(|entry| entry.article == *article)
                .map(|entry| entry.record.clone())
                .collect(),
        })
        .collect();
    SiteTable {
        site: site.to_string(),
        rows,
    }
}

/// Build the per-site table from the site's current snapshot.
///
/// Never fails: a missing snapshot means the site has no data yet, a corrupt
/// one is logged with its path for diagnosis; both degrade to an all-empty
/// table so the rest of the pipeline keeps going.
#[instrument(level = "info", skip(store, articles), fields(site = %site))]
pub async fn build(store: &SnapshotStore, site: &str, articles: &[String]) -> SiteTable {
    match store.read_latest(site).await {
        Ok(snapshot) => {
            let table = collate(site, articles, &snapshot);
            let found = table.rows.iter().filter(|r| !r.records.is_empty()).count();
            info!(
                entries = snapshot.entries.len(),
                articles = articles.len(),
                articles_found = found,
                "Built per-site table"
            );
            table
        }
        Err(e) if e.is_not_found() => {
            warn!(error = %e, "No snapshot yet; site table will be empty");
            SiteTable::empty(site, articles)
        }
        Err(e) => {
            error!(error = %e, "Unreadable snapshot; site table will be empty");
            SiteTable::empty(site, articles)
        }
    }
}
