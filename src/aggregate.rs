//! Aggregation: union all per-site tables into one article-keyed table.

use crate::models::{SiteCell, SiteTable, UnifiedRow, UnifiedTable};
use tracing::{debug, info};

/// Union the given per-site tables into the unified table.
///
/// For each article in master input order, each site (in slice order)
/// contributes one cell per record it holds for that article, or a single
/// placeholder cell when it holds none — a site is never silently omitted
/// from a row. The result is a pure function of the arguments: no clocks, no
/// counters, no prior output is ever read back in, so repeated invocations
/// over the same tables are identical.
pub fn aggregate(articles: &[String], tables: &[SiteTable]) -> UnifiedTable {
    let rows = articles
        .iter()
        .map(|article| {
            let mut cells = Vec::new();
            for table in tables {
                match table.records_for(article) {
                    Some(records) if !records.is_empty() => {
                        cells.extend(records.iter().map(|record| SiteCell {
                            site: table.site.clone(),
                            record: Some(record.clone()),
                        }));
                    }
                    _ => cells.push(SiteCell {
                        site: table.site.clone(),
                        record: None,
                    }),
                }
            }
            debug!(article = %article, cells = cells.len(), "Aggregated article row");
            UnifiedRow {
                article: article.clone(),
                cells,
            }
        })
        .collect();

    let table = UnifiedTable { rows };
    info!(
        articles = articles.len(),
        sites = tables.len(),
        "Aggregated per-site tables"
    );
    table
}
