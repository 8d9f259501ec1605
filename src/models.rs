//! Data models for scraped listings and their collated representations.
//!
//! This module defines the core data structures used throughout the engine:
//! - [`Record`]: the scraped fields for one product listing
//! - [`Entry`]: one article-to-record association inside a snapshot
//! - [`Snapshot`]: one persisted run's raw output for one site
//! - [`SiteTable`]: article-keyed view of a single site's current snapshot
//! - [`UnifiedTable`]: article-keyed union of all sites' tables
//!
//! Snapshots are plain JSON on disk; the serde shapes here are wire-stable
//! and also accept the legacy field labels written by the earlier tooling.

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One scraped product listing.
///
/// Every field is optional: extraction is partial by nature, and each site
/// fills in what its markup exposes. Site-specific fields (`cards_ID`,
/// `product_code`, `name`, …) ride along in the open `extra` map so no
/// per-site schema is needed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Record {
    /// Listing description or title text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price as displayed by the site, currency and all. Kept as text;
    /// normalizing currencies is not this engine's job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Link to the listing page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Site-specific fields with no common schema.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Record {
    /// Display name for rendering: description if present, else the
    /// site-specific `name` field, else empty.
    pub fn display_name(&self) -> &str {
        if let Some(d) = self.description.as_deref() {
            return d;
        }
        self.extra
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }
}

/// One article-to-record association inside a snapshot.
///
/// On the wire an entry is a single-key object, `{"<article>": {record}}` —
/// the shape the extractors have always written. A snapshot's entry list may
/// hold zero, one, or many entries per article; duplicates are preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub article: String,
    pub record: Record,
}

impl Entry {
    pub fn new(article: impl Into<String>, record: Record) -> Self {
        Entry {
            article: article.into(),
            record,
        }
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.article, &self.record)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = Entry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping exactly one article to a record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entry, A::Error> {
                let (article, record) = map
                    .next_entry::<String, Record>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                if map.next_entry::<String, IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom(
                        "entry must map exactly one article to one record",
                    ));
                }
                Ok(Entry { article, record })
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

/// One persisted run's raw scraped output for one site.
///
/// Written as `{"Created": "...", "Data": [...]}`. The aliases keep snapshots
/// from the earlier tooling readable; new files always get the English labels.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Snapshot {
    /// Creation timestamp, `YYYY-MM-DD HH:MM:SS` local time.
    #[serde(rename = "Created", alias = "Дата и время создания файла")]
    pub created: String,
    /// The run's entry list, in scrape order.
    #[serde(rename = "Data", alias = "Данные")]
    pub entries: Vec<Entry>,
}

impl Snapshot {
    pub fn new(created: impl Into<String>, entries: Vec<Entry>) -> Self {
        Snapshot {
            created: created.into(),
            entries,
        }
    }
}

/// One row of a [`SiteTable`]: every record a site produced for one article.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecords {
    pub article: String,
    /// In snapshot order; empty when the site found nothing.
    pub records: Vec<Record>,
}

/// Article-keyed view of one site's current snapshot.
///
/// Always has exactly one row per input article, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteTable {
    pub site: String,
    pub rows: Vec<ArticleRecords>,
}

impl SiteTable {
    /// An all-empty table: the shape used when a site has no readable data.
    pub fn empty(site: impl Into<String>, articles: &[String]) -> Self {
        SiteTable {
            site: site.into(),
            rows: articles
                .iter()
                .map(|a| ArticleRecords {
                    article: a.clone(),
                    records: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn records_for(&self, article: &str) -> Option<&[Record]> {
        self.rows
            .iter()
            .find(|r| r.article == article)
            .map(|r| r.records.as_slice())
    }
}

/// One (site, record) cell of a unified row. `record: None` is the
/// placeholder for a site with no data for the article.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteCell {
    pub site: String,
    pub record: Option<Record>,
}

/// One row of the [`UnifiedTable`]: every site's records for one article,
/// laid out in site-processing order.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRow {
    pub article: String,
    pub cells: Vec<SiteCell>,
}

/// Article-keyed union of all sites' per-site tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnifiedTable {
    pub rows: Vec<UnifiedRow>,
}
