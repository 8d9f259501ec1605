//! Durable per-site, per-run storage of scraped records.
//!
//! Each scraping run persists one JSON snapshot per site under
//! `<root>/<Site>Data/<Site>Data_<HH-MM-SS_DD-MM-YYYY>.json`. Snapshots are
//! append-only during their own run (via [`SnapshotSession`]) and read-only
//! afterwards; aggregation always consumes the most recently modified file
//! in a site's directory.

use crate::error::{Error, Result};
use crate::models::{Entry, Snapshot};
use crate::utils::{created_stamp, timestamp_label};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Handle to the snapshot directory tree (conventionally `data/JSON`).
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SnapshotStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one site's snapshots, e.g. `data/JSON/ChipDipData`.
    pub fn site_dir(&self, site: &str) -> PathBuf {
        self.root.join(format!("{site}Data"))
    }

    /// Write a fresh snapshot for `site` to a new timestamped file.
    ///
    /// Creates the site directory if absent. An unwritable directory fails
    /// that site's run; the caller reports it and moves on.
    #[instrument(level = "info", skip(self, entries), fields(site = %site))]
    pub async fn write(&self, site: &str, entries: Vec<Entry>) -> Result<PathBuf> {
        let dir = self.site_dir(site);
        fs::create_dir_all(&dir).await.map_err(|e| Error::Write {
            path: dir.clone(),
            source: e,
        })?;

        let path = dir.join(format!("{site}Data_{}.json", timestamp_label()));
        let snapshot = Snapshot::new(created_stamp(), entries);
        write_snapshot(&path, &snapshot).await?;
        info!(path = %path.display(), count = snapshot.entries.len(), "Wrote snapshot");
        Ok(path)
    }

    /// Path of the most recently modified snapshot file for `site`.
    ///
    /// Selection is a single point-in-time directory listing, so one
    /// aggregation pass always sees one consistent choice. A missing or empty
    /// directory means the site has no data yet.
    #[instrument(level = "debug", skip(self), fields(site = %site))]
    pub async fn latest_path(&self, site: &str) -> Result<PathBuf> {
        let dir = self.site_dir(site);
        let not_found = || Error::NotFound {
            what: site.to_string(),
            path: dir.clone(),
        };

        let mut read_dir = fs::read_dir(&dir).await.map_err(|_| not_found())?;
        let mut latest: Option<(SystemTime, PathBuf)> = None;
        while let Some(dirent) = read_dir.next_entry().await.map_err(|_| not_found())? {
            let path = dirent.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(meta) = dirent.metadata().await else {
                continue;
            };
            let Ok(modified) = meta.modified() else {
                continue;
            };
            let newer = match &latest {
                Some((best, _)) => modified > *best,
                None => true,
            };
            if newer {
                latest = Some((modified, path));
            }
        }

        match latest {
            Some((_, path)) => {
                debug!(path = %path.display(), "Selected latest snapshot");
                Ok(path)
            }
            None => Err(not_found()),
        }
    }

    /// Load the current (most recently modified) snapshot for `site`.
    pub async fn read_latest(&self, site: &str) -> Result<Snapshot> {
        let path = self.latest_path(site).await?;
        read_snapshot(&path).await
    }

    /// Sites with any persisted data: every `<Site>Data` directory under the
    /// root. A missing root is just "no sites yet".
    pub async fn discover_sites(&self) -> Vec<String> {
        let Ok(mut read_dir) = fs::read_dir(&self.root).await else {
            return Vec::new();
        };
        let mut sites = Vec::new();
        while let Ok(Some(dirent)) = read_dir.next_entry().await {
            let path = dirent.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if let Some(site) = name.strip_suffix("Data") {
                    if !site.is_empty() {
                        sites.push(site.to_string());
                    }
                }
            }
        }
        sites.sort();
        sites
    }

    /// Start a per-run append session for `site`.
    pub fn session(&self, site: &str) -> SnapshotSession {
        SnapshotSession {
            site: site.to_string(),
            dir: self.site_dir(site),
            active: None,
        }
    }
}

/// One site's output file for one run.
///
/// The session owns the active snapshot path explicitly: the first append
/// creates a fresh timestamped file, later appends extend that same file's
/// entry list, so the latest snapshot always holds the union of records seen
/// during the run. A new session (a new run) starts a new file.
#[derive(Debug)]
pub struct SnapshotSession {
    site: String,
    dir: PathBuf,
    active: Option<PathBuf>,
}

impl SnapshotSession {
    pub fn site(&self) -> &str {
        &self.site
    }

    /// The active snapshot path, once the first append has created it.
    pub fn path(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    /// Append records to this run's snapshot, creating it on first use.
    ///
    /// If the active file has been corrupted out from under the run it is
    /// recreated with the new entries rather than aborting the run.
    #[instrument(level = "info", skip(self, entries), fields(site = %self.site))]
    pub async fn append(&mut self, entries: Vec<Entry>) -> Result<&Path> {
        let (path, snapshot) = match self.active.take() {
            None => {
                fs::create_dir_all(&self.dir).await.map_err(|e| Error::Write {
                    path: self.dir.clone(),
                    source: e,
                })?;
                let path = self
                    .dir
                    .join(format!("{}Data_{}.json", self.site, timestamp_label()));
                info!(path = %path.display(), "Starting snapshot for this run");
                (path, Snapshot::new(created_stamp(), entries))
            }
            Some(path) => {
                let snapshot = match read_snapshot(&path).await {
                    Ok(mut snapshot) => {
                        snapshot.entries.extend(entries);
                        snapshot
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Active snapshot unreadable; recreating");
                        Snapshot::new(created_stamp(), entries)
                    }
                };
                (path, snapshot)
            }
        };

        write_snapshot(&path, &snapshot).await?;
        info!(path = %path.display(), total = snapshot.entries.len(), "Snapshot updated");
        Ok(self.active.insert(path).as_path())
    }
}

async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| Error::decode(path, format!("serialize: {e}")))?;
    fs::write(path, json).await.map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

async fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| Error::decode(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::decode(path, e))
}
