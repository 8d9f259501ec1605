//! Utility functions for timestamp labels, sheet naming, and link checks.

use chrono::Local;
use url::Url;

/// Filename timestamp label for snapshot files: `HH-MM-SS_DD-MM-YYYY`.
///
/// This is the label format the extractors have always used, so existing
/// snapshot directories and new ones sort and group the same way.
pub fn timestamp_label() -> String {
    Local::now().format("%H-%M-%S_%d-%m-%Y").to_string()
}

/// Human-readable creation stamp stored inside a snapshot: `YYYY-MM-DD HH:MM:SS`.
pub fn created_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Clamp a site name to a legal xlsx sheet name.
///
/// Excel forbids `[ ] : * ? / \`, leading/trailing apostrophes, empty names,
/// and names longer than 31 characters.
pub fn sanitize_sheet_name(site: &str) -> String {
    let mut name: String = site
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    name = name.trim_matches('\'').to_string();
    if name.is_empty() {
        name.push_str("Sheet");
    }
    // 31-char limit is in characters, not bytes
    name.chars().take(31).collect()
}

/// Whether a scraped link field is worth turning into a hyperlink.
///
/// Extractors write placeholder text ("Ссылка не найдена", "N/A") into the
/// url field when a listing has no link; only real http(s) URLs qualify.
pub fn is_http_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(u) => matches!(u.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
