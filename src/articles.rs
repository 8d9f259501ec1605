//! Article list loading from the input spreadsheet.
//!
//! The operator's workbook keeps the search terms in the first column of the
//! first sheet, no header row. Blank cells are skipped; order is preserved
//! all the way through to the final report.

use crate::error::{Error, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{info, instrument};

/// Load the ordered article list from `path`.
///
/// Numeric cells are common (bare part numbers); they are rendered without
/// the float formatting artifacts a spreadsheet reader produces, so `12345`
/// stays `"12345"` and not `"12345.0"`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::NotFound {
            what: "input spreadsheet".to_string(),
            path: path.to_path_buf(),
        });
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| Error::decode(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::decode(path, "workbook has no sheets"))?
        .map_err(|e| Error::decode(path, e))?;

    let mut articles = Vec::new();
    for row in range.rows() {
        let Some(cell) = row.first() else { continue };
        let text = match cell {
            Data::String(s) => s.trim().to_string(),
            Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            _ => continue,
        };
        if !text.is_empty() {
            articles.push(text);
        }
    }

    info!(count = articles.len(), "Loaded articles");
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;

    fn tmp_xlsx(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("price_sweep_articles_{}_{}.xlsx", name, std::process::id()));
        let _ = std::fs::remove_file(&p);
        p
    }

    #[test]
    fn test_load_skips_blanks_and_preserves_order() {
        let path = tmp_xlsx("order");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "LM317").unwrap();
        // row 1 intentionally left blank
        sheet.write_string(2, 0, "  NE555  ").unwrap();
        sheet.write_number(3, 0, 74141.0).unwrap();
        sheet.write_string(4, 0, "").unwrap();
        workbook.save(&path).unwrap();

        let articles = load(&path).unwrap();
        assert_eq!(articles, vec!["LM317", "NE555", "74141"]);
    }

    #[test]
    fn test_load_only_reads_first_column() {
        let path = tmp_xlsx("first_col");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "A1").unwrap();
        sheet.write_string(0, 1, "ignored").unwrap();
        workbook.save(&path).unwrap();

        assert_eq!(load(&path).unwrap(), vec!["A1"]);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let err = load(Path::new("/nonexistent/articles.xlsx")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_garbage_file_is_decode_error() {
        let path = tmp_xlsx("garbage");
        std::fs::write(&path, "this is not a workbook").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "got: {err}");
    }
}
