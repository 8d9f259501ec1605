//! Workbook rendering for the consolidated price report.
//!
//! Layout: the first sheet (`Aggregate`) unions every site; each article owns
//! a fixed-width block of four columns `{shop, name, price, link}` headed by
//! a merged cell with the article text. After it comes one sheet per site
//! with three-column blocks `{name, price, link}`. Link cells become
//! hyperlinks when the scraped value is a real http(s) URL; extractors write
//! placeholder text there when a listing has no link, and that stays text.

use crate::error::{Error, Result};
use crate::models::{Record, SiteTable, UnifiedTable};
use crate::utils::{is_http_url, sanitize_sheet_name};
use rust_xlsxwriter::{Format, FormatAlign, Url, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::{info, instrument};

/// Placeholder shown where a site produced no record for an article.
const NOT_FOUND: &str = "Not found";

/// Columns per article block on the aggregate sheet: shop, name, price, link.
const AGG_BLOCK: u16 = 4;
/// Columns per article block on a per-site sheet: name, price, link.
const SITE_BLOCK: u16 = 3;

/// Render the full report and save it to `path`.
///
/// A failed save (typically the file is open in a spreadsheet viewer) is
/// returned as [`Error::Write`] so the operator can close it and rerun;
/// nothing is retried automatically.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_report(
    path: &Path,
    tables: &[SiteTable],
    unified: &UnifiedTable,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold().set_align(FormatAlign::Center);
    let caption = Format::new().set_bold();

    let aggregate_sheet = workbook.add_worksheet();
    aggregate_sheet
        .set_name("Aggregate")
        .map_err(|e| Error::spreadsheet(path, e))?;
    write_aggregate_sheet(aggregate_sheet, unified, &header, &caption)
        .map_err(|e| Error::spreadsheet(path, e))?;

    for table in tables {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(sanitize_sheet_name(&table.site))
            .map_err(|e| Error::spreadsheet(path, e))?;
        write_site_sheet(sheet, table, &header, &caption)
            .map_err(|e| Error::spreadsheet(path, e))?;
    }

    workbook.save(path).map_err(|e| match e {
        XlsxError::IoError(source) => Error::Write {
            path: path.to_path_buf(),
            source,
        },
        other => Error::spreadsheet(path, other),
    })?;

    info!(sites = tables.len(), "Wrote report workbook");
    Ok(())
}

fn write_aggregate_sheet(
    sheet: &mut Worksheet,
    unified: &UnifiedTable,
    header: &Format,
    caption: &Format,
) -> core::result::Result<(), XlsxError> {
    for (i, row) in unified.rows.iter().enumerate() {
        let base = i as u16 * AGG_BLOCK;
        sheet.merge_range(0, base, 0, base + AGG_BLOCK - 1, &row.article, header)?;
        for (offset, label) in ["shop", "name", "price", "link"].iter().enumerate() {
            sheet.write_string_with_format(1, base + offset as u16, *label, caption)?;
        }

        for (r, cell) in row.cells.iter().enumerate() {
            let r = r as u32 + 2;
            sheet.write_string(r, base, &cell.site)?;
            match &cell.record {
                Some(record) => write_record(sheet, r, base + 1, record)?,
                None => {
                    sheet.write_string(r, base + 1, NOT_FOUND)?;
                }
            }
        }
    }
    Ok(())
}

fn write_site_sheet(
    sheet: &mut Worksheet,
    table: &SiteTable,
    header: &Format,
    caption: &Format,
) -> core::result::Result<(), XlsxError> {
    for (i, row) in table.rows.iter().enumerate() {
        let base = i as u16 * SITE_BLOCK;
        sheet.merge_range(0, base, 0, base + SITE_BLOCK - 1, &row.article, header)?;
        for (offset, label) in ["name", "price", "link"].iter().enumerate() {
            sheet.write_string_with_format(1, base + offset as u16, *label, caption)?;
        }

        if row.records.is_empty() {
            sheet.write_string(2, base, NOT_FOUND)?;
            continue;
        }
        for (r, record) in row.records.iter().enumerate() {
            write_record(sheet, r as u32 + 2, base, record)?;
        }
    }
    Ok(())
}

/// Write one record's `{name, price, link}` triple starting at `col`.
fn write_record(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    record: &Record,
) -> core::result::Result<(), XlsxError> {
    sheet.write_string(row, col, record.display_name())?;
    sheet.write_string(row, col + 1, record.price.as_deref().unwrap_or(""))?;
    match record.url.as_deref() {
        Some(link) if is_http_url(link) => {
            sheet.write_url(row, col + 2, Url::new(link))?;
        }
        Some(link) => {
            sheet.write_string(row, col + 2, link)?;
        }
        None => {}
    }
    Ok(())
}
