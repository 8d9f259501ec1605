// tests/pipeline.rs
//
// End-to-end flow over real files: ingest extractor output into the snapshot
// store, build per-site tables, aggregate, render the workbook, and read it
// back. Mirrors how the operator binary drives the library.

use std::fs;
use std::path::PathBuf;

use calamine::{open_workbook_auto, Data, Reader};
use price_sweep::aggregate::aggregate;
use price_sweep::models::{Entry, Record};
use price_sweep::outputs::xlsx::write_report;
use price_sweep::sheet;
use price_sweep::snapshot::SnapshotStore;

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("price_sweep_e2e_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn record(name: &str, price: &str, url: &str) -> Record {
    Record {
        description: Some(name.to_string()),
        price: Some(price.to_string()),
        url: Some(url.to_string()),
        ..Record::default()
    }
}

fn cell(range: &calamine::Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[tokio::test]
async fn full_pipeline_from_ingest_to_workbook() {
    let dir = tmp_dir("full");
    let store = SnapshotStore::new(dir.join("JSON"));
    let articles = vec!["LM317".to_string(), "NE555".to_string()];

    // One ChipDip run in two appends: a duplicate listing for LM317 arrives
    // in the second batch and must survive as a separate row.
    let mut chipdip_run = store.session("ChipDip");
    chipdip_run
        .append(vec![Entry::new(
            "LM317",
            record("LM317T regulator", "10", "https://chipdip.ru/p/1"),
        )])
        .await
        .unwrap();
    chipdip_run
        .append(vec![Entry::new(
            "LM317",
            record("LM317T regulator", "12", "https://chipdip.ru/p/2"),
        )])
        .await
        .unwrap();

    // eBay only knows the other article.
    store
        .write(
            "eBay",
            vec![Entry::new(
                "NE555",
                record("NE555 timer", "20", "https://ebay.com/i/5"),
            )],
        )
        .await
        .unwrap();

    let sites = store.discover_sites().await;
    assert_eq!(sites, vec!["ChipDip", "eBay"]);

    let mut tables = Vec::new();
    for site in &sites {
        tables.push(sheet::build(&store, site, &articles).await);
    }

    // ChipDip: both LM317 records, nothing for NE555.
    assert_eq!(tables[0].rows[0].records.len(), 2);
    assert!(tables[0].rows[1].records.is_empty());

    let unified = aggregate(&articles, &tables);
    assert_eq!(unified, aggregate(&articles, &tables), "aggregate must be idempotent");

    // LM317 row: two ChipDip cells then an eBay placeholder.
    let lm317 = &unified.rows[0];
    assert_eq!(lm317.cells.len(), 3);
    assert!(lm317.cells[2].record.is_none());
    // NE555 row: ChipDip placeholder then the eBay record.
    let ne555 = &unified.rows[1];
    assert!(ne555.cells[0].record.is_none());
    assert_eq!(
        ne555.cells[1].record.as_ref().unwrap().price.as_deref(),
        Some("20")
    );

    let report = dir.join("report.xlsx");
    write_report(&report, &tables, &unified).unwrap();

    let mut workbook = open_workbook_auto(&report).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Aggregate", "ChipDip", "eBay"]);

    let agg = workbook.worksheet_range("Aggregate").unwrap();
    assert_eq!(cell(&agg, 0, 0), "LM317");
    assert_eq!(cell(&agg, 2, 0), "ChipDip");
    assert_eq!(cell(&agg, 2, 2), "10");
    assert_eq!(cell(&agg, 3, 2), "12");
    assert_eq!(cell(&agg, 4, 0), "eBay");
    assert_eq!(cell(&agg, 4, 1), "Not found");
    assert_eq!(cell(&agg, 0, 4), "NE555");
}

#[tokio::test]
async fn rerun_overrides_older_snapshot_for_reporting() {
    let dir = tmp_dir("rerun");
    let store = SnapshotStore::new(dir.join("JSON"));
    let articles = vec!["LM317".to_string()];

    store
        .write(
            "ChipDip",
            vec![Entry::new("LM317", record("old listing", "99", ""))],
        )
        .await
        .unwrap();
    // Snapshot filenames carry second-resolution timestamps; spacing the runs
    // keeps both the names and the mtimes distinct.
    std::thread::sleep(std::time::Duration::from_millis(1100));
    store
        .write(
            "ChipDip",
            vec![Entry::new("LM317", record("new listing", "10", ""))],
        )
        .await
        .unwrap();

    let table = sheet::build(&store, "ChipDip", &articles).await;
    assert_eq!(table.rows[0].records.len(), 1);
    assert_eq!(
        table.rows[0].records[0].description.as_deref(),
        Some("new listing")
    );
}

#[tokio::test]
async fn corrupt_site_degrades_without_poisoning_others() {
    let dir = tmp_dir("corrupt");
    let store = SnapshotStore::new(dir.join("JSON"));
    let articles = vec!["LM317".to_string()];

    store
        .write(
            "eBay",
            vec![Entry::new("LM317", record("good", "20", ""))],
        )
        .await
        .unwrap();
    let bad_dir = store.site_dir("ChipDip");
    fs::create_dir_all(&bad_dir).unwrap();
    fs::write(bad_dir.join("ChipDipData_broken.json"), "{{{{").unwrap();

    let sites = store.discover_sites().await;
    let mut tables = Vec::new();
    for site in &sites {
        tables.push(sheet::build(&store, site, &articles).await);
    }
    let unified = aggregate(&articles, &tables);

    // ChipDip shows a placeholder, eBay's record is intact.
    let row = &unified.rows[0];
    assert_eq!(row.cells.len(), 2);
    assert!(row.cells[0].record.is_none());
    assert_eq!(
        row.cells[1].record.as_ref().unwrap().price.as_deref(),
        Some("20")
    );

    let report = dir.join("report.xlsx");
    write_report(&report, &tables, &unified).unwrap();
    assert!(report.exists());
}
