//! Tests for the `TableView` facade: loading, sheet switching and the
//! command surface JavaScript uses.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]

mod common;
mod fixtures;

use common::*;
use xltable::engine::SortDirection;
use xltable::{FilterUniverse, TableConfig, TableView};

fn two_sheet_book() -> Vec<u8> {
    XlsxBuilder::new()
        .sheet("Positions")
        .cell("A1", "Sym")
        .cell("B1", "Qty")
        .colored("A2", "AAPL", r#"<fgColor rgb="FFFFFF00"/>"#)
        .cell("B2", 10)
        .cell("A3", "MSFT")
        .cell("B3", 5)
        .colored("A4", "AAPL", r#"<fgColor rgb="FFFF0000"/>"#)
        .cell("B4", 3)
        .sheet("Orders")
        .cell("A1", "Id")
        .cell("B1", "Side")
        .cell("A2", 1)
        .cell("B2", "BUY")
        .build()
}

fn loaded() -> TableView {
    let mut view = TableView::new();
    view.load("book.xlsx", &two_sheet_book()).unwrap();
    view
}

#[test]
fn test_load_shows_first_sheet() {
    let view = loaded();
    assert_eq!(view.sheet_names(), vec!["Positions", "Orders"]);
    assert_eq!(view.active_sheet(), 0);
    let snap = view.snapshot().unwrap();
    assert_eq!(snap.counts.total, 3);
    assert_eq!(snap.columns[0].header, "Sym");
    assert_eq!(snap.rows[0].color.as_deref(), Some("#FFFF00"));
    assert_eq!(snap.available_colors, vec!["#FF0000", "#FFFF00", "__none__"]);
}

#[test]
fn test_switching_sheets_resets_state() {
    let mut view = loaded();
    view.set_search("aapl");
    view.toggle_row(0, false);
    view.add_pin();

    assert!(view.set_active_sheet(1));
    let snap = view.snapshot().unwrap();
    assert_eq!(snap.search, "");
    assert_eq!(snap.counts.selected, 0);
    assert_eq!(snap.pin_count, 0);
    assert_eq!(snap.columns[1].header, "Side");

    assert!(view.set_active_sheet(0));
    let snap = view.snapshot().unwrap();
    assert_eq!(snap.counts.visible, 3);
    assert_eq!(snap.search, "");

    assert!(!view.set_active_sheet(2));
    assert_eq!(view.active_sheet(), 0);
}

#[test]
fn test_same_sheet_keeps_state() {
    let mut view = loaded();
    view.set_search("msft");
    assert!(view.set_active_sheet(0));
    assert_eq!(view.snapshot().unwrap().counts.visible, 1);
}

#[test]
fn test_color_commands() {
    let mut view = loaded();
    view.toggle_color_filter("#FF0000");
    assert_eq!(view.engine().unwrap().visible_orig_indices(), &[2]);
    view.toggle_color_filter("__none__");
    assert_eq!(view.engine().unwrap().visible_orig_indices(), &[1, 2]);
    view.clear_color_filter();

    view.toggle_color_sort();
    let snap = view.snapshot().unwrap();
    assert_eq!(snap.color_sort, Some(SortDirection::Asc));
    let order: Vec<usize> = snap.rows.iter().map(|r| r.orig_index).collect();
    assert_eq!(order, vec![2, 0, 1]);
}

#[test]
fn test_delete_and_resize_commands() {
    let mut view = loaded();
    view.select_all_visible();
    view.toggle_row(1, false);
    view.delete_selected();
    let snap = view.snapshot().unwrap();
    assert_eq!(snap.counts.deleted, 2);
    assert_eq!(snap.rows.len(), 1);
    assert_eq!(snap.rows[0].cells, vec!["MSFT", "5"]);

    let start = snap.columns[1].width;
    view.begin_resize(1, 0.0);
    assert_eq!(view.drag_resize(25.0), Some(start + 25.0));
    assert_eq!(view.end_resize(25.0), Some(start + 25.0));
    assert_eq!(view.snapshot().unwrap().columns[1].width, start + 25.0);
    view.reset_widths();
    assert_eq!(view.snapshot().unwrap().columns[1].width, start);
}

#[test]
fn test_narrowed_filter_options_from_config() {
    let config = TableConfig {
        filter_universe: FilterUniverse::Narrowed,
        ..TableConfig::default()
    };
    let mut view = TableView::with_config(config);
    view.load("book.xlsx", &two_sheet_book()).unwrap();
    view.apply_filter(1, vec!["5".into()]);
    assert_eq!(view.filter_options(0), vec!["MSFT"]);
    assert_eq!(view.filter_options(1), vec!["10", "3", "5"]);
}

#[test]
fn test_snapshot_json_shape() {
    let mut view = loaded();
    view.set_summary_mode("max");
    let json: serde_json::Value = serde_json::from_str(&view.snapshot_json()).unwrap();
    assert_eq!(json["counts"]["total"], 3);
    assert_eq!(json["summaryMode"], "max");
    assert_eq!(json["columns"][1]["summary"], "10");
    assert_eq!(json["rows"][0]["origIndex"], 0);
    assert_eq!(json["allVisibleSelected"], false);
}

#[test]
fn test_csv_upload_replaces_workbook() {
    let mut view = loaded();
    view.load("other.csv", b"Name\nx\ny\n").unwrap();
    assert_eq!(view.sheet_names(), vec!["Sheet1"]);
    assert_eq!(view.export_csv(), "\u{FEFF}Name\r\nx\r\ny");
}
