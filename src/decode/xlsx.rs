//! `.xlsx` decoding: ZIP container, SpreadsheetML parts, solid fill colours.
//!
//! Each sheet becomes a dense grid anchored at its first used cell, so
//! grid row 0 is the header. Background colours are keyed by grid row and
//! column.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Read, Seek};
use zip::read::ZipFile;
use zip::ZipArchive;

use super::color::{parse_theme_colors, resolve_color, ColorSpec, Palette};
use super::xml::{attr_string, attr_string_local, attr_u32, parse_cell_ref};
use crate::error::Result;
use crate::types::{CellColorMap, CellValue, DecodedSheet, Row, Workbook};

/// Part paths found in `xl/_rels/workbook.xml.rels`.
#[derive(Debug, Default)]
struct WorkbookParts {
    /// rId -> full part path
    worksheets: HashMap<String, String>,
    shared_strings: Option<String>,
    styles: Option<String>,
    theme: Option<String>,
}

/// A sheet listed in `xl/workbook.xml`, in tab order.
#[derive(Debug)]
struct SheetEntry {
    name: String,
    path: String,
}

/// Decode every sheet of an `.xlsx` archive.
pub fn decode_xlsx(data: &[u8]) -> Result<Workbook> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let parts = read_relationships(&mut archive);
    let entries = read_sheet_entries(&mut archive, &parts.worksheets)?;

    let shared_strings_path = find_part(
        &archive,
        parts.shared_strings.as_deref(),
        "xl/sharedStrings.xml",
    );
    let shared_strings = match open_part(&mut archive, shared_strings_path.as_deref()) {
        Some(reader) => read_shared_strings(reader)?,
        None => Vec::new(),
    };

    let mut palette = Palette::default();
    let theme_path = find_part(&archive, parts.theme.as_deref(), "xl/theme/theme1.xml");
    if let Some(reader) = open_part(&mut archive, theme_path.as_deref()) {
        palette.theme = parse_theme_colors(reader);
    }

    let styles_path = find_part(&archive, parts.styles.as_deref(), "xl/styles.xml");
    let styles = match open_part(&mut archive, styles_path.as_deref()) {
        Some(reader) => read_styles(reader).unwrap_or_else(|e| {
            log::warn!("ignoring malformed styles part: {e}");
            RawStyles::default()
        }),
        None => RawStyles::default(),
    };
    let xf_colors = styles.resolve(&mut palette);

    let mut sheets = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(reader) = open_part(&mut archive, Some(&entry.path)) else {
            log::warn!("sheet {:?} points at missing part {}", entry.name, entry.path);
            continue;
        };
        let grid = read_sheet(reader, &shared_strings, &xf_colors)?;
        log::debug!(
            "sheet {:?}: {} rows, {} coloured cells",
            entry.name,
            grid.rows.len(),
            grid.colors.len()
        );
        sheets.push(DecodedSheet {
            name: entry.name,
            rows: grid.rows,
            cell_colors: (!grid.colors.is_empty()).then_some(grid.colors),
        });
    }

    Ok(Workbook { sheets })
}

/// The related part if present, else the conventional location.
fn find_part<R: Read + Seek>(
    archive: &ZipArchive<R>,
    related: Option<&str>,
    fallback: &str,
) -> Option<String> {
    let exists = |path: &str| archive.file_names().any(|name| name == path);
    related
        .filter(|path| exists(path))
        .or_else(|| Some(fallback).filter(|path| exists(path)))
        .map(str::to_string)
}

fn open_part<'a, R: Read + Seek>(
    archive: &'a mut ZipArchive<R>,
    path: Option<&str>,
) -> Option<BufReader<ZipFile<'a>>> {
    archive.by_name(path?).ok().map(BufReader::new)
}

/// Resolve a relationship target against the `xl/` directory.
fn part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

fn read_relationships<R: Read + Seek>(archive: &mut ZipArchive<R>) -> WorkbookParts {
    let mut parts = WorkbookParts::default();
    let Some(reader) = open_part(archive, Some("xl/_rels/workbook.xml.rels")) else {
        return parts;
    };

    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attr_string(e, b"Id").unwrap_or_default();
                let target = attr_string(e, b"Target").unwrap_or_default();
                let rel_type = attr_string(e, b"Type").unwrap_or_default();
                let path = part_path(&target);
                if target.is_empty() {
                    log::warn!("relationship {id:?} has no target");
                } else if rel_type.ends_with("/worksheet") && !id.is_empty() {
                    parts.worksheets.insert(id, path);
                } else if rel_type.ends_with("/sharedStrings") {
                    parts.shared_strings = Some(path);
                } else if rel_type.ends_with("/styles") {
                    parts.styles = Some(path);
                } else if rel_type.ends_with("/theme") {
                    parts.theme = Some(path);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("workbook relationships are malformed: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }
    parts
}

fn read_sheet_entries<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    worksheets: &HashMap<String, String>,
) -> Result<Vec<SheetEntry>> {
    let file = archive.by_name("xl/workbook.xml")?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"sheet" => {
                if let Some(name) = attr_string(e, b"name") {
                    let path = attr_string_local(e, b"id")
                        .and_then(|rid| worksheets.get(&rid).cloned())
                        .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", entries.len() + 1));
                    entries.push(SheetEntry { name, path });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(entries)
}

/// Plain text of every `<si>`, rich runs concatenated, phonetic runs
/// skipped.
fn read_shared_strings<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_t = false;
    let mut in_phonetic = false;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"rPh" => in_phonetic = true,
                b"t" if !in_phonetic => in_t = true,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Event::Text(ref t) if in_t => current.push_str(&t.unescape()?),
            Event::CData(ref t) if in_t => {
                current.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

#[derive(Debug, Default)]
struct RawFill {
    pattern: Option<String>,
    fg: Option<ColorSpec>,
}

/// The parts of `styles.xml` that decide a cell's background.
#[derive(Debug, Default)]
struct RawStyles {
    fills: Vec<RawFill>,
    /// `fillId` of each `cellXfs/xf`
    xf_fills: Vec<Option<usize>>,
    indexed_colors: Vec<String>,
}

impl RawStyles {
    /// Background colour per cell format index. Only solid pattern fills
    /// count as a background.
    fn resolve(self, palette: &mut Palette) -> Vec<Option<String>> {
        if !self.indexed_colors.is_empty() {
            palette.indexed = self.indexed_colors;
        }
        let fill_colors: Vec<Option<String>> = self
            .fills
            .iter()
            .map(|fill| match (fill.pattern.as_deref(), &fill.fg) {
                (Some("solid"), Some(fg)) => resolve_color(fg, palette),
                _ => None,
            })
            .collect();
        self.xf_fills
            .iter()
            .map(|fill_id| fill_id.and_then(|id| fill_colors.get(id).cloned().flatten()))
            .collect()
    }
}

fn read_styles<R: BufRead>(reader: R) -> Result<RawStyles> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut styles = RawStyles::default();
    let mut in_fills = false;
    let mut in_cell_xfs = false;
    let mut in_indexed = false;
    let mut current_fill: Option<RawFill> = None;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"fills" => in_fills = !is_empty,
                    b"cellXfs" => in_cell_xfs = !is_empty,
                    b"indexedColors" => in_indexed = !is_empty,
                    b"fill" if in_fills => {
                        if is_empty {
                            styles.fills.push(RawFill::default());
                        } else {
                            current_fill = Some(RawFill::default());
                        }
                    }
                    b"patternFill" => {
                        if let Some(fill) = current_fill.as_mut() {
                            fill.pattern = attr_string(e, b"patternType");
                        }
                    }
                    b"fgColor" => {
                        if let Some(fill) = current_fill.as_mut() {
                            fill.fg = Some(ColorSpec::from_element(e));
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        styles
                            .xf_fills
                            .push(attr_u32(e, b"fillId").map(|id| id as usize));
                    }
                    b"rgbColor" if in_indexed => {
                        let color = attr_string(e, b"rgb")
                            .as_deref()
                            .and_then(super::color::normalize_hex)
                            .unwrap_or_else(|| "#000000".to_string());
                        styles.indexed_colors.push(color);
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"fills" => in_fills = false,
                b"cellXfs" => in_cell_xfs = false,
                b"indexedColors" => in_indexed = false,
                b"fill" => {
                    if let Some(fill) = current_fill.take() {
                        styles.fills.push(fill);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(styles)
}

/// `t` attribute of a `<c>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Number,
}

impl CellTag {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("s") => Self::Shared,
            Some("inlineStr") => Self::Inline,
            Some("str") => Self::Str,
            Some("b") => Self::Bool,
            Some("e") => Self::Error,
            _ => Self::Number,
        }
    }
}

#[derive(Debug)]
struct PendingCell {
    row: usize,
    col: usize,
    tag: CellTag,
    text: Option<String>,
}

impl PendingCell {
    fn value(&self, shared_strings: &[String]) -> Option<CellValue> {
        let text = self.text.as_deref()?;
        let value = match self.tag {
            CellTag::Shared => {
                let idx: usize = text.trim().parse().ok()?;
                CellValue::Text(shared_strings.get(idx)?.clone())
            }
            CellTag::Inline | CellTag::Str | CellTag::Error => CellValue::Text(text.to_string()),
            CellTag::Bool => match text.trim() {
                "1" | "true" => "TRUE".into(),
                "0" | "false" => "FALSE".into(),
                other => other.into(),
            },
            CellTag::Number => match text.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::Text(text.to_string()),
            },
        };
        Some(value)
    }
}

#[derive(Debug, Default)]
struct SheetGrid {
    rows: Vec<Row>,
    colors: CellColorMap,
}

fn read_sheet<R: BufRead>(
    reader: R,
    shared_strings: &[String],
    xf_colors: &[Option<String>],
) -> Result<SheetGrid> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut values: Vec<(usize, usize, CellValue)> = Vec::new();
    let mut colors: Vec<(usize, usize, String)> = Vec::new();

    let mut next_row = 0usize;
    let mut current_row = 0usize;
    let mut next_col = 0usize;
    let mut pending: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline = false;
    let mut in_phonetic = false;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"row" => {
                        current_row = attr_u32(e, b"r")
                            .and_then(|r| (r as usize).checked_sub(1))
                            .unwrap_or(next_row);
                        next_row = current_row + 1;
                        next_col = 0;
                    }
                    b"c" => {
                        let (col, row) = attr_string(e, b"r")
                            .and_then(|r| parse_cell_ref(r.as_bytes()))
                            .unwrap_or((next_col, current_row));
                        next_col = col + 1;
                        let style = attr_u32(e, b"s").map(|s| s as usize);
                        if let Some(color) = style.and_then(|s| xf_colors.get(s).cloned().flatten()) {
                            colors.push((row, col, color));
                        }
                        if !is_empty {
                            pending = Some(PendingCell {
                                row,
                                col,
                                tag: CellTag::parse(attr_string(e, b"t").as_deref()),
                                text: None,
                            });
                        }
                    }
                    b"v" if pending.is_some() && !is_empty => in_value = true,
                    b"is" if pending.is_some() && !is_empty => in_inline = true,
                    b"rPh" if in_inline && !is_empty => in_phonetic = true,
                    b"t" if in_inline && !in_phonetic && !is_empty => in_value = true,
                    _ => {}
                }
            }
            Event::Text(ref t) if in_value => {
                let text = t.unescape()?;
                if let Some(cell) = pending.as_mut() {
                    cell.text.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Event::CData(ref t) if in_value => {
                if let Some(cell) = pending.as_mut() {
                    cell.text
                        .get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"rPh" => in_phonetic = false,
                b"is" => in_inline = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        if let Some(value) = cell.value(shared_strings) {
                            values.push((cell.row, cell.col, value));
                        } else if cell.text.is_some() {
                            log::warn!(
                                "dropping unreadable cell at row {}, column {}",
                                cell.row + 1,
                                cell.col + 1
                            );
                        }
                    }
                    in_value = false;
                    in_inline = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(build_grid(values, colors))
}

/// Lay cells out densely from the first used row and column.
fn build_grid(
    values: Vec<(usize, usize, CellValue)>,
    colors: Vec<(usize, usize, String)>,
) -> SheetGrid {
    let bounds = values.iter().fold(None, |acc, &(r, c, _)| match acc {
        None => Some((r, c, r, c)),
        Some((r0, c0, r1, c1)) => Some((r0.min(r), c0.min(c), r1.max(r), c1.max(c))),
    });
    let Some((top, left, bottom, right)) = bounds else {
        return SheetGrid::default();
    };

    let width = right - left + 1;
    let mut rows: Vec<Row> = vec![vec![CellValue::default(); width]; bottom - top + 1];
    for (r, c, value) in values {
        if let Some(slot) = rows
            .get_mut(r - top)
            .and_then(|row| row.get_mut(c - left))
        {
            *slot = value;
        }
    }

    let mut color_map = CellColorMap::new();
    for (r, c, color) in colors {
        if (top..=bottom).contains(&r) && (left..=right).contains(&c) {
            color_map.insert(r - top, c - left, color);
        }
    }

    SheetGrid {
        rows,
        colors: color_map,
    }
}
