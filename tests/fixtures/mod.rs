//! Test fixtures for generating spreadsheet files in memory.
//!
//! [`XlsxBuilder`] writes a minimal but valid `.xlsx` package: workbook,
//! relationships, shared strings, a styles part with one solid fill per
//! coloured cell, the default Office theme and one part per sheet.
//!
//! # Example
//!
//! ```rust,ignore
//! let xlsx = XlsxBuilder::new()
//!     .sheet("Trades")
//!     .cell("A1", "Sym")
//!     .cell("B1", "Qty")
//!     .colored("A2", "AAPL", r#"<fgColor rgb="FFFFFF00"/>"#)
//!     .cell("B2", 10)
//!     .build();
//!
//! let workbook = xltable::decode::decode("trades.xlsx", &xlsx).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

// ============================================================================
// Cell values
// ============================================================================

/// A cell as written to sheet XML.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureValue {
    Number(f64),
    /// Stored in the shared strings table
    Shared(String),
    /// `t="inlineStr"`
    Inline(String),
    Bool(bool),
    Error(String),
    /// A `<c>` element without a value, only useful with a fill
    Blank,
}

impl From<f64> for FixtureValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for FixtureValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for FixtureValue {
    fn from(s: &str) -> Self {
        Self::Shared(s.to_string())
    }
}

impl From<bool> for FixtureValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[derive(Debug, Clone)]
struct FixtureCell {
    reference: String,
    value: FixtureValue,
    style: Option<usize>,
}

#[derive(Debug, Clone)]
struct FixtureSheet {
    name: String,
    cells: Vec<FixtureCell>,
}

// ============================================================================
// Workbook builder
// ============================================================================

/// Builder for `.xlsx` packages.
#[derive(Debug, Clone, Default)]
pub struct XlsxBuilder {
    sheets: Vec<FixtureSheet>,
    /// Inner XML of each extra `<fill>`, after the two reserved fills
    fills: Vec<String>,
    indexed_colors: Option<Vec<String>>,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new sheet; following cells go to it.
    pub fn sheet(mut self, name: &str) -> Self {
        self.sheets.push(FixtureSheet {
            name: name.to_string(),
            cells: Vec::new(),
        });
        self
    }

    pub fn cell(self, reference: &str, value: impl Into<FixtureValue>) -> Self {
        self.push_cell(reference, value.into(), None)
    }

    /// A cell with a solid fill whose foreground is `fg_xml`, e.g.
    /// `<fgColor rgb="FFFFFF00"/>`.
    pub fn colored(self, reference: &str, value: impl Into<FixtureValue>, fg_xml: &str) -> Self {
        let fill = format!(r#"<patternFill patternType="solid">{fg_xml}</patternFill>"#);
        self.styled(reference, value.into(), fill)
    }

    /// A cell with an arbitrary pattern fill.
    pub fn patterned(
        self,
        reference: &str,
        value: impl Into<FixtureValue>,
        pattern: &str,
        fg_xml: &str,
    ) -> Self {
        let fill = format!(r#"<patternFill patternType="{pattern}">{fg_xml}</patternFill>"#);
        self.styled(reference, value.into(), fill)
    }

    /// Replace the default indexed palette (`<indexedColors>`).
    pub fn indexed_colors(mut self, argb: &[&str]) -> Self {
        self.indexed_colors = Some(argb.iter().map(|s| (*s).to_string()).collect());
        self
    }

    fn styled(mut self, reference: &str, value: FixtureValue, fill_xml: String) -> Self {
        let fill_id = match self.fills.iter().position(|f| *f == fill_xml) {
            Some(pos) => pos + 2,
            None => {
                self.fills.push(fill_xml);
                self.fills.len() + 1
            }
        };
        // cellXfs are laid out so that xf N uses fill N
        self.push_cell(reference, value, Some(fill_id))
    }

    fn push_cell(mut self, reference: &str, value: FixtureValue, style: Option<usize>) -> Self {
        if self.sheets.is_empty() {
            self = self.sheet("Sheet1");
        }
        if let Some(sheet) = self.sheets.last_mut() {
            sheet.cells.push(FixtureCell {
                reference: reference.to_string(),
                value,
                style,
            });
        }
        self
    }

    /// Write the package.
    pub fn build(self) -> Vec<u8> {
        let shared = self.shared_strings();

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut put = |name: &str, body: &str| {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };

        put("[Content_Types].xml", &self.content_types());
        put("_rels/.rels", ROOT_RELS);
        put("xl/workbook.xml", &self.workbook_xml());
        put("xl/_rels/workbook.xml.rels", &self.workbook_rels());
        put("xl/sharedStrings.xml", &shared_strings_xml(&shared));
        put("xl/styles.xml", &self.styles_xml());
        put("xl/theme/theme1.xml", THEME_XML);
        for (i, sheet) in self.sheets.iter().enumerate() {
            put(
                &format!("xl/worksheets/sheet{}.xml", i + 1),
                &sheet_xml(sheet, &shared),
            );
        }

        zip.finish().unwrap().into_inner()
    }

    fn shared_strings(&self) -> Vec<String> {
        let mut strings: Vec<String> = Vec::new();
        for cell in self.sheets.iter().flat_map(|s| &s.cells) {
            if let FixtureValue::Shared(text) = &cell.value {
                if !strings.contains(text) {
                    strings.push(text.clone());
                }
            }
        }
        strings
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
"#,
        );
        for i in 1..=self.sheets.len() {
            let _ = writeln!(
                xml,
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            );
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_xml(&self) -> String {
        let mut sheets = String::new();
        for (i, sheet) in self.sheets.iter().enumerate() {
            let _ = write!(
                sheets,
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(&sheet.name),
                i + 1,
                i + 10
            );
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>{sheets}</sheets>
</workbook>"#
        )
    }

    fn workbook_rels(&self) -> String {
        let mut rels = String::new();
        for i in 0..self.sheets.len() {
            let _ = write!(
                rels,
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 10,
                i + 1
            );
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
{rels}
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>
</Relationships>"#
        )
    }

    fn styles_xml(&self) -> String {
        let mut fills = String::from(
            r#"<fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill>"#,
        );
        for fill in &self.fills {
            let _ = write!(fills, "<fill>{fill}</fill>");
        }
        let fill_count = self.fills.len() + 2;

        let mut xfs = String::new();
        for fill_id in 0..fill_count {
            let _ = write!(
                xfs,
                r#"<xf numFmtId="0" fontId="0" fillId="{fill_id}" borderId="0" applyFill="1"/>"#
            );
        }

        let colors = self
            .indexed_colors
            .as_ref()
            .map(|argb| {
                let entries: String = argb
                    .iter()
                    .map(|c| format!(r#"<rgbColor rgb="{c}"/>"#))
                    .collect();
                format!("<colors><indexedColors>{entries}</indexedColors></colors>")
            })
            .unwrap_or_default();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="{fill_count}">{fills}</fills>
<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="{fill_count}">{xfs}</cellXfs>
<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
{colors}
</styleSheet>"#
        )
    }
}

fn shared_strings_xml(strings: &[String]) -> String {
    let items: String = strings
        .iter()
        .map(|s| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{n}" uniqueCount="{n}">{items}</sst>"#,
        n = strings.len()
    )
}

/// 1-based row number of an A1 reference.
fn row_number(reference: &str) -> u32 {
    reference
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .unwrap()
}

fn sheet_xml(sheet: &FixtureSheet, shared: &[String]) -> String {
    let mut cells = sheet.cells.clone();
    cells.sort_by_key(|c| row_number(&c.reference));

    let mut rows = String::new();
    let mut open_row: Option<u32> = None;
    for cell in &cells {
        let row = row_number(&cell.reference);
        if open_row != Some(row) {
            if open_row.is_some() {
                rows.push_str("</row>");
            }
            let _ = write!(rows, r#"<row r="{row}">"#);
            open_row = Some(row);
        }
        rows.push_str(&cell_xml(cell, shared));
    }
    if open_row.is_some() {
        rows.push_str("</row>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>{rows}</sheetData>
</worksheet>"#
    )
}

fn cell_xml(cell: &FixtureCell, shared: &[String]) -> String {
    let style = cell
        .style
        .map(|s| format!(r#" s="{s}""#))
        .unwrap_or_default();
    let r = &cell.reference;
    match &cell.value {
        FixtureValue::Number(n) => format!(r#"<c r="{r}"{style}><v>{n}</v></c>"#),
        FixtureValue::Shared(text) => {
            let idx = shared.iter().position(|s| s == text).unwrap();
            format!(r#"<c r="{r}"{style} t="s"><v>{idx}</v></c>"#)
        }
        FixtureValue::Inline(text) => format!(
            r#"<c r="{r}"{style} t="inlineStr"><is><t>{}</t></is></c>"#,
            escape(text)
        ),
        FixtureValue::Bool(b) => format!(r#"<c r="{r}"{style} t="b"><v>{}</v></c>"#, u8::from(*b)),
        FixtureValue::Error(code) => {
            format!(r#"<c r="{r}"{style} t="e"><v>{}</v></c>"#, escape(code))
        }
        FixtureValue::Blank => format!(r#"<c r="{r}"{style}/>"#),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">
<a:themeElements>
<a:clrScheme name="Office">
<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
<a:dk2><a:srgbClr val="44546A"/></a:dk2>
<a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
<a:accent1><a:srgbClr val="4472C4"/></a:accent1>
<a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
<a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
<a:accent4><a:srgbClr val="FFC000"/></a:accent4>
<a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
<a:accent6><a:srgbClr val="70AD47"/></a:accent6>
<a:hlink><a:srgbClr val="0563C1"/></a:hlink>
<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
</a:clrScheme>
</a:themeElements>
</a:theme>"#;
