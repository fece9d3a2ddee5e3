//! CSV writer for the visible table.

use crate::types::Dataset;

/// File name offered for downloads.
pub const DEFAULT_EXPORT_FILENAME: &str = "export.csv";

const BOM: char = '\u{FEFF}';
const ROW_SEPARATOR: &str = "\r\n";

/// Quote a field iff it contains a comma, quote, CR or LF.
fn escape_field(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

fn push_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field.as_ref()));
    }
}

/// BOM-prefixed, CRLF-separated CSV text.
pub fn to_csv<H, R>(headers: &[H], rows: &[R]) -> String
where
    H: AsRef<str>,
    R: AsRef<[String]>,
{
    let mut out = String::new();
    out.push(BOM);
    push_record(&mut out, headers);
    for row in rows {
        out.push_str(ROW_SEPARATOR);
        push_record(&mut out, row.as_ref());
    }
    out
}

/// Header labels for the given original column indices. Blank headers
/// become `Column {n+1}`.
pub fn export_headers(dataset: &Dataset, columns: &[usize]) -> Vec<String> {
    columns
        .iter()
        .map(|&col| {
            let header = dataset.header(col).to_string();
            if header.trim().is_empty() {
                format!("Column {}", col + 1)
            } else {
                header
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("plain", "plain" ; "plain")]
    #[test_case("a,b", "\"a,b\"" ; "comma")]
    #[test_case("say \"x\"", "\"say \"\"x\"\"\"" ; "quotes doubled")]
    #[test_case("two\nlines", "\"two\nlines\"" ; "newline")]
    #[test_case("cr\rhere", "\"cr\rhere\"" ; "carriage return")]
    #[test_case("", "" ; "empty")]
    fn test_escape_field(input: &str, expected: &str) {
        assert_eq!(escape_field(input), expected);
    }

    #[test]
    fn test_quoting_and_bom() {
        let csv = to_csv(
            &["Name", "Note"],
            &[vec!["Al, pha".to_string(), "He said \"hi\"".to_string()]],
        );
        assert!(csv.starts_with('\u{FEFF}'));
        assert_eq!(
            csv,
            "\u{FEFF}Name,Note\r\n\"Al, pha\",\"He said \"\"hi\"\"\""
        );
    }

    #[test]
    fn test_header_only() {
        let csv = to_csv::<&str, Vec<String>>(&["A"], &[]);
        assert_eq!(csv, "\u{FEFF}A");
    }

    #[test]
    fn test_blank_headers_fall_back() {
        let ds = Dataset::new(
            vec!["Sym".into(), "".into(), " ".into()],
            vec![vec!["x".into(), "y".into(), "z".into()]],
        );
        assert_eq!(
            export_headers(&ds, &[0, 2, 1]),
            vec!["Sym", "Column 3", "Column 2"]
        );
    }
}
