//! Attribute and cell-reference helpers shared by the `.xlsx` readers.

use quick_xml::events::BytesStart;

/// String attribute by exact key. `None` when missing or not UTF-8.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| std::str::from_utf8(&attr.value).ok().map(str::to_string))
}

/// String attribute by local name, ignoring any namespace prefix.
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| std::str::from_utf8(&attr.value).ok().map(str::to_string))
}

pub fn attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

pub fn attr_f64(e: &BytesStart, key: &[u8]) -> Option<f64> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

/// `"1"` and `"true"` are true; anything else present is false.
pub fn attr_bool(e: &BytesStart, key: &[u8]) -> Option<bool> {
    attr_string(e, key).map(|s| matches!(s.as_str(), "1" | "true"))
}

/// Parse an A1-style reference (`$` allowed) into 0-based `(col, row)`.
pub fn parse_cell_ref(reference: &[u8]) -> Option<(usize, usize)> {
    let mut col: usize = 0;
    let mut row: usize = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in reference {
        match b {
            b'$' => {}
            b'A'..=b'Z' | b'a'..=b'z' if !saw_row => {
                let digit = usize::from(b.to_ascii_uppercase() - b'A') + 1;
                col = col.checked_mul(26)?.checked_add(digit)?;
                saw_col = true;
            }
            b'0'..=b'9' => {
                row = row.checked_mul(10)?.checked_add(usize::from(b - b'0'))?;
                saw_row = true;
            }
            _ => return None,
        }
    }

    (saw_col && saw_row && row > 0).then(|| (col - 1, row - 1))
}
