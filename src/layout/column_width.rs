//! Initial column widths estimated from header and cell text.

use std::collections::HashMap;

use crate::config::WidthConfig;
use crate::types::Dataset;

/// Pixel cost of a string: ASCII characters are narrow, everything above
/// U+007F (Hangul, CJK, accented Latin) is counted `wide_char_factor` times
/// wider.
pub fn measure_text(text: &str, config: &WidthConfig) -> f32 {
    text.chars()
        .map(|ch| {
            if u32::from(ch) > 127 {
                config.ascii_char_width * config.wide_char_factor
            } else {
                config.ascii_char_width
            }
        })
        .sum()
}

/// Original row indices measured for the estimate, at most
/// `config.sample_rows` of them spread evenly over the dataset.
pub fn sample_row_indices(row_count: usize, config: &WidthConfig) -> Vec<usize> {
    let limit = config.sample_rows.max(1);
    if row_count <= limit {
        return (0..row_count).collect();
    }
    (0..limit).map(|i| i * row_count / limit).collect()
}

/// Estimate a width for every column of the dataset.
///
/// `width = clamp(widest measured text + padding, min_width, max_width)`.
pub fn estimate_column_widths(dataset: &Dataset, config: &WidthConfig) -> HashMap<usize, f32> {
    let samples = sample_row_indices(dataset.row_count(), config);

    (0..dataset.column_count())
        .map(|col| {
            let header = measure_text(&dataset.header(col).to_string(), config);
            let widest = samples
                .iter()
                .map(|&row| measure_text(&dataset.cell(row, col).to_string(), config))
                .fold(header, f32::max);
            let width = (widest + config.padding)
                .max(config.min_width)
                .min(config.max_width);
            (col, width)
        })
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    #[test]
    fn test_measure_ascii_and_wide() {
        let cfg = WidthConfig::default();
        assert_eq!(measure_text("abc", &cfg), 24.0);
        // two Hangul syllables at 12.8px each
        assert!((measure_text("삼성", &cfg) - 25.6).abs() < 1e-4);
    }

    #[test]
    fn test_estimate_clamps() {
        let cfg = WidthConfig::default();
        let long = "x".repeat(100);
        let ds = Dataset::new(
            vec!["A".into(), "Name".into(), "".into()],
            vec![vec!["1".into(), CellValue::Text(long), "abcdefghij".into()]],
        );
        let widths = estimate_column_widths(&ds, &cfg);
        // 8 + 40 < 60
        assert_eq!(widths[&0], 60.0);
        // 800 + 40 > 400
        assert_eq!(widths[&1], 400.0);
        // 80 + 40
        assert_eq!(widths[&2], 120.0);
    }

    #[test]
    fn test_sampling_is_bounded_and_even() {
        let cfg = WidthConfig::default();
        let idx = sample_row_indices(1000, &cfg);
        assert_eq!(idx.len(), 100);
        assert_eq!(idx[0], 0);
        assert_eq!(idx[1], 10);
        assert_eq!(idx[99], 990);
        assert_eq!(sample_row_indices(7, &cfg), vec![0, 1, 2, 3, 4, 5, 6]);
    }
}
