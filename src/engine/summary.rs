//! Footer aggregates over the visible rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::Dataset;
use crate::value::{format_number, numeric_value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    #[default]
    None,
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl SummaryMode {
    /// none → sum → avg → count → min → max → none
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Sum,
            Self::Sum => Self::Avg,
            Self::Avg => Self::Count,
            Self::Count => Self::Min,
            Self::Min => Self::Max,
            Self::Max => Self::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Count => "count",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "sum" => Ok(Self::Sum),
            "avg" | "average" => Ok(Self::Avg),
            "count" => Ok(Self::Count),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(format!("unknown summary mode: {other}")),
        }
    }
}

/// One footer cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SummaryValue {
    Number(f64),
    Count(usize),
    /// No numeric values to aggregate; rendered as `-`.
    Missing,
}

impl SummaryValue {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n),
            #[allow(clippy::cast_precision_loss)]
            Self::Count(n) => Some(n as f64),
            Self::Missing => None,
        }
    }
}

impl fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Count(n) => write!(f, "{n}"),
            Self::Missing => f.write_str("-"),
        }
    }
}

/// Aggregate one column over the visible rows.
///
/// `Count` counts rows regardless of content. The other modes only look at
/// numeric cells and yield [`SummaryValue::Missing`] when there are none.
pub fn summarize(
    dataset: &Dataset,
    visible: &[usize],
    col: usize,
    mode: SummaryMode,
) -> Option<SummaryValue> {
    let numbers = || {
        visible
            .iter()
            .filter_map(move |&orig| numeric_value(dataset.cell(orig, col)))
    };

    let value = match mode {
        SummaryMode::None => return None,
        SummaryMode::Count => SummaryValue::Count(visible.len()),
        SummaryMode::Sum | SummaryMode::Avg => {
            let (sum, n) = numbers().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            match (mode, n) {
                (_, 0) => SummaryValue::Missing,
                #[allow(clippy::cast_precision_loss)]
                (SummaryMode::Avg, n) => SummaryValue::Number(sum / n as f64),
                _ => SummaryValue::Number(sum),
            }
        }
        SummaryMode::Min => numbers()
            .reduce(f64::min)
            .map_or(SummaryValue::Missing, SummaryValue::Number),
        SummaryMode::Max => numbers()
            .reduce(f64::max)
            .map_or(SummaryValue::Missing, SummaryValue::Number),
    };
    Some(value)
}
