//! Dataset shapers: one per dashboard domain.
//!
//! A shaper consumes a decoded payload, resolves its columns through the
//! fuzzy resolver and returns a typed dataset. Shapers are pure: the same
//! payload always yields an equal dataset.

pub mod blockage;
pub mod cut;
pub mod funnel;
pub mod inventory;

use std::cmp::Ordering;

use serde::Serialize;

use crate::normalize::{looks_numeric, ColumnReference};
use crate::payload::RawRow;

pub use blockage::{shape_blockage, shape_top10, BlockagePoint, BlockageSeries, TopEntry};
pub use cut::{shape_cut, shape_cut_motives, CutPoint, CutSeries};
pub use funnel::{build_breakdown, shape_funnel, Breakdown, BreakdownEntry};
pub use inventory::{
    shape_coverage, shape_inventory, summarize_inventory_values, CoveragePoint, CoverageSeries,
    InventoryDataset, InventoryValues,
};

/// Rows kept by the top-N ranking.
pub const TOP_N: usize = 10;

/// A label with a nullable value, index-aligned with sibling series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: Option<f64>,
}

pub type NormalizedSeries = Vec<SeriesPoint>;

/// Synthetic label for rows whose label cell is blank (1-based).
pub fn fallback_label(index: usize) -> String {
    format!("Item {}", index + 1)
}

pub(crate) fn label_or_fallback(label: Option<String>, index: usize) -> String {
    label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| fallback_label(index))
}

/// First column, outside `taken`, whose first non-null cell does not read as
/// a number. Used when no label candidate matches.
pub(crate) fn first_text_column(
    columns: &[String],
    rows: &[RawRow],
    taken: &[&ColumnReference],
) -> Option<String> {
    columns
        .iter()
        .filter(|column| !taken.iter().any(|r| r.column.as_deref() == Some(column.as_str())))
        .find(|column| {
            rows.iter()
                .filter_map(|row| row.get(column.as_str()))
                .find(|cell| !cell.is_null())
                .is_some_and(|cell| !looks_numeric(cell))
        })
        .cloned()
}

/// Descending order on nullable values; rows without a value sink to the end.
pub(crate) fn descending_by_value(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
