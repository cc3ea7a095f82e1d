// src/present/chart.rs

use serde::Serialize;

use super::format::{format_currency, format_percent, PLACEHOLDER};
use crate::shape::{BlockageSeries, Breakdown};

/// Amplitude of the percent line relative to its raw values.
pub const LINE_SCALE: f64 = 0.55;
/// Downward shift of the percent line, in axis units after scaling.
pub const LINE_OFFSET: f64 = 55.0;

const METER_MIN: f64 = 4.0;
const METER_MAX: f64 = 100.0;

/// A period label such as `"05 mai"` split for a two-line axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelParts {
    pub day: String,
    /// Falls back to the day when the label has a single word.
    pub month: String,
}

pub fn split_label(label: &str) -> LabelParts {
    let mut words = label.split_whitespace();
    let day = words.next().unwrap_or_default().to_string();
    let rest = words.collect::<Vec<_>>().join(" ");
    let month = if rest.is_empty() { day.clone() } else { rest };
    LabelParts { day, month }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockageChart {
    pub day_labels: Vec<String>,
    pub month_labels: Vec<String>,
    pub bars: Vec<Option<f64>>,
    /// Percent line after [`scale_line`], for plotting.
    pub line: Vec<Option<f64>>,
    /// Percent line as reported, for tooltips.
    pub line_raw: Vec<Option<f64>>,
    pub accumulated: Vec<Option<f64>>,
}

pub fn scale_line(percent: f64) -> f64 {
    percent * LINE_SCALE - LINE_OFFSET
}

pub fn blockage_chart(series: &BlockageSeries) -> BlockageChart {
    let (day_labels, month_labels): (Vec<String>, Vec<String>) = series
        .points
        .iter()
        .map(|p| {
            let parts = split_label(&p.label);
            (parts.day, parts.month)
        })
        .unzip();
    let line_raw = series.percents();

    BlockageChart {
        day_labels,
        month_labels,
        bars: series.values(),
        line: line_raw.iter().map(|p| p.map(scale_line)).collect(),
        line_raw,
        accumulated: series.accumulated(),
    }
}

/// Bar width for a share, in percent of the row.
pub fn meter_width(share: f64) -> u32 {
    let share = if share.is_finite() { share } else { 0.0 };
    (share * 100.0).round().clamp(METER_MIN, METER_MAX) as u32
}

/// One line of a motive list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterRow {
    pub label: String,
    pub observation: String,
    /// `R$ 1.234,56 - 12,3% do total`
    pub details: String,
    pub width: u32,
}

pub fn meter_rows(breakdown: &Breakdown) -> Vec<MeterRow> {
    breakdown
        .entries
        .iter()
        .map(|entry| MeterRow {
            label: entry.label.clone(),
            observation: entry
                .observation
                .clone()
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            details: format!(
                "{} - {} do total",
                format_currency(entry.value),
                format_percent(entry.share, 1)
            ),
            width: meter_width(entry.share),
        })
        .collect()
}
