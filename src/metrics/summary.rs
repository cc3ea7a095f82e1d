// src/metrics/summary.rs

use serde::Serialize;

use super::delta::{evaluate_delta, Delta, Polarity};
use super::extremum::{labelled_extremum, Extreme, LabelledExtremum};
use super::target::{average, divergence, hit_rate, Divergence, HitRate};
use crate::shape::{CoverageSeries, CutSeries};

/// Headline figures for a series that is tracked against a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    /// Last period with a value.
    pub latest: LabelledExtremum,
    pub vs_previous: Option<Delta>,
    pub vs_target: Option<Delta>,
    pub average: Option<f64>,
    pub average_target: Option<f64>,
    pub best: Option<LabelledExtremum>,
    pub worst: Option<LabelledExtremum>,
    pub hit_rate: Option<HitRate>,
    pub divergence: Option<Divergence>,
}

pub fn summarize_series(
    labels: &[String],
    values: &[Option<f64>],
    targets: &[Option<f64>],
    polarity: Polarity,
) -> Option<SeriesSummary> {
    let mut present = values
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(i, v)| v.filter(|v| v.is_finite()).map(|v| (i, v)));
    let (latest_index, latest_value) = present.next()?;
    let previous = present.next().map(|(_, v)| v);

    let latest_target = targets.get(latest_index).copied().flatten();
    let (best_side, worst_side) = match polarity {
        Polarity::HigherIsBetter => (Extreme::Max, Extreme::Min),
        Polarity::LowerIsBetter => (Extreme::Min, Extreme::Max),
    };

    Some(SeriesSummary {
        latest: LabelledExtremum {
            label: labels.get(latest_index).cloned().unwrap_or_default(),
            value: latest_value,
            meta: latest_target,
        },
        vs_previous: evaluate_delta(Some(latest_value), previous, polarity),
        vs_target: evaluate_delta(Some(latest_value), latest_target, polarity),
        average: average(values),
        average_target: average(targets),
        best: labelled_extremum(labels, values, targets, best_side),
        worst: labelled_extremum(labels, values, targets, worst_side),
        hit_rate: hit_rate(values, targets, polarity),
        divergence: divergence(labels, values, targets),
    })
}

/// A falling cut rate is good.
pub fn cut_summary(series: &CutSeries) -> Option<SeriesSummary> {
    summarize_series(
        &series.labels(),
        &series.percents(),
        &series.metas(),
        Polarity::LowerIsBetter,
    )
}

/// Coverage at or above its target is good.
pub fn coverage_summary(series: &CoverageSeries) -> Option<SeriesSummary> {
    summarize_series(
        &series.labels(),
        &series.realized(),
        &series.metas(),
        Polarity::HigherIsBetter,
    )
}
