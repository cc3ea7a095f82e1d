// src/metrics/blockage.rs

use serde::Serialize;
use tracing::debug;

use super::delta::{deltas_vs_previous, Delta, Polarity, Tone};
use crate::payload::{ExtremePercent, TrendPayload};
use crate::shape::BlockageSeries;

const TREND_UP: &str = "Alta";
const TREND_DOWN: &str = "Queda";
const TREND_FLAT: &str = "Estável";

/// Movement of blocked stock from the first to the last period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub direction: String,
    pub delta: f64,
    pub tone: Tone,
    pub start_label: String,
    pub end_label: String,
}

impl From<&TrendPayload> for Trend {
    fn from(reported: &TrendPayload) -> Self {
        Trend {
            direction: reported.direction.clone(),
            delta: reported.delta,
            tone: Tone::from_status(&reported.status),
            start_label: reported.start_label.clone(),
            end_label: reported.end_label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockageMetrics {
    pub largest_positive: Option<ExtremePercent>,
    pub largest_negative: Option<ExtremePercent>,
    pub trend: Trend,
    pub acumulativo_sum: Option<f64>,
    /// Bar value vs the previous period; blocked stock going up is bad.
    pub bar_deltas: Vec<Option<Delta>>,
    pub line_deltas: Vec<Option<Delta>>,
}

/// Metrics for the blockage series. Whatever the source reported is kept;
/// the rest is derived from the points.
pub fn blockage_metrics(series: &BlockageSeries) -> Option<BlockageMetrics> {
    if series.points.is_empty() {
        return None;
    }
    let reported = series.reported.clone().unwrap_or_default();
    let derived_fields = [
        reported.largest_positive.is_none(),
        reported.largest_negative.is_none(),
        reported.trend.is_none(),
        reported.acumulativo_sum.is_none(),
    ]
    .iter()
    .filter(|missing| **missing)
    .count();
    debug!(derived_fields, "computing blockage metrics");

    let values = series.values();
    Some(BlockageMetrics {
        largest_positive: reported
            .largest_positive
            .or_else(|| largest_percent(series, |p| p > 0.0, |a, b| a > b)),
        largest_negative: reported
            .largest_negative
            .or_else(|| largest_percent(series, |p| p < 0.0, |a, b| a < b)),
        trend: reported
            .trend
            .as_ref()
            .map(Trend::from)
            .unwrap_or_else(|| derive_trend(series)),
        acumulativo_sum: reported.acumulativo_sum.or_else(|| sum_present(&series.accumulated())),
        bar_deltas: deltas_vs_previous(&values, Polarity::LowerIsBetter),
        line_deltas: deltas_vs_previous(&series.percents(), Polarity::LowerIsBetter),
    })
}

/// First point whose percent passes `keep` and beats every other under
/// `better`.
fn largest_percent(
    series: &BlockageSeries,
    keep: impl Fn(f64) -> bool,
    better: impl Fn(f64, f64) -> bool,
) -> Option<ExtremePercent> {
    series
        .points
        .iter()
        .filter_map(|p| p.percent.filter(|v| v.is_finite() && keep(*v)).map(|v| (p, v)))
        .fold(None, |best: Option<(&_, f64)>, (point, percent)| match best {
            Some((_, current)) if !better(percent, current) => best,
            _ => Some((point, percent)),
        })
        .map(|(point, percent)| ExtremePercent {
            label: point.label.clone(),
            percent,
        })
}

/// Compare the first and last bars, a missing bar counting as zero. The
/// tolerance is half a percent of the reference bar, and never below 1.
fn derive_trend(series: &BlockageSeries) -> Trend {
    let (Some(first_point), Some(last_point)) = (series.points.first(), series.points.last()) else {
        return flat_trend(String::new(), String::new());
    };
    let start_label = first_point.label.clone();
    let end_label = last_point.label.clone();
    if series.points.len() < 2 {
        return flat_trend(start_label, end_label);
    }

    let bar = |value: Option<f64>| value.filter(|v| v.is_finite()).unwrap_or(0.0);
    let (first, last) = (bar(first_point.value), bar(last_point.value));
    let delta = last - first;
    let reference = if first != 0.0 { first.abs() } else { last.abs() };
    let tolerance = (reference * 0.005).max(1.0);
    let (direction, tone) = if delta > tolerance {
        (TREND_UP, Tone::Bad)
    } else if delta < -tolerance {
        (TREND_DOWN, Tone::Good)
    } else {
        (TREND_FLAT, Tone::Neutral)
    };

    Trend {
        direction: direction.to_string(),
        delta,
        tone,
        start_label,
        end_label,
    }
}

fn flat_trend(start_label: String, end_label: String) -> Trend {
    Trend {
        direction: TREND_FLAT.to_string(),
        delta: 0.0,
        tone: Tone::Neutral,
        start_label,
        end_label,
    }
}

fn sum_present(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    (!present.is_empty()).then(|| present.iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Direction;
    use crate::payload::{BlockageMetricsPayload, BlockagePayload};
    use crate::shape::shape_blockage;
    use serde_json::json;

    fn series(body: serde_json::Value) -> BlockageSeries {
        shape_blockage(&BlockagePayload::decode(&body).expect("valid payload")).expect("points")
    }

    #[test]
    fn test_derives_metrics_when_missing() {
        let s = series(json!({
            "labels": ["01/05", "08/05", "15/05", "22/05"],
            "bars": [1000, 1200, 900, 1500],
            "line": [0, 20, -25, 66.7],
            "acumulativos": [1000, 2200, 3100, null]
        }));
        let metrics = blockage_metrics(&s).expect("points");

        let positive = metrics.largest_positive.expect("positive change");
        assert_eq!((positive.label.as_str(), positive.percent), ("22/05", 66.7));
        let negative = metrics.largest_negative.expect("negative change");
        assert_eq!((negative.label.as_str(), negative.percent), ("15/05", -25.0));

        assert_eq!(metrics.trend.direction, "Alta");
        assert_eq!(metrics.trend.delta, 500.0);
        assert_eq!(metrics.trend.tone, Tone::Bad);
        assert_eq!(metrics.trend.start_label, "01/05");
        assert_eq!(metrics.trend.end_label, "22/05");

        assert_eq!(metrics.acumulativo_sum, Some(6300.0));
        assert_eq!(metrics.bar_deltas.len(), 4);
        assert_eq!(metrics.bar_deltas[2].map(|d| d.direction), Some(Direction::Down));
        assert_eq!(metrics.bar_deltas[2].map(|d| d.tone), Some(Tone::Good));
    }

    #[test]
    fn test_trend_within_tolerance_is_stable() {
        let s = series(json!({"labels": ["a", "b"], "bars": [1000, 1004]}));
        let trend = blockage_metrics(&s).expect("points").trend;
        assert_eq!(trend.direction, "Estável");
        assert_eq!(trend.tone, Tone::Neutral);

        let s = series(json!({"labels": ["a", "b"], "bars": [1000, 990]}));
        let trend = blockage_metrics(&s).expect("points").trend;
        assert_eq!(trend.direction, "Queda");
        assert_eq!(trend.tone, Tone::Good);
    }

    #[test]
    fn test_single_bar_is_flat() {
        let s = series(json!({"labels": ["a"], "bars": [1000]}));
        let metrics = blockage_metrics(&s).expect("points");
        assert_eq!(metrics.trend.delta, 0.0);
        assert_eq!(metrics.trend.direction, "Estável");
        assert!(metrics.largest_positive.is_none());
        assert!(metrics.largest_negative.is_none());
        assert_eq!(metrics.acumulativo_sum, None);
    }

    #[test]
    fn test_trend_counts_missing_edge_bar_as_zero() {
        let s = series(json!({"labels": ["a", "b", "c"], "bars": [null, 500, 2000]}));
        let trend = blockage_metrics(&s).expect("points").trend;
        assert_eq!(trend.delta, 2000.0);
        assert_eq!(trend.direction, "Alta");
        assert_eq!(trend.start_label, "a");
        assert_eq!(trend.end_label, "c");
    }

    #[test]
    fn test_reported_metrics_take_precedence() {
        let s = series(json!({
            "labels": ["a", "b"],
            "bars": [10, 5000],
            "line": [5, 10],
            "metrics": {
                "largest_positive": {"label": "x", "percent": 1.5},
                "trend": {"direction": "Queda", "delta": -3, "status": "good",
                          "start_label": "a", "end_label": "b"}
            }
        }));
        let metrics = blockage_metrics(&s).expect("points");
        assert_eq!(
            metrics.largest_positive,
            Some(ExtremePercent { label: "x".into(), percent: 1.5 })
        );
        assert_eq!(metrics.trend.direction, "Queda");
        assert_eq!(metrics.trend.tone, Tone::Good);
        // not reported, not derivable
        assert!(metrics.largest_negative.is_none());
        assert_eq!(
            s.reported,
            Some(BlockageMetricsPayload {
                largest_positive: Some(ExtremePercent { label: "x".into(), percent: 1.5 }),
                largest_negative: None,
                trend: Some(TrendPayload {
                    direction: "Queda".into(),
                    delta: -3.0,
                    status: "good".into(),
                    start_label: "a".into(),
                    end_label: "b".into(),
                }),
                acumulativo_sum: None,
            })
        );
    }

    #[test]
    fn test_ties_keep_first_label() {
        let s = series(json!({"labels": ["a", "b", "c"], "bars": [1, 2, 3], "line": [4, 4, -1]}));
        let metrics = blockage_metrics(&s).expect("points");
        assert_eq!(metrics.largest_positive.map(|e| e.label), Some("a".to_string()));
    }
}
