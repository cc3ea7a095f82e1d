// src/metrics/concentration.rs

use serde::Serialize;

use crate::shape::Breakdown;

/// Motives at or above this share of the total are critical.
pub const CRITICAL_SHARE: f64 = 0.10;
const TOP_GROUP: usize = 3;

/// Herfindahl–Hirschman index of shares given in `[0, 1]`, on the usual
/// 0..=10000 scale. `None` when no share is finite.
pub fn hhi(shares: &[f64]) -> Option<i64> {
    let finite: Vec<f64> = shares.iter().copied().filter(|s| s.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let sum: f64 = finite.iter().map(|s| s * s).sum();
    Some((sum * 10_000.0).round() as i64)
}

/// Combined share of the first `n` entries. Shares are expected sorted.
pub fn top_n_share(shares: &[f64], n: usize) -> Option<f64> {
    let head: Vec<f64> = shares.iter().take(n).copied().filter(|s| s.is_finite()).collect();
    (!head.is_empty()).then(|| head.iter().sum())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMotive {
    pub label: String,
    pub value: f64,
    pub share: f64,
}

/// Card figures for a motive breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownMetrics {
    pub count: usize,
    pub total: f64,
    pub top: TopMotive,
    pub top3_share: f64,
    pub top3_count: usize,
    /// `total / count`
    pub average_value: f64,
    pub critical_count: usize,
    pub hhi: i64,
    /// `1 - top3_share`, clamped to `[0, 1]`.
    pub tail_share: f64,
    pub tail_count: usize,
}

pub fn breakdown_metrics(breakdown: &Breakdown) -> Option<BreakdownMetrics> {
    let first = breakdown.entries.first()?;
    let shares = breakdown.shares();
    let count = shares.len();
    let top3_share = top_n_share(&shares, TOP_GROUP)?;
    let concentration = hhi(&shares)?;
    let top3_count = count.min(TOP_GROUP);

    Some(BreakdownMetrics {
        count,
        total: breakdown.total,
        top: TopMotive {
            label: first.label.clone(),
            value: first.value,
            share: first.share,
        },
        top3_share,
        top3_count,
        average_value: breakdown.total / count as f64,
        critical_count: shares.iter().filter(|s| **s >= CRITICAL_SHARE).count(),
        hhi: concentration,
        tail_share: (1.0 - top3_share).clamp(0.0, 1.0),
        tail_count: count - top3_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::build_breakdown;

    fn breakdown(values: &[f64]) -> Breakdown {
        build_breakdown(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (Some(format!("M{i}")), *v, None))
                .collect(),
            None,
        )
    }

    #[test]
    fn test_hhi_uniform_four() {
        assert_eq!(hhi(&[0.25, 0.25, 0.25, 0.25]), Some(2500));
        assert_eq!(hhi(&[1.0]), Some(10_000));
    }

    #[test]
    fn test_no_finite_share_gives_none() {
        assert_eq!(hhi(&[]), None);
        assert_eq!(hhi(&[f64::NAN]), None);
        assert_eq!(top_n_share(&[], 3), None);
        assert_eq!(top_n_share(&[f64::NAN, f64::INFINITY], 3), None);
    }

    #[test]
    fn test_top_n_share_short_list() {
        assert_eq!(top_n_share(&[0.5, 0.5], 3), Some(1.0));
        assert_eq!(top_n_share(&[0.5, 0.25, 0.125, 0.125], 3), Some(0.875));
    }

    #[test]
    fn test_breakdown_metrics() {
        let metrics = breakdown_metrics(&breakdown(&[25.0, 50.0, 12.5, 6.25, 6.25])).expect("entries");
        assert_eq!(metrics.count, 5);
        assert_eq!(metrics.total, 100.0);
        assert_eq!(metrics.top.label, "M1");
        assert_eq!(metrics.top.share, 0.5);
        assert_eq!(metrics.top3_share, 0.875);
        assert_eq!(metrics.top3_count, 3);
        assert_eq!(metrics.average_value, 20.0);
        assert_eq!(metrics.critical_count, 3);
        assert_eq!(metrics.tail_share, 0.125);
        assert_eq!(metrics.tail_count, 2);
        // 0.25 + 0.0625 + 0.015625 + 2 * 0.00390625
        assert_eq!(metrics.hhi, 3359);
    }

    #[test]
    fn test_empty_breakdown_has_no_metrics() {
        assert!(breakdown_metrics(&Breakdown::default()).is_none());
    }

    #[test]
    fn test_tail_share_never_negative() {
        let over = build_breakdown(vec![(Some("A".into()), 150.0, None)], Some(100.0));
        let metrics = breakdown_metrics(&over).expect("entries");
        assert_eq!(metrics.top3_share, 1.5);
        assert_eq!(metrics.tail_share, 0.0);
    }
}
