// src/metrics/target.rs

use serde::Serialize;

use super::delta::Polarity;
use super::EPSILON;

/// Indices where both the value and its target are finite.
fn paired<'a>(
    values: &'a [Option<f64>],
    targets: &'a [Option<f64>],
) -> impl Iterator<Item = (usize, f64, f64)> + 'a {
    values
        .iter()
        .zip(targets.iter())
        .enumerate()
        .filter_map(|(i, (value, target))| {
            let value = value.filter(|v| v.is_finite())?;
            let target = target.filter(|t| t.is_finite())?;
            Some((i, value, target))
        })
}

/// Mean of the finite values.
pub fn average(values: &[Option<f64>]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    (!finite.is_empty()).then(|| finite.iter().sum::<f64>() / finite.len() as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitRate {
    pub hits: usize,
    pub total: usize,
    /// `hits / total`, in `[0, 1]`.
    pub rate: f64,
}

/// Share of paired rows on target. Higher-is-better counts
/// `value >= target - ε`, lower-is-better counts `value <= target + ε`.
pub fn hit_rate(values: &[Option<f64>], targets: &[Option<f64>], polarity: Polarity) -> Option<HitRate> {
    let (hits, total) = paired(values, targets).fold((0usize, 0usize), |(hits, total), (_, value, target)| {
        let on_target = match polarity {
            Polarity::HigherIsBetter => value >= target - EPSILON,
            Polarity::LowerIsBetter => value <= target + EPSILON,
        };
        (hits + usize::from(on_target), total + 1)
    });
    (total > 0).then(|| HitRate {
        hits,
        total,
        rate: hits as f64 / total as f64,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divergence {
    /// Mean `|value - target|` across paired rows.
    pub average_diff: f64,
    pub worst_index: usize,
    pub worst_label: String,
    pub worst_diff: f64,
}

/// Mean absolute deviation from target plus the row that strays the most
/// (first one on ties).
pub fn divergence(labels: &[String], values: &[Option<f64>], targets: &[Option<f64>]) -> Option<Divergence> {
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut worst: Option<(usize, f64)> = None;

    for (i, value, target) in paired(values, targets) {
        let diff = (value - target).abs();
        sum += diff;
        count += 1;
        if worst.map_or(true, |(_, w)| diff > w) {
            worst = Some((i, diff));
        }
    }

    let (worst_index, worst_diff) = worst?;
    Some(Divergence {
        average_diff: sum / count as f64,
        worst_index,
        worst_label: labels.get(worst_index).cloned().unwrap_or_default(),
        worst_diff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("S{i}")).collect()
    }

    #[test]
    fn test_divergence_average_and_worst() {
        let result = divergence(&labels(2), &[Some(10.0), Some(20.0)], &[Some(12.0), Some(15.0)])
            .expect("paired rows");
        assert_eq!(result.average_diff, 3.5);
        assert_eq!(result.worst_index, 1);
        assert_eq!(result.worst_label, "S2");
        assert_eq!(result.worst_diff, 5.0);
    }

    #[test]
    fn test_divergence_tie_keeps_first() {
        let result = divergence(
            &labels(3),
            &[Some(1.0), Some(5.0), Some(9.0)],
            &[Some(3.0), None, Some(7.0)],
        )
        .expect("paired rows");
        assert_eq!(result.worst_index, 0);
        assert_eq!(result.average_diff, 2.0);
    }

    #[test]
    fn test_divergence_without_pairs() {
        assert!(divergence(&labels(2), &[Some(1.0), None], &[None, Some(2.0)]).is_none());
        assert!(divergence(&[], &[], &[]).is_none());
    }

    #[test]
    fn test_hit_rate_counts_epsilon_as_hit() {
        let values = [Some(95.0), Some(97.99995), Some(99.0), None];
        let targets = [Some(98.0), Some(98.0), Some(98.0), Some(98.0)];
        let rate = hit_rate(&values, &targets, Polarity::HigherIsBetter).expect("paired rows");
        assert_eq!(rate.hits, 2);
        assert_eq!(rate.total, 3);
        assert!((rate.rate - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_hit_rate_lower_is_better() {
        let rate = hit_rate(
            &[Some(0.8), Some(1.2), Some(1.0)],
            &[Some(1.0), Some(1.0), Some(1.0)],
            Polarity::LowerIsBetter,
        )
        .expect("paired rows");
        assert_eq!((rate.hits, rate.total), (2, 3));
    }

    #[test]
    fn test_hit_rate_without_pairs_is_none() {
        assert!(hit_rate(&[Some(1.0)], &[None], Polarity::HigherIsBetter).is_none());
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(average(&[None]), None);
    }
}
