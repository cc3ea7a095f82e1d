// src/metrics/delta.rs

use serde::Serialize;

use super::EPSILON;

/// Which way is good for a metric. Cut rate and blocked stock want to go
/// down; coverage wants to reach or pass its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Good,
    Bad,
    Neutral,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Good => "good",
            Tone::Bad => "bad",
            Tone::Neutral => "neutral",
        }
    }

    /// Read a status string as reported by the source; unknown is neutral.
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "good" => Tone::Good,
            "bad" => Tone::Bad,
            _ => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Flat => "→",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Delta {
    /// `current - comparison`
    pub delta: f64,
    /// `delta / comparison`; `None` when the comparison is zero.
    pub percent: Option<f64>,
    pub direction: Direction,
    pub tone: Tone,
}

/// Direction and tone of a difference under `polarity`. A difference within
/// [`EPSILON`] of zero is flat and neutral whatever the polarity.
pub fn classify(delta: f64, polarity: Polarity) -> (Direction, Tone) {
    if delta.abs() <= EPSILON {
        return (Direction::Flat, Tone::Neutral);
    }
    let direction = if delta > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };
    let tone = match (direction, polarity) {
        (Direction::Up, Polarity::HigherIsBetter) | (Direction::Down, Polarity::LowerIsBetter) => {
            Tone::Good
        }
        _ => Tone::Bad,
    };
    (direction, tone)
}

/// Compare `current` against a previous period or a target.
pub fn evaluate_delta(
    current: Option<f64>,
    comparison: Option<f64>,
    polarity: Polarity,
) -> Option<Delta> {
    let current = current.filter(|v| v.is_finite())?;
    let comparison = comparison.filter(|v| v.is_finite())?;
    let delta = current - comparison;
    let percent = (comparison != 0.0).then(|| delta / comparison);
    let (direction, tone) = classify(delta, polarity);
    Some(Delta {
        delta,
        percent,
        direction,
        tone,
    })
}

/// Delta of every point against the point right before it; the first point
/// has no history.
pub fn deltas_vs_previous(values: &[Option<f64>], polarity: Polarity) -> Vec<Option<Delta>> {
    values
        .iter()
        .enumerate()
        .map(|(i, current)| {
            let previous = i.checked_sub(1).and_then(|p| values[p]);
            evaluate_delta(*current, previous, polarity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_flips_tone() {
        let up_lower = evaluate_delta(Some(12.0), Some(10.0), Polarity::LowerIsBetter)
            .expect("both values present");
        assert_eq!(up_lower.direction, Direction::Up);
        assert_eq!(up_lower.tone, Tone::Bad);
        assert_eq!(up_lower.percent, Some(0.2));

        let up_higher = evaluate_delta(Some(12.0), Some(10.0), Polarity::HigherIsBetter)
            .expect("both values present");
        assert_eq!(up_higher.tone, Tone::Good);

        let down_lower = evaluate_delta(Some(8.0), Some(10.0), Polarity::LowerIsBetter)
            .expect("both values present");
        assert_eq!(down_lower.direction, Direction::Down);
        assert_eq!(down_lower.tone, Tone::Good);
    }

    #[test]
    fn test_near_zero_delta_is_neutral() {
        for polarity in [Polarity::HigherIsBetter, Polarity::LowerIsBetter] {
            let d = evaluate_delta(Some(10.00005), Some(10.0), polarity).expect("present");
            assert_eq!(d.direction, Direction::Flat);
            assert_eq!(d.tone, Tone::Neutral);
        }
    }

    #[test]
    fn test_zero_comparison_has_no_percent() {
        let d = evaluate_delta(Some(5.0), Some(0.0), Polarity::HigherIsBetter).expect("present");
        assert_eq!(d.delta, 5.0);
        assert_eq!(d.percent, None);
    }

    #[test]
    fn test_missing_side_gives_none() {
        assert!(evaluate_delta(None, Some(1.0), Polarity::HigherIsBetter).is_none());
        assert!(evaluate_delta(Some(1.0), None, Polarity::HigherIsBetter).is_none());
    }

    #[test]
    fn test_deltas_vs_previous() {
        let deltas = deltas_vs_previous(&[Some(10.0), Some(15.0), None, Some(5.0)], Polarity::LowerIsBetter);
        assert_eq!(deltas.len(), 4);
        assert!(deltas[0].is_none());
        assert_eq!(deltas[1].map(|d| d.tone), Some(Tone::Bad));
        assert!(deltas[2].is_none());
        assert!(deltas[3].is_none());
    }

    #[test]
    fn test_status_strings_and_arrows() {
        assert_eq!(Tone::from_status(" Good "), Tone::Good);
        assert_eq!(Tone::from_status("bad"), Tone::Bad);
        assert_eq!(Tone::from_status("whatever"), Tone::Neutral);
        assert_eq!(Direction::Down.arrow(), "↓");
    }
}
