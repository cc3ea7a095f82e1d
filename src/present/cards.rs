// src/present/cards.rs

use serde::Serialize;

use super::format::{format_currency, format_decimal, format_integer, format_percent, PLACEHOLDER};
use crate::metrics::concentration::CRITICAL_SHARE;
use crate::metrics::{BlockageMetrics, BreakdownMetrics, Delta, SeriesSummary, Tone};

pub const EMPTY_CONTEXT: &str = "Sem dados";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTone {
    Good,
    Bad,
    Neutral,
    Empty,
}

impl From<Tone> for CardTone {
    fn from(tone: Tone) -> Self {
        match tone {
            Tone::Good => CardTone::Good,
            Tone::Bad => CardTone::Bad,
            Tone::Neutral => CardTone::Neutral,
        }
    }
}

/// A headline figure: formatted value plus a line of context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub key: &'static str,
    pub value: String,
    pub context: String,
    pub tone: CardTone,
    pub arrow: Option<&'static str>,
}

impl MetricCard {
    pub fn empty(key: &'static str, context: &str) -> Self {
        Self {
            key,
            value: PLACEHOLDER.to_string(),
            context: context.to_string(),
            tone: CardTone::Empty,
            arrow: None,
        }
    }

    fn filled(key: &'static str, value: String, context: String, tone: CardTone) -> Self {
        Self {
            key,
            value,
            context,
            tone,
            arrow: None,
        }
    }

    fn with_arrow(mut self, arrow: &'static str) -> Self {
        self.arrow = Some(arrow);
        self
    }
}

const BLOCKAGE_KEYS: [&str; 4] = ["largest-positive", "largest-negative", "trend", "acumulativo"];

pub fn blockage_cards(metrics: Option<&BlockageMetrics>) -> Vec<MetricCard> {
    let Some(metrics) = metrics else {
        return BLOCKAGE_KEYS
            .iter()
            .map(|key| MetricCard::empty(key, EMPTY_CONTEXT))
            .collect();
    };

    let positive = match &metrics.largest_positive {
        Some(extreme) => MetricCard::filled(
            "largest-positive",
            format_percent(extreme.percent / 100.0, 2),
            reference(&extreme.label),
            CardTone::Bad,
        )
        .with_arrow("↑"),
        None => MetricCard::empty("largest-positive", "Sem variação positiva"),
    };

    let negative = match &metrics.largest_negative {
        Some(extreme) => MetricCard::filled(
            "largest-negative",
            format_percent(extreme.percent.abs() / 100.0, 2),
            reference(&extreme.label),
            CardTone::Good,
        )
        .with_arrow("↓"),
        None => MetricCard::empty("largest-negative", "Sem variação negativa"),
    };

    let trend = &metrics.trend;
    let (arrow, tone) = match trend.direction.to_lowercase().as_str() {
        "alta" => ("↑", CardTone::Bad),
        "queda" => ("↓", CardTone::Good),
        _ => ("→", CardTone::Neutral),
    };
    let delta_text = format_currency(trend.delta.abs());
    let trend_context = if trend.start_label.is_empty() || trend.end_label.is_empty() {
        format!("Δ {delta_text}")
    } else {
        format!("Δ {delta_text} ({} → {})", trend.start_label, trend.end_label)
    };
    let direction = if trend.direction.is_empty() {
        "Estável".to_string()
    } else {
        trend.direction.clone()
    };
    let trend_card = MetricCard::filled("trend", direction, trend_context, tone).with_arrow(arrow);

    let accumulated = match metrics.acumulativo_sum {
        Some(sum) => MetricCard::filled(
            "acumulativo",
            format_currency(sum),
            "Somatório do período".to_string(),
            CardTone::Neutral,
        ),
        None => MetricCard::empty("acumulativo", "Sem dados acumulados"),
    };

    vec![positive, negative, trend_card, accumulated]
}

fn reference(label: &str) -> String {
    if label.is_empty() {
        "Sem referência".to_string()
    } else {
        label.to_string()
    }
}

const BREAKDOWN_KEYS: [&str; 6] = [
    "top-motive",
    "top3-share",
    "average-value",
    "critical-count",
    "hhi",
    "tail-share",
];

/// Cards for a motive breakdown (funnel or cut motives).
pub fn breakdown_cards(metrics: Option<&BreakdownMetrics>) -> Vec<MetricCard> {
    let Some(m) = metrics else {
        return BREAKDOWN_KEYS
            .iter()
            .map(|key| MetricCard::empty(key, EMPTY_CONTEXT))
            .collect();
    };
    let neutral = CardTone::Neutral;
    let plural = if m.count == 1 { "" } else { "s" };

    vec![
        MetricCard::filled(
            "top-motive",
            format_currency(m.top.value),
            format!("{} - {}", m.top.label, format_percent(m.top.share, 1)),
            neutral,
        ),
        MetricCard::filled(
            "top3-share",
            format_percent(m.top3_share, 1),
            format!("Participação conjunta dos {} maiores motivos", m.top3_count),
            neutral,
        ),
        MetricCard::filled(
            "average-value",
            format_currency(m.average_value),
            format!("Média calculada sobre {} motivo{plural}", m.count),
            neutral,
        ),
        MetricCard::filled(
            "critical-count",
            format_integer(m.critical_count as f64),
            format!("Motivos com participação >= {}", format_percent(CRITICAL_SHARE, 1)),
            neutral,
        ),
        MetricCard::filled(
            "hhi",
            format_integer(m.hhi as f64),
            "HHI (0 a 10.000) - maior valor indica maior concentração".to_string(),
            neutral,
        ),
        MetricCard::filled(
            "tail-share",
            format_percent(m.tail_share, 1),
            format!("Demais motivos ({}) após o Top 3", m.tail_count),
            neutral,
        ),
    ]
}

const SUMMARY_KEYS: [&str; 5] = ["latest", "vs-target", "average", "hit-rate", "divergence"];

/// Cards for a series tracked against a target. Values are already in
/// percentage points.
pub fn summary_cards(summary: Option<&SeriesSummary>) -> Vec<MetricCard> {
    let Some(s) = summary else {
        return SUMMARY_KEYS
            .iter()
            .map(|key| MetricCard::empty(key, EMPTY_CONTEXT))
            .collect();
    };
    let points = |v: f64| format_percent(v / 100.0, 2);

    let latest = match &s.vs_previous {
        Some(d) => MetricCard::filled(
            "latest",
            points(s.latest.value),
            format!("{} ({} vs anterior)", s.latest.label, delta_points(d)),
            d.tone.into(),
        )
        .with_arrow(d.direction.arrow()),
        None => MetricCard::filled(
            "latest",
            points(s.latest.value),
            s.latest.label.clone(),
            CardTone::Neutral,
        ),
    };

    let vs_target = match (&s.vs_target, s.latest.meta) {
        (Some(d), Some(meta)) => MetricCard::filled(
            "vs-target",
            delta_points(d),
            format!("Meta {}", points(meta)),
            d.tone.into(),
        )
        .with_arrow(d.direction.arrow()),
        _ => MetricCard::empty("vs-target", "Sem meta"),
    };

    let average = match s.average {
        Some(avg) => MetricCard::filled(
            "average",
            points(avg),
            match s.average_target {
                Some(meta) => format!("Meta média {}", points(meta)),
                None => "Média do período".to_string(),
            },
            CardTone::Neutral,
        ),
        None => MetricCard::empty("average", EMPTY_CONTEXT),
    };

    let hit_rate = match &s.hit_rate {
        Some(h) => MetricCard::filled(
            "hit-rate",
            format_percent(h.rate, 0),
            format!("{} de {} períodos na meta", h.hits, h.total),
            CardTone::Neutral,
        ),
        None => MetricCard::empty("hit-rate", "Sem meta"),
    };

    let divergence = match &s.divergence {
        Some(d) => MetricCard::filled(
            "divergence",
            points(d.average_diff),
            format!("Maior desvio: {} ({})", d.worst_label, points(d.worst_diff)),
            CardTone::Neutral,
        ),
        None => MetricCard::empty("divergence", "Sem meta"),
    };

    vec![latest, vs_target, average, hit_rate, divergence]
}

/// Signed difference in percentage points: `+1,25 p.p.`
fn delta_points(delta: &Delta) -> String {
    let sign = if delta.delta > 0.0 { "+" } else { "" };
    format!("{sign}{} p.p.", format_decimal(delta.delta, 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{blockage_metrics, breakdown_metrics, summarize_series, Polarity};
    use crate::payload::BlockagePayload;
    use crate::shape::{build_breakdown, shape_blockage};
    use serde_json::json;

    #[test]
    fn test_missing_metrics_give_placeholders() {
        let cards = blockage_cards(None);
        assert_eq!(cards.len(), 4);
        assert!(cards.iter().all(|c| c.value == "—" && c.context == "Sem dados"));
        assert!(cards.iter().all(|c| c.tone == CardTone::Empty));
        assert_eq!(breakdown_cards(None).len(), 6);
        assert_eq!(summary_cards(None)[0].context, "Sem dados");
    }

    #[test]
    fn test_blockage_cards() {
        let payload = BlockagePayload::decode(&json!({
            "labels": ["01 mai", "08 mai"],
            "bars": [1000, 2500.5],
            "line": [0, 150],
            "acumulativos": [1000, 3500.5]
        }))
        .expect("valid payload");
        let metrics = blockage_metrics(&shape_blockage(&payload).expect("points"));
        let cards = blockage_cards(metrics.as_ref());

        assert_eq!(cards[0].value, "150,00%");
        assert_eq!(cards[0].context, "08 mai");
        assert_eq!(cards[0].arrow, Some("↑"));
        assert_eq!(cards[0].tone, CardTone::Bad);
        assert_eq!(cards[1].context, "Sem variação negativa");
        assert_eq!(cards[1].tone, CardTone::Empty);
        assert_eq!(cards[2].value, "Alta");
        assert_eq!(cards[2].context, "Δ R$ 1.500,50 (01 mai → 08 mai)");
        assert_eq!(cards[2].tone, CardTone::Bad);
        assert_eq!(cards[3].value, "R$ 4.500,50");
    }

    #[test]
    fn test_breakdown_cards() {
        let breakdown = build_breakdown(
            vec![
                (Some("Avaria".into()), 600.0, None),
                (Some("Validade".into()), 300.0, None),
                (Some("Outros".into()), 100.0, None),
            ],
            None,
        );
        let cards = breakdown_cards(breakdown_metrics(&breakdown).as_ref());
        assert_eq!(cards[0].value, "R$ 600,00");
        assert_eq!(cards[0].context, "Avaria - 60,0%");
        assert_eq!(cards[1].value, "100,0%");
        assert_eq!(cards[2].context, "Média calculada sobre 3 motivos");
        assert_eq!(cards[3].value, "3");
        assert_eq!(cards[3].context, "Motivos com participação >= 10,0%");
        assert_eq!(cards[4].value, "4.600");
        assert_eq!(cards[5].value, "0,0%");
    }

    #[test]
    fn test_summary_cards() {
        let labels = vec!["S1".to_string(), "S2".to_string()];
        let summary = summarize_series(
            &labels,
            &[Some(2.0), Some(1.5)],
            &[Some(1.0), Some(1.0)],
            Polarity::LowerIsBetter,
        );
        let cards = summary_cards(summary.as_ref());
        assert_eq!(cards[0].value, "1,50%");
        assert_eq!(cards[0].context, "S2 (-0,50 p.p. vs anterior)");
        assert_eq!(cards[0].tone, CardTone::Good);
        assert_eq!(cards[0].arrow, Some("↓"));
        assert_eq!(cards[1].value, "+0,50 p.p.");
        assert_eq!(cards[1].arrow, Some("↑"));
        assert_eq!(cards[1].tone, CardTone::Bad);
        assert_eq!(cards[3].context, "0 de 2 períodos na meta");
        assert_eq!(cards[4].context, "Maior desvio: S1 (1,00%)");
    }
}
