// src/shape/funnel.rs

use serde::Serialize;
use serde_json::Value;

use crate::normalize::{parse_number, value_text};
use crate::payload::FunnelPayload;

pub const UNLABELLED_MOTIVE: &str = "Sem motivo";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub value: f64,
    pub observation: Option<String>,
    /// `value / total`, 0 when the total is not positive.
    pub share: f64,
}

/// Entries sorted by value, highest first, each with its share of `total`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdown {
    pub total: f64,
    pub entries: Vec<BreakdownEntry>,
}

impl Breakdown {
    pub fn shares(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.share).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sort `(label, value, observation)` triples by value and attach shares.
///
/// The total is `raw_total` when it is positive, otherwise the sum of the
/// values. With no entries the breakdown keeps `raw_total` (or 0).
pub fn build_breakdown(
    mut entries: Vec<(Option<String>, f64, Option<String>)>,
    raw_total: Option<f64>,
) -> Breakdown {
    let raw_total = raw_total.filter(|t| t.is_finite()).unwrap_or(0.0);
    entries.retain(|(_, value, _)| value.is_finite());
    if entries.is_empty() {
        return Breakdown {
            total: raw_total,
            entries: Vec::new(),
        };
    }

    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    let computed: f64 = entries.iter().map(|(_, value, _)| value).sum();
    let total = if raw_total > 0.0 { raw_total } else { computed };

    let entries = entries
        .into_iter()
        .map(|(label, value, observation)| BreakdownEntry {
            label: label.unwrap_or_else(|| UNLABELLED_MOTIVE.to_string()),
            value,
            observation,
            share: if total > 0.0 { value / total } else { 0.0 },
        })
        .collect();

    Breakdown { total, entries }
}

/// Shape `/api/funnel`. Entries whose value is missing or not a finite
/// number are dropped; blank observations become `None`.
pub fn shape_funnel(payload: &FunnelPayload) -> Breakdown {
    let entries = payload
        .entries
        .iter()
        .filter_map(|entry| {
            let value = entry.get("value").and_then(parse_number)?;
            let label = entry
                .get("label")
                .filter(|l| !l.is_null())
                .map(|l| match l {
                    Value::String(s) => s.clone(),
                    other => value_text(other).unwrap_or_else(|| other.to_string()),
                });
            let observation = entry.get("observation").and_then(value_text);
            Some((label, value, observation))
        })
        .collect();

    build_breakdown(entries, payload.total)
}
