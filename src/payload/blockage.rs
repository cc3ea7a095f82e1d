// src/payload/blockage.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{as_object, optional_array, required_array};
use crate::error::ShapeError;
use crate::normalize::{parse_number, value_text};

/// `/api/bloqueado`, already shaped by the source: one label per period with
/// the blocked stock value (`bars`), its percent change (`line`) and the
/// running total (`acumulativos`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockagePayload {
    pub labels: Vec<String>,
    pub bars: Vec<Option<f64>>,
    pub line: Vec<Option<f64>>,
    pub accumulated: Vec<Option<f64>>,
    pub metrics: Option<BlockageMetricsPayload>,
}

/// A label with its percent change, in percentage points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremePercent {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPayload {
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub delta: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_label: String,
    #[serde(default)]
    pub end_label: String,
}

/// Server-computed blockage metrics. Every field is optional; missing ones are
/// derived from the series by the metric calculators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockageMetricsPayload {
    #[serde(default)]
    pub largest_positive: Option<ExtremePercent>,
    #[serde(default)]
    pub largest_negative: Option<ExtremePercent>,
    #[serde(default)]
    pub trend: Option<TrendPayload>,
    #[serde(default)]
    pub acumulativo_sum: Option<f64>,
}

impl BlockagePayload {
    pub fn decode(value: &Value) -> Result<Self, ShapeError> {
        let obj = as_object(value, "bloqueado")?;
        let labels = required_array(obj, "labels")?
            .iter()
            .map(|label| value_text(label).unwrap_or_default())
            .collect();

        let numbers = |field: &str| -> Vec<Option<f64>> {
            optional_array(obj, field)
                .map(|items| items.iter().map(parse_number).collect())
                .unwrap_or_default()
        };

        let metrics = match obj.get("metrics") {
            None | Some(Value::Null) => None,
            Some(raw) => match serde_json::from_value::<BlockageMetricsPayload>(raw.clone()) {
                Ok(m) => Some(m),
                Err(err) => {
                    warn!(error = %err, "ignoring malformed blockage metrics");
                    None
                }
            },
        };

        Ok(Self {
            labels,
            bars: numbers("bars"),
            line: numbers("line"),
            accumulated: numbers("acumulativos"),
            metrics,
        })
    }
}
