// src/shape/blockage.rs

use serde::Serialize;
use tracing::{debug, warn};

use super::{descending_by_value, label_or_fallback, NormalizedSeries, SeriesPoint, TOP_N};
use crate::error::ShapeError;
use crate::normalize::{column_order, ColumnReference};
use crate::payload::{BlockageMetricsPayload, BlockagePayload, TablePayload};

const ITEM_CANDIDATES: &[&str] = &["item", "codigo", "cod", "sku", "material"];
const DESCRIPTION_CANDIDATES: &[&str] = &["descricao", "desc"];
const QUANTITY_CANDIDATES: &[&str] = &["quantidade", "qtde", "qtd", "quant"];
const VALUE_CANDIDATES: &[&str] = &["valor", "r$", "total"];
const REASON_CANDIDATES: &[&str] = &["motivo", "razao", "causa", "observacao"];

/// One period of blocked stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockagePoint {
    pub label: String,
    /// Blocked stock value (R$).
    pub value: Option<f64>,
    /// Change vs the previous period, in percentage points.
    pub percent: Option<f64>,
    /// Running total (R$).
    pub accumulated: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockageSeries {
    pub points: Vec<BlockagePoint>,
    /// Metrics as reported by the source, if any.
    pub reported: Option<BlockageMetricsPayload>,
}

impl BlockageSeries {
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn percents(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.percent).collect()
    }

    pub fn accumulated(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.accumulated).collect()
    }

    pub fn bars(&self) -> NormalizedSeries {
        self.points
            .iter()
            .map(|p| SeriesPoint {
                label: p.label.clone(),
                value: p.value,
            })
            .collect()
    }

    pub fn line(&self) -> NormalizedSeries {
        self.points
            .iter()
            .map(|p| SeriesPoint {
                label: p.label.clone(),
                value: p.percent,
            })
            .collect()
    }
}

/// Align the pre-shaped blockage arrays on the label axis. Arrays shorter
/// than `labels` leave trailing points without a value.
pub fn shape_blockage(payload: &BlockagePayload) -> Result<BlockageSeries, ShapeError> {
    if payload.labels.is_empty() {
        return Err(ShapeError::NoRows {
            dataset: "bloqueado",
        });
    }

    let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();
    let points = payload
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| BlockagePoint {
            label: label_or_fallback(Some(label.clone()), i),
            value: at(&payload.bars, i),
            percent: at(&payload.line, i),
            accumulated: at(&payload.accumulated, i),
        })
        .collect::<Vec<_>>();

    debug!(points = points.len(), "shaped blockage series");
    Ok(BlockageSeries {
        points,
        reported: payload.metrics.clone(),
    })
}

/// One row of the top blocked items ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEntry {
    pub item: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub value: Option<f64>,
    pub reason: Option<String>,
}

impl TopEntry {
    fn is_blank(&self) -> bool {
        self.item.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.value.is_none()
            && self.reason.is_none()
    }
}

/// Rank blocked items by value, highest first, keeping [`TOP_N`].
/// Rows with every field empty are dropped before ranking.
pub fn shape_top10(table: &TablePayload) -> Result<Vec<TopEntry>, ShapeError> {
    if table.is_empty() {
        return Err(ShapeError::NoRows {
            dataset: "bloqueado-top10",
        });
    }

    let columns = column_order(&table.columns, &table.rows);
    let item = ColumnReference::resolve("item", &columns, ITEM_CANDIDATES);
    let description = ColumnReference::resolve("descricao", &columns, DESCRIPTION_CANDIDATES);
    let quantity = ColumnReference::resolve("quantidade", &columns, QUANTITY_CANDIDATES);
    let value = ColumnReference::resolve("valor", &columns, VALUE_CANDIDATES);
    let reason = ColumnReference::resolve("motivo", &columns, REASON_CANDIDATES);

    if !value.is_resolved() {
        warn!(?columns, "top10 table has no value column");
        return Err(ShapeError::UnresolvedColumn {
            dataset: "bloqueado-top10",
            field: "valor",
        });
    }

    let mut entries: Vec<TopEntry> = table
        .rows
        .iter()
        .map(|row| TopEntry {
            item: item.text(row),
            description: description.text(row),
            quantity: quantity.number(row),
            value: value.number(row),
            reason: reason.text(row),
        })
        .filter(|entry| !entry.is_blank())
        .collect();

    entries.sort_by(|a, b| descending_by_value(a.value, b.value));
    entries.truncate(TOP_N);
    Ok(entries)
}
