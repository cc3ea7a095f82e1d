// src/shape/cut.rs

use serde::Serialize;
use tracing::{debug, warn};

use super::{build_breakdown, first_text_column, label_or_fallback, Breakdown};
use crate::error::ShapeError;
use crate::normalize::{column_order, normalize_percent, ColumnReference};
use crate::payload::TablePayload;

const LABEL_CANDIDATES: &[&str] = &["rotulos de linha", "rotulo", "semana", "periodo", "mes", "label"];
const PERCENT_CANDIDATES: &[&str] = &["%", "percentual", "taxa de corte"];
const META_CANDIDATES: &[&str] = &["meta", "objetivo", "alvo"];
const TOTAL_CANDIDATES: &[&str] = &["soma de valor total", "valor total", "valor cortado"];
const PER_ORDER_CANDIDATES: &[&str] = &["corte por pedido", "por pedido", "pedido"];
const REVENUE_CANDIDATES: &[&str] = &["faturamento", "receita"];

const MOTIVE_CANDIDATES: &[&str] = &["motivo", "reason"];
const MOTIVE_VALUE_CANDIDATES: &[&str] = &["valor", "total"];

/// One period of the order-cut rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutPoint {
    pub label: String,
    /// Cut rate in percentage points.
    pub percent: Option<f64>,
    /// Target cut rate in percentage points.
    pub meta: Option<f64>,
    pub total_value: Option<f64>,
    pub cut_per_order: Option<f64>,
    pub revenue: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CutSeries {
    pub points: Vec<CutPoint>,
}

impl CutSeries {
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn percents(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.percent).collect()
    }

    pub fn metas(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.meta).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Shape `/api/corte`. The percent column is required; meta and the
/// auxiliary money fields are optional. Percent and meta go through the
/// ratio-or-percent policy independently.
pub fn shape_cut(table: &TablePayload) -> Result<CutSeries, ShapeError> {
    if table.is_empty() {
        return Err(ShapeError::NoRows { dataset: "corte" });
    }

    let columns = column_order(&table.columns, &table.rows);
    let percent = ColumnReference::resolve("percentual", &columns, PERCENT_CANDIDATES);
    if !percent.is_resolved() {
        warn!(?columns, "cut table has no percent column");
        return Err(ShapeError::UnresolvedColumn {
            dataset: "corte",
            field: "percentual",
        });
    }
    let meta = ColumnReference::resolve("meta", &columns, META_CANDIDATES);
    let total = ColumnReference::resolve("valor total", &columns, TOTAL_CANDIDATES);
    let per_order = ColumnReference::resolve("corte por pedido", &columns, PER_ORDER_CANDIDATES);
    let revenue = ColumnReference::resolve("faturamento", &columns, REVENUE_CANDIDATES);

    let mut label = ColumnReference::resolve("rotulo", &columns, LABEL_CANDIDATES);
    if !label.is_resolved() {
        let taken = [&percent, &meta, &total, &per_order, &revenue];
        label = ColumnReference::fixed("rotulo", first_text_column(&columns, &table.rows, &taken));
    }

    let points: Vec<CutPoint> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| CutPoint {
            label: label_or_fallback(label.text(row), i),
            percent: percent.number(row).map(normalize_percent),
            meta: meta.number(row).map(normalize_percent),
            total_value: total.number(row),
            cut_per_order: per_order.number(row),
            revenue: revenue.number(row),
        })
        .collect();

    debug!(points = points.len(), "shaped cut series");
    Ok(CutSeries { points })
}

/// Shape `/api/corte/motivos` into a breakdown sorted by value.
pub fn shape_cut_motives(table: &TablePayload) -> Result<Breakdown, ShapeError> {
    if table.is_empty() {
        return Err(ShapeError::NoRows {
            dataset: "corte-motivos",
        });
    }

    let columns = column_order(&table.columns, &table.rows);
    let motive = ColumnReference::resolve("motivo", &columns, MOTIVE_CANDIDATES);
    let value = ColumnReference::resolve("valor", &columns, MOTIVE_VALUE_CANDIDATES);
    if !value.is_resolved() {
        warn!(?columns, "cut motives table has no value column");
        return Err(ShapeError::UnresolvedColumn {
            dataset: "corte-motivos",
            field: "valor",
        });
    }

    let entries = table
        .rows
        .iter()
        .filter_map(|row| {
            let amount = value.number(row)?;
            Some((motive.text(row), amount, None))
        })
        .collect();

    Ok(build_breakdown(entries, None))
}
