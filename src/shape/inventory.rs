// src/shape/inventory.rs

use serde::Serialize;
use tracing::{debug, warn};

use super::{first_text_column, label_or_fallback};
use crate::error::ShapeError;
use crate::normalize::{column_order, normalize_percent, value_text, ColumnReference};
use crate::payload::{InventoryPayload, RawRow, TablePayload};

const LABEL_CANDIDATES: &[&str] = &["periodo", "semana", "mes", "data", "rotulo", "label"];
const REALIZED_CANDIDATES: &[&str] = &["realizado", "cobertura", "resultado"];
const META_CANDIDATES: &[&str] = &["meta", "objetivo", "alvo"];

const STOCK_CANDIDATES: &[&str] = &["estoque contado"];
const SHORTAGE_CANDIDATES: &[&str] = &["ajuste inv. falta", "falta"];
const EXCESS_CANDIDATES: &[&str] = &["ajuste inv. sobra", "sobra"];
const ABSOLUTE_CANDIDATES: &[&str] = &["valor absoluto", "absoluto"];
const MODULAR_CANDIDATES: &[&str] = &["valor modular", "modular"];
const PERCENT_ADJUST_CANDIDATES: &[&str] = &["% ajuste", "percentual de ajuste"];
const YEAR_CANDIDATES: &[&str] = &["ano", "year"];
const UNIT_CANDIDATES: &[&str] = &["unidade", "filial", "loja"];

/// Distinct values shown in full up to this many; beyond it the list is cut
/// to two plus a "+N" counter.
const MAX_LISTED: usize = 3;

/// One period of inventory coverage, in percentage points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoveragePoint {
    pub label: String,
    pub realized: Option<f64>,
    pub meta: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageSeries {
    pub points: Vec<CoveragePoint>,
}

impl CoverageSeries {
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn realized(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.realized).collect()
    }

    pub fn metas(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.meta).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Totals across the inventory values table. Sums only include parseable
/// cells; a field with no parseable cell is `None`, not 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryValues {
    pub rows: usize,
    pub stock_counted: Option<f64>,
    pub shortage: Option<f64>,
    pub excess: Option<f64>,
    pub absolute_value: Option<f64>,
    pub modular_value: Option<f64>,
    /// Average adjustment, in percentage points.
    pub percent_adjust: Option<f64>,
    pub years: Option<String>,
    pub units: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryDataset {
    pub coverage: CoverageSeries,
    pub values: Option<InventoryValues>,
}

/// Shape the coverage table. Realized is required; when no label candidate
/// matches, the first column that does not look numeric becomes the label.
pub fn shape_coverage(table: &TablePayload) -> Result<CoverageSeries, ShapeError> {
    if table.is_empty() {
        return Err(ShapeError::NoRows {
            dataset: "inventario",
        });
    }

    let columns = column_order(&table.columns, &table.rows);
    let realized = ColumnReference::resolve("realizado", &columns, REALIZED_CANDIDATES);
    if !realized.is_resolved() {
        warn!(?columns, "inventory table has no realized column");
        return Err(ShapeError::UnresolvedColumn {
            dataset: "inventario",
            field: "realizado",
        });
    }
    let meta = ColumnReference::resolve("meta", &columns, META_CANDIDATES);

    let mut label = ColumnReference::resolve("periodo", &columns, LABEL_CANDIDATES);
    if !label.is_resolved() {
        label = ColumnReference::fixed(
            "periodo",
            first_text_column(&columns, &table.rows, &[&realized, &meta]),
        );
    }

    let points: Vec<CoveragePoint> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| CoveragePoint {
            label: label_or_fallback(label.text(row), i),
            realized: realized.number(row).map(normalize_percent),
            meta: meta.number(row).map(normalize_percent),
        })
        .collect();

    debug!(points = points.len(), "shaped coverage series");
    Ok(CoverageSeries { points })
}

fn sum_field(rows: &[RawRow], column: &ColumnReference) -> Option<f64> {
    rows.iter()
        .filter_map(|row| column.number(row))
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

fn average_field(rows: &[RawRow], column: &ColumnReference) -> Option<f64> {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|row| column.number(row))
        .map(normalize_percent)
        .collect();
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn distinct_texts(rows: &[RawRow], column: &ColumnReference) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for text in rows.iter().filter_map(|row| column.value(row).and_then(value_text)) {
        if !seen.contains(&text) {
            seen.push(text);
        }
    }
    seen
}

/// `"2023, 2024"` for up to three values, `"A, B +3"` beyond that.
pub fn compact_list(values: &[String]) -> Option<String> {
    match values.len() {
        0 => None,
        n if n <= MAX_LISTED => Some(values.join(", ")),
        n => Some(format!("{}, {} +{}", values[0], values[1], n - 2)),
    }
}

/// Aggregate the inventory values table; `None` when it has no rows.
pub fn summarize_inventory_values(table: &TablePayload) -> Option<InventoryValues> {
    if table.is_empty() {
        return None;
    }
    let columns = column_order(&table.columns, &table.rows);
    let resolve = |field: &'static str, candidates: &[&str]| {
        ColumnReference::resolve(field, &columns, candidates)
    };
    let rows = &table.rows;

    Some(InventoryValues {
        rows: rows.len(),
        stock_counted: sum_field(rows, &resolve("estoque contado", STOCK_CANDIDATES)),
        shortage: sum_field(rows, &resolve("falta", SHORTAGE_CANDIDATES)),
        excess: sum_field(rows, &resolve("sobra", EXCESS_CANDIDATES)),
        absolute_value: sum_field(rows, &resolve("valor absoluto", ABSOLUTE_CANDIDATES)),
        modular_value: sum_field(rows, &resolve("valor modular", MODULAR_CANDIDATES)),
        percent_adjust: average_field(rows, &resolve("% ajuste", PERCENT_ADJUST_CANDIDATES)),
        years: compact_list(&distinct_texts(rows, &resolve("ano", YEAR_CANDIDATES))),
        units: compact_list(&distinct_texts(rows, &resolve("unidade", UNIT_CANDIDATES))),
    })
}

/// Shape `/api/inventario`: coverage is required, the values summary is not.
pub fn shape_inventory(payload: &InventoryPayload) -> Result<InventoryDataset, ShapeError> {
    let coverage = shape_coverage(&payload.coverage)?;
    let values = payload.values.as_ref().and_then(summarize_inventory_values);
    Ok(InventoryDataset { coverage, values })
}
