//! Per-endpoint decoders.
//!
//! Each decoder takes the raw JSON body and either returns a typed payload or
//! a [`ShapeError`]. Only the minimal shape is enforced here (the arrays a
//! dataset cannot live without); individual cells stay loosely typed until a
//! shaper resolves them.

pub mod blockage;
pub mod funnel;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ShapeError;

pub use blockage::{BlockageMetricsPayload, BlockagePayload, ExtremePercent, TrendPayload};
pub use funnel::FunnelPayload;

/// One row of a tabular payload: header -> cell, in source key order.
pub type RawRow = Map<String, Value>;

/// `{ columns?: [...], rows: [...] }`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePayload {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl TablePayload {
    /// Decode a `columns`/`rows` body. Non-object rows are skipped rather than
    /// failing the whole table; non-string column names are dropped.
    pub fn decode(value: &Value, dataset: &'static str) -> Result<Self, ShapeError> {
        let obj = as_object(value, dataset)?;
        let raw_rows = required_array(obj, "rows")?;

        let rows: Vec<RawRow> = raw_rows
            .iter()
            .filter_map(|row| row.as_object().cloned())
            .collect();
        if rows.len() < raw_rows.len() {
            warn!(
                dataset,
                skipped = raw_rows.len() - rows.len(),
                "skipping rows that are not objects"
            );
        }

        let columns = optional_array(obj, "columns")
            .map(|cols| {
                cols.iter()
                    .filter_map(|c| c.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { columns, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `/api/inventario`: the coverage table plus an optional `valores` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryPayload {
    pub coverage: TablePayload,
    pub values: Option<TablePayload>,
}

impl InventoryPayload {
    pub fn decode(value: &Value) -> Result<Self, ShapeError> {
        let coverage = TablePayload::decode(value, "inventario")?;
        let values = as_object(value, "inventario")?
            .get("valores")
            .filter(|v| !v.is_null())
            .and_then(|v| match TablePayload::decode(v, "inventario-valores") {
                Ok(table) => Some(table),
                Err(err) => {
                    warn!(error = %err, "ignoring malformed inventory values table");
                    None
                }
            });
        Ok(Self { coverage, values })
    }
}

pub(crate) fn as_object<'a>(
    value: &'a Value,
    dataset: &'static str,
) -> Result<&'a Map<String, Value>, ShapeError> {
    value.as_object().ok_or(ShapeError::NotAnObject { dataset })
}

pub(crate) fn required_array<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Vec<Value>, ShapeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ShapeError::MissingField { field }),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ShapeError::NotAnArray { field }),
    }
}

pub(crate) fn optional_array<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Vec<Value>> {
    obj.get(field).and_then(Value::as_array)
}
