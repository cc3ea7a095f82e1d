// src/payload/funnel.rs

use serde_json::Value;

use super::{as_object, required_array};
use crate::error::ShapeError;
use crate::normalize::parse_number;

/// `/api/funnel`: `{ total?, entries: [{label, value, observation?}] }`.
/// Entries stay raw; the funnel shaper decides which ones are usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunnelPayload {
    pub total: Option<f64>,
    pub entries: Vec<Value>,
}

impl FunnelPayload {
    pub fn decode(value: &Value) -> Result<Self, ShapeError> {
        let obj = as_object(value, "funnel")?;
        let entries = required_array(obj, "entries")?.clone();
        let total = obj.get("total").and_then(parse_number);
        Ok(Self { total, entries })
    }
}
