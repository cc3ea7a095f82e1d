// src/metrics/extremum.rs

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub index: usize,
    pub value: f64,
}

/// Smallest or largest finite value. Ties keep the lowest index; missing and
/// non-finite values are skipped.
pub fn find_extremum(values: &[Option<f64>], extreme: Extreme) -> Option<Extremum> {
    let mut best: Option<Extremum> = None;
    for (index, value) in values.iter().enumerate() {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            continue;
        };
        let replaces = match best {
            None => true,
            Some(current) => match extreme {
                Extreme::Max => value > current.value,
                Extreme::Min => value < current.value,
            },
        };
        if replaces {
            best = Some(Extremum { index, value });
        }
    }
    best
}

/// An extremum with its label and, when available, the target at that index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledExtremum {
    pub label: String,
    pub value: f64,
    pub meta: Option<f64>,
}

pub fn labelled_extremum(
    labels: &[String],
    values: &[Option<f64>],
    metas: &[Option<f64>],
    extreme: Extreme,
) -> Option<LabelledExtremum> {
    let found = find_extremum(values, extreme)?;
    Some(LabelledExtremum {
        label: labels.get(found.index).cloned().unwrap_or_default(),
        value: found.value,
        meta: metas.get(found.index).copied().flatten(),
    })
}
