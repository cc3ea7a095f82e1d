//! Metric calculators.
//!
//! Pure functions over shaped datasets. Insufficient data is `None`, never a
//! zeroed record, so callers can tell "nothing to show" from a real zero.

pub mod blockage;
pub mod concentration;
pub mod delta;
pub mod extremum;
pub mod summary;
pub mod target;

pub use blockage::{blockage_metrics, BlockageMetrics, Trend};
pub use concentration::{breakdown_metrics, hhi, top_n_share, BreakdownMetrics, TopMotive};
pub use delta::{deltas_vs_previous, evaluate_delta, Delta, Direction, Polarity, Tone};
pub use extremum::{find_extremum, labelled_extremum, Extreme, Extremum, LabelledExtremum};
pub use summary::{coverage_summary, cut_summary, summarize_series, SeriesSummary};
pub use target::{average, divergence, hit_rate, Divergence, HitRate};

/// Differences at or below this magnitude count as zero.
pub const EPSILON: f64 = 0.0001;
