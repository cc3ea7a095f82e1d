//! Presentation adapters: pt-BR text, metric cards, chart series and the
//! serialisable dashboard snapshot. Nothing here touches the network.

pub mod cards;
pub mod chart;
pub mod format;
pub mod snapshot;

pub use cards::{blockage_cards, breakdown_cards, summary_cards, CardTone, MetricCard};
pub use chart::{blockage_chart, meter_rows, meter_width, split_label, BlockageChart, MeterRow};
pub use format::{format_currency, format_decimal, format_integer, format_percent, PLACEHOLDER};
pub use snapshot::{DashboardSnapshot, Panel};
