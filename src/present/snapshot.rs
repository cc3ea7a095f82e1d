// src/present/snapshot.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::cards::{blockage_cards, breakdown_cards, summary_cards, MetricCard};
use super::chart::{blockage_chart, meter_rows, BlockageChart, MeterRow};
use super::format::format_currency;
use crate::metrics::{
    blockage_metrics, breakdown_metrics, coverage_summary, cut_summary, BlockageMetrics,
    BreakdownMetrics, SeriesSummary,
};
use crate::shape::{BlockageSeries, Breakdown, CutSeries, InventoryDataset, TopEntry};
use crate::store::{CacheState, DashboardStore, DatasetSlot};

pub const LOAD_FAILED: &str = "Não foi possível carregar os dados.";
pub const LOADING: &str = "Carregando...";
pub const NO_DATA: &str = "Sem dados disponíveis.";

const FUNNEL_TOTAL: &str = "Total bloqueado";
const CUT_MOTIVES_TOTAL: &str = "Total cortado";

/// What one panel shows: its slot state, a status line and, when the slot is
/// fresh, the rendered view.
#[derive(Debug, Clone, Serialize)]
pub struct Panel<V> {
    pub dataset: &'static str,
    pub state: &'static str,
    pub loading: bool,
    pub status: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub view: Option<V>,
    pub cards: Vec<MetricCard>,
}

/// Build a panel from a slot. `render` turns fresh data into a view and its
/// cards; `empty_cards` stands in when there is nothing fresh to show.
fn panel<T, V>(
    slot: &DatasetSlot<T>,
    render: impl FnOnce(&T) -> (V, Vec<MetricCard>),
    empty_cards: impl FnOnce() -> Vec<MetricCard>,
    is_empty: impl FnOnce(&T) -> bool,
) -> Panel<V> {
    let loading = slot.is_loading();
    let mut panel = Panel {
        dataset: slot.name(),
        state: slot.state().label(),
        loading,
        status: if loading { LOADING.to_string() } else { String::new() },
        updated_at: None,
        error: None,
        view: None,
        cards: Vec::new(),
    };

    match slot.state() {
        CacheState::Fresh {
            data, fetched_at, ..
        } => {
            if is_empty(data) && !loading {
                panel.status = NO_DATA.to_string();
            }
            let (view, cards) = render(data);
            panel.updated_at = Some(*fetched_at);
            panel.view = Some(view);
            panel.cards = cards;
        }
        CacheState::Error { message, .. } => {
            if !loading {
                panel.status = LOAD_FAILED.to_string();
            }
            panel.error = Some(message.clone());
            panel.cards = empty_cards();
        }
        CacheState::Stale => panel.cards = empty_cards(),
    }
    panel
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockageView {
    pub series: BlockageSeries,
    pub chart: BlockageChart,
    pub metrics: Option<BlockageMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakdownView {
    pub breakdown: Breakdown,
    /// Caption and formatted total, e.g. `Total bloqueado: R$ 1.234,56`.
    pub total_text: String,
    pub rows: Vec<MeterRow>,
    pub metrics: Option<BreakdownMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CutView {
    pub series: CutSeries,
    pub summary: Option<SeriesSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    pub dataset: InventoryDataset,
    pub summary: Option<SeriesSummary>,
}

/// Everything the dashboard would render, as of `generated_at`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub blockage: Panel<BlockageView>,
    pub top10: Panel<Vec<TopEntry>>,
    pub cut: Panel<CutView>,
    pub cut_motives: Panel<BreakdownView>,
    pub inventory: Panel<InventoryView>,
    pub funnel: Panel<BreakdownView>,
}

impl DashboardSnapshot {
    pub fn from_store(store: &DashboardStore) -> Self {
        Self {
            generated_at: Utc::now(),
            blockage: panel(
                &store.blockage,
                |series| {
                    let metrics = blockage_metrics(series);
                    let cards = blockage_cards(metrics.as_ref());
                    let view = BlockageView {
                        series: series.clone(),
                        chart: blockage_chart(series),
                        metrics,
                    };
                    (view, cards)
                },
                || blockage_cards(None),
                |series| series.points.is_empty(),
            ),
            top10: panel(
                &store.top10,
                |entries| (entries.clone(), Vec::new()),
                Vec::new,
                |entries| entries.is_empty(),
            ),
            cut: panel(
                &store.cut,
                |series| {
                    let summary = cut_summary(series);
                    let cards = summary_cards(summary.as_ref());
                    let view = CutView {
                        series: series.clone(),
                        summary,
                    };
                    (view, cards)
                },
                || summary_cards(None),
                |series| series.is_empty(),
            ),
            cut_motives: panel(
                &store.cut_motives,
                |breakdown| breakdown_view(breakdown, CUT_MOTIVES_TOTAL),
                || breakdown_cards(None),
                Breakdown::is_empty,
            ),
            inventory: panel(
                &store.inventory,
                |dataset| {
                    let summary = coverage_summary(&dataset.coverage);
                    let cards = summary_cards(summary.as_ref());
                    let view = InventoryView {
                        dataset: dataset.clone(),
                        summary,
                    };
                    (view, cards)
                },
                || summary_cards(None),
                |dataset| dataset.coverage.is_empty(),
            ),
            funnel: panel(
                &store.funnel,
                |breakdown| breakdown_view(breakdown, FUNNEL_TOTAL),
                || breakdown_cards(None),
                Breakdown::is_empty,
            ),
        }
    }

    /// Panels whose latest load failed.
    pub fn failed(&self) -> Vec<&'static str> {
        [
            (self.blockage.dataset, self.blockage.error.is_some()),
            (self.top10.dataset, self.top10.error.is_some()),
            (self.cut.dataset, self.cut.error.is_some()),
            (self.cut_motives.dataset, self.cut_motives.error.is_some()),
            (self.inventory.dataset, self.inventory.error.is_some()),
            (self.funnel.dataset, self.funnel.error.is_some()),
        ]
        .into_iter()
        .filter_map(|(dataset, failed)| failed.then_some(dataset))
        .collect()
    }
}

fn breakdown_view(breakdown: &Breakdown, caption: &str) -> (BreakdownView, Vec<MetricCard>) {
    let metrics = breakdown_metrics(breakdown);
    let cards = breakdown_cards(metrics.as_ref());
    let view = BreakdownView {
        breakdown: breakdown.clone(),
        total_text: format!("{caption}: {}", format_currency(breakdown.total)),
        rows: meter_rows(breakdown),
        metrics,
    };
    (view, cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LoadError, ShapeError};
    use crate::shape::build_breakdown;

    #[test]
    fn test_empty_store_snapshot() {
        let snapshot = DashboardSnapshot::from_store(&DashboardStore::default());
        assert_eq!(snapshot.blockage.state, "stale");
        assert!(snapshot.blockage.view.is_none());
        assert_eq!(snapshot.blockage.cards.len(), 4);
        assert_eq!(snapshot.funnel.cards[0].value, "—");
        assert!(snapshot.failed().is_empty());
    }

    #[test]
    fn test_error_and_fresh_panels() {
        let mut store = DashboardStore::default();

        let id = store.cut.begin();
        store.cut.resolve(
            id,
            Err(LoadError::shape("/api/corte", ShapeError::NoRows { dataset: "corte" })),
        );

        let id = store.funnel.begin();
        let breakdown = build_breakdown(vec![(Some("Avaria".into()), 120.0, None)], None);
        store.funnel.resolve(id, Ok(breakdown));

        let id = store.cut_motives.begin();
        store.cut_motives.resolve(id, Ok(Breakdown::default()));

        let mut motives = DashboardStore::default();
        let id = motives.cut_motives.begin();
        let breakdown = build_breakdown(vec![(Some("Falta".into()), 80.0, None)], None);
        motives.cut_motives.resolve(id, Ok(breakdown));
        let view = DashboardSnapshot::from_store(&motives).cut_motives.view.expect("fresh motives");
        assert_eq!(view.total_text, "Total cortado: R$ 80,00");

        store.inventory.begin();

        let snapshot = DashboardSnapshot::from_store(&store);
        assert_eq!(snapshot.cut.state, "error");
        assert_eq!(snapshot.cut.status, LOAD_FAILED);
        assert_eq!(snapshot.cut.cards[0].context, "Sem dados");
        assert_eq!(snapshot.failed(), vec!["corte"]);

        let funnel = snapshot.funnel.view.as_ref().expect("fresh funnel");
        assert_eq!(funnel.total_text, "Total bloqueado: R$ 120,00");
        assert_eq!(funnel.rows[0].width, 100);
        assert_eq!(snapshot.funnel.status, "");

        assert_eq!(snapshot.cut_motives.status, NO_DATA);
        assert_eq!(snapshot.cut_motives.cards[0].value, "—");

        assert!(snapshot.inventory.loading);
        assert_eq!(snapshot.inventory.status, LOADING);

        let json = serde_json::to_value(&snapshot).expect("serializable");
        assert_eq!(json["funnel"]["state"], "fresh");
        assert_eq!(json["funnel"]["cards"][0]["key"], "top-motive");
    }
}
