//! Per-domain dataset caches.

pub mod slot;

pub use slot::{CacheState, DatasetSlot, RequestId};

use crate::fetch::Endpoint;
use crate::shape::{BlockageSeries, Breakdown, CutSeries, InventoryDataset, TopEntry};

/// One slot per endpoint. Owned by the [`Session`](crate::session::Session);
/// every slot is written only by its own load.
#[derive(Debug, Clone)]
pub struct DashboardStore {
    pub blockage: DatasetSlot<BlockageSeries>,
    pub top10: DatasetSlot<Vec<TopEntry>>,
    pub cut: DatasetSlot<CutSeries>,
    pub cut_motives: DatasetSlot<Breakdown>,
    pub inventory: DatasetSlot<InventoryDataset>,
    pub funnel: DatasetSlot<Breakdown>,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self {
            blockage: DatasetSlot::new(Endpoint::Blockage.dataset()),
            top10: DatasetSlot::new(Endpoint::BlockageTop10.dataset()),
            cut: DatasetSlot::new(Endpoint::Cut.dataset()),
            cut_motives: DatasetSlot::new(Endpoint::CutMotives.dataset()),
            inventory: DatasetSlot::new(Endpoint::Inventory.dataset()),
            funnel: DatasetSlot::new(Endpoint::Funnel.dataset()),
        }
    }
}

impl DashboardStore {
    /// `(dataset, state label)` for every slot, in endpoint order.
    pub fn states(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            (self.blockage.name(), self.blockage.state().label()),
            (self.top10.name(), self.top10.state().label()),
            (self.cut.name(), self.cut.state().label()),
            (self.cut_motives.name(), self.cut_motives.state().label()),
            (self.inventory.name(), self.inventory.state().label()),
            (self.funnel.name(), self.funnel.state().label()),
        ]
    }

    pub fn invalidate_all(&mut self) {
        self.blockage.invalidate();
        self.top10.invalidate();
        self.cut.invalidate();
        self.cut_motives.invalidate();
        self.inventory.invalidate();
        self.funnel.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_all_stale() {
        let store = DashboardStore::default();
        let states = store.states();
        assert_eq!(states.len(), 6);
        assert!(states.iter().all(|(_, state)| *state == "stale"));
        assert_eq!(states[3].0, "corte-motivos");
    }

    #[test]
    fn test_invalidate_all() {
        let mut store = DashboardStore::default();
        let id = store.funnel.begin();
        store.funnel.resolve(id, Ok(Breakdown::default()));
        assert_eq!(store.funnel.state().label(), "fresh");
        store.invalidate_all();
        assert_eq!(store.funnel.state().label(), "stale");
    }
}
