use serde_json::Value;

use crate::entity::SyncEntity;
use crate::filter_engine::apply;

/// Full and visible record sets of one entity.
///
/// `full` only changes through [`CollectionStore::replace_all`]; `visible`
/// is always `apply(full, filter)`.
#[derive(Debug, Clone)]
pub struct CollectionStore<E: SyncEntity> {
    full: Vec<E>,
    visible: Vec<E>,
    filter: E::Filter,
}

impl<E: SyncEntity> Default for CollectionStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SyncEntity> CollectionStore<E> {
    /// Creates an empty store with the default filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            full: Vec::new(),
            visible: Vec::new(),
            filter: E::Filter::default(),
        }
    }

    /// Normalizes and stores a new full set, then re-applies the filter.
    pub fn replace_all(&mut self, raw_records: &[Value]) {
        self.full = raw_records.iter().map(E::normalize).collect();
        self.refilter();
    }

    /// Stores a new filter state and recomputes the visible set.
    pub fn apply_filter(&mut self, filter: E::Filter) {
        self.filter = filter;
        self.refilter();
    }

    /// Returns every record of the last successful load, in server order.
    #[must_use]
    pub fn full(&self) -> &[E] {
        &self.full
    }

    /// Returns the records passing the current filter.
    #[must_use]
    pub fn visible(&self) -> &[E] {
        &self.visible
    }

    /// Returns the current filter state.
    #[must_use]
    pub fn filter(&self) -> &E::Filter {
        &self.filter
    }

    fn refilter(&mut self) {
        self.visible = apply(&self.full, &self.filter);
    }
}
