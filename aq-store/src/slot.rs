//! Resource slots: cached async state for one chart lane.
//!
//! A slot moves through `Idle -> Loading -> Ready | Error`. Every fetch
//! starts with [`ResourceSlot::begin_fetch`], which bumps the slot's
//! generation; [`ResourceSlot::resolve`] only lands a result whose
//! generation is still current, so a slow response for an old selection
//! can never overwrite a newer one.

use crate::error::FetchError;
use crate::key::{SlotId, SlotKey};
use crate::observable::{Listeners, Subscription};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Monotonic fetch counter of a slot.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlotStatus::Idle => "idle",
            SlotStatus::Loading => "loading",
            SlotStatus::Ready => "ready",
            SlotStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Lifecycle state. The value exists only when `Ready`, the error only when `Error`.
#[derive(Debug)]
pub enum SlotState<V> {
    Idle,
    Loading,
    Ready(Rc<V>),
    Error(FetchError),
}

impl<V> SlotState<V> {
    pub fn status(&self) -> SlotStatus {
        match self {
            SlotState::Idle => SlotStatus::Idle,
            SlotState::Loading => SlotStatus::Loading,
            SlotState::Ready(_) => SlotStatus::Ready,
            SlotState::Error(_) => SlotStatus::Error,
        }
    }

    pub fn value(&self) -> Option<&Rc<V>> {
        match self {
            SlotState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            SlotState::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl<V> Clone for SlotState<V> {
    fn clone(&self) -> Self {
        match self {
            SlotState::Idle => SlotState::Idle,
            SlotState::Loading => SlotState::Loading,
            SlotState::Ready(v) => SlotState::Ready(v.clone()),
            SlotState::Error(e) => SlotState::Error(e.clone()),
        }
    }
}

impl<V: PartialEq> PartialEq for SlotState<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SlotState::Idle, SlotState::Idle) => true,
            (SlotState::Loading, SlotState::Loading) => true,
            (SlotState::Ready(a), SlotState::Ready(b)) => Rc::ptr_eq(a, b) || **a == **b,
            (SlotState::Error(a), SlotState::Error(b)) => a == b,
            _ => false,
        }
    }
}

/// What subscribers receive and `current_state` returns.
#[derive(Debug)]
pub struct SlotSnapshot<V> {
    pub id: SlotId,
    pub key: Option<SlotKey>,
    pub generation: Generation,
    pub state: SlotState<V>,
}

impl<V> SlotSnapshot<V> {
    pub fn status(&self) -> SlotStatus {
        self.state.status()
    }
}

impl<V> Clone for SlotSnapshot<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            key: self.key.clone(),
            generation: self.generation,
            state: self.state.clone(),
        }
    }
}

struct SlotInner<V> {
    key: Option<SlotKey>,
    generation: Generation,
    state: SlotState<V>,
}

/// Subscribable async state for one lane of the dashboard.
///
/// Cheap to clone; clones share state and listeners.
pub struct ResourceSlot<V> {
    id: SlotId,
    inner: Rc<RefCell<SlotInner<V>>>,
    listeners: Listeners<SlotSnapshot<V>>,
}

impl<V> Clone for ResourceSlot<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: self.inner.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

impl<V: 'static> ResourceSlot<V> {
    pub fn new(id: SlotId) -> Self {
        Self {
            id,
            inner: Rc::new(RefCell::new(SlotInner {
                key: None,
                generation: 0,
                state: SlotState::Idle,
            })),
            listeners: Listeners::new(),
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Snapshot of the slot. Never blocks.
    pub fn current_state(&self) -> SlotSnapshot<V> {
        let inner = self.inner.borrow();
        SlotSnapshot {
            id: self.id,
            key: inner.key.clone(),
            generation: inner.generation,
            state: inner.state.clone(),
        }
    }

    pub fn status(&self) -> SlotStatus {
        self.inner.borrow().state.status()
    }

    pub fn key(&self) -> Option<SlotKey> {
        self.inner.borrow().key.clone()
    }

    pub fn generation(&self) -> Generation {
        self.inner.borrow().generation
    }

    pub fn value(&self) -> Option<Rc<V>> {
        self.inner.borrow().state.value().cloned()
    }

    pub fn error(&self) -> Option<FetchError> {
        self.inner.borrow().state.error().cloned()
    }

    /// `listener` runs synchronously after every transition.
    pub fn subscribe(&self, listener: impl Fn(&SlotSnapshot<V>) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    /// Start a fetch of `key`: new generation, status `Loading`, previous
    /// value or error dropped. The returned generation tags the request.
    pub fn begin_fetch(&self, key: SlotKey) -> Generation {
        let snapshot = self.transition(|inner| {
            inner.generation += 1;
            inner.key = Some(key);
            inner.state = SlotState::Loading;
            true
        });
        snapshot.map_or_else(|| self.generation(), |s| s.generation)
    }

    /// Land the result of fetch `generation`.
    ///
    /// Returns `false`, leaving the slot untouched, when that fetch has
    /// been superseded or already resolved.
    pub fn resolve(&self, generation: Generation, result: Result<V, FetchError>) -> bool {
        self.transition(|inner| {
            if inner.generation != generation || !matches!(inner.state, SlotState::Loading) {
                return false;
            }
            inner.state = match result {
                Ok(value) => SlotState::Ready(Rc::new(value)),
                Err(err) => SlotState::Error(err),
            };
            true
        })
        .is_some()
    }

    /// Re-key the slot to `key` without fetching. In-flight responses are
    /// discarded; the slot waits `Idle` until a fetch can start.
    pub fn invalidate(&self, key: SlotKey) {
        self.transition(|inner| {
            if inner.key.as_ref() == Some(&key) && matches!(inner.state, SlotState::Idle) {
                return false;
            }
            inner.generation += 1;
            inner.key = Some(key);
            inner.state = SlotState::Idle;
            true
        });
    }

    /// Forget the key and any value. In-flight responses are discarded.
    pub fn clear(&self) {
        self.transition(|inner| {
            if inner.key.is_none() && matches!(inner.state, SlotState::Idle) {
                return false;
            }
            inner.generation += 1;
            inner.key = None;
            inner.state = SlotState::Idle;
            true
        });
    }

    /// Apply `change` and, if it reports a transition, notify listeners
    /// with the new snapshot once the borrow is released.
    fn transition(&self, change: impl FnOnce(&mut SlotInner<V>) -> bool) -> Option<SlotSnapshot<V>> {
        let changed = change(&mut self.inner.borrow_mut());
        if !changed {
            return None;
        }
        let snapshot = self.current_state();
        self.listeners.notify(&snapshot);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_types::period::{ChartKind, Period};
    use aq_types::station::StationId;
    use std::cell::RefCell;

    fn box_plot_key(station: &str) -> SlotKey {
        SlotKey::BoxPlot {
            station: Some(StationId::from(station)),
            period: Period::Week,
        }
    }

    fn slot() -> ResourceSlot<Vec<f64>> {
        ResourceSlot::new(SlotId::Chart(ChartKind::BoxPlot, Period::Week))
    }

    fn record(slot: &ResourceSlot<Vec<f64>>) -> (Rc<RefCell<Vec<SlotSnapshot<Vec<f64>>>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sub = {
            let seen = seen.clone();
            slot.subscribe(move |s| seen.borrow_mut().push(s.clone()))
        };
        (seen, sub)
    }

    #[test]
    fn test_new_slot_is_idle() {
        let slot = slot();
        let snapshot = slot.current_state();
        assert_eq!(snapshot.status(), SlotStatus::Idle);
        assert_eq!(snapshot.generation, 0);
        assert!(snapshot.key.is_none());
        assert!(slot.value().is_none());
    }

    #[test]
    fn test_idle_loading_ready() {
        let slot = slot();
        let (seen, _sub) = record(&slot);
        let generation = slot.begin_fetch(box_plot_key("STA01"));
        assert_eq!(generation, 1);
        assert_eq!(slot.status(), SlotStatus::Loading);
        assert!(slot.resolve(generation, Ok(vec![57.0, 57.5, 60.0, 64.0, 65.0])));
        assert_eq!(slot.status(), SlotStatus::Ready);
        assert_eq!(*slot.value().unwrap(), vec![57.0, 57.5, 60.0, 64.0, 65.0]);

        let statuses: Vec<SlotStatus> = seen.borrow().iter().map(|s| s.status()).collect();
        assert_eq!(statuses, vec![SlotStatus::Loading, SlotStatus::Ready]);
    }

    #[test]
    fn test_error_result() {
        let slot = slot();
        let generation = slot.begin_fetch(box_plot_key("STA01"));
        assert!(slot.resolve(generation, Err(FetchError::transport("refused"))));
        assert_eq!(slot.status(), SlotStatus::Error);
        assert_eq!(slot.error(), Some(FetchError::transport("refused")));
        assert!(slot.value().is_none());
    }

    #[test]
    fn test_refetch_clears_previous_value() {
        let slot = slot();
        let g1 = slot.begin_fetch(box_plot_key("STA01"));
        slot.resolve(g1, Ok(vec![1.0]));
        slot.begin_fetch(box_plot_key("STA02"));
        let snapshot = slot.current_state();
        assert_eq!(snapshot.status(), SlotStatus::Loading);
        assert!(snapshot.state.value().is_none());
        assert_eq!(snapshot.key, Some(box_plot_key("STA02")));
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let slot = slot();
        let (seen, _sub) = record(&slot);
        let old = slot.begin_fetch(box_plot_key("STA01"));
        let new = slot.begin_fetch(box_plot_key("STA02"));
        assert!(slot.resolve(new, Ok(vec![2.0])));
        assert!(!slot.resolve(old, Ok(vec![1.0])));
        assert_eq!(*slot.value().unwrap(), vec![2.0]);

        // Observed generations never go backwards.
        let generations: Vec<Generation> = seen.borrow().iter().map(|s| s.generation).collect();
        assert!(generations.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_double_resolve_is_ignored() {
        let slot = slot();
        let g = slot.begin_fetch(box_plot_key("STA01"));
        assert!(slot.resolve(g, Ok(vec![1.0])));
        assert!(!slot.resolve(g, Err(FetchError::schema("late"))));
        assert_eq!(slot.status(), SlotStatus::Ready);
    }

    #[test]
    fn test_clear_discards_in_flight() {
        let slot = slot();
        let g = slot.begin_fetch(box_plot_key("STA01"));
        slot.clear();
        assert!(!slot.resolve(g, Ok(vec![1.0])));
        assert_eq!(slot.status(), SlotStatus::Idle);
        assert!(slot.key().is_none());
    }

    #[test]
    fn test_invalidate_rekeys_and_waits() {
        let slot = slot();
        let (seen, _sub) = record(&slot);
        let g = slot.begin_fetch(box_plot_key("STA01"));
        slot.invalidate(box_plot_key("STA02"));
        assert!(!slot.resolve(g, Ok(vec![1.0])));
        assert_eq!(slot.status(), SlotStatus::Idle);
        assert_eq!(slot.key(), Some(box_plot_key("STA02")));

        // Invalidating to the same pending key is not a transition.
        slot.invalidate(box_plot_key("STA02"));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_clear_on_idle_slot_is_silent() {
        let slot = slot();
        let (seen, _sub) = record(&slot);
        slot.clear();
        assert!(seen.borrow().is_empty());
    }
}
