// SPDX-License-Identifier: MPL-2.0
//! Thread-safe navigation over a growing working set.
//!
//! Every mutation runs under one lock. Observers subscribe to `watch` channels
//! that are written only after the lock is released, so a published value
//! always comes from a complete update.

use super::working_set::WorkingSet;
use crate::config::SortOrder;
use crate::domain::media::MediaItem;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Uniform draw in `0..n` used by the random-selection policy.
pub type DrawFn = Box<dyn FnMut(usize) -> usize + Send>;

struct EngineState {
    set: WorkingSet,
    sort_order: SortOrder,
    draw: DrawFn,
}

/// What a mutation needs to publish once the lock is gone.
struct Update {
    current: Option<Option<MediaItem>>,
    ordered: Option<Arc<Vec<MediaItem>>>,
    count: Option<usize>,
}

impl Update {
    fn none() -> Self {
        Self {
            current: None,
            ordered: None,
            count: None,
        }
    }
}

/// Owns the working set of the active session.
pub struct NavigationEngine {
    state: Mutex<EngineState>,
    current_tx: watch::Sender<Option<MediaItem>>,
    items_tx: watch::Sender<Arc<Vec<MediaItem>>>,
    count_tx: watch::Sender<usize>,
}

impl std::fmt::Debug for NavigationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("NavigationEngine")
            .field("set", &state.set)
            .field("sort_order", &state.sort_order)
            .finish_non_exhaustive()
    }
}

impl Default for NavigationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationEngine {
    /// Creates an engine drawing from an OS-seeded generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates an engine with a reproducible random sequence.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(mut rng: StdRng) -> Self {
        Self::with_draw(move |n| rng.random_range(0..n))
    }

    /// Creates an engine with a custom draw source. `draw(n)` must return a value in `0..n`.
    #[must_use]
    pub fn with_draw(draw: impl FnMut(usize) -> usize + Send + 'static) -> Self {
        let (current_tx, _) = watch::channel(None);
        let (items_tx, _) = watch::channel(Arc::new(Vec::new()));
        let (count_tx, _) = watch::channel(0);
        Self {
            state: Mutex::new(EngineState {
                set: WorkingSet::new(),
                sort_order: SortOrder::default(),
                draw: Box::new(draw),
            }),
            current_tx,
            items_tx,
            count_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, update: Update) {
        if let Some(ordered) = update.ordered {
            self.items_tx.send_replace(ordered);
        }
        if let Some(count) = update.count {
            self.count_tx.send_replace(count);
        }
        if let Some(current) = update.current {
            self.current_tx.send_replace(current);
        }
    }

    /// Starts a new session with nothing selected.
    pub fn reset(&self) {
        {
            let mut state = self.lock();
            state.set.reset();
        }
        tracing::debug!("working set reset");
        self.publish(Update {
            current: Some(None),
            ordered: Some(Arc::new(Vec::new())),
            count: Some(0),
        });
    }

    /// Appends a batch; the first non-empty batch of a session selects its first item.
    pub fn append(&self, items: Vec<MediaItem>) {
        if items.is_empty() {
            return;
        }
        let added = items.len();
        let update = {
            let mut state = self.lock();
            let selected = state.set.append(items);
            Update {
                current: selected.then(|| state.set.current().cloned()),
                ordered: Some(Arc::new(ordered(state.set.items(), state.sort_order))),
                count: Some(state.set.len()),
            }
        };
        tracing::debug!(added, total = ?update.count, "items appended");
        self.publish(update);
    }

    /// Moves forward, redoing history first and drawing a new item at its end.
    pub fn next(&self) -> Option<MediaItem> {
        self.step(|state| {
            let EngineState { set, draw, .. } = state;
            set.next(draw.as_mut())
        })
    }

    /// Moves back through history, wrapping at the start.
    pub fn previous(&self) -> Option<MediaItem> {
        self.step(|state| {
            let EngineState { set, draw, .. } = state;
            set.previous(draw.as_mut())
        })
    }

    fn step(&self, advance: impl FnOnce(&mut EngineState) -> Option<usize>) -> Option<MediaItem> {
        let shown = {
            let mut state = self.lock();
            advance(&mut *state).and_then(|_| state.set.current().cloned())
        };
        if let Some(item) = &shown {
            tracing::trace!(item = %item, "navigated");
            self.publish(Update {
                current: Some(Some(item.clone())),
                ..Update::none()
            });
        }
        shown
    }

    /// Shows `item` if it belongs to the set. History and cursor are left as they were.
    pub fn jump(&self, item: &MediaItem) -> bool {
        let found = {
            let mut state = self.lock();
            state.set.jump(item).is_some()
        };
        if found {
            self.publish(Update {
                current: Some(Some(item.clone())),
                ..Update::none()
            });
        } else {
            tracing::debug!(item = %item, "jump target not in working set");
        }
        found
    }

    /// Changes the ordering of the browsing view. Selection and history are unaffected.
    pub fn set_sort_order(&self, sort_order: SortOrder) {
        let update = {
            let mut state = self.lock();
            if state.sort_order == sort_order {
                return;
            }
            state.sort_order = sort_order;
            Update {
                ordered: Some(Arc::new(ordered(state.set.items(), sort_order))),
                ..Update::none()
            }
        };
        self.publish(update);
    }

    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        self.lock().sort_order
    }

    #[must_use]
    pub fn current(&self) -> Option<MediaItem> {
        self.lock().set.current().cloned()
    }

    /// Items in discovery order.
    #[must_use]
    pub fn items(&self) -> Vec<MediaItem> {
        self.lock().set.items().to_vec()
    }

    /// Items in the configured browsing order.
    #[must_use]
    pub fn ordered_items(&self) -> Vec<MediaItem> {
        let state = self.lock();
        ordered(state.set.items(), state.sort_order)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().set.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().set.is_empty()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.lock().set.history().len()
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.lock().set.cursor()
    }

    #[must_use]
    pub fn subscribe_current(&self) -> watch::Receiver<Option<MediaItem>> {
        self.current_tx.subscribe()
    }

    /// Receives the ordered browsing view after every change.
    #[must_use]
    pub fn subscribe_items(&self) -> watch::Receiver<Arc<Vec<MediaItem>>> {
        self.items_tx.subscribe()
    }

    #[must_use]
    pub fn subscribe_count(&self) -> watch::Receiver<usize> {
        self.count_tx.subscribe()
    }
}

fn ordered(items: &[MediaItem], sort_order: SortOrder) -> Vec<MediaItem> {
    let mut view = items.to_vec();
    match sort_order {
        SortOrder::Discovery => {}
        SortOrder::Alphabetical => sort_by_name(&mut view),
        SortOrder::ReverseAlphabetical => {
            sort_by_name(&mut view);
            view.reverse();
        }
    }
    view
}

fn sort_by_name(items: &mut [MediaItem]) {
    items.sort_by_cached_key(|item| (item.display_name().to_lowercase(), item.clone()));
}
