// SPDX-License-Identifier: MPL-2.0
//! Session navigation: working set, random selection and the shared engine.
//!
//! - [`WorkingSet`]: the plain state machine (items, history, cursor)
//! - [`generate_smart_random_index`]: the repeat-avoiding selection policy
//! - [`NavigationEngine`]: lock-protected wrapper publishing `watch` observables

pub mod engine;
pub mod random;
pub mod working_set;

pub use engine::{DrawFn, NavigationEngine};
pub use random::{
    generate_smart_random_index, recency_window, MAX_RANDOM_ATTEMPTS, MAX_RECENCY_WINDOW,
};
pub use working_set::WorkingSet;
