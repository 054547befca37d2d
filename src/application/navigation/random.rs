// SPDX-License-Identifier: MPL-2.0
//! Repeat-avoiding random selection.

use std::collections::HashSet;

/// Largest number of history entries treated as "recently shown".
pub const MAX_RECENCY_WINDOW: usize = 50;

/// Total candidate draws before the last one is accepted regardless.
pub const MAX_RANDOM_ATTEMPTS: usize = 20;

/// Sets smaller than this are drawn uniformly without repeat avoidance.
pub const REPEAT_AVOIDANCE_THRESHOLD: usize = 5;

/// Number of trailing history entries considered recent for a set of `len` items.
#[must_use]
pub fn recency_window(len: usize) -> usize {
    MAX_RECENCY_WINDOW.min(len / 2)
}

/// Picks the next index into a working set of `len` items.
///
/// `draw(n)` must return a uniformly distributed value in `0..n`. Sets of fewer
/// than [`REPEAT_AVOIDANCE_THRESHOLD`] items are drawn from directly. Larger
/// sets reject candidates found in the last [`recency_window`] history entries,
/// up to [`MAX_RANDOM_ATTEMPTS`] draws in total; the final draw is accepted
/// even if it is recent.
pub fn generate_smart_random_index<F>(len: usize, history: &[usize], draw: &mut F) -> usize
where
    F: FnMut(usize) -> usize + ?Sized,
{
    if len <= 1 {
        return 0;
    }
    if len < REPEAT_AVOIDANCE_THRESHOLD {
        return draw(len);
    }

    let window = recency_window(len);
    let recent: HashSet<usize> = history[history.len().saturating_sub(window)..]
        .iter()
        .copied()
        .collect();

    let mut candidate = draw(len);
    let mut attempts = 1;
    while attempts < MAX_RANDOM_ATTEMPTS && recent.contains(&candidate) {
        candidate = draw(len);
        attempts += 1;
    }
    candidate
}
