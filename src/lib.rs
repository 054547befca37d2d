// SPDX-License-Identifier: MPL-2.0
//! `media_deck` assembles navigable media lists from files and folders.
//!
//! It streams folder scans in batches, serves repeat loads from validity-checked
//! caches, and walks the resulting list with history and a repeat-avoiding
//! random selection.

#![doc(html_root_url = "https://docs.rs/media_deck/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod paths;
