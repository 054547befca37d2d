// SPDX-License-Identifier: MPL-2.0
//! Streaming media scanner.
//!
//! Walks a playlist's sources in order and emits matching items in batches so
//! a consumer can start working before the walk finishes. The walk runs on a
//! blocking worker thread and feeds a bounded channel; the returned
//! [`ScanStream`] is the consumer side.
//!
//! Failures never abort a scan: a source that cannot be resolved is skipped,
//! and an unreadable subtree is skipped while the rest of the walk continues.
//! Cancellation is cooperative and checked before every source, every
//! directory entry and every batch hand-off.

use crate::application::cache::FolderCache;
use crate::application::port::PathResolver;
use crate::domain::media::{MediaFilter, MediaItem, MediaType};
use crate::domain::playlist::{Source, SourceKind};
use futures_util::Stream;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use walkdir::WalkDir;

/// Number of items per emitted batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Batches buffered between the walker and a slow consumer.
const CHANNEL_CAPACITY: usize = 4;

/// Cancellation token shared between a scan and its owner.
pub type CancellationToken = Arc<AtomicBool>;

/// Creates a fresh, untriggered token.
#[must_use]
pub fn cancellation_token() -> CancellationToken {
    Arc::new(AtomicBool::new(false))
}

/// Checks if the cancellation token has been triggered.
#[must_use]
pub fn is_cancelled(token: &CancellationToken) -> bool {
    token.load(Ordering::SeqCst)
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every source was processed; `total` items were emitted.
    Completed { total: usize },
    /// The scan stopped early. Batches already emitted stay emitted.
    Cancelled,
}

/// Walks sources and emits batches of matching items.
#[derive(Clone)]
pub struct Scanner {
    resolver: Arc<dyn PathResolver>,
    folder_cache: Option<FolderCache>,
    batch_size: usize,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("folder_cache", &self.folder_cache)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    #[must_use]
    pub fn new(resolver: Arc<dyn PathResolver>) -> Self {
        Self {
            resolver,
            folder_cache: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Reuses valid folder listings instead of walking, and records fresh ones.
    #[must_use]
    pub fn with_folder_cache(mut self, cache: FolderCache) -> Self {
        self.folder_cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Starts scanning `sources` on a blocking worker and returns the batch stream.
    ///
    /// Must be called from within a Tokio runtime. Dropping the stream cancels
    /// the walk.
    #[must_use]
    pub fn scan(&self, sources: Vec<Source>, filter: MediaFilter) -> ScanStream {
        self.scan_with_token(sources, filter, cancellation_token())
    }

    /// Like [`Scanner::scan`], stopping when the caller-owned `cancel` is triggered.
    #[must_use]
    pub fn scan_with_token(
        &self,
        sources: Vec<Source>,
        filter: MediaFilter,
        cancel: CancellationToken,
    ) -> ScanStream {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let scanner = self.clone();
        let token = Arc::clone(&cancel);

        let handle = tokio::task::spawn_blocking(move || {
            scanner.scan_blocking(&sources, filter, &token, &mut |batch| {
                tx.blocking_send(batch).is_ok()
            })
        });

        ScanStream {
            rx,
            cancel,
            handle: Some(handle),
        }
    }

    /// Synchronous scan driving `emit` with each batch.
    ///
    /// `emit` returns `false` when the consumer has gone away, which stops the
    /// walk like a cancellation.
    pub fn scan_blocking(
        &self,
        sources: &[Source],
        filter: MediaFilter,
        cancel: &CancellationToken,
        emit: &mut dyn FnMut(Vec<MediaItem>) -> bool,
    ) -> ScanOutcome {
        let started = Instant::now();
        let mut sink = BatchSink::new(self.batch_size, cancel, emit);

        for source in sources {
            if sink.is_stopped() {
                break;
            }
            match source.kind {
                SourceKind::File => {
                    sink.push(MediaItem::new(source.identifier.as_str()));
                }
                SourceKind::Folder => self.scan_folder(source, filter, &mut sink),
            }
        }

        let outcome = if sink.finish() {
            ScanOutcome::Completed { total: sink.total }
        } else {
            ScanOutcome::Cancelled
        };

        tracing::info!(
            sources = sources.len(),
            emitted = sink.total,
            ?outcome,
            elapsed_ms = started.elapsed().as_millis(),
            "scan finished"
        );
        outcome
    }

    fn scan_folder(&self, source: &Source, filter: MediaFilter, sink: &mut BatchSink<'_>) {
        let Some(root) = self.resolver.resolve(&source.identifier) else {
            tracing::warn!(source = %source.identifier, "cannot resolve folder, skipping");
            return;
        };

        let Some(cache) = &self.folder_cache else {
            walk_folder(&root, source.recursive, filter, sink, None);
            return;
        };

        let key = FolderCache::key_for(&source.identifier, source.recursive);
        if let Some(entry) = cache.get(&key) {
            for item in entry.media_items() {
                if sink.is_stopped() {
                    return;
                }
                if item.media_type().is_some_and(|kind| filter.matches_type(kind)) {
                    sink.push(item);
                }
            }
            return;
        }

        let mut discovered = Vec::new();
        let complete = walk_folder(&root, source.recursive, filter, sink, Some(&mut discovered));
        if complete {
            if let Err(error) = cache.put(&key, &root, &discovered) {
                tracing::warn!(source = %source.identifier, %error, "failed to write folder cache");
            }
        }
    }
}

/// Walks `root`, pushing filter matches into `sink`.
///
/// When `discovered` is given, every media file (regardless of `filter`) is
/// recorded there for the folder cache. Returns `false` if the walk stopped early.
fn walk_folder(
    root: &Path,
    recursive: bool,
    filter: MediaFilter,
    sink: &mut BatchSink<'_>,
    mut discovered: Option<&mut Vec<MediaItem>>,
) -> bool {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name();

    for entry in walker {
        if sink.is_stopped() {
            return false;
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::warn!(
                    path = ?error.path(),
                    %error,
                    "cannot read directory entry, skipping subtree"
                );
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = entry.file_name().to_str().and_then(MediaType::from_name) else {
            continue;
        };

        let item = MediaItem::new(entry.path().to_string_lossy().as_ref());
        if let Some(discovered) = discovered.as_deref_mut() {
            discovered.push(item.clone());
        }
        if filter.matches_type(kind) {
            sink.push(item);
        }
    }
    !sink.is_stopped()
}

/// Accumulates items and hands them off in fixed-size batches.
struct BatchSink<'a> {
    batch_size: usize,
    buffer: Vec<MediaItem>,
    cancel: &'a CancellationToken,
    emit: &'a mut dyn FnMut(Vec<MediaItem>) -> bool,
    total: usize,
    stopped: bool,
}

impl<'a> BatchSink<'a> {
    fn new(
        batch_size: usize,
        cancel: &'a CancellationToken,
        emit: &'a mut dyn FnMut(Vec<MediaItem>) -> bool,
    ) -> Self {
        Self {
            batch_size,
            buffer: Vec::with_capacity(batch_size),
            cancel,
            emit,
            total: 0,
            stopped: false,
        }
    }

    fn is_stopped(&mut self) -> bool {
        if !self.stopped && is_cancelled(self.cancel) {
            self.stopped = true;
        }
        self.stopped
    }

    fn push(&mut self, item: MediaItem) {
        if self.is_stopped() {
            return;
        }
        self.buffer.push(item);
        if self.buffer.len() >= self.batch_size {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() || self.is_stopped() {
            return;
        }
        let batch = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.batch_size));
        let len = batch.len();
        if (self.emit)(batch) {
            self.total += len;
            tracing::trace!(len, total = self.total, "batch emitted");
        } else {
            self.stopped = true;
        }
    }

    /// Flushes the remainder. Returns `true` if the scan ran to completion.
    fn finish(&mut self) -> bool {
        self.flush();
        !self.is_stopped()
    }
}

/// Consumer side of a running scan.
///
/// Yields batches in discovery order. Dropping the stream cancels the scan.
#[derive(Debug)]
pub struct ScanStream {
    rx: mpsc::Receiver<Vec<MediaItem>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<ScanOutcome>>,
}

impl ScanStream {
    /// Receives the next batch, or `None` once the scan has ended.
    pub async fn next_batch(&mut self) -> Option<Vec<MediaItem>> {
        self.rx.recv().await
    }

    /// Requests the walk to stop at its next check.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        Arc::clone(&self.cancel)
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        is_cancelled(&self.cancel)
    }

    /// Waits for the walker to exit and reports how it ended.
    ///
    /// Batches not yet received are discarded.
    pub async fn outcome(mut self) -> ScanOutcome {
        self.rx.close();
        while self.rx.recv().await.is_some() {}
        match self.handle.take() {
            Some(handle) => handle.await.unwrap_or(ScanOutcome::Cancelled),
            None => ScanOutcome::Cancelled,
        }
    }
}

impl Stream for ScanStream {
    type Item = Vec<MediaItem>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for ScanStream {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel();
        }
    }
}
