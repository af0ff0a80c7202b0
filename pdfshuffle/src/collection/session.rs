//! Session state: the current collection plus activity flags.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::{PageCollection, PageDescriptor, SourceId};
use crate::arrange::Edit;
use crate::error::{PdfShuffleError, Result};

/// Owned state of one editing session.
///
/// Ingestion and arrangement take `&mut Session`; export takes `&Session` and
/// works on a snapshot of the collection.
#[derive(Debug, Default)]
pub struct Session {
    collection: PageCollection,
    next_source: AtomicU64,
    loading: Arc<AtomicBool>,
    exporting: Arc<AtomicBool>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current arrangement.
    pub fn collection(&self) -> &PageCollection {
        &self.collection
    }

    /// Copy of the current arrangement.
    pub fn snapshot(&self) -> PageCollection {
        self.collection.clone()
    }

    /// Handle for observing the activity flags from elsewhere.
    pub fn monitor(&self) -> ActivityMonitor {
        ActivityMonitor {
            loading: Arc::clone(&self.loading),
            exporting: Arc::clone(&self.exporting),
        }
    }

    /// Whether an ingestion batch is in progress.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Whether an export is in progress.
    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    /// Whether an export could start now.
    pub fn can_export(&self) -> bool {
        !self.collection.is_empty() && !self.is_exporting()
    }

    /// Move the page at `from` to `to`, replacing the collection.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<()> {
        self.collection = self.collection.moved(from, to)?;
        Ok(())
    }

    /// Delete the page at `index`, replacing the collection.
    pub fn delete_page(&mut self, index: usize) -> Result<()> {
        self.collection = self.collection.removed(index)?;
        Ok(())
    }

    /// Apply edits in order.
    ///
    /// The collection is only replaced if every edit succeeds.
    pub fn apply_edits(&mut self, edits: &[Edit]) -> Result<()> {
        let mut arranged = self.collection.clone();
        for edit in edits {
            arranged = edit.apply(&arranged)?;
        }
        self.collection = arranged;
        Ok(())
    }

    pub(crate) fn append(&mut self, pages: Vec<PageDescriptor>) {
        if !pages.is_empty() {
            self.collection = self.collection.appended(pages);
        }
    }

    pub(crate) fn allocate_source_id(&self) -> SourceId {
        SourceId::new(self.next_source.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub(crate) fn begin_loading(&self) -> ActivityGuard {
        self.loading.store(true, Ordering::Release);
        ActivityGuard {
            flag: Arc::clone(&self.loading),
        }
    }

    /// Raise the export flag, failing if it is already raised.
    pub(crate) fn begin_export(&self) -> Result<ActivityGuard> {
        self.exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PdfShuffleError::ExportInProgress)?;

        Ok(ActivityGuard {
            flag: Arc::clone(&self.exporting),
        })
    }
}

/// Read-only view of a session's activity flags.
#[derive(Debug, Clone)]
pub struct ActivityMonitor {
    loading: Arc<AtomicBool>,
    exporting: Arc<AtomicBool>,
}

impl ActivityMonitor {
    /// Whether an ingestion batch is in progress.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Whether an export is in progress.
    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }
}

/// Clears its activity flag when dropped.
#[derive(Debug)]
#[must_use = "the flag is cleared as soon as the guard is dropped"]
pub struct ActivityGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
