//! Refresh scheduling
//!
//! Collects what changed during an input event so the controller can run the
//! derived-state refreshes once, after the event has finished. Nothing is
//! dropped: a pending text change always yields one highlight pass and one
//! suggestion pass on the next flush.

use super::editor::ChangeEvent;
use std::ops::Range;

/// Refresh work owed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingRefresh {
    /// Document text changed: lines, highlight and suggestions are stale
    pub text: bool,
    /// Caret moved: suggestions are stale
    pub caret: bool,
    /// Scroll or viewport changed: gutter is stale
    pub viewport: bool,
    /// Merged ranges touched since the last flush
    pub dirty: Vec<Range<usize>>,
}

impl PendingRefresh {
    pub fn is_empty(&self) -> bool {
        !self.text && !self.caret && !self.viewport
    }

    pub fn suggestions(&self) -> bool {
        self.text || self.caret
    }
}

/// Dirty-state tracker for the controller
#[derive(Debug, Default)]
pub struct RefreshScheduler {
    pending: PendingRefresh,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document change
    pub fn text_changed(&mut self, change: &ChangeEvent) {
        self.pending.text = true;
        // An edit always moves or invalidates the caret context too
        self.pending.caret = true;
        self.mark_dirty(change);
    }

    pub fn caret_moved(&mut self) {
        self.pending.caret = true;
    }

    pub fn viewport_changed(&mut self) {
        self.pending.viewport = true;
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take the accumulated work, leaving nothing pending
    pub fn take(&mut self) -> PendingRefresh {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending = PendingRefresh::default();
    }

    /// Merge overlapping/adjacent regions as they arrive
    ///
    /// Regions recorded earlier are moved into the coordinates of the
    /// document after `change`.
    fn mark_dirty(&mut self, change: &ChangeEvent) {
        let regions = &mut self.pending.dirty;
        for region in regions.iter_mut() {
            *region = shift(region, change);
        }
        regions.push(change.range.clone());
        regions.sort_by_key(|r| r.start);

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(regions.len());
        for region in regions.drain(..) {
            match merged.last_mut() {
                Some(current) if region.start <= current.end => {
                    current.end = current.end.max(region.end);
                }
                _ => merged.push(region),
            }
        }
        *regions = merged;
    }
}

/// Map `region` through a replacement of `change.removed` chars at
/// `change.range.start` by `change.range.len()` chars
fn shift(region: &Range<usize>, change: &ChangeEvent) -> Range<usize> {
    let start = change.range.start;
    let old_end = start + change.removed;
    let new_end = change.range.end;
    let map = |offset: usize| {
        if offset <= start {
            offset
        } else if offset >= old_end {
            offset - old_end + new_end
        } else {
            new_end
        }
    };
    map(region.start)..map(region.end)
}
