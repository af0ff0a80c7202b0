//! Arrangement instructions and the drag gesture.
//!
//! [`Edit`] is the textual form used by the command line (`move:4:0`,
//! `delete:2`). [`DragGesture`] turns pointer hover events into
//! [`PageMove`]s for interactive front ends; the collection itself never
//! tracks hover state.

use std::fmt;
use std::str::FromStr;

use crate::collection::{PageCollection, PageId};
use crate::error::{PdfShuffleError, Result};

/// A single arrangement instruction with 0-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Take the page at `from` out and reinsert it at `to`.
    Move {
        /// Source index.
        from: usize,
        /// Destination index in the shortened sequence.
        to: usize,
    },
    /// Remove the page at `index`.
    Delete {
        /// Index to remove.
        index: usize,
    },
}

impl Edit {
    /// Apply to `collection`, returning the arranged copy.
    pub fn apply(&self, collection: &PageCollection) -> Result<PageCollection> {
        match *self {
            Edit::Move { from, to } => collection.moved(from, to),
            Edit::Delete { index } => collection.removed(index),
        }
    }
}

impl FromStr for Edit {
    type Err = PdfShuffleError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let index = |raw: &str| {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| PdfShuffleError::invalid_edit(s, format!("'{raw}' is not an index")))
        };

        match parts.as_slice() {
            [op, from, to] if op.eq_ignore_ascii_case("move") => Ok(Edit::Move {
                from: index(from)?,
                to: index(to)?,
            }),
            [op, at] if op.eq_ignore_ascii_case("delete") => Ok(Edit::Delete { index: index(at)? }),
            [op, ..] if op.eq_ignore_ascii_case("move") => Err(PdfShuffleError::invalid_edit(
                s,
                "expected move:FROM:TO",
            )),
            [op, ..] if op.eq_ignore_ascii_case("delete") => Err(PdfShuffleError::invalid_edit(
                s,
                "expected delete:INDEX",
            )),
            _ => Err(PdfShuffleError::invalid_edit(
                s,
                "expected move:FROM:TO or delete:INDEX",
            )),
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::Move { from, to } => write!(f, "move:{from}:{to}"),
            Edit::Delete { index } => write!(f, "delete:{index}"),
        }
    }
}

/// A move emitted by a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMove {
    /// Index the dragged page currently sits at.
    pub from: usize,
    /// Index it should move to.
    pub to: usize,
}

impl PageMove {
    /// Apply to `collection`.
    pub fn apply(&self, collection: &PageCollection) -> Result<PageCollection> {
        collection.moved(self.from, self.to)
    }
}

impl From<PageMove> for Edit {
    fn from(value: PageMove) -> Self {
        Edit::Move {
            from: value.from,
            to: value.to,
        }
    }
}

/// Horizontal extent of the element under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverBounds {
    /// Left edge in client coordinates.
    pub left: f32,
    /// Right edge in client coordinates.
    pub right: f32,
}

impl HoverBounds {
    /// Bounds from the left and right edges.
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    fn midpoint_offset(&self) -> f32 {
        (self.right - self.left) / 2.0
    }
}

/// An in-progress drag of one page.
///
/// The gesture tracks where the dragged page currently sits so that each
/// midpoint crossing fires exactly one move.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    dragged: PageId,
    index: usize,
}

impl DragGesture {
    /// Begin dragging the page at `index`.
    pub fn start(collection: &PageCollection, index: usize) -> Result<Self> {
        let page = collection.get(index).ok_or(PdfShuffleError::InvalidIndex {
            index,
            len: collection.len(),
        })?;

        Ok(Self {
            dragged: page.id(),
            index,
        })
    }

    /// Id of the dragged page.
    pub fn dragged(&self) -> PageId {
        self.dragged
    }

    /// Index the dragged page currently sits at.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Report the pointer over the element at `hover_index`.
    ///
    /// Returns a move only once the pointer has crossed the midpoint of that
    /// element in the direction of travel. The caller applies the move; the
    /// gesture assumes it was applied and tracks the new index.
    pub fn hover(
        &mut self,
        hover_index: usize,
        bounds: HoverBounds,
        pointer_x: f32,
    ) -> Option<PageMove> {
        if hover_index == self.index {
            return None;
        }

        let middle = bounds.midpoint_offset();
        let offset = pointer_x - bounds.left;

        if self.index < hover_index && offset < middle {
            return None;
        }
        if self.index > hover_index && offset > middle {
            return None;
        }

        let page_move = PageMove {
            from: self.index,
            to: hover_index,
        };
        self.index = hover_index;
        Some(page_move)
    }

    /// End the gesture, returning the final index of the dragged page.
    pub fn drop(self) -> usize {
        self.index
    }
}
