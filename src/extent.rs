//! Extent model: how big a document is, and windows over that size.
//!
//! Every downstream algorithm looks only at [`Extent::total`]. The
//! [`Unit`] rides along for labels, suggested commands, and picking the
//! default [`crate::sampling::PaddingPolicy`].

use crate::error::SkimError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The unit an extent is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Text lines (text files).
    Lines,
    /// PDF pages.
    Pages,
    /// Characters of fetched text (URLs).
    Characters,
}

impl Unit {
    /// Plural label used in reports ("lines 1-10").
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Lines => "lines",
            Unit::Pages => "pages",
            Unit::Characters => "chars",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Total size of a document in one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub total: usize,
    pub unit: Unit,
}

impl Extent {
    /// Build an extent, rejecting negative totals.
    pub fn new(total: i64, unit: Unit) -> Result<Self, SkimError> {
        let total = usize::try_from(total).map_err(|_| SkimError::InvalidExtent { total })?;
        Ok(Self { total, unit })
    }

    pub fn lines(total: usize) -> Self {
        Self {
            total,
            unit: Unit::Lines,
        }
    }

    pub fn pages(total: usize) -> Self {
        Self {
            total,
            unit: Unit::Pages,
        }
    }

    pub fn characters(total: usize) -> Self {
        Self {
            total,
            unit: Unit::Characters,
        }
    }
}

/// An inclusive, 1-indexed `(start, end)` range over an extent.
///
/// `start <= end` holds for every window over a non-empty extent. The
/// planner emits `(1, 0)` for a zero-sized extent; [`Window::is_empty`]
/// reports that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Build a window clamped into `[1, total]`.
    ///
    /// For `total == 0` the result is the empty window `(1, 0)`.
    pub fn clamped(start: usize, end: usize, total: usize) -> Self {
        if total == 0 {
            return Self::new(1, 0);
        }
        let end = end.clamp(1, total);
        let start = start.clamp(1, end);
        Self::new(start, end)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Number of units covered.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos <= self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
