use std::collections::BTreeSet;

use crate::config::DEFAULT_DISPLAY_ROWS;

/// Which part of the matching rows a search asks for.
///
/// `begin` and `end` are 1-based and inclusive. A `begin` of zero means the
/// listing starts at the first (most recent) match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultRange {
    /// Only report how many rows match.
    CountOnly,
    Rows { begin: usize, end: usize },
}

impl ResultRange {
    pub fn first(end: usize) -> Self {
        ResultRange::Rows { begin: 0, end }
    }
    pub fn is_count_only(&self) -> bool {
        matches!(self, ResultRange::CountOnly)
    }
    /// Whether the select statement carries a `LIMIT` placeholder.
    pub fn has_limit(&self) -> bool {
        !self.is_count_only()
    }
    /// Whether the select statement carries an `OFFSET` placeholder.
    pub fn has_offset(&self) -> bool {
        matches!(self, ResultRange::Rows { begin, .. } if *begin > 0)
    }
}

impl Default for ResultRange {
    fn default() -> Self {
        ResultRange::first(DEFAULT_DISPLAY_ROWS)
    }
}

/// The message that asked for the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageContext {
    pub message_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
}

/// A fully resolved search: every user is a numeric id by now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub users: BTreeSet<u64>,
    pub channels: BTreeSet<u64>,
    /// Negative or absent means no recency restriction.
    pub seconds: Option<i64>,
    /// Free text fragments joined with single spaces; empty when none.
    pub message: String,
    pub range: ResultRange,
}
