//! Selection of entries from a fitted regularization path.

use crate::error::{RegressionError, RegressionResult};
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

/// An index into the regularization path. Only a single entry or a
/// contiguous range can be selected; a list of indices is accepted as input so
/// that it can be rejected with an indexing error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathIndex {
    /// One entry. The selected model predicts without a path axis.
    Single(usize),
    /// The entries start..end
    Range { start: usize, end: Option<usize> },
    /// An arbitrary list of entries, which is not supported.
    List(Vec<usize>),
}

impl PathIndex {
    /// Resolve against a path of the given length into the selected range.
    pub(crate) fn resolve(&self, len: usize) -> RegressionResult<Range<usize>> {
        let range = match self {
            Self::Single(i) => *i..i.saturating_add(1),
            Self::Range { start, end } => *start..end.unwrap_or(len),
            Self::List(list) => {
                return Err(RegressionError::Index(format!(
                    "only a single index or a contiguous range can select from the path, got {:?}",
                    list
                )))
            }
        };
        if range.start >= range.end || range.end > len {
            return Err(RegressionError::Index(format!(
                "{:?} selects nothing from a path of length {}",
                range, len
            )));
        }
        Ok(range)
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }
}

impl From<usize> for PathIndex {
    fn from(i: usize) -> Self {
        Self::Single(i)
    }
}

impl From<Range<usize>> for PathIndex {
    fn from(r: Range<usize>) -> Self {
        Self::Range {
            start: r.start,
            end: Some(r.end),
        }
    }
}

impl From<RangeInclusive<usize>> for PathIndex {
    fn from(r: RangeInclusive<usize>) -> Self {
        Self::Range {
            start: *r.start(),
            end: Some(r.end().saturating_add(1)),
        }
    }
}

impl From<RangeTo<usize>> for PathIndex {
    fn from(r: RangeTo<usize>) -> Self {
        Self::Range {
            start: 0,
            end: Some(r.end),
        }
    }
}

impl From<RangeFrom<usize>> for PathIndex {
    fn from(r: RangeFrom<usize>) -> Self {
        Self::Range {
            start: r.start,
            end: None,
        }
    }
}

impl From<RangeFull> for PathIndex {
    fn from(_: RangeFull) -> Self {
        Self::Range {
            start: 0,
            end: None,
        }
    }
}

impl From<Vec<usize>> for PathIndex {
    fn from(list: Vec<usize>) -> Self {
        Self::List(list)
    }
}

impl From<&[usize]> for PathIndex {
    fn from(list: &[usize]) -> Self {
        Self::List(list.to_vec())
    }
}
