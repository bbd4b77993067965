use std::fmt;

use serde::{Deserialize, Serialize};

/// A byte range requested from a source.
///
/// `from` is the logical offset the loader reports chunk positions against.
/// `to` is inclusive; `None` means the range runs to the end of the resource
/// (or forever, for live sources).
///
/// Whether the server actually honours the range is up to the
/// [`SeekHandler`](crate::SeekHandler) and the server; the loader only uses
/// `from` for accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ByteRange {
    pub from: u64,
    pub to:   Option<u64>,
}

impl ByteRange {
    pub fn new(from: u64, to: Option<u64>) -> Self { Self { from, to } }

    /// The whole resource, `0..`.
    pub fn full() -> Self { Self::default() }

    /// Everything from `from` onwards.
    pub fn starting_at(from: u64) -> Self { Self { from, to: None } }

    pub fn is_unbounded(&self) -> bool { self.to.is_none() }

    /// Returns `true` when the range selects the whole resource.
    pub fn is_full(&self) -> bool { self.from == 0 && self.to.is_none() }

    /// Number of bytes covered, if bounded.
    pub fn byte_count(&self) -> Option<u64> {
        self.to.map(|to| to.saturating_sub(self.from).saturating_add(1))
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to {
            Some(to) => write!(f, "{}-{}", self.from, to),
            None => write!(f, "{}-", self.from),
        }
    }
}
