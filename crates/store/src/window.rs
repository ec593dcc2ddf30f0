//! Listing windows for paginated enumeration.
//!
//! A window is applied to the lexicographically sorted entry set:
//! skip `offset` entries, then take at most `limit`.

/// Skip-then-take window over a sorted listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    /// entries to skip
    pub offset: usize,
    /// maximum entries to return; `None` means everything after the offset
    pub limit: Option<usize>,
}

impl Window {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit: Some(limit) }
    }

    /// Everything after `offset`.
    pub fn unbounded(offset: usize) -> Self {
        Self { offset, limit: None }
    }

    /// Normalize the signed wire form where any negative limit means "everything"
    /// and a negative offset clamps to zero.
    pub fn from_wire(offset: i64, limit: i64) -> Self {
        Self {
            offset: offset.max(0) as usize,
            limit: if limit < 0 { None } else { Some(limit as usize) },
        }
    }
}

impl Default for Window {
    fn default() -> Self { Self { offset: 0, limit: Some(20) } }
}
