//! Client-side pagination over an in-memory list.
//!
//! Pages are 1-based. A page past the end yields an empty window.

use std::ops::Range;

/// `ceil(len / page_size)`; zero for an empty list.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// The visible slice of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub range: Range<usize>,
    /// More records exist after this window.
    pub has_more: bool,
}

impl PageWindow {
    pub fn compute(len: usize, page: usize, page_size: usize) -> Self {
        let start = page.saturating_sub(1).saturating_mul(page_size);
        if start >= len {
            return Self {
                range: len..len,
                has_more: false,
            };
        }
        let end = start.saturating_add(page_size).min(len);
        Self {
            range: start..end,
            has_more: end < len,
        }
    }
}
