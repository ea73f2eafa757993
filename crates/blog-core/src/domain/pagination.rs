use serde::{Deserialize, Serialize};

/// Number of posts shown on each page of the listing.
pub const POSTS_PER_PAGE: u64 = 6;

/// One page of an ordered listing. Page numbers start at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, current_page: u64, per_page: u64, total: u64) -> Self {
        Self {
            items,
            current_page: current_page.max(1),
            per_page,
            total,
        }
    }

    /// Last page number; an empty listing still has one (empty) page.
    pub fn last_page(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page).max(1)
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    /// Zero-based offset of the first item on `page`.
    pub fn offset(page: u64, per_page: u64) -> u64 {
        page.max(1).saturating_sub(1).saturating_mul(per_page)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}
