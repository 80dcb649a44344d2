//! Page cursor implementation

use super::PageDirection;

/// Position within a paged sequence
///
/// The page is always kept inside `[1, total_pages]`; stepping past either
/// end is refused rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
    total_pages: usize,
}

impl PageCursor {
    /// Create a cursor, snapping `page` into range
    pub fn new(page: usize, total_pages: usize) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            page: page.clamp(1, total_pages),
            total_pages,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Navigate forward by one page
    pub fn next(self) -> Result<Self, String> {
        if self.page < self.total_pages {
            Ok(Self {
                page: self.page + 1,
                ..self
            })
        } else {
            Err(format!("Already at last page ({})", self.total_pages))
        }
    }

    /// Navigate backward by one page
    pub fn previous(self) -> Result<Self, String> {
        if self.page > 1 {
            Ok(Self {
                page: self.page - 1,
                ..self
            })
        } else {
            Err("Already at first page".to_string())
        }
    }

    pub fn step(self, direction: PageDirection) -> Result<Self, String> {
        match direction {
            PageDirection::Previous => self.previous(),
            PageDirection::Next => self.next(),
        }
    }
}
