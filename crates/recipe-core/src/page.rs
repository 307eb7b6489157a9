//! Pagination request and result types.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Largest page size a caller may ask for.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// A zero-based page index and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Validates and builds a page request. `size` must be in `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, size: u32) -> Result<Self, CoreError> {
        if size == 0 {
            return Err(CoreError::invalid("size", "page size must be positive"));
        }
        if size > MAX_PAGE_SIZE {
            return Err(CoreError::invalid(
                "size",
                format!("page size must be at most {MAX_PAGE_SIZE}"),
            ));
        }
        Ok(PageRequest { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Cuts this page out of an already filtered and ordered sequence.
    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total_elements = items.len() as u64;
        let content = items
            .into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(self.size as usize)
            .collect();
        Page {
            content,
            page: self.page,
            size: self.size,
            total_elements,
        }
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Converts every element, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
