//! Pagination primitives.
//!
//! The backend is trusted for totals only: item counts and the current page
//! are normalized here so callers can rely on `items.len() <= page_size` and
//! `1 <= current_page <= max(total_pages, 1)`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tilgang_core::{AppError, AppResult};

/// Allowed number of rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// Five rows.
    #[default]
    Five,
    /// Ten rows.
    Ten,
    /// Twenty-five rows.
    TwentyFive,
    /// Fifty rows.
    Fifty,
}

impl PageSize {
    /// Returns all allowed page sizes in ascending order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PageSize] = &[
            PageSize::Five,
            PageSize::Ten,
            PageSize::TwentyFive,
            PageSize::Fifty,
        ];

        ALL
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn get(&self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
        }
    }

    /// Parses a row count into an allowed page size.
    pub fn from_rows(rows: u32) -> AppResult<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|size| size.get() == rows)
            .ok_or_else(|| {
                AppError::Validation(format!("page size must be one of 5, 10, 25 or 50, got {rows}"))
            })
    }
}

impl FromStr for PageSize {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let rows = value.trim().parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid page size '{value}': {error}"))
        })?;
        Self::from_rows(rows)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages.
    pub total_items: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// 1-indexed page number this page holds.
    pub current_page: u32,
    /// Items of this page in display order.
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Builds a page from backend totals, enforcing the pagination invariants.
    ///
    /// `requested_page` is the page the caller asked for. It is clamped into
    /// `1..=max(total_pages, 1)` and surplus items beyond `page_size` are dropped.
    #[must_use]
    pub fn clamped(
        total_items: u32,
        total_pages: u32,
        requested_page: u32,
        page_size: PageSize,
        mut items: Vec<T>,
    ) -> Self {
        let limit = usize::try_from(page_size.get()).unwrap_or(usize::MAX);
        items.truncate(limit);

        Self {
            total_items,
            total_pages,
            current_page: clamp_page(requested_page, total_pages),
            items,
        }
    }

    /// Returns whether there are no items on this page.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Clamps a 1-indexed page number into `1..=max(total_pages, 1)`.
#[must_use]
pub fn clamp_page(requested_page: u32, total_pages: u32) -> u32 {
    requested_page.clamp(1, total_pages.max(1))
}

/// Number of pages needed to show `total_items` at `page_size` rows, never below one.
#[must_use]
pub fn page_count(total_items: u32, page_size: PageSize) -> u32 {
    total_items.div_ceil(page_size.get()).max(1)
}
