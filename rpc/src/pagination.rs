//! Limit/offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when `limit` is not specified.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Common pagination parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    /// Number of items per page (default 100, max 1000).
    pub limit: Option<u32>,
    /// Items to skip (default 0).
    pub offset: Option<u64>,
}

impl PaginationParams {
    /// Resolve effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn effective_offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }

    /// Cut one page out of `items`.
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let limit = self.effective_limit();
        let offset = self.effective_offset();
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        let items: Vec<T> = items.into_iter().skip(start).take(limit as usize).collect();
        let end = offset.saturating_add(items.len() as u64);
        Page {
            meta: PaginationMeta {
                limit,
                offset,
                total,
                next_offset: (end < total).then_some(end),
            },
            items,
        }
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub limit: u32,
    pub offset: u64,
    pub total: u64,
    /// Offset of the next page, or `None` if this is the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<u32>, offset: Option<u64>) -> PaginationParams {
        PaginationParams { limit, offset }
    }

    #[test]
    fn effective_limit_defaults() {
        assert_eq!(params(None, None).effective_limit(), 100);
        assert_eq!(params(None, None).effective_offset(), 0);
    }

    #[test]
    fn effective_limit_clamps() {
        assert_eq!(params(Some(5000), None).effective_limit(), 1000);
        assert_eq!(params(Some(0), None).effective_limit(), 1);
    }

    #[test]
    fn paginate_middle_page() {
        let page = params(Some(3), Some(2)).paginate((0..10).collect());
        assert_eq!(page.items, vec![2, 3, 4]);
        assert_eq!(page.meta.total, 10);
        assert_eq!(page.meta.next_offset, Some(5));
    }

    #[test]
    fn paginate_last_page() {
        let page = params(Some(5), Some(8)).paginate((0..10).collect());
        assert_eq!(page.items, vec![8, 9]);
        assert_eq!(page.meta.next_offset, None);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let page = params(None, Some(50)).paginate((0..10).collect::<Vec<i32>>());
        assert!(page.items.is_empty());
        assert_eq!(page.meta.next_offset, None);
    }
}
