use crate::errors::ServiceError;
use serde::Serialize;

/// A validated, 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Result<Self, ServiceError> {
        if page == 0 {
            return Err(ServiceError::InvalidInput(
                "page must be 1 or greater".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(ServiceError::InvalidInput(
                "pageSize must be 1 or greater".to_string(),
            ));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Start of the window `[(page-1)*pageSize, page*pageSize)`.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// `ceil(total / pageSize)`, 0 when there is nothing to show.
    pub fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size)
    }

    /// Number of items that fall inside this page's window.
    pub fn items_on_page(&self, total: u64) -> u64 {
        total.saturating_sub(self.offset()).min(self.page_size)
    }

    /// Wraps an already-windowed result set fetched from the store.
    pub fn page_of<T>(&self, items: Vec<T>, total: u64) -> Page<T> {
        Page {
            num_of_results_on_cur_page: items.len() as u64,
            items,
            count: total,
            last_page: self.last_page(total),
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// In-memory equivalent of the store-level window over a full result set.
    pub fn slice<T>(&self, all: Vec<T>) -> Page<T> {
        let total = all.len() as u64;
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        let items: Vec<T> = all.into_iter().skip(offset).take(limit).collect();
        self.page_of(items, total)
    }
}

/// One page of results plus the totals a listing needs to render its pager.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of matches across all pages
    pub count: u64,
    pub last_page: u64,
    pub num_of_results_on_cur_page: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            last_page: self.last_page,
            num_of_results_on_cur_page: self.num_of_results_on_cur_page,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn rejects_zero_page_and_size() {
        assert_matches!(PageRequest::new(0, 20), Err(ServiceError::InvalidInput(_)));
        assert_matches!(PageRequest::new(1, 0), Err(ServiceError::InvalidInput(_)));
    }

    #[test]
    fn window_and_last_page() {
        let req = PageRequest::new(3, 20).unwrap();
        assert_eq!(req.offset(), 40);
        assert_eq!(req.limit(), 20);
        assert_eq!(req.last_page(45), 3);
        assert_eq!(req.items_on_page(45), 5);
        assert_eq!(req.last_page(0), 0);
    }

    #[test]
    fn slice_past_the_end_is_empty() {
        let page = PageRequest::new(4, 2).unwrap().slice(vec![1, 2, 3, 4, 5]);
        assert!(page.items.is_empty());
        assert_eq!(page.count, 5);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.num_of_results_on_cur_page, 0);
    }

    #[test]
    fn slice_returns_partial_last_page() {
        let page = PageRequest::new(3, 2).unwrap().slice(vec![1, 2, 3, 4, 5]);
        assert_eq!(page.items, vec![5]);
        assert_eq!(page.num_of_results_on_cur_page, 1);
    }
}
