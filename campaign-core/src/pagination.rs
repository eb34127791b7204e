use crate::models::Page;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Slices `items` into a page. An offset past the end yields an empty page
/// positioned at `total`, so `offset + items.len()` never exceeds `total`.
pub fn paginate<T: Clone>(items: &[T], offset: usize, limit: usize) -> Page<T> {
    let total = items.len();
    let start = offset.min(total);
    let end = start.saturating_add(limit).min(total);
    Page {
        items: items[start..end].to_vec(),
        total,
        offset: start,
        limit,
    }
}

/// Table pager state derived from the last page response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub offset: usize,
    pub limit: usize,
    pub total: usize,
}

impl PageCursor {
    pub fn new(offset: usize, limit: usize, total: usize) -> Self {
        Self {
            offset,
            limit: limit.max(1),
            total,
        }
    }

    pub fn of<T>(page: &Page<T>) -> Self {
        Self::new(page.offset, page.limit, page.total)
    }

    pub fn has_next(&self) -> bool {
        self.offset + self.limit < self.total
    }

    pub fn has_prev(&self) -> bool {
        self.offset > 0
    }

    pub fn next_offset(&self) -> Option<usize> {
        self.has_next().then(|| self.offset + self.limit)
    }

    pub fn prev_offset(&self) -> Option<usize> {
        self.has_prev().then(|| self.offset.saturating_sub(self.limit))
    }

    /// 1-based.
    pub fn page_number(&self) -> usize {
        self.offset / self.limit + 1
    }

    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.limit).max(1)
    }

    /// "26-50 of 120" style range label.
    pub fn range_label(&self, shown: usize) -> String {
        if shown == 0 {
            return format!("0 of {}", self.total);
        }
        format!("{}-{} of {}", self.offset + 1, self.offset + shown, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page() {
        let items: Vec<u32> = (0..10).collect();
        let page = paginate(&items, 4, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 10);
    }

    #[test]
    fn past_the_end_is_empty() {
        let items: Vec<u32> = (0..10).collect();
        let page = paginate(&items, 40, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 10);
        assert_eq!(page.offset, 10);
        assert!(page.offset + page.items.len() <= page.total);
        let tail = paginate(&items, 8, 5);
        assert_eq!(tail.items, vec![8, 9]);
    }

    #[test]
    fn cursor_navigation() {
        let cursor = PageCursor::new(25, 25, 60);
        assert_eq!(cursor.page_number(), 2);
        assert_eq!(cursor.page_count(), 3);
        assert_eq!(cursor.next_offset(), Some(50));
        assert_eq!(cursor.prev_offset(), Some(0));
        assert_eq!(PageCursor::new(50, 25, 60).next_offset(), None);
        assert_eq!(PageCursor::new(0, 25, 0).page_count(), 1);
        assert_eq!(cursor.range_label(25), "26-50 of 60");
        assert_eq!(PageCursor::new(0, 0, 3).limit, 1);
    }
}
