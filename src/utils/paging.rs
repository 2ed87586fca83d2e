#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Slices `[page*page_size, page*page_size + page_size)` out of an already
/// filtered list. Out-of-range pages are empty.
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> Page<T> {
    let total = items.len();
    let start = (page as usize).saturating_mul(page_size as usize);
    let items = if start >= total {
        Vec::new()
    } else {
        items
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect()
    };
    Page { items, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_requested_window_and_full_total() {
        let page = paginate((0..25).collect::<Vec<_>>(), 1, 10);
        assert_eq!(page.items, (10..20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
    }

    #[test]
    fn last_page_is_short() {
        let page = paginate((0..25).collect::<Vec<_>>(), 2, 10);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn past_the_end_is_empty_not_an_error() {
        let page = paginate((0..5).collect::<Vec<_>>(), 7, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);

        let huge = paginate(vec![1, 2, 3], u32::MAX, u32::MAX);
        assert!(huge.items.is_empty());
    }
}
