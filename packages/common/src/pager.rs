/// One-based page cursor over a list whose contents are replaced wholesale
/// (search results, live listings). Replacing the item count resets the
/// cursor to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    item_count: usize,
    current: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        assert!(page_size > 0);
        Self {
            page_size,
            item_count: 0,
            current: 1,
        }
    }

    /// Replace the backing item count and reset to page 1
    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.current = 1;
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        if self.item_count == 0 {
            1
        } else {
            self.item_count.div_ceil(self.page_size)
        }
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.page_count()
    }

    pub fn prev(&mut self) {
        if self.has_prev() {
            self.current -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.current += 1;
        }
    }

    /// Index range of the current page, clamped to the item count
    pub fn page_range(&self) -> std::ops::Range<usize> {
        let start = (self.current - 1) * self.page_size;
        let end = (start + self.page_size).min(self.item_count);
        start.min(end)..end
    }

    /// The current page's slice of `items`. `items` must be the list the
    /// last `set_item_count` described.
    pub fn page_of<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_is_a_single_page() {
        let pager = Pager::new(6);
        assert_eq!(pager.page_count(), 1);
        assert!(!pager.has_prev());
        assert!(!pager.has_next());
        assert_eq!(pager.page_range(), 0..0);
    }

    #[test]
    fn test_navigation_clamps_at_both_ends() {
        let mut pager = Pager::new(2);
        pager.set_item_count(5);
        assert_eq!(pager.page_count(), 3);

        pager.prev();
        assert_eq!(pager.current_page(), 1);

        pager.next();
        pager.next();
        assert_eq!(pager.current_page(), 3);
        assert_eq!(pager.page_range(), 4..5);

        pager.next();
        assert_eq!(pager.current_page(), 3);
    }

    #[test]
    fn test_thirteen_items_across_three_pages_of_six() {
        let mut pager = Pager::new(6);
        pager.set_item_count(13);
        assert_eq!(pager.page_count(), 3);
        assert!(!pager.has_prev()); // page 1

        pager.next();
        pager.next();
        assert_eq!(pager.page_range(), 12..13); // one record on page 3
        assert!(!pager.has_next());
    }

    #[test]
    fn test_replacing_items_resets_to_first_page() {
        let mut pager = Pager::new(6);
        pager.set_item_count(20);
        pager.next();
        assert_eq!(pager.current_page(), 2);

        pager.set_item_count(3);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.page_count(), 1);
    }

    #[test]
    fn test_page_of_returns_the_window() {
        let items: Vec<i32> = (0..7).collect();
        let mut pager = Pager::new(2);
        pager.set_item_count(items.len());
        pager.next();
        assert_eq!(pager.page_of(&items), &[2, 3]);
    }
}
