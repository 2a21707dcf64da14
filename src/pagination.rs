//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of rows to display per page.
    pub default_page_size: u64,
    /// The maximum number of numbered page links to show at once.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_pages: 5,
        }
    }
}

/// One page of a list of `total_items` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The 1-based page number, always within `1..=total_pages().max(1)`.
    pub number: u64,
    /// The maximum number of items on a page.
    pub size: u64,
    /// The number of items across all pages.
    pub total_items: u64,
}

impl Page {
    /// Create a page, clamping `requested` into the valid range of pages.
    ///
    /// A `size` of zero is treated as one so that the page count is always defined.
    pub fn new(requested: u64, size: u64, total_items: u64) -> Self {
        let size = size.max(1);
        let last_page = total_items.div_ceil(size).max(1);

        Self {
            number: requested.clamp(1, last_page),
            size,
            total_items,
        }
    }

    /// The number of pages, zero when there are no items.
    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(self.size)
    }

    /// The index of the first item on this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }

    /// The 1-based positions of the first and last item on this page.
    pub fn item_range(&self) -> (u64, u64) {
        if self.total_items == 0 {
            return (0, 0);
        }

        let start = self.offset() + 1;
        let end = (self.offset() + self.size).min(self.total_items);

        (start, end)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// Build the controls for navigating between pages.
///
/// At most `max_pages` numbered links are shown, centred on the current page
/// where possible. The first and last page stay reachable via an ellipsis.
pub fn create_pagination_indicators(page: &Page, max_pages: u64) -> Vec<PaginationIndicator> {
    let page_count = page.total_pages();
    let curr_page = page.number;
    let max_pages = max_pages.max(1);

    if page_count <= 1 {
        return Vec::new();
    }

    let window = max_pages.min(page_count);
    let first = curr_page
        .saturating_sub(window / 2)
        .clamp(1, page_count - window + 1);
    let last = first + window - 1;

    let mut indicators = Vec::new();

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(curr_page - 1));
    }

    if first > 1 {
        indicators.push(PaginationIndicator::Page(1));
        if first > 2 {
            indicators.push(PaginationIndicator::Ellipsis);
        }
    }

    indicators.extend((first..=last).map(|number| {
        if number == curr_page {
            PaginationIndicator::CurrPage(number)
        } else {
            PaginationIndicator::Page(number)
        }
    }));

    if last < page_count {
        if last + 1 < page_count {
            indicators.push(PaginationIndicator::Ellipsis);
        }
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}


#[cfg(test)]
mod indicator_tests {
    use super::{Page, PaginationIndicator, create_pagination_indicators};

    #[test]
    fn single_page_has_no_controls() {
        let got = create_pagination_indicators(&Page::new(1, 10, 7), 5);

        assert!(got.is_empty());
    }

    #[test]
    fn shows_all_pages_when_they_fit() {
        let want = [
            PaginationIndicator::BackButton(1),
            PaginationIndicator::Page(1),
            PaginationIndicator::CurrPage(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::NextButton(3),
        ];

        let got = create_pagination_indicators(&Page::new(2, 10, 25), 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn first_page_shows_trailing_ellipsis() {
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(&Page::new(1, 10, 100), 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn middle_page_shows_both_ellipses() {
        let want = [
            PaginationIndicator::BackButton(4),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::CurrPage(5),
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(6),
        ];

        let got = create_pagination_indicators(&Page::new(5, 10, 100), 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn last_page_shows_leading_ellipsis() {
        let want = [
            PaginationIndicator::BackButton(9),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Page(8),
            PaginationIndicator::Page(9),
            PaginationIndicator::CurrPage(10),
        ];

        let got = create_pagination_indicators(&Page::new(10, 10, 100), 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn adjacent_first_page_has_no_ellipsis() {
        let want = [
            PaginationIndicator::BackButton(3),
            PaginationIndicator::Page(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::CurrPage(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Page(6),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(5),
        ];

        let got = create_pagination_indicators(&Page::new(4, 10, 100), 5);

        assert_eq!(want, got.as_slice());
    }
}
