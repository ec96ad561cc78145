//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
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

/// A one-based page number and page size, used to slice an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// The page number, starting from 1.
    pub page: u64,
    /// The maximum number of items on a page.
    pub per_page: u64,
}

impl PageWindow {
    /// Build a window from raw query string values.
    ///
    /// A value that is missing, not a whole number, or zero is replaced by the
    /// matching default in `config`.
    pub fn from_query(page: Option<&str>, per_page: Option<&str>, config: &PaginationConfig) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(config.default_page),
            per_page: parse_positive(per_page).unwrap_or(config.default_page_size),
        }
    }

    /// The number of items that come before this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// The number of pages needed to show `total` items.
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page.max(1))
    }
}

fn parse_positive(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|&value| value > 0)
}

/// One element of the page navigation shown under a table.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A link to another page.
    Page(u64),
    /// The page being shown.
    CurrPage(u64),
    /// A gap in the page numbers.
    Ellipsis,
    /// A link to the following page.
    NextButton(u64),
    /// A link to the preceding page.
    BackButton(u64),
}

/// Lay out the page links for `curr_page` out of `page_count` pages.
///
/// At most `max_pages` consecutive page numbers are shown around the current
/// page. The first and last page are always reachable, with an ellipsis
/// standing in for any pages skipped in between.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    if page_count == 0 {
        return Vec::new();
    }

    let max_pages = max_pages.max(1);
    let first = curr_page
        .saturating_sub(max_pages / 2)
        .max(1)
        .min(page_count.saturating_sub(max_pages) + 1);
    let last = first.saturating_add(max_pages - 1).min(page_count);

    let mut indicators = Vec::new();

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(
            (curr_page - 1).min(page_count),
        ));
    }

    if first > 1 {
        indicators.push(PaginationIndicator::Page(1));
        if first > 2 {
            indicators.push(PaginationIndicator::Ellipsis);
        }
    }

    indicators.extend((first..=last).map(|page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
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
