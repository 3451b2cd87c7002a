//! This modules defines the common functionality for paging data.

use maud::{Markup, html};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum rows to display per page.
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

impl PaginationConfig {
    /// Parse the requested page number, falling back to the default page when
    /// it is missing, malformed or zero.
    pub fn parse_page(&self, raw: Option<&str>) -> u64 {
        raw.map(str::trim)
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|&page| page > 0)
            .unwrap_or(self.default_page)
    }

    /// The number of pages needed to show `row_count` rows.
    ///
    /// An empty list still has one (empty) page.
    pub fn page_count(&self, row_count: u64) -> u64 {
        let page_size = self.default_page_size.max(1);

        row_count.div_ceil(page_size).max(1)
    }

    /// The number of rows to skip to get to `page`.
    pub fn offset(&self, page: u64) -> u64 {
        page.saturating_sub(1) * self.default_page_size
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

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// Render the page links, using `page_url` to build the link for each page.
///
/// Nothing is rendered when there is only a single page.
pub fn pagination_view(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    let link_style = "block px-3 py-2 rounded-sm text-blue-600 hover:underline";

    html! {
        @if indicators.len() > 1 {
            nav class="pagination flex justify-center"
            {
                ul class="pagination flex gap-2 p-0 m-0 items-center"
                {
                    @for indicator in indicators {
                        li {
                            @match indicator {
                                PaginationIndicator::CurrPage(page) => {
                                    span
                                        aria-current="page"
                                        class="block px-3 py-2 rounded-sm font-bold text-black dark:text-white"
                                    { (page) }
                                }
                                PaginationIndicator::Page(page) => {
                                    a href=(page_url(*page)) class=(link_style) { (page) }
                                }
                                PaginationIndicator::Ellipsis => {
                                    span class="font-bold" { "..." }
                                }
                                PaginationIndicator::BackButton(page) => {
                                    a href=(page_url(*page)) role="button" class=(link_style) { "Back" }
                                }
                                PaginationIndicator::NextButton(page) => {
                                    a href=(page_url(*page)) role="button" class=(link_style) { "Next" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pagination::{PaginationIndicator, create_pagination_indicators};

    #[test]
    fn shows_all_pages() {
        let max_pages = 5;
        let page_count = 5;
        let curr_page = 1;
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn single_page_has_no_buttons() {
        let got = create_pagination_indicators(1, 1, 5);

        assert_eq!([PaginationIndicator::CurrPage(1)], got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_left() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 1;
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

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_right() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 10;
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

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn pagination_indicator_shows_page_subset_in_center() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 5;
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

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }
}

#[cfg(test)]
mod config_tests {
    use super::PaginationConfig;

    #[test]
    fn parse_page_falls_back_to_first_page() {
        let config = PaginationConfig::default();

        assert_eq!(config.parse_page(None), 1);
        assert_eq!(config.parse_page(Some("")), 1);
        assert_eq!(config.parse_page(Some("abc")), 1);
        assert_eq!(config.parse_page(Some("0")), 1);
        assert_eq!(config.parse_page(Some("-3")), 1);
        assert_eq!(config.parse_page(Some("2")), 2);
    }

    #[test]
    fn page_count_rounds_up() {
        let config = PaginationConfig::default();

        assert_eq!(config.page_count(0), 1);
        assert_eq!(config.page_count(10), 1);
        assert_eq!(config.page_count(11), 2);
        assert_eq!(config.page_count(15), 2);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let config = PaginationConfig::default();

        assert_eq!(config.offset(1), 0);
        assert_eq!(config.offset(2), 10);
    }
}
