//! This file defines the navigation bar shown at the top of every page.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            { (self.title) }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// A link is marked as active if `active_endpoint` is the link's list page
    /// or one of the pages nested under it, e.g. "/status/create/" activates
    /// the "Statuses" link.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let link = |url: &'static str, title: &'static str| Link {
            url,
            title,
            is_current: active_endpoint.starts_with(url),
        };

        let links = vec![
            link(endpoints::CASH_FLOWS_VIEW, "Cash Flow"),
            link(endpoints::STATUSES_VIEW, "Statuses"),
            link(endpoints::TYPES_VIEW, "Types"),
            link(endpoints::CATEGORIES_VIEW, "Categories"),
            link(endpoints::SUBCATEGORIES_VIEW, "Subcategories"),
        ];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Money Flow"
                        }
                    }

                    div class="w-full lg:block lg:w-auto"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4
                            border border-gray-100 rounded bg-gray-50
                            lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                            lg:border-0 lg:bg-white dark:bg-gray-800
                            lg:dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for link in self.links {
                                li { (link.into_html()) }
                            }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use crate::{endpoints, navigation::NavBar};

    #[test]
    fn set_active_endpoint() {
        let cases = [
            (endpoints::CASH_FLOWS_VIEW, Some(endpoints::CASH_FLOWS_VIEW)),
            (endpoints::NEW_CASH_FLOW_VIEW, Some(endpoints::CASH_FLOWS_VIEW)),
            ("/status/3/update/", Some(endpoints::STATUSES_VIEW)),
            (endpoints::TYPES_VIEW, Some(endpoints::TYPES_VIEW)),
            (endpoints::NEW_CATEGORY_VIEW, Some(endpoints::CATEGORIES_VIEW)),
            ("/subcategory/1/delete/", Some(endpoints::SUBCATEGORIES_VIEW)),
            (endpoints::ROOT, None),
            (endpoints::CASH_FLOWS_API, None),
        ];

        for (endpoint, want_active) in cases {
            let nav_bar = NavBar::new(endpoint);

            let active = nav_bar
                .links
                .iter()
                .filter(|link| link.is_current)
                .map(|link| link.url)
                .collect::<Vec<_>>();

            assert_eq!(
                active,
                want_active.into_iter().collect::<Vec<_>>(),
                "wrong active link for {endpoint}"
            );
        }
    }
}
