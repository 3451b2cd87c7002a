use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, html};
use numfmt::{Formatter, Precision};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{navigation::NavBar, notice::Notice};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DANGER_STYLE: &str = "w-full px-4 py-2 bg-red-600 \
    hover:enabled:bg-red-700 dark:bg-red-700 hover:enabled:dark:bg-red-800 \
    text-white rounded";

pub const DELETE_LINK_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_ERROR_STYLE: &str = "mt-1 text-sm text-red-600 dark:text-red-400";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

pub const TABLE_STYLE: &str = "w-full text-sm text-left rtl:text-right \
    text-gray-500 dark:text-gray-400";

// Badge for reference names shown inside tables
pub const BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-blue-800 bg-blue-100 rounded-full \
    dark:bg-blue-900 dark:text-blue-300";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Money Flow" }

                script src="https://cdn.tailwindcss.com" {}
                script
                    src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js"
                    integrity="sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz"
                    crossorigin="anonymous" {}
                script
                    src="https://unpkg.com/htmx-ext-response-targets@2.0.4/response-targets.js"
                    integrity="sha384-T41oglUPvXLGBVyRdZsVRxNWnOOqCynaPubjUVjxhsjFTKrFJGEMm3/0KGmNQ+Pg"
                    crossorigin="anonymous" {}

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptLink(path) => script src=(path) defer {}
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Alert container for swaps from failed HTMX requests
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// The "Edit" and "Delete" links shown in each row of a list page.
///
/// The delete link opens the confirmation page rather than deleting straight away.
pub fn edit_delete_action_links(edit_url: &str, delete_url: &str) -> Markup {
    html! {
        a href=(edit_url) class=(LINK_STYLE) { "Edit" }
        a href=(delete_url) class=(DELETE_LINK_STYLE) { "Delete" }
    }
}

/// The header of a list page: the title and a link to the create page.
pub fn list_header(title: &str, create_url: &str, create_text: &str) -> Markup {
    html! {
        header class="flex justify-between flex-wrap items-end"
        {
            h1 class="text-xl font-bold" { (title) }

            a href=(create_url) class=(LINK_STYLE) { (create_text) }
        }
    }
}

/// A table with a heading for each of `columns`.
///
/// `empty_message` is shown in place of the rows when `rows` is empty.
pub fn table_view(columns: &[&str], rows: &Markup, empty_message: &str) -> Markup {
    html! {
        section class="dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto overflow-x-auto"
        {
            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for column in columns {
                            th scope="col" class=(TABLE_CELL_STYLE) { (column) }
                        }
                    }
                }

                tbody
                {
                    @if rows.0.is_empty() {
                        tr
                        {
                            td
                                colspan=(columns.len())
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                (empty_message)
                            }
                        }
                    } @else {
                        (rows)
                    }
                }
            }
        }
    }
}

/// A full list page with the navigation bar, a header linking to the create
/// page, the pending notice (if any) and `body`.
pub fn list_page(
    title: &str,
    active_endpoint: &str,
    create_url: &str,
    create_text: &str,
    notice: Option<Notice>,
    body: &Markup,
) -> Markup {
    let nav_bar = NavBar::new(active_endpoint).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                @if let Some(notice) = notice {
                    (notice.into_alert().into_html())
                }

                (list_header(title, create_url, create_text))

                (body)
            }
        }
    };

    base(title, &[], &content)
}

/// Format an amount with a thousands separator and exactly two decimal places,
/// e.g. "1,234.50".
pub fn format_amount(amount: Decimal) -> String {
    static WHOLE_FMT: OnceLock<Formatter> = OnceLock::new();

    let whole_fmt = WHOLE_FMT.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap_or_else(|_| Formatter::new())
            .precision(Precision::Decimals(0))
    });

    let amount = amount.round_dp(2);
    let whole = amount.trunc();
    let cents = ((amount - whole) * Decimal::ONE_HUNDRED)
        .abs()
        .to_u32()
        .unwrap_or_default();
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let whole = whole.abs().to_i64().unwrap_or_default();

    // Zero is formatted by numfmt as "0", which is what we want for the whole part.
    format!("{sign}{}.{cents:02}", whole_fmt.fmt_string(whole))
}
