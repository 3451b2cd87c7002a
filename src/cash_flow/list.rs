//! The cash flow listing page with filters and pagination.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    cash_flow::{CashFlow, CashFlowFilter, count_cash_flows, get_cash_flow_page},
    category::get_all_categories,
    endpoints,
    flow_type::get_all_types,
    forms::{SelectOption, select_input},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        TABLE_CELL_STYLE, TABLE_ROW_STYLE, edit_delete_action_links, format_amount, list_page,
        table_view,
    },
    notice::{Notice, take_notice},
    pagination::{PaginationConfig, create_pagination_indicators, pagination_view},
    query::{DATE_FORMAT, parse_optional_date},
    status::get_all_statuses,
    subcategory::get_all_subcategories,
    validation::{FieldErrors, parse_optional_id},
};

/// The state needed for the cash flow listing page.
#[derive(Debug, Clone)]
pub struct CashFlowsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CashFlowsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query string of the cash flow listing page.
///
/// Every value is optional and kept as text: empty or malformed values
/// mean "no filter" rather than a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct CashFlowsQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub type_id: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<String>,
}

impl CashFlowsQuery {
    fn filter(&self) -> CashFlowFilter {
        CashFlowFilter {
            status_id: parse_optional_id(self.status.as_deref()),
            type_id: parse_optional_id(self.type_id.as_deref()),
            category_id: parse_optional_id(self.category.as_deref()),
            subcategory_id: parse_optional_id(self.subcategory.as_deref()),
            start_date: parse_optional_date(self.start_date.as_deref()),
            end_date: parse_optional_date(self.end_date.as_deref()),
            ..Default::default()
        }
    }
}

/// The choices offered by the filter form.
struct FilterOptions {
    statuses: Vec<SelectOption>,
    types: Vec<SelectOption>,
    categories: Vec<SelectOption>,
    subcategories: Vec<SelectOption>,
}

impl FilterOptions {
    fn load(connection: &Connection) -> Result<Self, Error> {
        Ok(Self {
            statuses: get_all_statuses(connection)?
                .into_iter()
                .map(|status| SelectOption {
                    id: status.id,
                    label: status.name.to_string(),
                })
                .collect(),
            types: get_all_types(connection)?
                .into_iter()
                .map(|flow_type| SelectOption {
                    id: flow_type.id,
                    label: flow_type.name.to_string(),
                })
                .collect(),
            categories: get_all_categories(connection)?
                .into_iter()
                .map(|category| SelectOption {
                    id: category.id,
                    label: category.display_name(),
                })
                .collect(),
            subcategories: get_all_subcategories(connection)?
                .into_iter()
                .map(|subcategory| SelectOption {
                    id: subcategory.id,
                    label: subcategory.display_name(),
                })
                .collect(),
        })
    }
}

/// Render a page of cash flow records, newest first.
///
/// Requesting a page past the last page is a 404.
pub async fn get_cash_flows_page(
    State(state): State<CashFlowsPageState>,
    Query(query): Query<CashFlowsQuery>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let config = &state.pagination_config;
    let filter = query.filter();
    let page = config.parse_page(query.page.as_deref());

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let row_count = count_cash_flows(&filter, &connection)
        .inspect_err(|error| tracing::error!("Failed to count cash flow records: {error}"))?;
    let page_count = config.page_count(row_count);

    if page > page_count {
        tracing::debug!("Requested page {page} of {page_count}");
        return Err(Error::NotFound);
    }

    let cash_flows = get_cash_flow_page(
        &filter,
        config.default_page_size,
        config.offset(page),
        &connection,
    )
    .inspect_err(|error| tracing::error!("Failed to retrieve cash flow records: {error}"))?;

    let options = FilterOptions::load(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve filter options: {error}"))?;

    let indicators = create_pagination_indicators(page, page_count, config.max_pages);
    let pagination = pagination_view(&indicators, |page| page_url(&filter, page));

    let (jar, notice) = take_notice(jar);

    Ok((
        jar,
        cash_flows_view(&cash_flows, &query, &options, &pagination, notice),
    )
        .into_response())
}

/// The URL of `page` with the active filters.
fn page_url(filter: &CashFlowFilter, page: u64) -> String {
    let mut params: Vec<(&str, String)> = Vec::new();

    for (key, id) in [
        ("status", filter.status_id),
        ("type", filter.type_id),
        ("category", filter.category_id),
        ("subcategory", filter.subcategory_id),
    ] {
        if let Some(id) = id {
            params.push((key, id.to_string()));
        }
    }

    for (key, date) in [
        ("start_date", filter.start_date),
        ("end_date", filter.end_date),
    ] {
        if let Some(date) = date.and_then(|date| date.format(DATE_FORMAT).ok()) {
            params.push((key, date));
        }
    }

    params.push(("page", page.to_string()));

    match serde_urlencoded::to_string(&params) {
        Ok(query) => format!("{}?{query}", endpoints::CASH_FLOWS_VIEW),
        Err(error) => {
            tracing::error!("Could not encode pagination query {params:?}: {error}");
            format!("{}?page={page}", endpoints::CASH_FLOWS_VIEW)
        }
    }
}

fn filter_form(query: &CashFlowsQuery, options: &FilterOptions) -> Markup {
    let no_errors = FieldErrors::new();
    let selected = |value: &Option<String>| value.clone().unwrap_or_default();

    html! {
        form
            method="get"
            action=(endpoints::CASH_FLOWS_VIEW)
            class="grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-3 items-end"
        {
            (select_input("status", "Status", &options.statuses, &selected(&query.status), false, &no_errors))
            (select_input("type", "Type", &options.types, &selected(&query.type_id), false, &no_errors))
            (select_input(
                "category", "Category", &options.categories, &selected(&query.category), false, &no_errors
            ))
            (select_input(
                "subcategory",
                "Subcategory",
                &options.subcategories,
                &selected(&query.subcategory),
                false,
                &no_errors
            ))

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }

                input
                    id="start_date"
                    type="date"
                    name="start_date"
                    value=(selected(&query.start_date))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }

                input
                    id="end_date"
                    type="date"
                    name="end_date"
                    value=(selected(&query.end_date))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex gap-4 items-center"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }

                a href=(endpoints::CASH_FLOWS_VIEW) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}

fn cash_flows_view(
    cash_flows: &[CashFlow],
    query: &CashFlowsQuery,
    options: &FilterOptions,
    pagination: &Markup,
    notice: Option<Notice>,
) -> Markup {
    let rows = html! {
        @for cash_flow in cash_flows {
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (cash_flow.date_created) }
                td class=(TABLE_CELL_STYLE) { (cash_flow.status_name) }
                td class=(TABLE_CELL_STYLE) { (cash_flow.type_name) }
                td class=(TABLE_CELL_STYLE) { (cash_flow.category_name) }
                td class=(TABLE_CELL_STYLE) { (cash_flow.subcategory_name) }
                td class="px-6 py-4 text-right" { (format_amount(cash_flow.amount.as_decimal())) }
                td class=(TABLE_CELL_STYLE) { (cash_flow.comment.as_deref().unwrap_or_default()) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &endpoints::format_endpoint(endpoints::EDIT_CASH_FLOW_VIEW, cash_flow.id),
                            &endpoints::format_endpoint(endpoints::DELETE_CASH_FLOW_VIEW, cash_flow.id),
                        ))
                    }
                }
            }
        }
    };

    let body = html! {
        (filter_form(query, options))

        (table_view(
            &[
                "Date",
                "Status",
                "Type",
                "Category",
                "Subcategory",
                "Amount",
                "Comment",
                "Actions",
            ],
            &rows,
            "No cash flow records found.",
        ))

        (pagination)
    };

    list_page(
        "Cash Flow",
        endpoints::CASH_FLOWS_VIEW,
        endpoints::NEW_CASH_FLOW_VIEW,
        "Create Record",
        notice,
        &body,
    )
}

#[cfg(test)]
mod cash_flows_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::{HeaderMap, HeaderValue, StatusCode},
    };
    use axum_extra::extract::CookieJar;
    use scraper::{Html, Selector};
    use time::{Date, Month};

    use crate::{
        Error,
        cash_flow::{NewCashFlow, create_cash_flow},
        pagination::PaginationConfig,
        test_utils::{
            CashFlowFixture, assert_valid_html, get_test_connection, insert_cash_flow_fixture,
            parse_html_document,
        },
    };

    use super::{CashFlowsPageState, CashFlowsQuery, get_cash_flows_page, page_url};

    fn get_state() -> (CashFlowsPageState, CashFlowFixture) {
        let connection = get_test_connection();
        let fixture = insert_cash_flow_fixture(&connection);
        let state = CashFlowsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        };

        (state, fixture)
    }

    /// Add records dated `dates` alongside the fixture record.
    fn insert_dated(state: &CashFlowsPageState, fixture: &CashFlowFixture, dates: &[Date]) {
        let connection = state.db_connection.lock().unwrap();

        for &date_created in dates {
            create_cash_flow(
                NewCashFlow {
                    date_created,
                    ..NewCashFlow::from(&fixture.cash_flow)
                },
                &connection,
            )
            .unwrap();
        }
    }

    fn row_dates(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("tbody tr td:first-child").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn lists_records_newest_first() {
        let (state, fixture) = get_state();
        insert_dated(
            &state,
            &fixture,
            &[Date::from_calendar_date(2024, Month::March, 1).unwrap()],
        );

        let response = get_cash_flows_page(
            State(state),
            Query(CashFlowsQuery::default()),
            CookieJar::new(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(row_dates(&html), ["2024-03-01", "2024-01-10"]);
        let amount = html
            .select(&Selector::parse("tbody tr td:nth-child(6)").unwrap())
            .next()
            .unwrap();
        assert_eq!(amount.text().collect::<String>().trim(), "12.34");
    }

    #[tokio::test]
    async fn filters_by_inclusive_date_range() {
        let (state, fixture) = get_state();
        insert_dated(
            &state,
            &fixture,
            &[
                Date::from_calendar_date(2023, Month::December, 31).unwrap(),
                Date::from_calendar_date(2024, Month::January, 1).unwrap(),
                Date::from_calendar_date(2024, Month::January, 31).unwrap(),
                Date::from_calendar_date(2024, Month::February, 1).unwrap(),
            ],
        );
        let query = CashFlowsQuery {
            start_date: Some("2024-01-01".to_owned()),
            end_date: Some("2024-01-31".to_owned()),
            ..Default::default()
        };

        let response = get_cash_flows_page(State(state), Query(query), CookieJar::new())
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            row_dates(&html),
            ["2024-01-31", "2024-01-10", "2024-01-01"]
        );
        let start = html
            .select(&Selector::parse("input[name=start_date]").unwrap())
            .next()
            .unwrap();
        assert_eq!(start.value().attr("value"), Some("2024-01-01"));
    }

    #[tokio::test]
    async fn malformed_filters_are_ignored() {
        let (state, _) = get_state();
        let query = CashFlowsQuery {
            status: Some("abc".to_owned()),
            start_date: Some("01/01/2024".to_owned()),
            page: Some("first".to_owned()),
            ..Default::default()
        };

        let response = get_cash_flows_page(State(state), Query(query), CookieJar::new())
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(row_dates(&html), ["2024-01-10"]);
    }

    #[tokio::test]
    async fn second_page_holds_remaining_rows() {
        let (state, fixture) = get_state();
        let dates = (1..=14)
            .map(|day| Date::from_calendar_date(2024, Month::February, day).unwrap())
            .collect::<Vec<_>>();
        insert_dated(&state, &fixture, &dates);
        let query = CashFlowsQuery {
            page: Some("2".to_owned()),
            ..Default::default()
        };

        let response = get_cash_flows_page(State(state), Query(query), CookieJar::new())
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            row_dates(&html),
            [
                "2024-02-04",
                "2024-02-03",
                "2024-02-02",
                "2024-02-01",
                "2024-01-10"
            ]
        );
        let current = html
            .select(&Selector::parse("nav.pagination span[aria-current=page]").unwrap())
            .next()
            .unwrap();
        assert_eq!(current.text().collect::<String>().trim(), "2");
    }

    #[tokio::test]
    async fn page_past_the_end_is_not_found() {
        let (state, _) = get_state();
        let query = CashFlowsQuery {
            page: Some("2".to_owned()),
            ..Default::default()
        };

        let result = get_cash_flows_page(State(state), Query(query), CookieJar::new()).await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn empty_list_has_one_page() {
        let state = CashFlowsPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            pagination_config: PaginationConfig::default(),
        };
        let query = CashFlowsQuery {
            page: Some("1".to_owned()),
            ..Default::default()
        };

        let response = get_cash_flows_page(State(state), Query(query), CookieJar::new())
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let cell = html
            .select(&Selector::parse("tbody td").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            cell.text().collect::<String>().trim(),
            "No cash flow records found."
        );
    }

    #[tokio::test]
    async fn pagination_links_keep_filters() {
        let (state, fixture) = get_state();
        let dates = (1..=14)
            .map(|day| Date::from_calendar_date(2024, Month::January, day).unwrap())
            .collect::<Vec<_>>();
        insert_dated(&state, &fixture, &dates);
        let query = CashFlowsQuery {
            status: Some(fixture.status.id.to_string()),
            start_date: Some("2024-01-01".to_owned()),
            ..Default::default()
        };

        let response = get_cash_flows_page(State(state), Query(query), CookieJar::new())
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let next = html
            .select(&Selector::parse("nav.pagination a[role=button]").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            next.value().attr("href"),
            Some(
                format!(
                    "/cashflow/?status={}&start_date=2024-01-01&page=2",
                    fixture.status.id
                )
                .as_str()
            )
        );
    }

    #[test]
    fn page_url_without_filters_only_has_page() {
        assert_eq!(page_url(&Default::default(), 3), "/cashflow/?page=3");
    }

    #[tokio::test]
    async fn shows_and_clears_notice() {
        let (state, _) = get_state();
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("notice=cashflow:created"));
        let jar = CookieJar::from_headers(&headers);

        let response = get_cash_flows_page(State(state), Query(CashFlowsQuery::default()), jar)
            .await
            .unwrap();

        let set_cookie = response
            .headers()
            .get("set-cookie")
            .expect("notice cookie should be cleared")
            .to_str()
            .unwrap()
            .to_owned();
        assert!(set_cookie.starts_with("notice=;"), "got {set_cookie}");

        let html = parse_html_document(response).await;
        let alert = html
            .select(&Selector::parse("[data-alert=success]").unwrap())
            .next()
            .expect("missing notice alert")
            .text()
            .collect::<String>();
        assert!(
            alert.contains("Cash flow record created successfully."),
            "got {alert}"
        );
    }
}
