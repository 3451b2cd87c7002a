//! Application router configuration for the pages, lookups and API.

use axum::{Router, response::Redirect, routing::get};
use tower_http::services::ServeDir;

use crate::{
    AppState, api,
    cash_flow::{
        create_cash_flow_endpoint, delete_cash_flow_endpoint, get_cash_flows_page,
        get_delete_cash_flow_page, get_edit_cash_flow_page, get_new_cash_flow_page,
        update_cash_flow_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_delete_category_page, get_edit_category_page, get_new_category_page,
        update_category_endpoint,
    },
    endpoints,
    error_page::get_404_not_found,
    flow_type::FlowType,
    lookup::{get_category_options, get_subcategory_options},
    named_record::{
        create_record_endpoint, delete_record_endpoint, get_delete_record_page,
        get_edit_record_page, get_new_record_page, get_records_page, update_record_endpoint,
    },
    status::Status,
    subcategory::{
        create_subcategory_endpoint, delete_subcategory_endpoint, get_delete_subcategory_page,
        get_edit_subcategory_page, get_new_subcategory_page, get_subcategories_page,
        update_subcategory_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Forms are submitted with HTMX as POST requests to the URL of the page that
/// shows them.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::CASH_FLOWS_VIEW, get(get_cash_flows_page))
        .route(
            endpoints::NEW_CASH_FLOW_VIEW,
            get(get_new_cash_flow_page).post(create_cash_flow_endpoint),
        )
        .route(
            endpoints::EDIT_CASH_FLOW_VIEW,
            get(get_edit_cash_flow_page).post(update_cash_flow_endpoint),
        )
        .route(
            endpoints::DELETE_CASH_FLOW_VIEW,
            get(get_delete_cash_flow_page).post(delete_cash_flow_endpoint),
        )
        .route(endpoints::STATUSES_VIEW, get(get_records_page::<Status>))
        .route(
            endpoints::NEW_STATUS_VIEW,
            get(get_new_record_page::<Status>).post(create_record_endpoint::<Status>),
        )
        .route(
            endpoints::EDIT_STATUS_VIEW,
            get(get_edit_record_page::<Status>).post(update_record_endpoint::<Status>),
        )
        .route(
            endpoints::DELETE_STATUS_VIEW,
            get(get_delete_record_page::<Status>).post(delete_record_endpoint::<Status>),
        )
        .route(endpoints::TYPES_VIEW, get(get_records_page::<FlowType>))
        .route(
            endpoints::NEW_TYPE_VIEW,
            get(get_new_record_page::<FlowType>).post(create_record_endpoint::<FlowType>),
        )
        .route(
            endpoints::EDIT_TYPE_VIEW,
            get(get_edit_record_page::<FlowType>).post(update_record_endpoint::<FlowType>),
        )
        .route(
            endpoints::DELETE_TYPE_VIEW,
            get(get_delete_record_page::<FlowType>).post(delete_record_endpoint::<FlowType>),
        )
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(
            endpoints::NEW_CATEGORY_VIEW,
            get(get_new_category_page).post(create_category_endpoint),
        )
        .route(
            endpoints::EDIT_CATEGORY_VIEW,
            get(get_edit_category_page).post(update_category_endpoint),
        )
        .route(
            endpoints::DELETE_CATEGORY_VIEW,
            get(get_delete_category_page).post(delete_category_endpoint),
        )
        .route(endpoints::SUBCATEGORIES_VIEW, get(get_subcategories_page))
        .route(
            endpoints::NEW_SUBCATEGORY_VIEW,
            get(get_new_subcategory_page).post(create_subcategory_endpoint),
        )
        .route(
            endpoints::EDIT_SUBCATEGORY_VIEW,
            get(get_edit_subcategory_page).post(update_subcategory_endpoint),
        )
        .route(
            endpoints::DELETE_SUBCATEGORY_VIEW,
            get(get_delete_subcategory_page).post(delete_subcategory_endpoint),
        );

    let lookup_routes = Router::new()
        .route(endpoints::CATEGORIES_LOOKUP, get(get_category_options))
        .route(endpoints::SUBCATEGORIES_LOOKUP, get(get_subcategory_options));

    page_routes
        .merge(lookup_routes)
        .merge(api::api_routes())
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the cash flow list.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::CASH_FLOWS_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_cash_flows() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::CASH_FLOWS_VIEW);
    }
}
