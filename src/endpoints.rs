//! The page, lookup and API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/status/{status_id}/update/', use [format_endpoint].

/// The root route which redirects to the cash flow list.
pub const ROOT: &str = "/";

/// The page listing cash flow records with filters and pagination.
pub const CASH_FLOWS_VIEW: &str = "/cashflow/";
/// The page for creating a cash flow record.
pub const NEW_CASH_FLOW_VIEW: &str = "/cashflow/create/";
/// The page for editing a cash flow record.
pub const EDIT_CASH_FLOW_VIEW: &str = "/cashflow/{cash_flow_id}/update/";
/// The page for confirming the deletion of a cash flow record.
pub const DELETE_CASH_FLOW_VIEW: &str = "/cashflow/{cash_flow_id}/delete/";

/// The page listing statuses.
pub const STATUSES_VIEW: &str = "/status/";
/// The page for creating a status.
pub const NEW_STATUS_VIEW: &str = "/status/create/";
/// The page for editing a status.
pub const EDIT_STATUS_VIEW: &str = "/status/{status_id}/update/";
/// The page for confirming the deletion of a status.
pub const DELETE_STATUS_VIEW: &str = "/status/{status_id}/delete/";

/// The page listing types.
pub const TYPES_VIEW: &str = "/type/";
/// The page for creating a type.
pub const NEW_TYPE_VIEW: &str = "/type/create/";
/// The page for editing a type.
pub const EDIT_TYPE_VIEW: &str = "/type/{type_id}/update/";
/// The page for confirming the deletion of a type.
pub const DELETE_TYPE_VIEW: &str = "/type/{type_id}/delete/";

/// The page listing categories.
pub const CATEGORIES_VIEW: &str = "/category/";
/// The page for creating a category.
pub const NEW_CATEGORY_VIEW: &str = "/category/create/";
/// The page for editing a category.
pub const EDIT_CATEGORY_VIEW: &str = "/category/{category_id}/update/";
/// The page for confirming the deletion of a category.
pub const DELETE_CATEGORY_VIEW: &str = "/category/{category_id}/delete/";

/// The page listing subcategories.
pub const SUBCATEGORIES_VIEW: &str = "/subcategory/";
/// The page for creating a subcategory.
pub const NEW_SUBCATEGORY_VIEW: &str = "/subcategory/create/";
/// The page for editing a subcategory.
pub const EDIT_SUBCATEGORY_VIEW: &str = "/subcategory/{subcategory_id}/update/";
/// The page for confirming the deletion of a subcategory.
pub const DELETE_SUBCATEGORY_VIEW: &str = "/subcategory/{subcategory_id}/delete/";

/// The categories of a type, used by the dependent dropdowns.
pub const CATEGORIES_LOOKUP: &str = "/ajax/categories/";
/// The subcategories of a category, used by the dependent dropdowns.
pub const SUBCATEGORIES_LOOKUP: &str = "/ajax/subcategories/";

/// The route for static files.
pub const STATIC: &str = "/static";
/// The script that refills the category and subcategory selects.
pub const DEPENDENT_DROPDOWNS_SCRIPT: &str = "/static/dependent_dropdowns.js";

/// The API collection of statuses.
pub const STATUSES_API: &str = "/api/statuses/";
/// A single status in the API.
pub const STATUS_API: &str = "/api/statuses/{status_id}/";
/// The API collection of types.
pub const TYPES_API: &str = "/api/types/";
/// A single type in the API.
pub const TYPE_API: &str = "/api/types/{type_id}/";
/// The API collection of categories.
pub const CATEGORIES_API: &str = "/api/categories/";
/// A single category in the API.
pub const CATEGORY_API: &str = "/api/categories/{category_id}/";
/// The API collection of subcategories.
pub const SUBCATEGORIES_API: &str = "/api/subcategories/";
/// A single subcategory in the API.
pub const SUBCATEGORY_API: &str = "/api/subcategories/{subcategory_id}/";
/// The API collection of cash flow records.
pub const CASH_FLOWS_API: &str = "/api/cashflows/";
/// A single cash flow record in the API.
pub const CASH_FLOW_API: &str = "/api/cashflows/{cash_flow_id}/";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/status/{status_id}/update/', '{status_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
