//! Categories group cash flows within a type, e.g. "Food" within "Expense".

mod create;
mod db;
mod delete;
mod edit;
mod form;
mod list;

pub use create::{create_category_endpoint, get_new_category_page};
pub(crate) use db::category_display_name;
pub use db::{
    Category, count_subcategories, create_category, create_category_table,
    delete_category, get_all_categories, get_categories_by_type, get_category, query_categories,
    update_category,
};
pub use delete::{delete_category_endpoint, get_delete_category_page};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use list::get_categories_page;
