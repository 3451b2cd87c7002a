//! Subcategories are the finest classification of a cash flow within a category.

mod create;
mod db;
mod delete;
mod edit;
mod form;
mod list;

pub use create::{create_subcategory_endpoint, get_new_subcategory_page};
pub(crate) use db::subcategory_display_name;
pub use db::{
    Subcategory, create_subcategory, create_subcategory_table, delete_subcategory,
    get_all_subcategories, get_subcategories_by_category, get_subcategory, query_subcategories,
    update_subcategory,
};
pub use delete::{delete_subcategory_endpoint, get_delete_subcategory_page};
pub use edit::{get_edit_subcategory_page, update_subcategory_endpoint};
pub use list::get_subcategories_page;
