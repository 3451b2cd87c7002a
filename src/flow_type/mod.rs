//! Types describe the direction of a cash flow, e.g. "Income" or "Expense".
//!
//! A type is the root of the type, category and subcategory hierarchy. The
//! pages and API handlers are shared with statuses, see [crate::named_record].

mod db;

pub use db::{FlowType, create_type_table, get_all_types, get_type};
