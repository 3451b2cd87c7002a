//! Statuses describe the nature of a cash flow record, e.g. "Business" or "Personal".
//!
//! The pages and API handlers are shared with types, see [crate::named_record].

mod db;

pub use db::{Status, create_status_table, get_all_statuses, get_status};
