//! Cash flow records: dated amounts classified by status, type, category and subcategory.

mod amount;
mod create;
mod db;
mod delete;
mod edit;
pub(crate) mod form;
mod list;

pub use amount::Amount;
pub use create::{create_cash_flow_endpoint, get_new_cash_flow_page};
pub use db::{
    CashFlow, CashFlowFilter, NewCashFlow, count_cash_flows, create_cash_flow,
    create_cash_flow_table, delete_cash_flow, get_cash_flow, get_cash_flow_page,
    query_cash_flows, update_cash_flow,
};
pub use delete::{delete_cash_flow_endpoint, get_delete_cash_flow_page};
pub use edit::{get_edit_cash_flow_page, update_cash_flow_endpoint};
pub use form::CashFlowForm;
pub use list::get_cash_flows_page;
