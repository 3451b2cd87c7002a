use rusqlite::Connection;
use time::macros::date;

use crate::{
    Error,
    cash_flow::{Amount, CashFlow, NewCashFlow, create_cash_flow},
    category::{Category, create_category},
    db::initialize,
    flow_type::FlowType,
    named_record::create_record,
    status::Status,
    subcategory::{Subcategory, create_subcategory},
    validation::Name,
};

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");
    connection
}

pub(crate) fn create_status(name: Name, connection: &Connection) -> Result<Status, Error> {
    create_record(name, connection)
}

pub(crate) fn create_type(name: Name, connection: &Connection) -> Result<FlowType, Error> {
    create_record(name, connection)
}

/// One row of each table, with the cash flow record referring to the others.
pub(crate) struct CashFlowFixture {
    pub status: Status,
    pub flow_type: FlowType,
    pub category: Category,
    pub subcategory: Subcategory,
    pub cash_flow: CashFlow,
}

/// Insert the status "Business", the type "Expense", the category "Food", the
/// subcategory "Groceries" and a 12.34 cash flow record on 2024-01-10 using them.
pub(crate) fn insert_cash_flow_fixture(connection: &Connection) -> CashFlowFixture {
    let status = create_status(Name::new_unchecked("Business"), connection).unwrap();
    let flow_type = create_type(Name::new_unchecked("Expense"), connection).unwrap();
    let category = create_category(Name::new_unchecked("Food"), flow_type.id, connection).unwrap();
    let subcategory =
        create_subcategory(Name::new_unchecked("Groceries"), category.id, connection).unwrap();
    let cash_flow = create_cash_flow(
        NewCashFlow {
            date_created: date!(2024 - 01 - 10),
            status_id: status.id,
            type_id: flow_type.id,
            category_id: category.id,
            subcategory_id: subcategory.id,
            amount: Amount::from_cents(1234),
            comment: Some("Weekly shop".to_owned()),
        },
        connection,
    )
    .unwrap();

    CashFlowFixture {
        status,
        flow_type,
        category,
        subcategory,
        cash_flow,
    }
}
