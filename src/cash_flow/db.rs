//! Defines the cash flow record model and its database queries.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::Date;

use crate::{
    DatabaseId, Error,
    cash_flow::Amount,
    category::{category_display_name, get_category},
    flow_type::get_type,
    query::{ListQuery, OrderingField},
    resource::Resource,
    status::get_status,
    subcategory::{get_subcategory, subcategory_display_name},
    validation::{
        CATEGORY_TYPE_MISMATCH_MESSAGE, FieldErrors, INVALID_CHOICE_MESSAGE,
        SUBCATEGORY_CATEGORY_MISMATCH_MESSAGE,
    },
};

// ============================================================================
// MODELS
// ============================================================================

/// A single movement of money, classified by status, type, category and
/// subcategory.
///
/// The `*_name` fields hold the display names of the referenced rows, e.g.
/// "Food (Expense)" for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlow {
    pub id: DatabaseId,
    pub date_created: Date,
    #[serde(rename = "status")]
    pub status_id: DatabaseId,
    pub status_name: String,
    #[serde(rename = "type")]
    pub type_id: DatabaseId,
    pub type_name: String,
    #[serde(rename = "category")]
    pub category_id: DatabaseId,
    pub category_name: String,
    #[serde(rename = "subcategory")]
    pub subcategory_id: DatabaseId,
    pub subcategory_name: String,
    pub amount: Amount,
    pub comment: Option<String>,
}

/// The writable fields of a cash flow record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCashFlow {
    pub date_created: Date,
    pub status_id: DatabaseId,
    pub type_id: DatabaseId,
    pub category_id: DatabaseId,
    pub subcategory_id: DatabaseId,
    pub amount: Amount,
    /// An optional note, `None` rather than an empty string when left blank.
    pub comment: Option<String>,
}

impl From<&CashFlow> for NewCashFlow {
    fn from(cash_flow: &CashFlow) -> Self {
        Self {
            date_created: cash_flow.date_created,
            status_id: cash_flow.status_id,
            type_id: cash_flow.type_id,
            category_id: cash_flow.category_id,
            subcategory_id: cash_flow.subcategory_id,
            amount: cash_flow.amount,
            comment: cash_flow.comment.clone(),
        }
    }
}

/// Filters for listing cash flow records. `None` means "don't filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CashFlowFilter {
    pub status_id: Option<DatabaseId>,
    pub type_id: Option<DatabaseId>,
    pub category_id: Option<DatabaseId>,
    pub subcategory_id: Option<DatabaseId>,
    /// Only records created on exactly this date.
    pub date_created: Option<Date>,
    /// Only records created on or after this date.
    pub start_date: Option<Date>,
    /// Only records created on or before this date.
    pub end_date: Option<Date>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "cash_flow.id, cash_flow.date_created,
    cash_flow.status_id, status.name,
    cash_flow.type_id, flow_type.name,
    cash_flow.category_id, category.name, category_type.name,
    cash_flow.subcategory_id, subcategory.name, subcategory_category.name, subcategory_type.name,
    cash_flow.amount, cash_flow.comment";

// Display names come from the category's and subcategory's own parents, which
// can differ from the record's type and category if a parent was edited later.
const FROM_TABLES: &str = "cash_flow
    INNER JOIN status ON cash_flow.status_id = status.id
    INNER JOIN flow_type ON cash_flow.type_id = flow_type.id
    INNER JOIN category ON cash_flow.category_id = category.id
    INNER JOIN flow_type AS category_type ON category.type_id = category_type.id
    INNER JOIN subcategory ON cash_flow.subcategory_id = subcategory.id
    INNER JOIN category AS subcategory_category
        ON subcategory.category_id = subcategory_category.id
    INNER JOIN flow_type AS subcategory_type
        ON subcategory_category.type_id = subcategory_type.id";

const DEFAULT_ORDERING: &str = "cash_flow.date_created DESC";
const TIE_BREAKER: &str = "cash_flow.id DESC";

const CASH_FLOW_ORDERING: &[OrderingField] = &[
    OrderingField {
        name: "date_created",
        column: "cash_flow.date_created",
    },
    OrderingField {
        name: "status__name",
        column: "status.name",
    },
    OrderingField {
        name: "type__name",
        column: "flow_type.name",
    },
    OrderingField {
        name: "category__name",
        column: "category.name",
    },
    OrderingField {
        name: "subcategory__name",
        column: "subcategory.name",
    },
    OrderingField {
        name: "amount",
        column: "cash_flow.amount",
    },
];

/// Check that every reference in `cash_flow` exists and that the category and
/// subcategory belong to the chosen type and category.
///
/// # Errors
/// Returns [Error::Validation] with an error for each offending field.
fn validate_references(cash_flow: &NewCashFlow, connection: &Connection) -> Result<(), Error> {
    let mut errors = FieldErrors::new();

    match get_status(cash_flow.status_id, connection) {
        Ok(_) => {}
        Err(Error::NotFound) => errors.add("status", INVALID_CHOICE_MESSAGE),
        Err(error) => return Err(error),
    }

    match get_type(cash_flow.type_id, connection) {
        Ok(_) => {}
        Err(Error::NotFound) => errors.add("type", INVALID_CHOICE_MESSAGE),
        Err(error) => return Err(error),
    }

    match get_category(cash_flow.category_id, connection) {
        Ok(category) if category.type_id != cash_flow.type_id && !errors.contains("type") => {
            errors.add("category", CATEGORY_TYPE_MISMATCH_MESSAGE)
        }
        Ok(_) => {}
        Err(Error::NotFound) => errors.add("category", INVALID_CHOICE_MESSAGE),
        Err(error) => return Err(error),
    }

    match get_subcategory(cash_flow.subcategory_id, connection) {
        Ok(subcategory)
            if subcategory.category_id != cash_flow.category_id
                && !errors.contains("category") =>
        {
            errors.add("subcategory", SUBCATEGORY_CATEGORY_MISMATCH_MESSAGE)
        }
        Ok(_) => {}
        Err(Error::NotFound) => errors.add("subcategory", INVALID_CHOICE_MESSAGE),
        Err(error) => return Err(error),
    }

    errors.into_result(()).map_err(Error::from)
}

/// Create a cash flow record.
///
/// # Errors
/// Returns [Error::Validation] if a referenced row does not exist, the
/// category is not of the chosen type or the subcategory is not in the chosen
/// category.
pub fn create_cash_flow(cash_flow: NewCashFlow, connection: &Connection) -> Result<CashFlow, Error> {
    validate_references(&cash_flow, connection)?;

    connection.execute(
        "INSERT INTO cash_flow
            (date_created, status_id, type_id, category_id, subcategory_id, amount, comment)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            cash_flow.date_created,
            cash_flow.status_id,
            cash_flow.type_id,
            cash_flow.category_id,
            cash_flow.subcategory_id,
            cash_flow.amount,
            cash_flow.comment,
        ),
    )?;

    get_cash_flow(connection.last_insert_rowid(), connection)
}

/// Retrieve a cash flow record by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a cash flow record.
pub fn get_cash_flow(id: DatabaseId, connection: &Connection) -> Result<CashFlow, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM {FROM_TABLES} WHERE cash_flow.id = :id"
        ))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(Error::from)
}

/// Replace every writable field of the cash flow record `id`.
///
/// # Errors
/// Returns [Error::UpdateMissing] if the record doesn't exist, or the same
/// validation errors as [create_cash_flow].
pub fn update_cash_flow(
    id: DatabaseId,
    cash_flow: NewCashFlow,
    connection: &Connection,
) -> Result<CashFlow, Error> {
    validate_references(&cash_flow, connection)?;

    let rows_affected = connection.execute(
        "UPDATE cash_flow SET
            date_created = ?1, status_id = ?2, type_id = ?3, category_id = ?4,
            subcategory_id = ?5, amount = ?6, comment = ?7
        WHERE id = ?8",
        (
            cash_flow.date_created,
            cash_flow.status_id,
            cash_flow.type_id,
            cash_flow.category_id,
            cash_flow.subcategory_id,
            cash_flow.amount,
            cash_flow.comment,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing(Resource::CashFlow));
    }

    get_cash_flow(id, connection)
}

/// Delete the cash flow record `id`.
///
/// # Errors
/// Returns [Error::DeleteMissing] if the record doesn't exist.
pub fn delete_cash_flow(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM cash_flow WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing(Resource::CashFlow));
    }

    Ok(())
}

fn filtered_query(filter: &CashFlowFilter) -> ListQuery {
    ListQuery::new(SELECT_COLUMNS, FROM_TABLES)
        .filter_id("cash_flow.status_id", filter.status_id)
        .filter_id("cash_flow.type_id", filter.type_id)
        .filter_id("cash_flow.category_id", filter.category_id)
        .filter_id("cash_flow.subcategory_id", filter.subcategory_id)
        .filter_date("cash_flow.date_created", "=", filter.date_created)
        .filter_date("cash_flow.date_created", ">=", filter.start_date)
        .filter_date("cash_flow.date_created", "<=", filter.end_date)
}

/// Count the cash flow records matching `filter`.
pub fn count_cash_flows(filter: &CashFlowFilter, connection: &Connection) -> Result<u64, Error> {
    filtered_query(filter).count(connection)
}

/// Get one page of the cash flow records matching `filter`, newest first.
pub fn get_cash_flow_page(
    filter: &CashFlowFilter,
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<CashFlow>, Error> {
    filtered_query(filter)
        .order_by(&format!("{DEFAULT_ORDERING}, {TIE_BREAKER}"))
        .paginate(limit, offset)
        .fetch(connection, map_row)
}

/// Search cash flow records for the API.
///
/// Every one of `search_terms` must occur in the comment. `ordering` is a
/// comma separated list of `date_created`, `status__name`, `type__name`,
/// `category__name`, `subcategory__name` and `amount`, each optionally
/// prefixed with `-`.
pub fn query_cash_flows(
    filter: &CashFlowFilter,
    search_terms: &[String],
    ordering: Option<&str>,
    connection: &Connection,
) -> Result<Vec<CashFlow>, Error> {
    filtered_query(filter)
        .search(&["cash_flow.comment"], search_terms)
        .order(ordering, CASH_FLOW_ORDERING, DEFAULT_ORDERING, TIE_BREAKER)
        .fetch(connection, map_row)
}

/// Create the cash flow table in the database.
///
/// Amounts are stored as whole cents.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_cash_flow_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS cash_flow (
            id INTEGER PRIMARY KEY,
            date_created TEXT NOT NULL,
            status_id INTEGER NOT NULL,
            type_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            subcategory_id INTEGER NOT NULL,
            amount INTEGER NOT NULL CHECK (amount > 0),
            comment TEXT,
            FOREIGN KEY(status_id) REFERENCES status(id) ON DELETE RESTRICT,
            FOREIGN KEY(type_id) REFERENCES flow_type(id) ON DELETE RESTRICT,
            FOREIGN KEY(category_id) REFERENCES category(id) ON DELETE RESTRICT,
            FOREIGN KEY(subcategory_id) REFERENCES subcategory(id) ON DELETE RESTRICT
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_cash_flow_date ON cash_flow(date_created);",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<CashFlow, rusqlite::Error> {
    let category_name: String = row.get(7)?;
    let category_type_name: String = row.get(8)?;
    let subcategory_name: String = row.get(10)?;
    let subcategory_category_name: String = row.get(11)?;
    let subcategory_type_name: String = row.get(12)?;

    Ok(CashFlow {
        id: row.get(0)?,
        date_created: row.get(1)?,
        status_id: row.get(2)?,
        status_name: row.get(3)?,
        type_id: row.get(4)?,
        type_name: row.get(5)?,
        category_id: row.get(6)?,
        category_name: category_display_name(&category_name, &category_type_name),
        subcategory_id: row.get(9)?,
        subcategory_name: subcategory_display_name(
            &subcategory_name,
            &subcategory_category_name,
            &subcategory_type_name,
        ),
        amount: row.get(13)?,
        comment: row.get(14)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
