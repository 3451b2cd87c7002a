//! Database set up shared by every table in the app.

use rusqlite::{Connection, Transaction, TransactionBehavior, functions::FunctionFlags};

use crate::{
    Error, cash_flow::create_cash_flow_table, category::create_category_table,
    flow_type::create_type_table, resource::Resource, status::create_status_table,
    subcategory::create_subcategory_table,
};

/// The name of the SQL function that lowercases text for Unicode aware,
/// case-insensitive search.
///
/// SQLite's built-in `lower` only folds ASCII characters.
pub const CASEFOLD_FUNCTION: &str = "casefold";

/// Create the app tables and register the custom SQL functions.
///
/// Foreign key enforcement is switched on for `connection`, so this should be
/// called once for each new connection before it is used.
///
/// # Errors
/// Returns an error if a table could not be created or a pragma/function could
/// not be set.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;
    register_functions(connection)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_status_table(&transaction)?;
    create_type_table(&transaction)?;
    create_category_table(&transaction)?;
    create_subcategory_table(&transaction)?;
    create_cash_flow_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Convert a UNIQUE constraint failure into [Error::Duplicate] for `resource`.
///
/// Other errors are converted as usual.
pub fn map_unique_violation(resource: Resource) -> impl Fn(rusqlite::Error) -> Error {
    move |error| match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 2067 => {
            Error::Duplicate(resource)
        }
        error => error.into(),
    }
}

fn register_functions(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.create_scalar_function(
        CASEFOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            let text: Option<String> = context.get(0)?;

            Ok(text.map(|text| text.to_lowercase()))
        },
    )
}
