//! Database operations for subcategories.

use rusqlite::{Connection, Row};

use crate::{
    DatabaseId, Error,
    category::{category_display_name, get_category},
    db::map_unique_violation,
    query::{ListQuery, OrderingField},
    resource::Resource,
    validation::{Name, map_invalid_choice},
};

/// The finest grained classification of a cash flow, e.g. "Groceries" in the
/// "Food" category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub id: DatabaseId,
    pub name: Name,
    pub category_id: DatabaseId,
    pub category_name: String,
    /// The name of the type the parent category belongs to.
    pub type_name: String,
}

impl Subcategory {
    /// The display name of the parent category, e.g. "Food (Expense)".
    pub fn category_display_name(&self) -> String {
        category_display_name(&self.category_name, &self.type_name)
    }

    /// The name shown in selectors, e.g. "Groceries (Food (Expense))".
    pub fn display_name(&self) -> String {
        subcategory_display_name(self.name.as_ref(), &self.category_name, &self.type_name)
    }
}

/// Format a subcategory name with its category's display name.
pub(crate) fn subcategory_display_name(name: &str, category_name: &str, type_name: &str) -> String {
    format!("{name} ({})", category_display_name(category_name, type_name))
}

const SELECT_COLUMNS: &str =
    "subcategory.id, subcategory.name, subcategory.category_id, category.name, flow_type.name";
const FROM_TABLES: &str = "subcategory
    INNER JOIN category ON subcategory.category_id = category.id
    INNER JOIN flow_type ON category.type_id = flow_type.id";

const SUBCATEGORY_ORDERING: &[OrderingField] = &[
    OrderingField {
        name: "name",
        column: "subcategory.name",
    },
    OrderingField {
        name: "category__name",
        column: "category.name",
    },
];

/// Create a subcategory in the category `category_id`.
///
/// # Errors
/// Returns a validation error on the `category` field if the category does not
/// exist, or [Error::Duplicate] if the category already has a subcategory with
/// this name.
pub fn create_subcategory(
    name: Name,
    category_id: DatabaseId,
    connection: &Connection,
) -> Result<Subcategory, Error> {
    get_category(category_id, connection).map_err(map_invalid_choice("category"))?;

    connection
        .execute(
            "INSERT INTO subcategory (name, category_id) VALUES (?1, ?2);",
            (name.as_ref(), category_id),
        )
        .map_err(map_unique_violation(Resource::Subcategory))?;

    get_subcategory(connection.last_insert_rowid(), connection)
}

pub fn get_subcategory(
    subcategory_id: DatabaseId,
    connection: &Connection,
) -> Result<Subcategory, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM {FROM_TABLES} WHERE subcategory.id = :id;"
        ))?
        .query_row(&[(":id", &subcategory_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all subcategories ordered by name.
pub fn get_all_subcategories(connection: &Connection) -> Result<Vec<Subcategory>, Error> {
    ListQuery::new(SELECT_COLUMNS, FROM_TABLES)
        .order_by("subcategory.name ASC, subcategory.id ASC")
        .fetch(connection, map_row)
}

/// Retrieve the subcategories of a category ordered by name.
pub fn get_subcategories_by_category(
    category_id: DatabaseId,
    connection: &Connection,
) -> Result<Vec<Subcategory>, Error> {
    ListQuery::new(SELECT_COLUMNS, FROM_TABLES)
        .filter_id("subcategory.category_id", Some(category_id))
        .order_by("subcategory.name ASC, subcategory.id ASC")
        .fetch(connection, map_row)
}

/// Search subcategories for the API.
///
/// Filters by the parent category and by the type of the parent category.
pub fn query_subcategories(
    category_id: Option<DatabaseId>,
    category_type_id: Option<DatabaseId>,
    search_terms: &[String],
    ordering: Option<&str>,
    connection: &Connection,
) -> Result<Vec<Subcategory>, Error> {
    ListQuery::new(SELECT_COLUMNS, FROM_TABLES)
        .filter_id("subcategory.category_id", category_id)
        .filter_id("category.type_id", category_type_id)
        .search(&["subcategory.name"], search_terms)
        .order(
            ordering,
            SUBCATEGORY_ORDERING,
            "subcategory.name ASC",
            "subcategory.id ASC",
        )
        .fetch(connection, map_row)
}

/// Change the name and category of a subcategory.
///
/// # Errors
/// Returns a validation error on the `category` field if the category does not
/// exist, [Error::UpdateMissing] if the subcategory doesn't exist, or
/// [Error::Duplicate] if the category already has another subcategory with
/// this name.
pub fn update_subcategory(
    subcategory_id: DatabaseId,
    name: Name,
    category_id: DatabaseId,
    connection: &Connection,
) -> Result<Subcategory, Error> {
    get_category(category_id, connection).map_err(map_invalid_choice("category"))?;

    let rows_affected = connection
        .execute(
            "UPDATE subcategory SET name = ?1, category_id = ?2 WHERE id = ?3",
            (name.as_ref(), category_id, subcategory_id),
        )
        .map_err(map_unique_violation(Resource::Subcategory))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing(Resource::Subcategory));
    }

    get_subcategory(subcategory_id, connection)
}

/// Delete a subcategory.
///
/// # Errors
/// Returns [Error::ProtectedDelete] if any cash flow record uses the
/// subcategory, or [Error::DeleteMissing] if it doesn't exist.
pub fn delete_subcategory(subcategory_id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    let count: u32 = transaction.query_row(
        "SELECT COUNT(*) FROM cash_flow WHERE subcategory_id = ?1",
        [subcategory_id],
        |row| row.get(0),
    )?;

    if count > 0 {
        return Err(Error::ProtectedDelete {
            resource: Resource::Subcategory,
            count,
        });
    }

    let rows_affected =
        transaction.execute("DELETE FROM subcategory WHERE id = ?1", [subcategory_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing(Resource::Subcategory));
    }

    transaction.commit()?;

    Ok(())
}

pub fn create_subcategory_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS subcategory (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            UNIQUE(name, category_id),
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_subcategory_category ON subcategory(category_id);",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Subcategory, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Subcategory {
        id: row.get(0)?,
        name: Name::new_unchecked(&raw_name),
        category_id: row.get(2)?,
        category_name: row.get(3)?,
        type_name: row.get(4)?,
    })
}
