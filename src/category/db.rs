//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    DatabaseId, Error,
    db::map_unique_violation,
    flow_type::get_type,
    query::{ListQuery, OrderingField},
    resource::Resource,
    validation::{Name, map_invalid_choice},
};

/// A category of cash flow, e.g. "Food" for the "Expense" type.
///
/// Names are unique within a type, so two types may each have a category with
/// the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: DatabaseId,
    pub name: Name,
    pub type_id: DatabaseId,
    /// The name of the parent type.
    pub type_name: String,
}

impl Category {
    /// The name shown in selectors, e.g. "Food (Expense)".
    pub fn display_name(&self) -> String {
        category_display_name(self.name.as_ref(), &self.type_name)
    }
}

pub(crate) fn category_display_name(name: &str, type_name: &str) -> String {
    format!("{name} ({type_name})")
}

const SELECT_COLUMNS: &str = "category.id, category.name, category.type_id, flow_type.name";
const FROM_TABLES: &str = "category INNER JOIN flow_type ON category.type_id = flow_type.id";

/// The fields API clients may order categories by.
const CATEGORY_ORDERING: &[OrderingField] = &[
    OrderingField {
        name: "name",
        column: "category.name",
    },
    OrderingField {
        name: "type__name",
        column: "flow_type.name",
    },
];

/// Create a category under the type `type_id`.
///
/// # Errors
/// Returns a validation error on the `type` field if the type does not exist,
/// or [Error::Duplicate] if the type already has a category with this name.
pub fn create_category(
    name: Name,
    type_id: DatabaseId,
    connection: &Connection,
) -> Result<Category, Error> {
    get_type(type_id, connection).map_err(map_invalid_choice("type"))?;

    connection
        .execute(
            "INSERT INTO category (name, type_id) VALUES (?1, ?2);",
            (name.as_ref(), type_id),
        )
        .map_err(map_unique_violation(Resource::Category))?;

    get_category(connection.last_insert_rowid(), connection)
}

pub fn get_category(category_id: DatabaseId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM {FROM_TABLES} WHERE category.id = :id;"
        ))?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    ListQuery::new(SELECT_COLUMNS, FROM_TABLES)
        .order_by("category.name ASC, category.id ASC")
        .fetch(connection, map_row)
}

/// Retrieve the categories of a type ordered by name.
///
/// An unknown type simply has no categories.
pub fn get_categories_by_type(
    type_id: DatabaseId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    ListQuery::new(SELECT_COLUMNS, FROM_TABLES)
        .filter_id("category.type_id", Some(type_id))
        .order_by("category.name ASC, category.id ASC")
        .fetch(connection, map_row)
}

/// Search categories for the API.
///
/// `search_terms` must all occur in the category name. `ordering` is a comma
/// separated list of fields from [CATEGORY_ORDERING].
pub fn query_categories(
    type_id: Option<DatabaseId>,
    search_terms: &[String],
    ordering: Option<&str>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    ListQuery::new(SELECT_COLUMNS, FROM_TABLES)
        .filter_id("category.type_id", type_id)
        .search(&["category.name"], search_terms)
        .order(
            ordering,
            CATEGORY_ORDERING,
            "category.name ASC",
            "category.id ASC",
        )
        .fetch(connection, map_row)
}

/// Change the name and type of a category.
///
/// # Errors
/// Returns a validation error on the `type` field if the type does not exist,
/// [Error::UpdateMissing] if the category doesn't exist, or
/// [Error::Duplicate] if the type already has another category with this name.
pub fn update_category(
    category_id: DatabaseId,
    name: Name,
    type_id: DatabaseId,
    connection: &Connection,
) -> Result<Category, Error> {
    get_type(type_id, connection).map_err(map_invalid_choice("type"))?;

    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1, type_id = ?2 WHERE id = ?3",
            (name.as_ref(), type_id, category_id),
        )
        .map_err(map_unique_violation(Resource::Category))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing(Resource::Category));
    }

    get_category(category_id, connection)
}

/// Delete a category together with its subcategories.
///
/// # Errors
/// Returns [Error::ProtectedDelete] if any cash flow record refers to the
/// category or one of its subcategories, or [Error::DeleteMissing] if the
/// category doesn't exist. Nothing is deleted on error.
pub fn delete_category(category_id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    let count: u32 = transaction.query_row(
        "SELECT COUNT(*) FROM cash_flow
        WHERE category_id = ?1
            OR subcategory_id IN (SELECT id FROM subcategory WHERE category_id = ?1)",
        [category_id],
        |row| row.get(0),
    )?;

    if count > 0 {
        return Err(Error::ProtectedDelete {
            resource: Resource::Category,
            count,
        });
    }

    transaction.execute(
        "DELETE FROM subcategory WHERE category_id = ?1",
        [category_id],
    )?;
    let rows_affected =
        transaction.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing(Resource::Category));
    }

    transaction.commit()?;

    Ok(())
}

/// Count the subcategories that would be deleted along with the category.
pub fn count_subcategories(category_id: DatabaseId, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(*) FROM subcategory WHERE category_id = ?1",
            [category_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type_id INTEGER NOT NULL,
            UNIQUE(name, type_id),
            FOREIGN KEY(type_id) REFERENCES flow_type(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_category_type ON category(type_id);",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id: row.get(0)?,
        name: Name::new_unchecked(&raw_name),
        type_id: row.get(2)?,
        type_name: row.get(3)?,
    })
}
