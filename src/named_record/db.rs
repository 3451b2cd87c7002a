//! Queries shared by the status and type tables.

use rusqlite::{Connection, Row};

use crate::{
    DatabaseId, Error,
    db::map_unique_violation,
    query::{ListQuery, OrderingField},
    validation::Name,
};

use super::NamedRecord;

const NAME_ORDERING: &[OrderingField] = &[OrderingField {
    name: "name",
    column: "name",
}];

/// Create a record and return it with its generated ID.
///
/// # Errors
/// Returns [Error::Duplicate] if a record of the same kind already has the name.
pub fn create_record<R: NamedRecord>(name: Name, connection: &Connection) -> Result<R, Error> {
    connection
        .execute(
            &format!("INSERT INTO {} (name) VALUES (?1);", R::TABLE),
            (name.as_ref(),),
        )
        .map_err(map_unique_violation(R::RESOURCE))?;

    Ok(R::new(connection.last_insert_rowid(), name))
}

pub fn get_record<R: NamedRecord>(id: DatabaseId, connection: &Connection) -> Result<R, Error> {
    connection
        .prepare(&format!("SELECT id, name FROM {} WHERE id = :id;", R::TABLE))?
        .query_row(&[(":id", &id)], map_row::<R>)
        .map_err(|error| error.into())
}

/// Retrieve all records of one kind ordered alphabetically by name.
pub fn get_all_records<R: NamedRecord>(connection: &Connection) -> Result<Vec<R>, Error> {
    connection
        .prepare(&format!(
            "SELECT id, name FROM {} ORDER BY name ASC, id ASC;",
            R::TABLE
        ))?
        .query_map([], map_row::<R>)?
        .map(|maybe_record| maybe_record.map_err(|error| error.into()))
        .collect()
}

/// Search records for the API.
///
/// Every one of `search_terms` must occur in the name. `ordering` may only
/// name the `name` field.
pub fn query_records<R: NamedRecord>(
    search_terms: &[String],
    ordering: Option<&str>,
    connection: &Connection,
) -> Result<Vec<R>, Error> {
    ListQuery::new("id, name", R::TABLE)
        .search(&["name"], search_terms)
        .order(ordering, NAME_ORDERING, "name ASC", "id ASC")
        .fetch(connection, map_row::<R>)
}

/// Rename a record.
///
/// # Errors
/// Returns [Error::UpdateMissing] if the record doesn't exist, or
/// [Error::Duplicate] if another record of the same kind already has the name.
pub fn update_record<R: NamedRecord>(
    id: DatabaseId,
    new_name: Name,
    connection: &Connection,
) -> Result<R, Error> {
    let rows_affected = connection
        .execute(
            &format!("UPDATE {} SET name = ?1 WHERE id = ?2", R::TABLE),
            (new_name.as_ref(), id),
        )
        .map_err(map_unique_violation(R::RESOURCE))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing(R::RESOURCE));
    }

    Ok(R::new(id, new_name))
}

pub fn create_named_table<R: NamedRecord>(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            )",
            R::TABLE
        ),
        (),
    )?;

    Ok(())
}

fn map_row<R: NamedRecord>(row: &Row) -> Result<R, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;

    Ok(R::new(id, Name::new_unchecked(&raw_name)))
}
