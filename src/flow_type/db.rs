//! Database operations for cash flow types.

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    DatabaseId, Error, endpoints,
    named_record::{NamedRecord, create_named_table, get_all_records, get_record},
    resource::Resource,
    validation::Name,
};

/// The direction of a cash flow, e.g. "Income" or "Expense".
///
/// Each type owns a set of categories which are deleted along with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowType {
    pub id: DatabaseId,
    pub name: Name,
}

impl NamedRecord for FlowType {
    const RESOURCE: Resource = Resource::Type;
    const TABLE: &'static str = "flow_type";
    const TITLE: &'static str = "Type";
    const PLURAL_TITLE: &'static str = "Types";

    const LIST_VIEW: &'static str = endpoints::TYPES_VIEW;
    const NEW_VIEW: &'static str = endpoints::NEW_TYPE_VIEW;
    const EDIT_VIEW: &'static str = endpoints::EDIT_TYPE_VIEW;
    const DELETE_VIEW: &'static str = endpoints::DELETE_TYPE_VIEW;

    fn new(id: DatabaseId, name: Name) -> Self {
        Self { id, name }
    }

    fn id(&self) -> DatabaseId {
        self.id
    }

    fn name(&self) -> &Name {
        &self.name
    }

    fn delete(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
        delete_type(id, connection)
    }

    fn delete_warning(id: DatabaseId, connection: &Connection) -> Result<Option<String>, Error> {
        let (category_count, subcategory_count) = count_type_descendants(id, connection)?;

        Ok((category_count > 0).then(|| {
            format!(
                "This will also delete {category_count} categories and \
                {subcategory_count} subcategories."
            )
        }))
    }
}

pub fn get_type(type_id: DatabaseId, connection: &Connection) -> Result<FlowType, Error> {
    get_record(type_id, connection)
}

pub fn get_all_types(connection: &Connection) -> Result<Vec<FlowType>, Error> {
    get_all_records(connection)
}

/// Delete a type together with its categories and their subcategories.
///
/// The deletion is refused if any cash flow record refers to the type or to
/// one of the categories or subcategories that would be deleted with it.
///
/// # Errors
/// Returns [Error::ProtectedDelete] if the type or one of its descendants is
/// in use, or [Error::DeleteMissing] if the type doesn't exist. Nothing is
/// deleted on error.
pub fn delete_type(type_id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    let count: u32 = transaction.query_row(
        "SELECT COUNT(*) FROM cash_flow
        WHERE type_id = ?1
            OR category_id IN (SELECT id FROM category WHERE type_id = ?1)
            OR subcategory_id IN (
                SELECT subcategory.id FROM subcategory
                INNER JOIN category ON subcategory.category_id = category.id
                WHERE category.type_id = ?1
            )",
        [type_id],
        |row| row.get(0),
    )?;

    if count > 0 {
        return Err(Error::ProtectedDelete {
            resource: Resource::Type,
            count,
        });
    }

    transaction.execute(
        "DELETE FROM subcategory
        WHERE category_id IN (SELECT id FROM category WHERE type_id = ?1)",
        [type_id],
    )?;
    transaction.execute("DELETE FROM category WHERE type_id = ?1", [type_id])?;
    let rows_affected = transaction.execute("DELETE FROM flow_type WHERE id = ?1", [type_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing(Resource::Type));
    }

    transaction.commit()?;

    Ok(())
}

/// Count the categories and subcategories that would be deleted along with the type.
fn count_type_descendants(
    type_id: DatabaseId,
    connection: &Connection,
) -> Result<(u32, u32), Error> {
    connection
        .query_row(
            "SELECT
                (SELECT COUNT(*) FROM category WHERE type_id = ?1),
                (SELECT COUNT(*) FROM subcategory
                    INNER JOIN category ON subcategory.category_id = category.id
                    WHERE category.type_id = ?1)",
            [type_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(Error::from)
}

pub fn create_type_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_named_table::<FlowType>(connection)
}
