//! Database operations for statuses.

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    DatabaseId, Error, endpoints,
    named_record::{NamedRecord, create_named_table, get_all_records, get_record},
    resource::Resource,
    validation::Name,
};

/// The status of a cash flow record, e.g. "Business", "Personal" or "Tax".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub id: DatabaseId,
    pub name: Name,
}

impl NamedRecord for Status {
    const RESOURCE: Resource = Resource::Status;
    const TABLE: &'static str = "status";
    const TITLE: &'static str = "Status";
    const PLURAL_TITLE: &'static str = "Statuses";

    const LIST_VIEW: &'static str = endpoints::STATUSES_VIEW;
    const NEW_VIEW: &'static str = endpoints::NEW_STATUS_VIEW;
    const EDIT_VIEW: &'static str = endpoints::EDIT_STATUS_VIEW;
    const DELETE_VIEW: &'static str = endpoints::DELETE_STATUS_VIEW;

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
        delete_status(id, connection)
    }
}

pub fn get_status(status_id: DatabaseId, connection: &Connection) -> Result<Status, Error> {
    get_record(status_id, connection)
}

pub fn get_all_statuses(connection: &Connection) -> Result<Vec<Status>, Error> {
    get_all_records(connection)
}

/// Delete a status by ID.
///
/// # Errors
/// Returns [Error::ProtectedDelete] if any cash flow record uses the status,
/// or [Error::DeleteMissing] if the status doesn't exist.
pub fn delete_status(status_id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    let count: u32 = transaction.query_row(
        "SELECT COUNT(*) FROM cash_flow WHERE status_id = ?1",
        [status_id],
        |row| row.get(0),
    )?;

    if count > 0 {
        return Err(Error::ProtectedDelete {
            resource: Resource::Status,
            count,
        });
    }

    let rows_affected = transaction.execute("DELETE FROM status WHERE id = ?1", [status_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing(Resource::Status));
    }

    transaction.commit()?;

    Ok(())
}

/// Initialize the status table.
pub fn create_status_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_named_table::<Status>(connection)
}
