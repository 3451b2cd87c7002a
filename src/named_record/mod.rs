//! Records identified by a unique name alone: statuses and types.
//!
//! Both kinds share their queries, pages and form handling. Each one implements
//! [NamedRecord] and exposes the generic handlers under its own routes.

use rusqlite::Connection;

use crate::{DatabaseId, Error, resource::Resource, validation::Name};

mod db;
mod pages;

pub use db::{
    create_named_table, create_record, get_all_records, get_record, query_records, update_record,
};
pub use pages::{
    NamedRecordState, create_record_endpoint, delete_record_endpoint, get_delete_record_page,
    get_edit_record_page, get_new_record_page, get_records_page, update_record_endpoint,
};

/// A row made up of an ID and a name that no other row of the same kind has.
pub trait NamedRecord: Sized {
    /// The kind of record, used in error messages and notices.
    const RESOURCE: Resource;
    /// The table the records are stored in.
    const TABLE: &'static str;
    /// Used in page titles and buttons, e.g. "Create Status".
    const TITLE: &'static str;
    const PLURAL_TITLE: &'static str;

    const LIST_VIEW: &'static str;
    const NEW_VIEW: &'static str;
    const EDIT_VIEW: &'static str;
    const DELETE_VIEW: &'static str;

    fn new(id: DatabaseId, name: Name) -> Self;

    fn id(&self) -> DatabaseId;

    fn name(&self) -> &Name;

    /// Delete the record with `id`.
    ///
    /// # Errors
    /// Returns [Error::ProtectedDelete] if a cash flow record depends on the
    /// record, or [Error::DeleteMissing] if it doesn't exist.
    fn delete(id: DatabaseId, connection: &Connection) -> Result<(), Error>;

    /// A warning for the delete confirmation page, e.g. about rows deleted
    /// along with the record.
    fn delete_warning(_id: DatabaseId, _connection: &Connection) -> Result<Option<String>, Error> {
        Ok(None)
    }
}
