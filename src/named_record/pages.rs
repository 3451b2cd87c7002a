//! List, create, edit and delete pages for statuses and types.
//!
//! The handlers are generic over [NamedRecord] and routed once per kind, e.g.
//! `get_records_page::<Status>`.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, DatabaseId, Error, endpoints,
    forms::{NameForm, delete_confirmation_page, form_page, hx_form, name_input},
    html::{TABLE_CELL_STYLE, TABLE_ROW_STYLE, edit_delete_action_links, list_page, table_view},
    notice::{Notice, NoticeAction, redirect_with_notice, take_notice},
    validation::{FieldErrors, Name},
};

use super::{NamedRecord, create_record, get_all_records, get_record, update_record};

/// The state needed for the status and type pages.
#[derive(Debug, Clone)]
pub struct NamedRecordState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NamedRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn lock_connection(state: &NamedRecordState) -> Result<MutexGuard<'_, Connection>, Error> {
    state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// Render the list of every record of one kind, ordered by name.
pub async fn get_records_page<R: NamedRecord>(
    State(state): State<NamedRecordState>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = lock_connection(&state)?;

    let records = get_all_records::<R>(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve {}: {error}", R::PLURAL_TITLE);
    })?;

    let (jar, notice) = take_notice(jar);

    Ok((jar, records_view(&records, notice)).into_response())
}

fn records_view<R: NamedRecord>(records: &[R], notice: Option<Notice>) -> Markup {
    let rows = html! {
        @for record in records {
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (record.name()) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &endpoints::format_endpoint(R::EDIT_VIEW, record.id()),
                            &endpoints::format_endpoint(R::DELETE_VIEW, record.id()),
                        ))
                    }
                }
            }
        }
    };
    let empty_message = format!("No {} created yet.", R::PLURAL_TITLE.to_lowercase());

    list_page(
        R::PLURAL_TITLE,
        R::LIST_VIEW,
        R::NEW_VIEW,
        &format!("Create {}", R::TITLE),
        notice,
        &table_view(&["Name", "Actions"], &rows, &empty_message),
    )
}

pub async fn get_new_record_page<R: NamedRecord>() -> Response {
    let form = record_form_view::<R>(R::NEW_VIEW, "Create", "", &FieldErrors::new());

    form_page(&format!("Create {}", R::TITLE), R::NEW_VIEW, &form).into_response()
}

/// Handle the creation form and redirect to the list page on success.
pub async fn create_record_endpoint<R: NamedRecord>(
    State(state): State<NamedRecordState>,
    jar: CookieJar,
    Form(form): Form<NameForm>,
) -> Response {
    let result = Name::new(&form.name).and_then(|name| {
        let connection = lock_connection(&state)?;

        create_record::<R>(name, &connection)
    });

    match result {
        Ok(_) => redirect_with_notice(
            jar,
            R::LIST_VIEW,
            Notice::new(R::RESOURCE, NoticeAction::Created),
        ),
        Err(error) => match error.into_field_errors() {
            Ok(errors) => {
                record_form_view::<R>(R::NEW_VIEW, "Create", &form.name, &errors).into_response()
            }
            Err(error) => {
                tracing::error!(
                    "An unexpected error occurred while creating a {}: {error}",
                    R::RESOURCE
                );
                error.into_alert_response()
            }
        },
    }
}

pub async fn get_edit_record_page<R: NamedRecord>(
    Path(id): Path<DatabaseId>,
    State(state): State<NamedRecordState>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state)?;

    let record = get_record::<R>(id, &connection)?;
    let edit_endpoint = endpoints::format_endpoint(R::EDIT_VIEW, id);
    let form = record_form_view::<R>(
        &edit_endpoint,
        "Update",
        record.name().as_ref(),
        &FieldErrors::new(),
    );

    Ok(form_page(&format!("Edit {}", R::TITLE), &edit_endpoint, &form).into_response())
}

/// Handle the edit form and redirect to the list page on success.
pub async fn update_record_endpoint<R: NamedRecord>(
    Path(id): Path<DatabaseId>,
    State(state): State<NamedRecordState>,
    jar: CookieJar,
    Form(form): Form<NameForm>,
) -> Response {
    let result = Name::new(&form.name).and_then(|name| {
        let connection = lock_connection(&state)?;

        update_record::<R>(id, name, &connection)
    });

    match result {
        Ok(_) => redirect_with_notice(
            jar,
            R::LIST_VIEW,
            Notice::new(R::RESOURCE, NoticeAction::Updated),
        ),
        Err(error) => match error.into_field_errors() {
            Ok(errors) => {
                let edit_endpoint = endpoints::format_endpoint(R::EDIT_VIEW, id);
                record_form_view::<R>(&edit_endpoint, "Update", &form.name, &errors)
                    .into_response()
            }
            Err(error) => {
                tracing::error!("Could not update {} {id}: {error}", R::RESOURCE);
                error.into_alert_response()
            }
        },
    }
}

fn record_form_view<R: NamedRecord>(
    action: &str,
    verb: &str,
    name: &str,
    errors: &FieldErrors,
) -> Markup {
    hx_form(
        action,
        &format!("{verb} {}", R::TITLE),
        &name_input(&format!("{} Name", R::TITLE), name, errors),
    )
}

/// Render the page asking the user to confirm the deletion.
pub async fn get_delete_record_page<R: NamedRecord>(
    Path(id): Path<DatabaseId>,
    State(state): State<NamedRecordState>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state)?;

    let record = get_record::<R>(id, &connection)?;
    let warning = R::delete_warning(id, &connection)?;
    let delete_url = endpoints::format_endpoint(R::DELETE_VIEW, id);

    Ok(delete_confirmation_page(
        &format!("Delete {}", R::TITLE),
        &delete_url,
        R::LIST_VIEW,
        record.name().as_ref(),
        warning.as_deref(),
    )
    .into_response())
}

pub async fn delete_record_endpoint<R: NamedRecord>(
    Path(id): Path<DatabaseId>,
    State(state): State<NamedRecordState>,
    jar: CookieJar,
) -> Response {
    let connection = match lock_connection(&state) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    match R::delete(id, &connection) {
        Ok(()) => redirect_with_notice(
            jar,
            R::LIST_VIEW,
            Notice::new(R::RESOURCE, NoticeAction::Deleted),
        ),
        Err(error @ (Error::ProtectedDelete { .. } | Error::DeleteMissing(_))) => {
            tracing::warn!("Could not delete {} {id}: {error}", R::RESOURCE);
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting {} {id}: {error}",
                R::RESOURCE
            );
            error.into_alert_response()
        }
    }
}
