use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    DatabaseId, Error,
    flow_type::get_all_types,
    forms::{SelectOption, hx_form, name_input, non_field_errors, select_input},
    validation::{FieldErrors, Name, parse_required_id},
};

/// The fields submitted by the category create and edit forms.
///
/// Values are kept as the raw strings so a rejected submission can be shown
/// back to the user as entered.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_id: String,
}

impl CategoryForm {
    /// Check the name and parse the type ID, collecting every field error.
    pub fn validate(&self) -> Result<(Name, DatabaseId), FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = Name::new(&self.name)
            .map_err(|error| errors.add("name", error.to_string()))
            .ok();
        let type_id = parse_required_id(&self.type_id)
            .map_err(|message| errors.add("type", message))
            .ok();

        match (name, type_id) {
            (Some(name), Some(type_id)) => Ok((name, type_id)),
            _ => Err(errors),
        }
    }
}

/// Every type as a select option.
pub fn type_options(connection: &Connection) -> Result<Vec<SelectOption>, Error> {
    Ok(get_all_types(connection)?
        .into_iter()
        .map(|flow_type| SelectOption {
            id: flow_type.id,
            label: flow_type.name.to_string(),
        })
        .collect())
}

pub fn category_form_view(
    action: &str,
    submit_text: &str,
    form: &CategoryForm,
    type_options: &[SelectOption],
    errors: &FieldErrors,
) -> Markup {
    let fields = html! {
        (non_field_errors(errors))
        (name_input("Category Name", &form.name, errors))
        (select_input("type", "Type", type_options, &form.type_id, true, errors))
    };

    hx_form(action, submit_text, &fields)
}
