use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    DatabaseId, Error,
    category::get_all_categories,
    forms::{SelectOption, hx_form, name_input, non_field_errors, select_input},
    validation::{FieldErrors, Name, parse_required_id},
};

/// The fields submitted by the subcategory create and edit forms.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SubcategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "category")]
    pub category_id: String,
}

impl SubcategoryForm {
    pub fn validate(&self) -> Result<(Name, DatabaseId), FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = Name::new(&self.name)
            .map_err(|error| errors.add("name", error.to_string()))
            .ok();
        let category_id = parse_required_id(&self.category_id)
            .map_err(|message| errors.add("category", message))
            .ok();

        match (name, category_id) {
            (Some(name), Some(category_id)) => Ok((name, category_id)),
            _ => Err(errors),
        }
    }
}

/// Every category as a select option labelled with its type, e.g. "Food (Expense)".
pub fn category_options(connection: &Connection) -> Result<Vec<SelectOption>, Error> {
    Ok(get_all_categories(connection)?
        .into_iter()
        .map(|category| SelectOption {
            id: category.id,
            label: category.display_name(),
        })
        .collect())
}

pub fn subcategory_form_view(
    action: &str,
    submit_text: &str,
    form: &SubcategoryForm,
    category_options: &[SelectOption],
    errors: &FieldErrors,
) -> Markup {
    let fields = html! {
        (non_field_errors(errors))
        (name_input("Subcategory Name", &form.name, errors))
        (select_input("category", "Category", category_options, &form.category_id, true, errors))
    };

    hx_form(action, submit_text, &fields)
}

#[cfg(test)]
mod tests {
    use crate::{
        category::create_category,
        test_utils::{create_type, get_test_connection},
        validation::Name,
    };

    use super::{SubcategoryForm, category_options};

    #[test]
    fn validate_rejects_malformed_category() {
        let form = SubcategoryForm {
            name: "Groceries".to_owned(),
            category_id: "1.5".to_owned(),
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(errors.get("category"), Some("Select a valid choice."));
    }

    #[test]
    fn category_options_include_type() {
        let connection = get_test_connection();
        let expense = create_type(Name::new_unchecked("Expense"), &connection).unwrap();
        create_category(Name::new_unchecked("Food"), expense.id, &connection).unwrap();

        let options = category_options(&connection).unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, "Food (Expense)");
    }
}
