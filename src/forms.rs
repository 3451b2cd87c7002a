//! Form widgets and page layouts shared by the create, edit and delete pages.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    DatabaseId,
    html::{
        BUTTON_DANGER_STYLE, BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_ERROR_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, base,
    },
    navigation::NavBar,
    validation::{FieldErrors, NAME_MAX_LENGTH, NON_FIELD_ERRORS},
};

/// Form data for entities that only have a name (statuses and types).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
}

/// An option in a `<select>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: DatabaseId,
    pub label: String,
}

/// Render the error messages for `field`, if any.
pub fn field_error(errors: &FieldErrors, field: &str) -> Markup {
    html! {
        @if let Some(message) = errors.get(field) {
            p class=(FORM_ERROR_STYLE) data-error-for=(field) { (message) }
        }
    }
}

/// Render the errors that do not belong to a single field.
pub fn non_field_errors(errors: &FieldErrors) -> Markup {
    field_error(errors, NON_FIELD_ERRORS)
}

/// A required text input for a name.
pub fn name_input(label: &str, value: &str, errors: &FieldErrors) -> Markup {
    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { (label) }

            input
                id="name"
                type="text"
                name="name"
                placeholder=(label)
                value=(value)
                maxlength=(NAME_MAX_LENGTH)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors, "name"))
        }
    }
}

/// A select element whose `id` and `name` are both `name`.
///
/// The first option is always the empty "---------" choice. `selected` is the
/// raw submitted value so that a rejected submission is shown as entered.
pub fn select_input(
    name: &str,
    label: &str,
    options: &[SelectOption],
    selected: &str,
    required: bool,
    errors: &FieldErrors,
) -> Markup {
    lookup_select_input(name, label, options, selected, required, None, errors)
}

/// Where a select fetches the options of the select that depends on it.
///
/// When the selected value changes, the dependent dropdowns script requests
/// `url?param=<value>` and replaces the options of the select `child`.
#[derive(Debug, Clone, Copy)]
pub struct OptionsLookup<'a> {
    pub url: &'a str,
    pub param: &'a str,
    pub child: &'a str,
}

/// A [select_input] whose changes refill the options of another select.
pub fn lookup_select_input(
    name: &str,
    label: &str,
    options: &[SelectOption],
    selected: &str,
    required: bool,
    lookup: Option<OptionsLookup<'_>>,
    errors: &FieldErrors,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select
                id=(name)
                name=(name)
                required[required]
                data-lookup-url=[lookup.map(|lookup| lookup.url)]
                data-lookup-param=[lookup.map(|lookup| lookup.param)]
                data-lookup-child=[lookup.map(|lookup| lookup.child)]
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "---------" }

                @for option in options {
                    @let value = option.id.to_string();
                    option value=(value) selected[value == selected] { (option.label) }
                }
            }

            (field_error(errors, name))
        }
    }
}

/// A form submitted with HTMX that replaces itself with the server's response.
///
/// Successful submissions redirect, failed validation re-renders the form and
/// any other failure is shown in the alert container.
pub fn hx_form(action: &str, submit_text: &str, fields: &Markup) -> Markup {
    html! {
        form
            hx-post=(action)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (fields)

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}

/// Wrap a form in a full page with the navigation bar and a heading.
pub fn form_page(title: &str, active_endpoint: &str, form: &Markup) -> Markup {
    form_page_with_head(title, active_endpoint, &[], form)
}

/// A [form_page] that also loads `head_elements`, e.g. scripts the form needs.
pub fn form_page_with_head(
    title: &str,
    active_endpoint: &str,
    head_elements: &[HeadElement],
    form: &Markup,
) -> Markup {
    let nav_bar = NavBar::new(active_endpoint).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="mb-4 text-xl font-bold" { (title) }

            (form)
        }
    };

    base(title, head_elements, &content)
}

/// The page asking the user to confirm deleting `description`.
///
/// `warning` explains any rows that will be deleted along with it.
pub fn delete_confirmation_page(
    title: &str,
    delete_url: &str,
    cancel_url: &str,
    description: &str,
    warning: Option<&str>,
) -> Markup {
    let form = html! {
        form
            hx-post=(delete_url)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            p { "Are you sure you want to delete \"" (description) "\"?" }

            @if let Some(warning) = warning {
                p class="text-sm text-yellow-700 dark:text-yellow-400" { (warning) }
            }

            button type="submit" class=(BUTTON_DANGER_STYLE) { "Delete" }

            a href=(cancel_url) class=(LINK_STYLE) { "Cancel" }
        }
    };

    form_page(title, delete_url, &form)
}
