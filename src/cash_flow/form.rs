use std::str::FromStr;

use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    cash_flow::{Amount, CashFlow, NewCashFlow},
    category::get_categories_by_type,
    endpoints,
    flow_type::get_all_types,
    forms::{
        OptionsLookup, SelectOption, field_error, form_page_with_head, hx_form,
        lookup_select_input, non_field_errors, select_input,
    },
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement},
    query::{DATE_FORMAT, parse_date},
    status::get_all_statuses,
    subcategory::get_subcategories_by_category,
    validation::{
        FieldErrors, INVALID_DATE_MESSAGE, REQUIRED_MESSAGE, parse_optional_id, parse_required_id,
    },
};

/// The fields submitted by the cash flow create and edit forms.
///
/// Values are kept as the raw strings so a rejected submission can be shown
/// back to the user as entered.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CashFlowForm {
    #[serde(default)]
    pub date_created: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "type")]
    pub type_id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub comment: String,
}

impl CashFlowForm {
    /// A form for a new record dated `today`.
    pub fn new(today: Date) -> Self {
        Self {
            date_created: today.format(DATE_FORMAT).unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Parse every field, collecting all field errors.
    ///
    /// An empty date means `default_date`, or is an error if there is no
    /// default. A blank comment means no comment. Whether the referenced rows
    /// exist is checked when the record is saved.
    pub fn validate(&self, default_date: Option<Date>) -> Result<NewCashFlow, FieldErrors> {
        let mut errors = FieldErrors::new();

        let date_created = match (self.date_created.trim().is_empty(), default_date) {
            (true, Some(default_date)) => Some(default_date),
            (true, None) => {
                errors.add("date_created", REQUIRED_MESSAGE);
                None
            }
            (false, _) => parse_date(&self.date_created).or_else(|| {
                errors.add("date_created", INVALID_DATE_MESSAGE);
                None
            }),
        };

        let mut parse_id = |field: &str, raw: &str| {
            parse_required_id(raw)
                .map_err(|message| errors.add(field, message))
                .ok()
        };
        let status_id = parse_id("status", &self.status);
        let type_id = parse_id("type", &self.type_id);
        let category_id = parse_id("category", &self.category);
        let subcategory_id = parse_id("subcategory", &self.subcategory);

        let amount = if self.amount.trim().is_empty() {
            errors.add("amount", REQUIRED_MESSAGE);
            None
        } else {
            Amount::from_str(&self.amount)
                .map_err(|error| errors.add("amount", error.to_string()))
                .ok()
        };

        let comment = Some(self.comment.trim())
            .filter(|comment| !comment.is_empty())
            .map(str::to_owned);

        match (
            date_created,
            status_id,
            type_id,
            category_id,
            subcategory_id,
            amount,
        ) {
            (
                Some(date_created),
                Some(status_id),
                Some(type_id),
                Some(category_id),
                Some(subcategory_id),
                Some(amount),
            ) => Ok(NewCashFlow {
                date_created,
                status_id,
                type_id,
                category_id,
                subcategory_id,
                amount,
                comment,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&CashFlow> for CashFlowForm {
    fn from(cash_flow: &CashFlow) -> Self {
        Self {
            date_created: cash_flow.date_created.format(DATE_FORMAT).unwrap_or_default(),
            status: cash_flow.status_id.to_string(),
            type_id: cash_flow.type_id.to_string(),
            category: cash_flow.category_id.to_string(),
            subcategory: cash_flow.subcategory_id.to_string(),
            amount: cash_flow.amount.to_string(),
            comment: cash_flow.comment.clone().unwrap_or_default(),
        }
    }
}

/// The choices for the select elements of a [CashFlowForm].
#[derive(Debug, Default)]
pub struct CashFlowFormOptions {
    pub statuses: Vec<SelectOption>,
    pub types: Vec<SelectOption>,
    pub categories: Vec<SelectOption>,
    pub subcategories: Vec<SelectOption>,
}

impl CashFlowFormOptions {
    /// Load the options for `form`.
    ///
    /// Only the categories of the chosen type and the subcategories of the
    /// chosen category are offered. They are empty until a type (or category)
    /// is chosen, after which the dependent dropdowns script keeps them in sync.
    pub fn load(form: &CashFlowForm, connection: &Connection) -> Result<Self, Error> {
        let statuses = get_all_statuses(connection)?
            .into_iter()
            .map(|status| SelectOption {
                id: status.id,
                label: status.name.to_string(),
            })
            .collect();

        let types = get_all_types(connection)?
            .into_iter()
            .map(|flow_type| SelectOption {
                id: flow_type.id,
                label: flow_type.name.to_string(),
            })
            .collect();

        let categories = match parse_optional_id(Some(form.type_id.as_str())) {
            Some(type_id) => get_categories_by_type(type_id, connection)?
                .into_iter()
                .map(|category| SelectOption {
                    id: category.id,
                    label: category.name.to_string(),
                })
                .collect(),
            None => Vec::new(),
        };

        let subcategories = match parse_optional_id(Some(form.category.as_str())) {
            Some(category_id) => get_subcategories_by_category(category_id, connection)?
                .into_iter()
                .map(|subcategory| SelectOption {
                    id: subcategory.id,
                    label: subcategory.name.to_string(),
                })
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            statuses,
            types,
            categories,
            subcategories,
        })
    }
}

pub fn cash_flow_form_view(
    action: &str,
    submit_text: &str,
    form: &CashFlowForm,
    options: &CashFlowFormOptions,
    errors: &FieldErrors,
) -> Markup {
    let type_lookup = OptionsLookup {
        url: endpoints::CATEGORIES_LOOKUP,
        param: "type_id",
        child: "category",
    };
    let category_lookup = OptionsLookup {
        url: endpoints::SUBCATEGORIES_LOOKUP,
        param: "category_id",
        child: "subcategory",
    };

    let fields = html! {
        (non_field_errors(errors))

        div
        {
            label for="date_created" class=(FORM_LABEL_STYLE) { "Date" }

            input
                id="date_created"
                type="date"
                name="date_created"
                value=(form.date_created)
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors, "date_created"))
        }

        (select_input("status", "Status", &options.statuses, &form.status, true, errors))
        (lookup_select_input(
            "type", "Type", &options.types, &form.type_id, true, Some(type_lookup), errors
        ))
        (lookup_select_input(
            "category",
            "Category",
            &options.categories,
            &form.category,
            true,
            Some(category_lookup),
            errors
        ))
        (select_input(
            "subcategory", "Subcategory", &options.subcategories, &form.subcategory, true, errors
        ))

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                id="amount"
                type="number"
                name="amount"
                step="0.01"
                min="0.01"
                placeholder="0.01"
                value=(form.amount)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors, "amount"))
        }

        div
        {
            label for="comment" class=(FORM_LABEL_STYLE) { "Comment" }

            textarea
                id="comment"
                name="comment"
                rows="3"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (form.comment)
            }

            (field_error(errors, "comment"))
        }
    };

    hx_form(action, submit_text, &fields)
}

/// A full page for the cash flow form, loading the dependent dropdowns script.
pub fn cash_flow_form_page(title: &str, active_endpoint: &str, form: &Markup) -> Markup {
    form_page_with_head(
        title,
        active_endpoint,
        &[HeadElement::ScriptLink(
            endpoints::DEPENDENT_DROPDOWNS_SCRIPT.to_owned(),
        )],
        form,
    )
}
