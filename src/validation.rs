//! Field level validation errors and the validated name type shared by the
//! reference records (statuses, types, categories and subcategories).

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The maximum number of characters in a status, type, category or subcategory name.
pub const NAME_MAX_LENGTH: usize = 100;

/// The key used for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str = "Select a valid choice.";
pub const INVALID_DATE_MESSAGE: &str = "Enter a valid date.";
pub const CATEGORY_TYPE_MISMATCH_MESSAGE: &str =
    "The selected category does not belong to the selected type.";
pub const SUBCATEGORY_CATEGORY_MISMATCH_MESSAGE: &str =
    "The selected subcategory does not belong to the selected category.";

/// Error messages keyed by the name of the field they apply to.
///
/// Serializes as a JSON object mapping field names to a list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set of errors holding one message for `field`.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first message for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns `Ok(value)` if there are no errors, otherwise the errors.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect::<Vec<_>>();

        write!(f, "{}", parts.join("; "))
    }
}

/// A validated, non-empty name of at most [NAME_MAX_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    /// Create a name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyName] if `name` is empty or only whitespace, or
    /// [Error::NameTooLong] if it has more than [NAME_MAX_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyName)
        } else if name.chars().count() > NAME_MAX_LENGTH {
            Err(Error::NameTooLong(NAME_MAX_LENGTH))
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a name without validation.
    ///
    /// The caller should ensure that the string is not empty. Used for values
    /// read back from the database, which were validated on the way in.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::new(s)
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a foreign key submitted through a form or query string.
///
/// # Errors
///
/// Returns [REQUIRED_MESSAGE] for an empty value and [INVALID_CHOICE_MESSAGE]
/// for a value that is not an integer.
pub fn parse_required_id(raw: &str) -> Result<i64, &'static str> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(REQUIRED_MESSAGE);
    }

    raw.parse().map_err(|_| INVALID_CHOICE_MESSAGE)
}

/// Report a missing referenced row as an invalid choice for `field`.
///
/// Any error other than [Error::NotFound] is passed through unchanged.
pub fn map_invalid_choice(field: &'static str) -> impl Fn(Error) -> Error {
    move |error| match error {
        Error::NotFound => Error::Validation(FieldErrors::single(field, INVALID_CHOICE_MESSAGE)),
        error => error,
    }
}

/// Parse an optional id filter, treating empty and malformed values as absent.
pub fn parse_optional_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse().ok())
}
