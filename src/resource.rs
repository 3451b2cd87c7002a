//! The kinds of records managed by the app, used to label messages and errors.

use std::fmt::Display;

/// One of the five record kinds in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    CashFlow,
    Status,
    Type,
    Category,
    Subcategory,
}

impl Resource {
    /// The lowercase, human readable name of the resource, e.g. "status".
    pub fn label(self) -> &'static str {
        match self {
            Resource::CashFlow => "cash flow record",
            Resource::Status => "status",
            Resource::Type => "type",
            Resource::Category => "category",
            Resource::Subcategory => "subcategory",
        }
    }

    /// A stable key for the resource, suitable for cookies and query strings.
    pub fn key(self) -> &'static str {
        match self {
            Resource::CashFlow => "cashflow",
            Resource::Status => "status",
            Resource::Type => "type",
            Resource::Category => "category",
            Resource::Subcategory => "subcategory",
        }
    }

    /// The inverse of [Resource::key].
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "cashflow" => Some(Resource::CashFlow),
            "status" => Some(Resource::Status),
            "type" => Some(Resource::Type),
            "category" => Some(Resource::Category),
            "subcategory" => Some(Resource::Subcategory),
            _ => None,
        }
    }


    /// The message used when a name (or name and parent pair) is already taken.
    pub fn duplicate_message(self) -> &'static str {
        match self {
            Resource::CashFlow => "This cash flow record already exists.",
            Resource::Status => "Status with this name already exists.",
            Resource::Type => "Type with this name already exists.",
            Resource::Category => "Category with this name and type already exists.",
            Resource::Subcategory => "Subcategory with this name and category already exists.",
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
