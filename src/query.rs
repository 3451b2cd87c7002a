//! A small SQL builder for the filtered, searched, ordered and paged list queries.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{DatabaseId, Error, db::CASEFOLD_FUNCTION};

/// The date format used in forms, query strings and the database.
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), DATE_FORMAT).ok()
}

/// Parse an optional date filter, treating empty and malformed values as absent.
pub fn parse_optional_date(raw: Option<&str>) -> Option<Date> {
    raw.and_then(parse_date)
}

/// Split a search string into lowercase terms on whitespace and commas.
pub fn split_search_terms(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// A field clients may order by and the SQL expression it maps to.
pub struct OrderingField {
    pub name: &'static str,
    pub column: &'static str,
}

/// Build a `SELECT` query with optional `WHERE`, `ORDER BY` and `LIMIT` clauses.
///
/// All values are bound as parameters, never interpolated into the SQL.
#[derive(Debug)]
pub struct ListQuery {
    select: &'static str,
    from: &'static str,
    conditions: Vec<String>,
    params: Vec<Value>,
    order_by: Option<String>,
    limit: Option<(u64, u64)>,
}

impl ListQuery {
    /// Start a query selecting `select` (the column list) `from` the given
    /// table expression, which may include joins.
    pub fn new(select: &'static str, from: &'static str) -> Self {
        Self {
            select,
            from,
            conditions: Vec::new(),
            params: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Keep rows where `column` equals `id`, if an id is given.
    pub fn filter_id(mut self, column: &str, id: Option<DatabaseId>) -> Self {
        if let Some(id) = id {
            self.conditions.push(format!("{column} = ?"));
            self.params.push(Value::Integer(id));
        }

        self
    }

    /// Keep rows where the date in `column` compares to `date` with `operator`
    /// (one of `=`, `>=`, `<=`), if a date is given.
    pub fn filter_date(mut self, column: &str, operator: &str, date: Option<Date>) -> Self {
        let Some(date) = date else {
            return self;
        };

        match date.format(DATE_FORMAT) {
            Ok(text) => {
                self.conditions.push(format!("{column} {operator} ?"));
                self.params.push(Value::Text(text));
            }
            Err(error) => tracing::warn!("could not format date filter {date}: {error}"),
        }

        self
    }

    /// Keep rows where every one of `terms` occurs in at least one of `columns`,
    /// ignoring case.
    ///
    /// `terms` should already be lowercase, see [split_search_terms].
    pub fn search(mut self, columns: &[&str], terms: &[String]) -> Self {
        if columns.is_empty() {
            return self;
        }

        for term in terms {
            let any_column = columns
                .iter()
                .map(|column| format!("instr({CASEFOLD_FUNCTION}({column}), ?) > 0"))
                .collect::<Vec<_>>()
                .join(" OR ");

            self.conditions.push(format!("({any_column})"));

            for _ in columns {
                self.params.push(Value::Text(term.clone()));
            }
        }

        self
    }

    /// Order by the comma separated `requested` fields, each optionally prefixed
    /// with `-` for descending order.
    ///
    /// Fields not in `allowed` are ignored. If no requested field is allowed,
    /// `default` is used. `tie_breaker` is always appended so that paging is stable.
    pub fn order(
        mut self,
        requested: Option<&str>,
        allowed: &[OrderingField],
        default: &str,
        tie_breaker: &str,
    ) -> Self {
        let requested = requested
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter_map(|field| {
                let (name, direction) = match field.strip_prefix('-') {
                    Some(name) => (name, "DESC"),
                    None => (field, "ASC"),
                };

                allowed
                    .iter()
                    .find(|allowed| allowed.name == name)
                    .map(|allowed| format!("{} {direction}", allowed.column))
            })
            .collect::<Vec<_>>();

        let order_by = if requested.is_empty() {
            default.to_owned()
        } else {
            requested.join(", ")
        };

        self.order_by = Some(format!("{order_by}, {tie_breaker}"));
        self
    }

    /// Order by a fixed SQL ordering expression.
    pub fn order_by(mut self, order_by: &str) -> Self {
        self.order_by = Some(order_by.to_owned());
        self
    }

    /// Return at most `limit` rows, skipping the first `offset` rows.
    pub fn paginate(mut self, limit: u64, offset: u64) -> Self {
        self.limit = Some((limit, offset));
        self
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Count the rows matching the filters, ignoring ordering and paging.
    pub fn count(&self, connection: &Connection) -> Result<u64, Error> {
        let sql = format!("SELECT COUNT(*) FROM {}{}", self.from, self.where_clause());

        let count: i64 = connection.query_row(&sql, params_from_iter(self.params.iter()), |row| {
            row.get(0)
        })?;

        Ok(count.max(0) as u64)
    }

    /// Run the query, converting each row with `map_row`.
    pub fn fetch<T>(
        &self,
        connection: &Connection,
        map_row: impl FnMut(&Row) -> Result<T, rusqlite::Error>,
    ) -> Result<Vec<T>, Error> {
        let mut sql = format!("SELECT {} FROM {}{}", self.select, self.from, self.where_clause());

        if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        if let Some((limit, offset)) = self.limit {
            sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        }

        connection
            .prepare(&sql)?
            .query_map(params_from_iter(self.params.iter()), map_row)?
            .map(|maybe_row| maybe_row.map_err(Error::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::db::initialize;

    use super::{ListQuery, OrderingField, parse_date, split_search_terms};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
            .execute_batch(
                "INSERT INTO status (name) VALUES ('Business'), ('Personal'), ('Tax'), ('Бизнес');",
            )
            .unwrap();
        connection
    }

    fn names(query: &ListQuery, connection: &Connection) -> Vec<String> {
        query.fetch(connection, |row| row.get(0)).unwrap()
    }

    const ALLOWED: &[OrderingField] = &[OrderingField {
        name: "name",
        column: "name",
    }];

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(parse_date("2024-01-31"), Some(date!(2024 - 01 - 31)));
        assert_eq!(parse_date("31/01/2024"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn splits_terms_on_whitespace_and_commas() {
        assert_eq!(
            split_search_terms(" Rent,  March\tBONUS,,"),
            ["rent", "march", "bonus"]
        );
        assert!(split_search_terms("   ").is_empty());
    }

    #[test]
    fn search_is_case_insensitive_for_non_ascii_text() {
        let connection = get_test_connection();
        let query = ListQuery::new("name", "status")
            .search(&["name"], &split_search_terms("БИЗ"))
            .order_by("name");

        assert_eq!(names(&query, &connection), ["Бизнес"]);
    }

    #[test]
    fn every_search_term_must_match() {
        let connection = get_test_connection();
        let query = ListQuery::new("name", "status")
            .search(&["name"], &split_search_terms("s, n"))
            .order_by("name");

        assert_eq!(names(&query, &connection), ["Business", "Personal"]);
    }

    #[test]
    fn unknown_ordering_fields_fall_back_to_default() {
        let connection = get_test_connection();
        let query = ListQuery::new("name", "status").order(
            Some("password,-id"),
            ALLOWED,
            "name DESC",
            "id ASC",
        );

        assert_eq!(
            names(&query, &connection),
            ["Бизнес", "Tax", "Personal", "Business"]
        );
    }

    #[test]
    fn descending_ordering() {
        let connection = get_test_connection();
        let query =
            ListQuery::new("name", "status").order(Some("-name"), ALLOWED, "id ASC", "id ASC");

        assert_eq!(
            names(&query, &connection),
            ["Бизнес", "Tax", "Personal", "Business"]
        );
    }

    #[test]
    fn count_ignores_pagination() {
        let connection = get_test_connection();
        let query = ListQuery::new("name", "status")
            .order_by("name")
            .paginate(2, 2);

        assert_eq!(query.count(&connection).unwrap(), 4);
        assert_eq!(names(&query, &connection), ["Tax", "Бизнес"]);
    }

    #[test]
    fn filter_id_ignores_missing_id() {
        let connection = get_test_connection();
        let query = ListQuery::new("name", "status").filter_id("id", None);

        assert_eq!(query.count(&connection).unwrap(), 4);

        let query = ListQuery::new("name", "status").filter_id("id", Some(3));
        assert_eq!(names(&query, &connection), ["Tax"]);
    }
}
