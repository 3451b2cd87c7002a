//! JSON endpoints that feed the dependent category and subcategory selects.
//!
//! A missing, malformed or unknown parent id gives an empty list.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, DatabaseId, Error, category::get_categories_by_type,
    subcategory::get_subcategories_by_category, validation::parse_optional_id,
};

/// The state needed for the lookup endpoints.
#[derive(Debug, Clone)]
pub struct LookupState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LookupState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// An option for a select element.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LookupOption {
    pub id: DatabaseId,
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoriesQuery {
    pub type_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubcategoriesQuery {
    pub category_id: Option<String>,
}

/// The categories of the type `type_id`, ordered by name.
pub async fn get_category_options(
    State(state): State<LookupState>,
    Query(query): Query<CategoriesQuery>,
) -> Result<Json<Vec<LookupOption>>, Error> {
    let Some(type_id) = parse_optional_id(query.type_id.as_deref()) else {
        return Ok(Json(Vec::new()));
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let options = get_categories_by_type(type_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to look up categories: {error}"))?
        .into_iter()
        .map(|category| LookupOption {
            id: category.id,
            name: category.name.to_string(),
        })
        .collect();

    Ok(Json(options))
}

/// The subcategories of the category `category_id`, ordered by name.
pub async fn get_subcategory_options(
    State(state): State<LookupState>,
    Query(query): Query<SubcategoriesQuery>,
) -> Result<Json<Vec<LookupOption>>, Error> {
    let Some(category_id) = parse_optional_id(query.category_id.as_deref()) else {
        return Ok(Json(Vec::new()));
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let options = get_subcategories_by_category(category_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to look up subcategories: {error}"))?
        .into_iter()
        .map(|subcategory| LookupOption {
            id: subcategory.id,
            name: subcategory.name.to_string(),
        })
        .collect();

    Ok(Json(options))
}

#[cfg(test)]
mod lookup_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};

    use crate::{
        category::create_category,
        subcategory::create_subcategory,
        test_utils::{CashFlowFixture, create_type, get_test_connection, insert_cash_flow_fixture},
        validation::Name,
    };

    use super::{
        CategoriesQuery, LookupOption, LookupState, SubcategoriesQuery, get_category_options,
        get_subcategory_options,
    };

    fn get_state() -> (LookupState, CashFlowFixture) {
        let connection = get_test_connection();
        let fixture = insert_cash_flow_fixture(&connection);
        let state = LookupState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, fixture)
    }

    fn categories_query(type_id: &str) -> Query<CategoriesQuery> {
        Query(CategoriesQuery {
            type_id: Some(type_id.to_owned()),
        })
    }

    #[tokio::test]
    async fn categories_of_type_ordered_by_name() {
        let (state, fixture) = get_state();
        let (rent, _) = {
            let connection = state.db_connection.lock().unwrap();
            let rent =
                create_category(Name::new_unchecked("Rent"), fixture.flow_type.id, &connection)
                    .unwrap();
            let income = create_type(Name::new_unchecked("Income"), &connection).unwrap();
            let salary =
                create_category(Name::new_unchecked("Salary"), income.id, &connection).unwrap();
            (rent, salary)
        };

        let options = get_category_options(
            State(state),
            categories_query(&fixture.flow_type.id.to_string()),
        )
        .await
        .unwrap();

        assert_eq!(
            options.0,
            [
                LookupOption {
                    id: fixture.category.id,
                    name: "Food".to_owned(),
                },
                LookupOption {
                    id: rent.id,
                    name: "Rent".to_owned(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn unknown_or_malformed_type_gives_empty_list() {
        let (state, _) = get_state();

        for type_id in ["999", "abc", ""] {
            let options = get_category_options(State(state.clone()), categories_query(type_id))
                .await
                .unwrap();

            assert!(options.0.is_empty(), "got {:?} for {type_id:?}", options.0);
        }

        let options = get_category_options(State(state), Query(CategoriesQuery::default()))
            .await
            .unwrap();
        assert!(options.0.is_empty());
    }

    #[tokio::test]
    async fn subcategories_of_category_ordered_by_name() {
        let (state, fixture) = get_state();
        let bakery = create_subcategory(
            Name::new_unchecked("Bakery"),
            fixture.category.id,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let options = get_subcategory_options(
            State(state),
            Query(SubcategoriesQuery {
                category_id: Some(fixture.category.id.to_string()),
            }),
        )
        .await
        .unwrap();

        let names = options
            .0
            .iter()
            .map(|option| (option.id, option.name.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [(bakery.id, "Bakery"), (fixture.subcategory.id, "Groceries")]
        );
    }

    #[tokio::test]
    async fn unknown_category_gives_empty_list() {
        let (state, _) = get_state();

        let options = get_subcategory_options(
            State(state),
            Query(SubcategoriesQuery {
                category_id: Some("42".to_owned()),
            }),
        )
        .await
        .unwrap();

        assert!(options.0.is_empty());
    }
}
