use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::config;
use crate::controllers::{CatalogController, SuggestionController, SuggestionState};
use crate::models::{AppState, FilterState};
use crate::storage;
use crate::templates::{select_options, CarCard, CatalogTemplate, SuggestionLink};
use crate::utils::with_query;

use super::helpers::{build_template_globals, ensure_session, render_template, TemplateGlobals};

/// Page options that are not filters.
#[derive(Deserialize, Default)]
pub struct CatalogView {
    /// Close the suggestion panel for this render.
    #[serde(default)]
    pub dismiss: bool,
}

pub async fn catalog_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(filters): Query<FilterState>,
    Query(view): Query<CatalogView>,
) -> impl IntoResponse {
    let (jar, sid) = ensure_session(jar);
    // A failed reload shows the session's last good lists instead of an empty grid
    let mut catalog = match state.last_catalog(&sid) {
        Some(previous) => CatalogController::with_state(state.api.clone(), previous),
        None => CatalogController::new(state.api.clone(), state.carousel_policy),
    };
    let loaded = catalog.initialize(&filters).await;
    let catalog = catalog.into_state();
    if loaded {
        state.save_catalog(&sid, catalog.clone());
    }

    let mut suggestions = Vec::new();
    if filters.has_search() {
        let mut lookup = SuggestionController::new(state.api.clone(), config::get_debounce_delay());
        let search = filters.search.trim().to_lowercase();
        lookup.lookup(&filters.search).await;
        if view.dismiss {
            lookup.state_mut().dismiss();
        }
        for text in lookup.state().suggestions() {
            if text.to_lowercase() == search {
                continue;
            }
            let pairs = vec![
                ("text".to_string(), text.clone()),
                ("type".to_string(), filters.car_type.clone()),
                ("brand".to_string(), filters.brand.clone()),
            ];
            suggestions.push(SuggestionLink {
                text: text.clone(),
                href: with_query("/suggestion", &pairs),
            });
        }
    }

    let TemplateGlobals {
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &sid);
    let dismiss_href = {
        let mut pairs = filters.to_query();
        pairs.push(("dismiss".to_string(), "true".to_string()));
        with_query("/", &pairs)
    };
    let page = CatalogTemplate {
        api_hostname,
        flash_messages,
        has_flash_messages,
        search: catalog.filters().search.clone(),
        type_options: select_options(&catalog.vocabulary().car_types, &catalog.filters().car_type),
        brand_options: select_options(&catalog.vocabulary().brands, &catalog.filters().brand),
        suggestions,
        dismiss_href,
        showcase_visible: catalog.showcase_visible(),
        featured: catalog.featured().iter().map(CarCard::from_car).collect(),
        cars: catalog.cars().iter().map(CarCard::from_car).collect(),
    };
    (jar, render_template(page))
}

#[derive(Deserialize)]
pub struct SuggestionQuery {
    pub text: String,
    #[serde(default, rename = "type")]
    pub car_type: String,
    #[serde(default)]
    pub brand: String,
}

/// A clicked suggestion: make it the search text, pre-select a matching
/// type or brand, and show the catalog for the result.
pub async fn suggestion_get(State(state): State<AppState>, Query(q): Query<SuggestionQuery>) -> Redirect {
    let mut catalog = CatalogController::new(state.api.clone(), state.carousel_policy);
    catalog.load_filters().await;
    let current = FilterState::new("", q.car_type, q.brand);
    let mut suggestions = SuggestionState::new(config::get_debounce_delay());
    let filters = suggestions.select(&q.text, catalog.state().vocabulary(), &current);
    Redirect::to(&with_query("/", &filters.to_query()))
}

/// "Rent Now": remember the car for the reservation page and go there.
pub async fn rent_post(State(state): State<AppState>, jar: CookieJar, Path(vin): Path<String>) -> impl IntoResponse {
    let (jar, sid) = ensure_session(jar);
    let mut store = state.session_store(&sid);
    if let Err(e) = storage::select_car(&mut store, &vin) {
        tracing::error!(%e, "Failed to store selected car");
    }
    state.save_session_store(&sid, store);
    (jar, Redirect::to("/reservation"))
}
