mod common;

use std::time::Duration;

use chrono::NaiveDate;

use carhop::controllers::{
    CarouselPolicy, CatalogController, ReservationForm, ReservationPhase, SubmitOutcome, SuggestionController,
};
use carhop::models::{Field, FilterState, ReservationDraft};
use carhop::storage::{self, FileStore, LocalStore, MemoryStore, DRAFT_KEY, SELECTED_VIN_KEY};

use common::{fleet, spawn_backend, unreachable_api};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn complete_draft() -> ReservationDraft {
    ReservationDraft {
        name: "Jane Doe".into(),
        phone: "+15551234567".into(),
        email: "jane@example.com".into(),
        license: "AB12345".into(),
        start_date: "2026-02-01".into(),
        rental_period: "3".into(),
    }
}

#[tokio::test]
async fn test_catalog_initialize_features_top_priced_available_cars() {
    let (api, _backend) = spawn_backend(fleet()).await;
    let mut catalog = CatalogController::new(api, CarouselPolicy::TopByPrice(2));

    assert!(catalog.initialize(&FilterState::default()).await);

    let state = catalog.state();
    assert_eq!(state.cars().len(), 5);
    assert_eq!(state.available().len(), 4);
    let featured: Vec<&str> = state.featured().iter().map(|c| c.vin.as_str()).collect();
    assert_eq!(featured, vec!["VIN005", "VIN004"]);
    assert_eq!(state.vocabulary().brands.len(), 4);
    assert!(state.showcase_visible());
}

#[tokio::test]
async fn test_catalog_search_hides_showcase() {
    let (api, _backend) = spawn_backend(fleet()).await;
    let mut catalog = CatalogController::new(api, CarouselPolicy::AllAvailable);

    catalog.load_cars(&FilterState::new("corolla", "", "")).await;

    assert_eq!(catalog.state().cars().len(), 1);
    assert!(!catalog.state().showcase_visible());
}

#[tokio::test]
async fn test_catalog_unreachable_backend_starts_empty() {
    let mut catalog = CatalogController::new(unreachable_api(), CarouselPolicy::default());
    assert!(!catalog.initialize(&FilterState::default()).await);
    assert!(catalog.state().cars().is_empty());
    assert!(catalog.state().vocabulary().is_empty());
}

#[tokio::test]
async fn test_catalog_failure_keeps_previous_list() {
    let (api, backend) = spawn_backend(fleet()).await;
    let mut catalog = CatalogController::new(api.clone(), CarouselPolicy::TopByPrice(2));
    assert!(catalog.initialize(&FilterState::default()).await);

    backend.set_cars_down(true);
    assert!(!catalog.load_cars(&FilterState::new("", "SUV", "")).await);
    assert_eq!(catalog.state().cars().len(), 5);
    assert_eq!(catalog.state().featured().len(), 2);

    // Same again starting from a saved state, as the web front-end does
    let mut resumed = CatalogController::with_state(api, catalog.into_state());
    assert!(!resumed.initialize(&FilterState::default()).await);
    assert_eq!(resumed.state().cars().len(), 5);
    assert_eq!(resumed.state().vocabulary().brands.len(), 4);
}

#[tokio::test]
async fn test_suggestion_pick_selects_matching_brand() {
    let (api, _backend) = spawn_backend(fleet()).await;
    let mut suggestions = SuggestionController::new(api.clone(), Duration::from_millis(10));
    let list = suggestions.lookup("bm").await.to_vec();
    assert_eq!(list, vec!["BMW"]);

    let mut catalog = CatalogController::new(api, CarouselPolicy::default());
    catalog.load_filters().await;
    let filters = suggestions
        .state_mut()
        .select(&list[0], catalog.state().vocabulary(), &FilterState::new("", "SUV", ""));
    assert_eq!(filters, FilterState::new("BMW", "SUV", "BMW"));
    assert!(suggestions.state().suggestions().is_empty());
}

#[tokio::test]
async fn test_suggestion_debounced_lookup() {
    let (api, _backend) = spawn_backend(fleet()).await;
    let mut suggestions = SuggestionController::new(api, Duration::from_millis(20));

    suggestions.input("s");
    suggestions.input("su");
    suggestions.input("suv");
    assert!(suggestions.settle().await);
    assert_eq!(suggestions.state().suggestions(), &["SUV".to_string()]);

    // Clearing the box hides the panel without a request
    suggestions.input("");
    assert!(!suggestions.settle().await);
    assert!(suggestions.state().suggestions().is_empty());
}

#[tokio::test]
async fn test_reservation_without_selection() {
    let (api, _backend) = spawn_backend(fleet()).await;
    let store = MemoryStore::new();
    let form = ReservationForm::enter(&api, &store, today()).await;
    assert_eq!(form.phase(), &ReservationPhase::NoCarSelected);
}

#[tokio::test]
async fn test_reservation_unavailable_car() {
    let (api, _backend) = spawn_backend(fleet()).await;
    let mut store = MemoryStore::new();
    storage::select_car(&mut store, "VIN003").unwrap();

    let form = ReservationForm::enter(&api, &store, today()).await;
    assert!(matches!(form.phase(), ReservationPhase::CarUnavailable(car) if car.vin == "VIN003"));
    assert!(!form.is_submittable());
}

#[tokio::test]
async fn test_reservation_restores_draft_and_submits() {
    let (api, backend) = spawn_backend(fleet()).await;
    let mut store = MemoryStore::new();
    storage::select_car(&mut store, "VIN002").unwrap();
    let mut partial = complete_draft();
    partial.email = String::new();
    storage::save_draft(&mut store, &partial).unwrap();

    let mut form = ReservationForm::enter(&api, &store, today()).await;
    assert!(form.is_active());
    assert_eq!(form.draft().name, "Jane Doe");
    assert!(form.error(Field::Email).is_some());
    assert!(!form.is_submittable());
    assert_eq!(form.total_display(), "$210");

    assert!(form.on_input(Field::Email, "jane@example.com", &mut store, today()).unwrap());
    assert!(form.is_submittable());
    assert_eq!(storage::load_draft(&store).unwrap().email, "jane@example.com");

    let outcome = form.submit(&api, &mut store).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Accepted(ref r) if r.success));
    assert_eq!(form.phase(), &ReservationPhase::Submitted);
    assert!(store.get_item(SELECTED_VIN_KEY).is_none());
    assert!(store.get_item(DRAFT_KEY).is_none());
    assert_eq!(backend.reservations.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reservation_rejected_keeps_draft() {
    let (api, backend) = spawn_backend(fleet()).await;
    let mut store = MemoryStore::new();
    storage::select_car(&mut store, "VIN004").unwrap();

    let mut form = ReservationForm::enter(&api, &store, today()).await;
    assert!(form.apply_all(complete_draft(), &mut store, today()).unwrap());

    // Someone else rents it first
    backend.cars.lock().unwrap()[3].available = false;

    let outcome = form.submit(&api, &mut store).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Rejected("Car is no longer available".into()));
    assert!(form.is_active());
    assert_eq!(storage::selected_vin(&store).as_deref(), Some("VIN004"));
    assert_eq!(storage::load_draft(&store), Some(complete_draft()));
}

#[tokio::test]
async fn test_reservation_network_failure_is_error() {
    let (api, _backend) = spawn_backend(fleet()).await;
    let mut store = MemoryStore::new();
    storage::select_car(&mut store, "VIN001").unwrap();
    let mut form = ReservationForm::enter(&api, &store, today()).await;
    form.apply_all(complete_draft(), &mut store, today()).unwrap();

    assert!(form.submit(&unreachable_api(), &mut store).await.is_err());
    assert!(form.is_active());
    assert!(store.get_item(DRAFT_KEY).is_some());
}

#[tokio::test]
async fn test_file_store_carries_draft_between_runs() {
    let (api, _backend) = spawn_backend(fleet()).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let mut store = FileStore::open(&path).unwrap();
        storage::select_car(&mut store, "VIN005").unwrap();
        let mut form = ReservationForm::enter(&api, &store, today()).await;
        form.on_input(Field::Name, "Jane Doe", &mut store, today()).unwrap();
        form.on_input(Field::RentalPeriod, "2", &mut store, today()).unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    let form = ReservationForm::enter(&api, &store, today()).await;
    assert_eq!(form.draft().name, "Jane Doe");
    assert_eq!(form.total_display(), "$300");
    assert!(form.error(Field::Phone).is_some());
}
