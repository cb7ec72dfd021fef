mod common;

use carhop::api;
use carhop::models::{CarRef, CustomerDetails, FilterState, RentalDetails, ReservationRequest};
use carhop::ClientError;

use common::{fleet, spawn_backend, unreachable_api};

#[tokio::test]
async fn test_load_cars_sends_only_set_filters() {
    let (client, backend) = spawn_backend(fleet()).await;

    let filters = FilterState::new("", "SUV", "");
    let cars = api::load_cars(&client, &filters).await.unwrap();

    assert_eq!(cars.len(), 3);
    assert!(cars.iter().all(|c| c.car_type == "SUV"));
    let query = backend.last_query.lock().unwrap().clone();
    assert_eq!(query.get("type").map(String::as_str), Some("SUV"));
    assert!(!query.contains_key("search"));
    assert!(!query.contains_key("brand"));
}

#[tokio::test]
async fn test_load_cars_unfiltered() {
    let (client, _backend) = spawn_backend(fleet()).await;
    let cars = api::load_cars(&client, &FilterState::default()).await.unwrap();
    assert_eq!(cars.len(), 5);
}

#[tokio::test]
async fn test_get_car_unknown_vin_is_backend_error() {
    let (client, _backend) = spawn_backend(fleet()).await;

    let car = api::get_car(&client, "VIN003").await.unwrap();
    assert_eq!(car.display_name(), "Honda Accord");
    assert!(!car.available);

    match api::get_car(&client, "NOPE").await {
        Err(ClientError::Backend(message)) => assert_eq!(message, "Car not found"),
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_load_filters() {
    let (client, _backend) = spawn_backend(fleet()).await;
    let vocabulary = api::load_filters(&client).await.unwrap();
    assert_eq!(vocabulary.car_types, vec!["SUV", "Sedan"]);
    assert_eq!(vocabulary.brands, vec!["BMW", "Ford", "Honda", "Toyota"]);
    assert_eq!(vocabulary.match_type("suv"), Some("SUV"));
}

#[tokio::test]
async fn test_load_suggestions() {
    let (client, _backend) = spawn_backend(fleet()).await;
    let suggestions = api::load_suggestions(&client, "toy").await.unwrap();
    assert_eq!(suggestions, vec!["Toyota"]);
}

#[tokio::test]
async fn test_reserve_then_conflict() {
    let (client, backend) = spawn_backend(fleet()).await;
    let request = ReservationRequest {
        customer: CustomerDetails {
            name: "Jane Doe".into(),
            phone_number: "+15551234567".into(),
            email: "jane@example.com".into(),
            drivers_license_number: "AB12345".into(),
        },
        car: CarRef { vin: "VIN002".into() },
        rental: RentalDetails {
            start_date: "2026-03-01".into(),
            rental_period: 3,
        },
    };

    let receipt = api::reserve(&client, &request).await.unwrap();
    assert!(receipt.success);
    let order = receipt.order.unwrap();
    assert_eq!(order.rental.total_price, 210.0);
    assert_eq!(order.customer.phone_number, "+15551234567");

    let sent = backend.reservations.lock().unwrap()[0].clone();
    assert_eq!(sent["customer"]["driversLicenseNumber"], "AB12345");
    assert_eq!(sent["rental"]["startDate"], "2026-03-01");

    match api::reserve(&client, &request).await {
        Err(ClientError::Backend(message)) => assert_eq!(message, "Car is no longer available"),
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = unreachable_api();
    let result = api::load_cars(&client, &FilterState::default()).await;
    assert!(matches!(result, Err(ClientError::Network(_))));
}
