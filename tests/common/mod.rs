#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use carhop::api::ApiClient;
use carhop::models::Car;

/// In-process stand-in for the rental backend.
#[derive(Clone, Default)]
pub struct FakeBackend {
    pub cars: Arc<Mutex<Vec<Car>>>,
    pub last_query: Arc<Mutex<HashMap<String, String>>>,
    pub reservations: Arc<Mutex<Vec<Value>>>,
    /// While set, `/api/cars` answers 503 with a non-JSON body.
    pub cars_down: Arc<AtomicBool>,
}

impl FakeBackend {
    pub fn set_cars_down(&self, down: bool) {
        self.cars_down.store(down, Ordering::SeqCst);
    }
}

pub fn car(vin: &str, brand: &str, model: &str, car_type: &str, price: f64, available: bool) -> Car {
    Car {
        vin: vin.to_string(),
        brand: brand.to_string(),
        car_model: model.to_string(),
        car_type: car_type.to_string(),
        description: format!("A {} {}", brand, model),
        price_per_day: price,
        image: format!("/images/{}.jpg", vin),
        available,
        year_of_manufacture: Some(2022),
    }
}

pub fn fleet() -> Vec<Car> {
    vec![
        car("VIN001", "Toyota", "Corolla", "Sedan", 45.0, true),
        car("VIN002", "Toyota", "RAV4", "SUV", 70.0, true),
        car("VIN003", "Honda", "Accord", "Sedan", 55.0, false),
        car("VIN004", "Ford", "Explorer", "SUV", 90.0, true),
        car("VIN005", "BMW", "X5", "SUV", 150.0, true),
    ]
}

fn matches(car: &Car, q: &HashMap<String, String>) -> bool {
    if let Some(t) = q.get("type").filter(|v| !v.is_empty()) {
        if &car.car_type != t {
            return false;
        }
    }
    if let Some(b) = q.get("brand").filter(|v| !v.is_empty()) {
        if &car.brand != b {
            return false;
        }
    }
    if let Some(s) = q.get("search").filter(|v| !v.is_empty()) {
        let s = s.to_lowercase();
        let haystack = format!("{} {} {} {}", car.car_type, car.brand, car.car_model, car.description).to_lowercase();
        if !haystack.contains(&s) {
            return false;
        }
    }
    true
}

async fn list_cars(State(backend): State<FakeBackend>, Query(q): Query<HashMap<String, String>>) -> Response {
    if backend.cars_down.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").into_response();
    }
    *backend.last_query.lock().unwrap() = q.clone();
    let cars = backend.cars.lock().unwrap();
    let matching: Vec<Car> = cars.iter().filter(|c| matches(c, &q)).cloned().collect();
    Json(matching).into_response()
}

async fn one_car(State(backend): State<FakeBackend>, Path(vin): Path<String>) -> (StatusCode, Json<Value>) {
    let cars = backend.cars.lock().unwrap();
    match cars.iter().find(|c| c.vin == vin) {
        Some(car) => (StatusCode::OK, Json(json!(car))),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "Car not found"}))),
    }
}

async fn car_types(State(backend): State<FakeBackend>) -> Json<Vec<String>> {
    let mut types: Vec<String> = backend.cars.lock().unwrap().iter().map(|c| c.car_type.clone()).collect();
    types.sort();
    types.dedup();
    Json(types)
}

async fn brands(State(backend): State<FakeBackend>) -> Json<Vec<String>> {
    let mut brands: Vec<String> = backend.cars.lock().unwrap().iter().map(|c| c.brand.clone()).collect();
    brands.sort();
    brands.dedup();
    Json(brands)
}

async fn suggestions(State(backend): State<FakeBackend>, Query(q): Query<HashMap<String, String>>) -> Json<Vec<String>> {
    let needle = q.get("q").cloned().unwrap_or_default().to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for car in backend.cars.lock().unwrap().iter() {
        for word in [&car.car_type, &car.brand, &car.car_model] {
            if word.to_lowercase().contains(&needle) && !out.contains(word) {
                out.push(word.clone());
            }
        }
    }
    Json(out)
}

async fn reserve(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let vin = body["car"]["vin"].as_str().unwrap_or_default().to_string();
    let mut cars = backend.cars.lock().unwrap();
    let Some(car) = cars.iter_mut().find(|c| c.vin == vin) else {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Car not found"})));
    };
    if !car.available {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Car is no longer available"})));
    }
    car.available = false;
    let days = body["rental"]["rentalPeriod"].as_u64().unwrap_or(0);
    backend.reservations.lock().unwrap().push(body.clone());
    let order = json!({
        "customer": body["customer"],
        "car": {"vin": vin},
        "rental": {
            "startDate": body["rental"]["startDate"],
            "rentalPeriod": days,
            "totalPrice": car.price_per_day * days as f64,
            "orderDate": "2026-01-01T00:00:00Z"
        }
    });
    (StatusCode::OK, Json(json!({"success": true, "order": order})))
}

/// Serve the fake backend on an ephemeral port and return a client bound to it.
pub async fn spawn_backend(cars: Vec<Car>) -> (ApiClient, FakeBackend) {
    let backend = FakeBackend {
        cars: Arc::new(Mutex::new(cars)),
        ..Default::default()
    };
    let app = Router::new()
        .route("/api/cars", get(list_cars))
        .route("/api/car/:vin", get(one_car))
        .route("/api/car-types", get(car_types))
        .route("/api/brands", get(brands))
        .route("/api/search-suggestions", get(suggestions))
        .route("/api/reserve", post(reserve))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let api = ApiClient::new(&format!("http://{}", addr)).unwrap();
    (api, backend)
}

/// A client pointed at a port nothing listens on.
pub fn unreachable_api() -> ApiClient {
    ApiClient::new("http://127.0.0.1:9").unwrap()
}
