use askama::Template;
use chrono::NaiveDate;

use crate::controllers::validation::{MAX_RENTAL_DAYS, MIN_RENTAL_DAYS};
use crate::controllers::ReservationForm;
use crate::models::{Car, Field};

/// What a car card needs, precomputed from a [`Car`].
#[derive(Clone, Debug)]
pub struct CarCard {
    pub vin: String,
    pub title: String,
    pub alt: String,
    pub car_type: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub available: bool,
    pub availability: String,
    pub rent_action: String,
}

impl CarCard {
    pub fn from_car(car: &Car) -> Self {
        Self {
            vin: car.vin.clone(),
            title: car.display_name(),
            alt: car.display_name(),
            car_type: car.car_type.clone(),
            description: car.description.clone(),
            price: car.price_display(),
            image: car.image.clone(),
            available: car.available,
            availability: car.availability_display().to_string(),
            rent_action: format!("/rent/{}", urlencoding::encode(&car.vin)),
        }
    }

    /// Reservation page header: "Honda Accord (2022)".
    pub fn detailed(car: &Car) -> Self {
        Self {
            title: car.title_with_year(),
            ..Self::from_car(car)
        }
    }
}

#[derive(Clone, Debug)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

pub fn select_options(values: &[String], selected: &str) -> Vec<SelectOption> {
    values
        .iter()
        .map(|v| SelectOption {
            value: v.clone(),
            selected: v == selected,
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct SuggestionLink {
    pub text: String,
    pub href: String,
}

#[derive(Template)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub search: String,
    pub type_options: Vec<SelectOption>,
    pub brand_options: Vec<SelectOption>,
    pub suggestions: Vec<SuggestionLink>,
    pub dismiss_href: String,
    pub showcase_visible: bool,
    pub featured: Vec<CarCard>,
    pub cars: Vec<CarCard>,
}

#[derive(Clone, Debug)]
pub struct FormFieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub value: String,
    pub has_error: bool,
    pub error: String,
    pub min: String,
    pub max: String,
}

pub fn form_fields(form: &ReservationForm, today: NaiveDate) -> Vec<FormFieldView> {
    Field::ALL
        .iter()
        .map(|&field| {
            let (input_type, min, max) = match field {
                Field::Phone => ("tel", String::new(), String::new()),
                Field::Email => ("email", String::new(), String::new()),
                Field::StartDate => ("date", today.format("%Y-%m-%d").to_string(), String::new()),
                Field::RentalPeriod => ("number", MIN_RENTAL_DAYS.to_string(), MAX_RENTAL_DAYS.to_string()),
                _ => ("text", String::new(), String::new()),
            };
            let error = form.error(field);
            FormFieldView {
                key: field.key(),
                label: field.label(),
                input_type,
                value: form.draft().value(field).to_string(),
                has_error: error.is_some(),
                error: error.unwrap_or_default().to_string(),
                min,
                max,
            }
        })
        .collect()
}

#[derive(Template)]
#[template(path = "reservation.html")]
pub struct ReservationTemplate {
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    /// "none", "unavailable" or "active"
    pub phase: &'static str,
    pub car: Option<CarCard>,
    pub fields: Vec<FormFieldView>,
    pub total: String,
    pub submit_enabled: bool,
}

#[derive(Template)]
#[template(path = "confirm.html")]
pub struct ConfirmTemplate {
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub message: String,
    pub confirm_action: String,
    pub back_href: String,
}
