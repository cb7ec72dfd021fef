use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Field;

pub const MIN_RENTAL_DAYS: u32 = 1;
pub const MAX_RENTAL_DAYS: u32 = 30;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s]{2,50}$").expect("valid name pattern"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9\s-]{10,15}$").expect("valid phone pattern"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static LICENSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{5,15}$").expect("valid license pattern"));

/// How a field is checked: a pattern over the whole value, or a predicate
/// that needs the current date.
pub enum Rule {
    Pattern(&'static Lazy<Regex>),
    Predicate(fn(&str, NaiveDate) -> bool),
}

impl Rule {
    pub fn check(&self, value: &str, today: NaiveDate) -> bool {
        match self {
            Rule::Pattern(re) => re.is_match(value),
            Rule::Predicate(f) => f(value, today),
        }
    }
}

pub fn rule_for(field: Field) -> Rule {
    match field {
        Field::Name => Rule::Pattern(&NAME_RE),
        Field::Phone => Rule::Pattern(&PHONE_RE),
        Field::Email => Rule::Pattern(&EMAIL_RE),
        Field::License => Rule::Pattern(&LICENSE_RE),
        Field::StartDate => Rule::Predicate(start_date_ok),
        Field::RentalPeriod => Rule::Predicate(rental_period_ok),
    }
}

/// Inline message shown next to an invalid field.
pub fn message_for(field: Field) -> &'static str {
    match field {
        Field::Name => "Please enter a valid name (2-50 characters, letters only)",
        Field::Phone => "Please enter a valid phone number (10-15 digits)",
        Field::Email => "Please enter a valid email address",
        Field::License => "Please enter a valid driver's license number (5-15 characters)",
        Field::StartDate => "Start date must be today or later",
        Field::RentalPeriod => "Rental period must be between 1 and 30 days",
    }
}

pub fn validate(field: Field, value: &str, today: NaiveDate) -> bool {
    rule_for(field).check(value, today)
}

/// `YYYY-MM-DD`, the value format of a date input.
pub fn parse_start_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn parse_rental_period(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

fn start_date_ok(value: &str, today: NaiveDate) -> bool {
    parse_start_date(value).is_some_and(|date| date >= today)
}

fn rental_period_ok(value: &str, _today: NaiveDate) -> bool {
    parse_rental_period(value).is_some_and(|days| (MIN_RENTAL_DAYS..=MAX_RENTAL_DAYS).contains(&days))
}
