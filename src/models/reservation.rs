use serde::{Deserialize, Serialize};

/// In-progress form values exactly as typed, persisted between page loads.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub license: String,
    pub start_date: String,
    pub rental_period: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub drivers_license_number: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CarRef {
    pub vin: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RentalDetails {
    pub start_date: String,
    pub rental_period: u32,
}

/// Body of `POST /api/reserve`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReservationRequest {
    pub customer: CustomerDetails,
    pub car: CarRef,
    pub rental: RentalDetails,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderRental {
    pub start_date: String,
    pub rental_period: u32,
    pub total_price: f64,
    pub order_date: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Order {
    pub customer: CustomerDetails,
    pub car: CarRef,
    #[serde(default)]
    pub rental: OrderRental,
}

/// Successful reservation response. The backend may answer with a bare `{}`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ReservationReceipt {
    pub success: bool,
    pub order: Option<Order>,
}

/// The six tracked inputs of the reservation form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Phone,
    Email,
    License,
    StartDate,
    RentalPeriod,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Phone,
        Field::Email,
        Field::License,
        Field::StartDate,
        Field::RentalPeriod,
    ];

    /// Input name on the page and key in the persisted draft.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::License => "license",
            Field::StartDate => "startDate",
            Field::RentalPeriod => "rentalPeriod",
        }
    }

    /// Accepts the draft key as well as the kebab-case spelling used on the command line.
    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Field::Name),
            "phone" => Some(Field::Phone),
            "email" => Some(Field::Email),
            "license" => Some(Field::License),
            "startDate" | "start-date" => Some(Field::StartDate),
            "rentalPeriod" | "rental-period" => Some(Field::RentalPeriod),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Full name",
            Field::Phone => "Phone number",
            Field::Email => "Email",
            Field::License => "Driver's license number",
            Field::StartDate => "Start date",
            Field::RentalPeriod => "Rental period (days)",
        }
    }
}

impl ReservationDraft {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::License => &self.license,
            Field::StartDate => &self.start_date,
            Field::RentalPeriod => &self.rental_period,
        }
    }

    pub fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::License => &mut self.license,
            Field::StartDate => &mut self.start_date,
            Field::RentalPeriod => &mut self.rental_period,
        };
        *slot = value.to_string();
    }
}
