use serde::{Deserialize, Serialize};

use crate::utils::format_price;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub vin: String,
    pub brand: String,
    pub car_model: String,
    pub car_type: String,
    #[serde(default)]
    pub description: String,
    pub price_per_day: f64,
    #[serde(default)]
    pub image: String,
    pub available: bool,
    #[serde(default)]
    pub year_of_manufacture: Option<u32>,
}

impl Car {
    /// "Toyota Corolla", used as card title and image alt text.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.car_model)
    }

    /// "Toyota Corolla (2021)" on the reservation page.
    pub fn title_with_year(&self) -> String {
        match self.year_of_manufacture {
            Some(year) => format!("{} ({})", self.display_name(), year),
            None => self.display_name(),
        }
    }

    pub fn price_display(&self) -> String {
        format!("{} per day", format_price(self.price_per_day))
    }

    pub fn availability_display(&self) -> &'static str {
        if self.available {
            "Available"
        } else {
            "Not Available"
        }
    }
}
