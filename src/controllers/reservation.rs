use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::api::{self, ApiClient};
use crate::error::{ClientError, Result};
use crate::models::{
    Car, CarRef, CustomerDetails, Field, RentalDetails, ReservationDraft, ReservationReceipt,
    ReservationRequest,
};
use crate::storage::{self, LocalStore};
use crate::utils::format_price;

use super::validation::{message_for, parse_rental_period, validate};

#[derive(Clone, Debug, PartialEq)]
pub enum ReservationPhase {
    NoCarSelected,
    /// Terminal: the car exists but was rented in the meantime.
    CarUnavailable(Car),
    FormActive(Car),
    Submitted,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Accepted(ReservationReceipt),
    /// The backend refused, e.g. the car is no longer available. The form stays active.
    Rejected(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    Stay,
    ReturnToCatalog,
}

#[derive(Clone, Debug)]
pub struct ReservationForm {
    phase: ReservationPhase,
    draft: ReservationDraft,
    errors: BTreeMap<Field, &'static str>,
    submit_enabled: bool,
}

impl Default for ReservationForm {
    fn default() -> Self {
        Self {
            phase: ReservationPhase::NoCarSelected,
            draft: ReservationDraft::default(),
            errors: BTreeMap::new(),
            submit_enabled: false,
        }
    }
}

impl ReservationForm {
    /// Resolve the selected car and restore any saved draft.
    pub async fn enter<S: LocalStore + ?Sized>(api: &ApiClient, store: &S, today: NaiveDate) -> Self {
        let Some(vin) = storage::selected_vin(store) else {
            return Self::default();
        };
        match api::get_car(api, &vin).await {
            Ok(car) => Self::activate(car, storage::load_draft(store), today),
            Err(e) => {
                tracing::warn!(%e, %vin, "Error loading car details");
                Self::default()
            }
        }
    }

    /// Form for `car`. A restored draft is validated field by field, so a
    /// saved value that breaks its rule is reported instead of trusted.
    pub fn activate(car: Car, draft: Option<ReservationDraft>, today: NaiveDate) -> Self {
        if !car.available {
            return Self {
                phase: ReservationPhase::CarUnavailable(car),
                ..Self::default()
            };
        }
        let mut form = Self {
            phase: ReservationPhase::FormActive(car),
            ..Self::default()
        };
        if let Some(draft) = draft {
            form.draft = draft;
            form.validate_all(today);
        }
        form
    }

    /// One edit of one field: validate it, persist the draft, recompute
    /// whether the whole form can be submitted. Returns the field's validity.
    pub fn on_input<S: LocalStore + ?Sized>(
        &mut self,
        field: Field,
        value: &str,
        store: &mut S,
        today: NaiveDate,
    ) -> Result<bool> {
        if !self.is_active() {
            return Ok(false);
        }
        self.draft.set(field, value);
        let valid = self.validate_field(field, today);
        self.validate_all(today);
        storage::save_draft(store, &self.draft)?;
        Ok(valid)
    }

    /// Replace every field at once, as a full form post does.
    pub fn apply_all<S: LocalStore + ?Sized>(
        &mut self,
        draft: ReservationDraft,
        store: &mut S,
        today: NaiveDate,
    ) -> Result<bool> {
        if !self.is_active() {
            return Ok(false);
        }
        self.draft = draft;
        let valid = self.validate_all(today);
        storage::save_draft(store, &self.draft)?;
        Ok(valid)
    }

    fn validate_field(&mut self, field: Field, today: NaiveDate) -> bool {
        let valid = validate(field, self.draft.value(field), today);
        if valid {
            self.errors.remove(&field);
        } else {
            self.errors.insert(field, message_for(field));
        }
        valid
    }

    fn validate_all(&mut self, today: NaiveDate) -> bool {
        let mut all = true;
        for field in Field::ALL {
            all &= self.validate_field(field, today);
        }
        self.submit_enabled = all && self.is_active();
        self.submit_enabled
    }

    pub fn phase(&self) -> &ReservationPhase {
        &self.phase
    }

    pub fn car(&self) -> Option<&Car> {
        match &self.phase {
            ReservationPhase::CarUnavailable(car) | ReservationPhase::FormActive(car) => Some(car),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, ReservationPhase::FormActive(_))
    }

    pub fn draft(&self) -> &ReservationDraft {
        &self.draft
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> &BTreeMap<Field, &'static str> {
        &self.errors
    }

    pub fn is_submittable(&self) -> bool {
        self.submit_enabled
    }

    /// `rentalPeriod × pricePerDay`; a period that is not a number counts as 0 days.
    pub fn total_price(&self) -> f64 {
        let days = parse_rental_period(&self.draft.rental_period).unwrap_or(0);
        let price = self.car().map(|c| c.price_per_day).unwrap_or(0.0);
        days as f64 * price
    }

    pub fn total_display(&self) -> String {
        format_price(self.total_price())
    }

    pub fn build_request(&self) -> Result<ReservationRequest> {
        let ReservationPhase::FormActive(car) = &self.phase else {
            return Err(ClientError::InvalidForm("no car selected".into()));
        };
        if !self.submit_enabled || !self.errors.is_empty() {
            let fields: Vec<&str> = self.errors.keys().map(|f| f.key()).collect();
            return Err(ClientError::InvalidForm(fields.join(", ")));
        }
        let rental_period = parse_rental_period(&self.draft.rental_period)
            .ok_or_else(|| ClientError::InvalidForm(Field::RentalPeriod.key().into()))?;
        Ok(ReservationRequest {
            customer: CustomerDetails {
                name: self.draft.name.clone(),
                phone_number: self.draft.phone.clone(),
                email: self.draft.email.clone(),
                drivers_license_number: self.draft.license.clone(),
            },
            car: CarRef { vin: car.vin.clone() },
            rental: RentalDetails {
                start_date: self.draft.start_date.clone(),
                rental_period,
            },
        })
    }

    /// Post the reservation. On success both persisted keys are cleared and
    /// the form moves to `Submitted`; a backend refusal keeps everything as is.
    pub async fn submit<S: LocalStore + ?Sized>(&mut self, api: &ApiClient, store: &mut S) -> Result<SubmitOutcome> {
        let request = self.build_request()?;
        match api::reserve(api, &request).await {
            Ok(receipt) => {
                storage::clear_reservation(store)?;
                tracing::info!(vin = %request.car.vin, "Reservation accepted");
                self.phase = ReservationPhase::Submitted;
                self.draft = ReservationDraft::default();
                self.errors.clear();
                self.submit_enabled = false;
                Ok(SubmitOutcome::Accepted(receipt))
            }
            Err(ClientError::Backend(message)) => {
                tracing::info!(%message, "Reservation rejected");
                Ok(SubmitOutcome::Rejected(message))
            }
            Err(e) => {
                tracing::error!(%e, "Error submitting reservation");
                Err(e)
            }
        }
    }

    /// Leaving the page needs confirmation. The draft stays saved either way.
    pub fn cancel(&self, confirmed: bool) -> CancelOutcome {
        if confirmed {
            CancelOutcome::ReturnToCatalog
        } else {
            CancelOutcome::Stay
        }
    }
}
