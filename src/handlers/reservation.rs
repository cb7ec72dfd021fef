use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::controllers::{CancelOutcome, ReservationForm, ReservationPhase, SubmitOutcome};
use crate::models::{AppState, ReservationDraft};
use crate::templates::{form_fields, CarCard, ConfirmTemplate, ReservationTemplate};

use super::helpers::{build_template_globals, ensure_session, render_template, TemplateGlobals};

const CANCEL_PROMPT: &str = "Are you sure you want to cancel? Your form data will be saved.";
const SUBMIT_FAILED: &str = "An error occurred while processing your reservation. Please try again.";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn render_form(state: &AppState, sid: &str, form: &ReservationForm, today: NaiveDate) -> Response {
    let TemplateGlobals {
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, sid);
    let phase = match form.phase() {
        ReservationPhase::FormActive(_) => "active",
        ReservationPhase::CarUnavailable(_) => "unavailable",
        ReservationPhase::NoCarSelected | ReservationPhase::Submitted => "none",
    };
    render_template(ReservationTemplate {
        api_hostname,
        flash_messages,
        has_flash_messages,
        phase,
        car: form.car().map(CarCard::detailed),
        fields: form_fields(form, today),
        total: form.total_display(),
        submit_enabled: form.is_submittable(),
    })
}

pub async fn reservation_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, sid) = ensure_session(jar);
    let today = today();
    let store = state.session_store(&sid);
    let form = ReservationForm::enter(&state.api, &store, today).await;
    (jar, render_form(&state, &sid, &form, today))
}

/// Body of the reservation form: the fields plus which button was pressed.
#[derive(Deserialize, Default)]
pub struct ReservationPost {
    /// "check" only validates; anything else reserves.
    #[serde(default)]
    pub intent: String,
    #[serde(flatten)]
    pub draft: ReservationDraft,
}

/// Full form post: every field is applied and validated, and the
/// reservation is sent only when all of them pass.
pub async fn reservation_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(post): Form<ReservationPost>,
) -> impl IntoResponse {
    let (jar, sid) = ensure_session(jar);
    let today = today();
    let mut store = state.session_store(&sid);
    let mut form = ReservationForm::enter(&state.api, &store, today).await;
    if !form.is_active() {
        return (jar, Redirect::to("/reservation").into_response());
    }

    let valid = match form.apply_all(post.draft, &mut store, today) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!(%e, "Failed to save reservation draft");
            false
        }
    };
    if !valid || post.intent == "check" {
        state.save_session_store(&sid, store);
        return (jar, render_form(&state, &sid, &form, today));
    }

    let response = match form.submit(&state.api, &mut store).await {
        Ok(SubmitOutcome::Accepted(_)) => {
            state.push_flash(&sid, "Reservation successful!");
            Redirect::to("/").into_response()
        }
        Ok(SubmitOutcome::Rejected(message)) => {
            state.push_flash(&sid, message);
            Redirect::to("/reservation").into_response()
        }
        Err(_) => {
            state.push_flash(&sid, SUBMIT_FAILED);
            Redirect::to("/reservation").into_response()
        }
    };
    state.save_session_store(&sid, store);
    (jar, response)
}

pub async fn cancel_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, sid) = ensure_session(jar);
    let TemplateGlobals {
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &sid);
    let page = ConfirmTemplate {
        api_hostname,
        flash_messages,
        has_flash_messages,
        message: CANCEL_PROMPT.to_string(),
        confirm_action: "/reservation/cancel".to_string(),
        back_href: "/reservation".to_string(),
    };
    (jar, render_template(page))
}

#[derive(Deserialize, Default)]
pub struct CancelForm {
    #[serde(default)]
    pub confirm: String,
}

pub async fn cancel_post(Form(f): Form<CancelForm>) -> Redirect {
    let confirmed = f.confirm == "yes";
    match ReservationForm::default().cancel(confirmed) {
        CancelOutcome::ReturnToCatalog => Redirect::to("/"),
        CancelOutcome::Stay => Redirect::to("/reservation"),
    }
}
