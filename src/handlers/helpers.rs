use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::RngCore;

use crate::models::AppState;

pub const SESSION_COOKIE: &str = "carhop_session";

pub fn random_session_id() -> String {
    let mut b = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut b);
    hex::encode(b)
}

pub fn session_id_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// The session id of this browser, creating the cookie on first visit.
/// The returned jar must be part of the response.
pub fn ensure_session(jar: CookieJar) -> (CookieJar, String) {
    if let Some(sid) = session_id_from_jar(&jar) {
        return (jar, sid);
    }
    let sid = random_session_id();
    let cookie = Cookie::build((SESSION_COOKIE, sid.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), sid)
}

#[derive(Default)]
pub struct TemplateGlobals {
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
}

pub fn build_template_globals(state: &AppState, sid: &str) -> TemplateGlobals {
    let flash_messages = state.take_flash(sid);
    let has_flash_messages = !flash_messages.is_empty();
    TemplateGlobals {
        api_hostname: state.api_hostname.clone(),
        flash_messages,
        has_flash_messages,
    }
}

pub fn render_template<T: askama::Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
