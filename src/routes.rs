use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::models::AppState;

// Embed the stylesheet in the binary
const STYLESHEET: &str = include_str!("../static/styles.css");

pub fn build_router(state: AppState) -> Router {
    let assets = Router::new()
        .route("/static/styles.css", get(|| async { ([(CONTENT_TYPE, "text/css")], STYLESHEET) }))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400"),
        ));

    Router::new()
        .route("/", get(handlers::catalog::catalog_get))
        .route("/suggestion", get(handlers::catalog::suggestion_get))
        .route("/rent/:vin", post(handlers::catalog::rent_post))
        .route(
            "/reservation",
            get(handlers::reservation::reservation_get).post(handlers::reservation::reservation_post),
        )
        .route(
            "/reservation/cancel",
            get(handlers::reservation::cancel_get).post(handlers::reservation::cancel_post),
        )
        .merge(assets)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
