pub mod config;
pub mod error;
pub mod models;
pub mod api;
pub mod storage;
pub mod controllers;
pub mod templates;
pub mod handlers;
pub mod routes;
pub mod utils;

pub use error::{ClientError, Result};
