//! Tag-cloud layout engine with a headless host and an HTTP front end.
//!
//! The engine lives in [`layout`]; [`routes`] exposes it over axum.

pub mod config;
pub mod errors;
pub mod layout;
pub mod models;
pub mod routes;
pub mod state;
