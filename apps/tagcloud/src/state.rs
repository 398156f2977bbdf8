use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Layout passes keep no state between requests; each request builds its own
/// host and cloud.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}
