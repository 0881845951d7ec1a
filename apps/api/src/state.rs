use std::sync::Arc;

use crate::auth::AuthClient;
use crate::config::Config;
use crate::grading::EssayGrader;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Profile/correction/theme persistence. Production uses Postgres;
    /// tests swap in an in-memory store behind the same trait.
    pub store: Arc<dyn ProfileStore>,
    /// Opaque grading function. Default: Gemini.
    pub grader: Arc<dyn EssayGrader>,
    pub auth: AuthClient,
    pub config: Config,
}
