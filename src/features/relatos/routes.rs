use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::relatos::handlers::{self, RelatoState};
use crate::features::relatos::services::RelatoService;

/// Create routes for the relatos feature
///
/// All routes are public; submitter authentication is out of scope.
pub fn routes(relato_service: Arc<RelatoService>) -> Router {
    let state = RelatoState { relato_service };

    Router::new()
        .route(
            "/relatos",
            post(handlers::create_relato).get(handlers::list_relatos),
        )
        .route("/test", get(handlers::test_endpoint))
        .with_state(state)
}
