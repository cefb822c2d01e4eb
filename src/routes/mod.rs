pub mod assessments;
pub mod health;
pub mod wizard;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::middleware::auth::require_bearer_auth;
use crate::AppState;

/// Every route of the service. `/health` is public; everything under
/// `/api` needs a bearer token.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/wizards", post(wizard::open_wizard))
        .route(
            "/api/wizards/:id",
            get(wizard::get_wizard).delete(wizard::discard_wizard),
        )
        .route("/api/wizards/:id/basic-info", put(wizard::update_basic_info))
        .route("/api/wizards/:id/settings", put(wizard::update_settings))
        .route("/api/wizards/:id/questions", post(wizard::add_question))
        .route(
            "/api/wizards/:id/questions/:question_id",
            put(wizard::edit_question).delete(wizard::delete_question),
        )
        .route(
            "/api/wizards/:id/questions/:question_id/move",
            post(wizard::move_question),
        )
        .route("/api/wizards/:id/scopes", post(wizard::add_scope))
        .route(
            "/api/wizards/:id/scopes/:institution_id",
            put(wizard::update_scope).delete(wizard::remove_scope),
        )
        .route("/api/wizards/:id/next", post(wizard::next_step))
        .route("/api/wizards/:id/back", post(wizard::previous_step))
        .route("/api/wizards/:id/submit", post(wizard::submit))
        .route("/api/assessments", get(assessments::list_assessments))
        .route("/api/assessments/:id", get(assessments::get_assessment))
        .route(
            "/api/assessments/:id/status",
            get(assessments::get_assessment_status),
        )
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth));

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .with_state(state)
}
