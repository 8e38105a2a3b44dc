//! App Router

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::application::config::AuthConfig;
use crate::domain::repository::{CredentialRepository, SessionStore};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{require_login, session_layer};

/// Create the app router with PostgreSQL repository
pub fn app_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    app_router_generic(repo, config)
}

/// Create the app router for any repository implementation
pub fn app_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: CredentialRepository + SessionStore + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/sign-up",
            get(handlers::sign_up_form).post(handlers::sign_up::<R>),
        )
        .route("/log-in", post(handlers::log_in::<R>))
        .route("/log-out", get(handlers::log_out))
        .route(
            "/restricted",
            get(handlers::restricted).layer(from_fn(require_login)),
        )
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), session_layer::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
