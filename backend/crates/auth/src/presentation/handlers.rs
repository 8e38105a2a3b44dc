//! HTTP Handlers

use axum::extract::{Extension, Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_gate::{self, LOGIN_FAILED_MESSAGE};
use crate::application::{Authenticator, Registrar};
use crate::domain::entity::identity::Identity;
use crate::domain::repository::{CredentialRepository, SessionStore};
use crate::error::{AuthFailure, RegistrationError};
use crate::presentation::dto::{LogInForm, SignUpForm};
use crate::presentation::session::{SessionChange, SessionContext};
use crate::presentation::views;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: CredentialRepository + SessionStore + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Index
// ============================================================================

/// GET /
///
/// Renders and clears the message queue.
pub async fn index(context: SessionContext) -> impl IntoResponse {
    let SessionContext {
        mut record,
        identity,
    } = context;

    let messages = session_gate::drain_messages(&mut record);
    let page = views::index_page(identity.as_ref(), &messages);

    let change = (!messages.is_empty()).then_some(SessionChange::Save(record));

    (change, Html(page))
}

// ============================================================================
// Sign Up
// ============================================================================

/// GET /sign-up
pub async fn sign_up_form() -> Html<String> {
    Html(views::sign_up_page(None))
}

/// POST /sign-up
///
/// Does not log the new user in.
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Form(form): Form<SignUpForm>,
) -> Response
where
    R: CredentialRepository + SessionStore + Clone + Send + Sync + 'static,
{
    let registrar = Registrar::new(state.repo.clone(), state.config.clone());

    match registrar.register(&form.username, form.password).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(
            e @ (RegistrationError::DuplicateUsername | RegistrationError::InvalidInput(_)),
        ) => {
            tracing::info!(error = %e, "Sign-up rejected");
            (e.status_code(), Html(views::sign_up_page(Some(&e.user_message())))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// Log In
// ============================================================================

/// POST /log-in
///
/// Success and failure both redirect to `/`; failure queues one message.
pub async fn log_in<R>(
    State(state): State<AuthAppState<R>>,
    context: SessionContext,
    Form(form): Form<LogInForm>,
) -> Response
where
    R: CredentialRepository + SessionStore + Clone + Send + Sync + 'static,
{
    let mut record = context.record;
    let authenticator = Authenticator::new(state.repo.clone(), state.config.clone());

    match authenticator.authenticate(&form.username, form.password).await {
        Ok(identity) => {
            session_gate::login(&mut record, &identity);
            tracing::info!(
                session_id = %record.session_id,
                user_id = %identity.user_id,
                "Session authenticated"
            );
        }
        Err(AuthFailure::InvalidCredentials) => {
            tracing::info!(session_id = %record.session_id, "Login rejected");
            record.push_message(LOGIN_FAILED_MESSAGE);
        }
        Err(e) => return e.into_response(),
    }

    (SessionChange::Save(record), Redirect::to("/")).into_response()
}

// ============================================================================
// Log Out
// ============================================================================

/// GET /log-out
pub async fn log_out() -> impl IntoResponse {
    (SessionChange::Destroy, Redirect::to("/"))
}

// ============================================================================
// Restricted
// ============================================================================

/// GET /restricted
///
/// Only reachable through `require_login`, which supplies the identity.
pub async fn restricted(
    Extension(identity): Extension<Identity>,
    context: SessionContext,
) -> impl IntoResponse {
    let mut record = context.record;
    let page_count = session_gate::record_visit(&mut record);

    (
        SessionChange::Save(record),
        Html(views::restricted_page(&identity, page_count)),
    )
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::new(ErrorKind::NotFound, "Page not found")
}
