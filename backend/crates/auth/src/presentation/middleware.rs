//! Session Middleware
//!
//! `session_layer` wraps every route; `require_login` gates protected ones.

use axum::extract::{Request, State};
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::application::session_gate::{self, Access, OpenedSession, SessionGate};
use crate::domain::repository::{CredentialRepository, SessionStore};
use crate::presentation::handlers::AuthAppState;
use crate::presentation::session::{SessionChange, SessionContext};

/// Load the session before the handler and persist it afterwards.
///
/// A session that was neither changed by the handler nor newly created is
/// not written back.
pub async fn session_layer<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: CredentialRepository + SessionStore + Clone + Send + Sync + 'static,
{
    let gate = SessionGate::new(state.repo.clone(), state.config.clone());
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let OpenedSession { mut record, is_new } = match gate.open(token.as_deref()).await {
        Ok(opened) => opened,
        Err(e) => return e.into_response(),
    };

    let resolved = match gate.resolve(&mut record).await {
        Ok(resolved) => resolved,
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(SessionContext {
        record: record.clone(),
        identity: resolved.identity,
    });

    let mut response = next.run(req).await;
    let cookie = state.config.cookie_config();

    let to_save = match response.extensions_mut().remove::<SessionChange>() {
        Some(SessionChange::Destroy) => {
            if let Err(e) = gate.destroy(&record.session_id).await {
                tracing::warn!(
                    session_id = %record.session_id,
                    error = %e,
                    "Failed to destroy session"
                );
            }
            set_cookie(&mut response, &cookie.build_delete_cookie());
            return response;
        }
        Some(SessionChange::Save(changed)) => Some(changed),
        None if is_new || resolved.unbound => Some(record),
        None => None,
    };

    if let Some(mut record) = to_save {
        match gate.commit(&mut record).await {
            Ok(token) => set_cookie(&mut response, &cookie.build_set_cookie(&token)),
            Err(e) => return e.into_response(),
        }
    }

    response
}

fn set_cookie(response: &mut Response, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!(error = %e, "Invalid Set-Cookie value"),
    }
}

/// Gate a protected route.
///
/// Anonymous requests are redirected to `/` with a message queued; the
/// inner handler never runs. Authenticated requests get the [`Identity`]
/// as a request extension.
///
/// [`Identity`]: crate::domain::entity::identity::Identity
pub async fn require_login(context: SessionContext, mut req: Request, next: Next) -> Response {
    let SessionContext {
        mut record,
        identity,
    } = context;

    match session_gate::authorize(&mut record, identity.as_ref()) {
        Access::Granted(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Access::Denied => {
            tracing::debug!(
                session_id = %record.session_id,
                path = %req.uri().path(),
                "Anonymous access to protected route"
            );
            (SessionChange::Save(record), Redirect::to("/")).into_response()
        }
    }
}
