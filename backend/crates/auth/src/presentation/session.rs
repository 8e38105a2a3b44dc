//! Request-scoped session value
//!
//! The session layer inserts a [`SessionContext`] into request extensions.
//! Handlers take it as an extractor and return a [`SessionChange`] as a
//! response part; the layer applies the change once the handler returns.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use std::convert::Infallible;

use crate::domain::entity::{identity::Identity, session::SessionRecord};
use crate::error::SessionError;

/// The current session and the identity bound to it, if any
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub record: SessionRecord,
    pub identity: Option<Identity>,
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .ok_or(SessionError::MissingLayer)
    }
}

/// What to do with the session after the handler
#[derive(Debug, Clone)]
pub enum SessionChange {
    /// Persist this record (it replaces the stored one)
    Save(SessionRecord),
    /// Delete the session and clear the cookie
    Destroy,
}

impl IntoResponseParts for SessionChange {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.extensions_mut().insert(self);
        Ok(res)
    }
}
