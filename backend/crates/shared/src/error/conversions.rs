//! Error conversions
//!
//! Behind the `axum` feature, [`AppError`] renders as a small HTML page.

#[cfg(feature = "axum")]
use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::response::Html;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let action = self
            .action()
            .map(|a| format!("<p>{}</p>", html_escape::encode_text(a)))
            .unwrap_or_default();

        let body = format!(
            "<!DOCTYPE html>\n<html><head><title>{title}</title></head>\
             <body><h1>{title}</h1><p>{detail}</p>{action}<a href=\"/\">Back</a></body></html>",
            title = self.kind().as_str(),
            detail = html_escape::encode_text(self.message()),
            action = action,
        );

        (status, Html(body)).into_response()
    }
}
