//! Form DTOs (Data Transfer Objects)
//!
//! Both forms carry a plaintext password, so neither derives `Debug`.

use serde::Deserialize;

/// POST /sign-up body
#[derive(Deserialize)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
}

/// POST /log-in body
#[derive(Deserialize)]
pub struct LogInForm {
    pub username: String,
    pub password: String,
}
