use serde::Deserialize;

/// Form body for `POST /create` (registration).
///
/// Fields default to empty so that missing inputs surface as flash messages
/// rather than a 400.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// Form body for `POST /login`.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
