//! Form and query payloads for the account pages.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Fields posted by the login form. Every field is optional so validation, not
/// the extractor, decides what a missing value means.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
    /// Checkbox value; only `on` enables a persistent cookie.
    pub remember: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct JoinForm {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

#[derive(IntoParams, Deserialize, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct RedirectQuery {
    /// Path to land on after authenticating.
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}
