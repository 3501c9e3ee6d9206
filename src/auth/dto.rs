use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::Role;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub ok: bool,
    pub role: Role,
    pub redirect_to: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Session check result, derived from the cookie alone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub authenticated: bool,
    pub role: Option<Role>,
    pub user_id: Option<Uuid>,
}

/// Public part of an employee, used for the worker list.
#[derive(Debug, Serialize)]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub name: String,
}
