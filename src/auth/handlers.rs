use axum::{
    extract::{FromRef, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CheckResponse, EmployeeSummary, LoginRequest, LoginResponse, LogoutResponse},
        password::verify_password,
        repo::{Admin, Employee},
        session::{cookie_value, Role, SessionKeys},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/check", get(check))
}

pub fn employee_routes() -> Router<AppState> {
    Router::new().route("/employees", get(list_employees))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn login_success(
    keys: &SessionKeys,
    role: Role,
    user_id: uuid::Uuid,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let token = keys.sign(role, user_id)?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        keys.build_cookie(role, &token)
            .parse()
            .map_err(|e| anyhow::anyhow!("cookie header: {e}"))?,
    );
    info!(%user_id, ?role, "login succeeded");
    Ok((
        headers,
        Json(LoginResponse {
            ok: true,
            role,
            redirect_to: role.home_path(),
        }),
    ))
}

/// Admin records are checked first, then employees; first match wins. An
/// email must never exist in both tables. Unknown email and wrong password
/// produce the same generic 401 so the response does not reveal which.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Missing credentials"));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }

    let keys = SessionKeys::from_ref(&state);

    if let Some(admin) = Admin::find_by_email(&state.db, &payload.email).await? {
        if !verify_password(&payload.password, &admin.password_hash)? {
            warn!(user_id = %admin.id, "admin login invalid password");
            return Err(ApiError::Auth("Invalid credentials".into()));
        }
        return login_success(&keys, Role::Admin, admin.id);
    }

    if let Some(employee) = Employee::find_by_email(&state.db, &payload.email).await? {
        if !verify_password(&payload.password, &employee.password_hash)? {
            warn!(user_id = %employee.id, "employee login invalid password");
            return Err(ApiError::Auth("Invalid credentials".into()));
        }
        return login_success(&keys, Role::Employee, employee.id);
    }

    warn!("login unknown email");
    Err(ApiError::Auth("Invalid credentials".into()))
}

/// Clears both role cookies. The tokens themselves stay valid until expiry;
/// there is no server-side revocation (see `auth::session`).
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<LogoutResponse>), ApiError> {
    let keys = SessionKeys::from_ref(&state);
    let mut headers = HeaderMap::new();
    for role in [Role::Admin, Role::Employee] {
        headers.append(
            header::SET_COOKIE,
            keys.clear_cookie(role)
                .parse()
                .map_err(|e| anyhow::anyhow!("cookie header: {e}"))?,
        );
    }
    Ok((headers, Json(LogoutResponse { ok: true })))
}

/// Parses the cookie without touching the credential store: the identity in
/// the token is trusted until it expires, so deleted accounts stay
/// authenticated for the remainder of their cookie lifetime.
#[instrument(skip(state, headers))]
pub async fn check(State(state): State<AppState>, headers: HeaderMap) -> Json<CheckResponse> {
    let keys = SessionKeys::from_ref(&state);
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());

    for role in [Role::Admin, Role::Employee] {
        let claims = cookie_header
            .and_then(|header| cookie_value(header, role.cookie_name()))
            .and_then(|token| keys.verify_role(token, role).ok());
        if let Some(claims) = claims {
            return Json(CheckResponse {
                authenticated: true,
                role: Some(role),
                user_id: Some(claims.sub),
            });
        }
    }

    Json(CheckResponse {
        authenticated: false,
        role: None,
        user_id: None,
    })
}

/// Worker list for the submission form, sourced from the employee table.
#[instrument(skip(state))]
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeSummary>>, ApiError> {
    let employees = Employee::list(&state.db).await?;
    let items = employees
        .into_iter()
        .map(|e| EmployeeSummary {
            id: e.id,
            name: e.name,
        })
        .collect();
    Ok(Json(items))
}
