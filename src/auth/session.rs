//! Self-contained session tokens stored in role cookies.
//!
//! The token is a signed JWT carrying `{sub, role, iat, exp}`. There is no
//! server-side session table and no revocation list: logout only clears the
//! cookie, so a copied cookie stays valid until it expires. This is a known,
//! accepted limitation of the design.

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn cookie_name(self) -> &'static str {
        match self {
            Role::Admin => "admin_session",
            Role::Employee => "employee_session",
        }
    }

    pub fn home_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Employee => "/employee",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    admin_ttl: Duration,
    employee_ttl: Duration,
    cookie_secure: bool,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.session)
    }
}

impl SessionKeys {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            admin_ttl: Duration::minutes(config.admin_ttl_minutes),
            employee_ttl: Duration::minutes(config.employee_ttl_minutes),
            cookie_secure: config.cookie_secure,
        }
    }

    fn ttl(&self, role: Role) -> Duration {
        match role {
            Role::Admin => self.admin_ttl,
            Role::Employee => self.employee_ttl,
        }
    }

    pub fn sign(&self, role: Role, user_id: Uuid) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl(role);
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, role = ?role, "session token signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }

    /// Verify and additionally require the token to carry the given role.
    /// A valid employee token never opens an admin session.
    pub fn verify_role(&self, token: &str, role: Role) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.role != role {
            anyhow::bail!("token role mismatch");
        }
        Ok(claims)
    }

    /// Set-Cookie value for a fresh session of the given role.
    pub fn build_cookie(&self, role: Role, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            role.cookie_name(),
            token,
            self.ttl(role).whole_seconds()
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Set-Cookie value that expires the role cookie immediately.
    pub fn clear_cookie(&self, role: Role) -> String {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            role.cookie_name()
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Pull a single cookie value out of a Cookie header.
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    fn make_keys() -> SessionKeys {
        SessionKeys::new(&SessionConfig {
            secret: "test-secret".into(),
            admin_ttl_minutes: 60 * 8,
            employee_ttl_minutes: 60 * 24 * 30,
            cookie_secure: false,
        })
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(Role::Admin, user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_role_rejects_wrong_role() {
        let keys = make_keys();
        let token = keys.sign(Role::Employee, Uuid::new_v4()).expect("sign");
        assert!(keys.verify_role(&token, Role::Employee).is_ok());
        let err = keys.verify_role(&token, Role::Admin).unwrap_err();
        assert!(err.to_string().contains("role mismatch"));
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let keys = make_keys();
        let mut token = keys.sign(Role::Admin, Uuid::new_v4()).expect("sign");
        token.push('x');
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_foreign_secret() {
        let keys = make_keys();
        let other = SessionKeys::new(&SessionConfig {
            secret: "other-secret".into(),
            admin_ttl_minutes: 60,
            employee_ttl_minutes: 60,
            cookie_secure: false,
        });
        let token = other.sign(Role::Admin, Uuid::new_v4()).expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn cookie_attributes() {
        let keys = make_keys();
        let cookie = keys.build_cookie(Role::Admin, "tok");
        assert!(cookie.starts_with("admin_session=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains(&format!("Max-Age={}", 60 * 60 * 8)));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let keys = make_keys();
        let cookie = keys.clear_cookie(Role::Employee);
        assert!(cookie.starts_with("employee_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn cookie_value_parses_header() {
        let header = "admin_session=abc; employee_session=def; other=1";
        assert_eq!(cookie_value(header, "admin_session"), Some("abc"));
        assert_eq!(cookie_value(header, "employee_session"), Some("def"));
        assert_eq!(cookie_value(header, "missing"), None);
    }
}
