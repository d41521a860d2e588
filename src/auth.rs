use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::{
    config::{AppConfig, Env},
    session::{Identity, Role, Session},
};

/// Name of the cookie carrying the session token for page navigations.
pub const SESSION_COOKIE: &str = "session";

/// Claims
///
/// Payload of the session token issued by the auth provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the provider's user id.
    pub sub: String,
    /// Role claim: 'admin', 'seller' or 'buyer'.
    #[serde(default)]
    pub role: String,
    /// Expiration Time (exp).
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// SessionSnapshot Extractor Result
///
/// The session of the current request, resolved server-side. Resolution is
/// synchronous, so the snapshot is never in the loading state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot(pub Session);

/// SessionSnapshot Extractor Implementation
///
/// Never rejects: a missing, malformed or expired token is simply an anonymous
/// session, which the gate treats as a normal state.
///
/// The process involves:
/// 1. Dependency Resolution: pulling AppConfig from the application state.
/// 2. Local Bypass: `x-user-id` / `x-user-role` headers in `Env::Local` only.
/// 3. Token Extraction: Bearer header first, then the `session` cookie.
/// 4. Token Validation: HS256 decode with expiry checks.
impl<S> FromRequestParts<S> for SessionSnapshot
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            if let Some(identity) = local_bypass_identity(&parts.headers) {
                return Ok(SessionSnapshot(Session::authenticated(identity)));
            }
        }

        let session = session_token(&parts.headers)
            .and_then(|token| identity_from_token(&token, &config.jwt_secret))
            .map(Session::authenticated)
            .unwrap_or_else(Session::anonymous);

        Ok(SessionSnapshot(session))
    }
}

/// Development shortcut: trust explicit identity headers.
fn local_bypass_identity(headers: &HeaderMap) -> Option<Identity> {
    let id = headers.get("x-user-id")?.to_str().ok()?.trim();
    if id.is_empty() {
        return None;
    }
    let role = headers
        .get("x-user-role")
        .and_then(|value| value.to_str().ok())
        .map(Role::from_claim)
        .unwrap_or(Role::Buyer);
    Some(Identity::new(id, role))
}

/// Finds the session token: `Authorization: Bearer` wins over the cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

/// Decodes and validates a session token into an identity.
pub fn identity_from_token(token: &str, secret: &str) -> Option<Identity> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Some(Identity::new(
            data.claims.sub,
            Role::from_claim(&data.claims.role),
        )),
        Err(e) => {
            tracing::debug!(error = %e, "rejected session token");
            None
        }
    }
}
