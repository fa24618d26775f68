use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

// Decoded only; the backend verifies the signature on every call
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user_id: Uuid,
    pub expires_at: Option<i64>,
}

#[derive(Deserialize)]
struct Claims {
    sub: Uuid,
    exp: Option<i64>,
}

impl Session {
    pub fn from_token(token: &str) -> Result<Self, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized("missing access token".to_string()));
        }

        let payload = token
            .split('.')
            .nth(1)
            .ok_or_else(|| AppError::Unauthorized("malformed access token".to_string()))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|_| AppError::Unauthorized("malformed access token".to_string()))?;
        let claims: Claims = serde_json::from_slice(&bytes)
            .map_err(|_| AppError::Unauthorized("access token has no subject".to_string()))?;

        if let Some(exp) = claims.exp {
            if exp <= Utc::now().timestamp() {
                return Err(AppError::Unauthorized("session expired".to_string()));
            }
        }

        Ok(Self {
            access_token: token.to_string(),
            user_id: claims.sub,
            expires_at: claims.exp,
        })
    }

    pub fn from_authorization(header: Option<&str>) -> Result<Self, AppError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .unwrap_or("");
        Self::from_token(token)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn token_for(user_id: Uuid, exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = serde_json::json!({ "sub": user_id, "exp": exp, "role": "authenticated" });
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }
}
