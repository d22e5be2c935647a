//! Firebase Identity Toolkit authentication.
//!
//! Handles email/password sign-in and ID token refresh.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use venus_gecko_core::Email;

use crate::backend::{AuthError, BackendError, Session};

/// Identity Toolkit password sign-in endpoint.
const SIGN_IN_ENDPOINT: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword";

/// Secure token refresh endpoint.
const REFRESH_ENDPOINT: &str = "https://securetoken.googleapis.com/v1/token";

/// Error codes that mean the credentials were rejected.
const CREDENTIAL_ERRORS: &[&str] = &[
    "INVALID_PASSWORD",
    "EMAIL_NOT_FOUND",
    "INVALID_LOGIN_CREDENTIALS",
    "INVALID_EMAIL",
    "USER_DISABLED",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Token lifetime in seconds, as a decimal string.
    expires_in: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Error code from an Identity Toolkit error body.
///
/// Messages look like `INVALID_PASSWORD` or
/// `TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled...`.
fn error_code(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    let code = envelope.error.message.split(':').next()?.trim().to_owned();
    (!code.is_empty()).then_some(code)
}

fn lifetime_secs(expires_in: &str) -> i64 {
    expires_in.trim().parse().unwrap_or(3600)
}

/// Authenticate with email and password.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the account rejects the
/// credentials, `AuthError::Backend` for transport or service failures.
#[instrument(skip(client, api_key, password), fields(email = %email))]
pub async fn sign_in(
    client: &reqwest::Client,
    api_key: &SecretString,
    email: &Email,
    password: &SecretString,
) -> Result<Session, AuthError> {
    let now = chrono::Utc::now().timestamp();

    let response = client
        .post(SIGN_IN_ENDPOINT)
        .query(&[("key", api_key.expose_secret())])
        .json(&SignInRequest {
            email: email.as_str(),
            password: password.expose_secret(),
            return_secure_token: true,
        })
        .send()
        .await
        .map_err(BackendError::from)?;

    let status = response.status();
    let body = response.text().await.map_err(BackendError::from)?;

    if status.is_success() {
        let signed_in: SignInResponse = serde_json::from_str(&body).map_err(BackendError::from)?;
        return Ok(Session {
            uid: signed_in.local_id,
            email: email.clone(),
            id_token: SecretString::from(signed_in.id_token),
            refresh_token: signed_in.refresh_token.map(SecretString::from),
            expires_at: now + lifetime_secs(&signed_in.expires_in),
        });
    }

    match error_code(&body) {
        Some(code) if CREDENTIAL_ERRORS.contains(&code.as_str()) => {
            tracing::warn!(code = %code, "sign-in rejected");
            Err(AuthError::InvalidCredentials)
        }
        code => {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Identity Toolkit returned non-success status"
            );
            Err(AuthError::Backend(BackendError::Status {
                status: status.as_u16(),
                message: code.unwrap_or_else(|| body.chars().take(200).collect()),
            }))
        }
    }
}

/// Exchange a refresh token for a new ID token.
///
/// Returns the session with fresh tokens and expiry.
///
/// # Errors
///
/// Returns `BackendError::PermissionDenied` if the refresh token was
/// revoked or expired.
#[instrument(skip_all, fields(uid = %session.uid))]
pub async fn refresh(
    client: &reqwest::Client,
    api_key: &SecretString,
    session: &Session,
) -> Result<Session, BackendError> {
    let Some(refresh_token) = &session.refresh_token else {
        return Err(BackendError::PermissionDenied(
            "session expired and cannot be refreshed".to_string(),
        ));
    };
    let now = chrono::Utc::now().timestamp();

    let response = client
        .post(REFRESH_ENDPOINT)
        .query(&[("key", api_key.expose_secret())])
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose_secret()),
        ])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "token refresh failed"
        );
        return Err(BackendError::PermissionDenied(
            error_code(&body).unwrap_or_else(|| format!("HTTP {status}")),
        ));
    }

    let refreshed: RefreshResponse = serde_json::from_str(&body)?;
    Ok(Session {
        uid: session.uid.clone(),
        email: session.email.clone(),
        id_token: SecretString::from(refreshed.id_token),
        refresh_token: Some(SecretString::from(refreshed.refresh_token)),
        expires_at: now + lifetime_secs(&refreshed.expires_in),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_plain() {
        let body = r#"{"error": {"code": 400, "message": "INVALID_PASSWORD", "errors": []}}"#;
        assert_eq!(error_code(body).as_deref(), Some("INVALID_PASSWORD"));
    }

    #[test]
    fn test_error_code_with_detail() {
        let body = r#"{"error": {"code": 400, "message": "TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled."}}"#;
        assert_eq!(error_code(body).as_deref(), Some("TOO_MANY_ATTEMPTS_TRY_LATER"));
    }

    #[test]
    fn test_error_code_unparseable() {
        assert_eq!(error_code("<html>"), None);
    }

    #[test]
    fn test_lifetime_parse() {
        assert_eq!(lifetime_secs("3600"), 3600);
        assert_eq!(lifetime_secs("garbage"), 3600);
    }

    #[test]
    fn test_sign_in_response_shape() {
        let body = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "uid-1",
            "email": "admin@venusgecko.kr",
            "idToken": "jwt",
            "registered": true,
            "refreshToken": "refresh",
            "expiresIn": "3600"
        }"#;
        let parsed: SignInResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.local_id, "uid-1");
        assert_eq!(parsed.refresh_token.as_deref(), Some("refresh"));
    }
}
