/// Bearer-token authentication for Axum
///
/// Resolves the `Authorization: Bearer <token>` header to an [`AuthContext`]:
/// the token must be a valid access token, and its subject must still exist
/// in the user store. Handlers read the context through Axum's `Extension`
/// extractor once the middleware has inserted it.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskdesk_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.username, auth.user_id)
/// }
/// ```

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, warn};

use super::jwt::{validate_access_token, JwtError};
use crate::store::UserRepository;

/// Authenticated caller, added to request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID, used as the owner ID for every task operation
    pub user_id: i64,

    /// Login name of the authenticated user
    pub username: String,
}

impl AuthContext {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// Error type for bearer-token authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Authorization header present but not `Bearer <token>`
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),

    /// Token is valid but its user no longer exists
    #[error("User no longer exists")]
    UnknownUser,

    /// The user store failed
    #[error("User store error: {0}")]
    StoreError(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidToken(_) | AuthError::UnknownUser => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            AuthError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AuthError::StoreError(_) => json!({
                "error": "internal_error",
                "message": "Internal server error",
            }),
            AuthError::InvalidFormat(msg) => json!({
                "error": "bad_request",
                "message": msg,
            }),
            other => json!({
                "error": "unauthorized",
                "message": other.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Extracts the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    Ok(token)
}

/// Authenticates a request from its headers.
///
/// Validates the access token with `secret` and re-loads its subject from
/// `users`, rejecting tokens whose user has been removed.
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] / [`AuthError::InvalidFormat`] for a bad header
/// - [`AuthError::InvalidToken`] for an expired, forged or refresh token
/// - [`AuthError::UnknownUser`] when the subject no longer exists
/// - [`AuthError::StoreError`] when the user lookup fails
pub async fn authenticate(
    headers: &HeaderMap,
    secret: &str,
    users: &dyn UserRepository,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = validate_access_token(token, secret).map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        match e {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            _ => AuthError::InvalidToken("Invalid token".to_string()),
        }
    })?;

    let user = users
        .find_by_id(claims.sub)
        .await
        .map_err(|e| {
            error!(user_id = claims.sub, error = %e, "Failed to load user for token");
            AuthError::StoreError(e.to_string())
        })?
        .ok_or_else(|| {
            warn!(user_id = claims.sub, "Token subject no longer exists");
            AuthError::UnknownUser
        })?;

    Ok(AuthContext::new(user.id, user.username))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims, TokenType};
    use crate::models::user::NewUser;
    use crate::store::memory::InMemoryUserRepository;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn repo_with_user() -> (InMemoryUserRepository, i64) {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .insert(NewUser {
                username: "alice".to_string(),
                password_hash: "hash".to_string(),
                salt: "salt".to_string(),
            })
            .await
            .unwrap();
        (repo, user.id)
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")).unwrap(), "abc");
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Basic abc")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer   ")),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_valid_token() {
        let (repo, user_id) = repo_with_user().await;
        let token = create_token(&Claims::new(user_id, "alice", TokenType::Access), SECRET).unwrap();

        let ctx = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET, &repo)
            .await
            .unwrap();

        assert_eq!(ctx, AuthContext::new(user_id, "alice"));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_refresh_token() {
        let (repo, user_id) = repo_with_user().await;
        let token = create_token(&Claims::new(user_id, "alice", TokenType::Refresh), SECRET).unwrap();

        let err = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET, &repo)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_secret() {
        let (repo, user_id) = repo_with_user().await;
        let token = create_token(&Claims::new(user_id, "alice", TokenType::Access), SECRET).unwrap();

        let err = authenticate(
            &headers_with(&format!("Bearer {}", token)),
            "another-secret-key-at-least-32-bytes",
            &repo,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_user() {
        let (repo, _) = repo_with_user().await;
        let token = create_token(&Claims::new(999, "ghost", TokenType::Access), SECRET).unwrap();

        let err = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET, &repo)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownUser));
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AuthError::StoreError("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
