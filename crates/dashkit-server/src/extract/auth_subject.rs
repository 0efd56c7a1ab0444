//! Bearer token verification.
//!
//! Tokens are issued and signed by the identity provider; this service only
//! verifies them with the provider's public key and reads the `sub` claim.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_AUTHENTICATION as TRACING_TARGET;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::AuthKeys;

/// Claims read from identity-provider tokens.
///
/// Only `sub` and `exp` are required. Everything else the provider puts into
/// the token is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Identity-provider user id.
    pub sub: String,
    /// Expiration time (seconds since the Unix epoch).
    pub exp: i64,
    /// Issuer, checked only when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Issued at (seconds since the Unix epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl AuthClaims {
    fn from_token(token: &str, auth_keys: &AuthKeys) -> Result<Self> {
        let token_data =
            jsonwebtoken::decode::<Self>(token, auth_keys.decoding_key(), auth_keys.validation())
                .inspect_err(|error| {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        error = %error,
                        algorithm = %auth_keys.algorithm(),
                        "Bearer token rejected"
                    );
                })?;

        Ok(token_data.claims)
    }
}

/// Authenticated caller.
///
/// Rejects the request with `401 Unauthorized` unless it carries a bearer
/// token that verifies against the configured [`AuthKeys`] and names a
/// non-blank subject. The result is cached in the request extensions.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSubject {
    user_id: String,
}

impl AuthSubject {
    /// Creates a subject for `user_id`.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// Returns the identity-provider user id.
    #[inline]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn from_header(header: TypedHeader<Authorization<Bearer>>, auth_keys: &AuthKeys) -> Result<Self> {
        let claims = AuthClaims::from_token(header.token(), auth_keys)?;

        let user_id = claims.sub.trim();
        if user_id.is_empty() {
            tracing::warn!(target: TRACING_TARGET, "Bearer token has a blank subject");
            return Err(ErrorKind::Unauthorized
                .with_message("Authentication required")
                .with_context("Token does not identify a user")
                .with_resource("authentication"));
        }

        tracing::debug!(target: TRACING_TARGET, user_id = %user_id, "Bearer token verified");
        Ok(Self::new(user_id))
    }
}

impl<S> FromRequestParts<S> for AuthSubject
where
    S: Sync + Send,
    AuthKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(subject) = parts.extensions.get::<Self>() {
            return Ok(subject.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let auth_keys = AuthKeys::from_ref(state);

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(bearer_header) => {
                let subject = Self::from_header(bearer_header, &auth_keys)?;
                parts.extensions.insert(subject.clone());
                Ok(subject)
            }
            Err(rejection) => {
                let error = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                        .with_message("Authentication required")
                        .with_context("Missing Authorization header with Bearer token"),
                    TypedHeaderRejectionReason::Error(_) => ErrorKind::MalformedAuthToken
                        .with_message("Invalid token format")
                        .with_context("Authorization header must contain a valid Bearer token"),
                    _ => ErrorKind::InternalServerError
                        .with_message("Authentication processing failed")
                        .with_context("Unexpected error during header extraction"),
                };

                tracing::debug!(target: TRACING_TARGET, kind = %error.kind(), "Authorization header rejected");
                Err(error.with_resource("authentication"))
            }
        }
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        let error = match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue"),
            JwtErrorKind::InvalidToken => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is invalid")
                .with_context("The provided token format is unrecognized"),
            JwtErrorKind::InvalidSignature => ErrorKind::Unauthorized
                .with_message("Authentication token verification failed")
                .with_context("Token signature could not be verified"),
            JwtErrorKind::InvalidAlgorithm => ErrorKind::MalformedAuthToken
                .with_message("Authentication token uses unsupported format")
                .with_context("Token was signed with an incompatible algorithm"),
            JwtErrorKind::ImmatureSignature => ErrorKind::Unauthorized
                .with_message("Authentication token is not valid yet"),
            JwtErrorKind::InvalidIssuer => ErrorKind::Unauthorized
                .with_message("Authentication token is from an untrusted source")
                .with_context("Token was not issued by the configured identity provider"),
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is incomplete")
                .with_context(format!("Token is missing required field: {claim}")),
            JwtErrorKind::Base64(_) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token format is corrupted")
                .with_context("Token contains invalid base64 encoding"),
            JwtErrorKind::Json(_) | JwtErrorKind::Utf8(_) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token structure is invalid")
                .with_context("Token payload contains malformed data"),
            _ => ErrorKind::InternalServerError
                .with_message("Authentication processing failed")
                .with_context("An unexpected error occurred during token validation"),
        };

        error.with_resource("authentication")
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;
    use dashkit_test::fixtures::{TEST_ISSUER, TEST_PUBLIC_KEY_PEM, TestClaims, sign_claims, sign_token};

    use super::*;
    use crate::handler::ErrorResponse;
    use crate::service::AuthAlgorithm;

    fn auth_keys(issuer: &str) -> anyhow::Result<AuthKeys> {
        let keys = AuthKeys::from_pem(TEST_PUBLIC_KEY_PEM.as_bytes(), AuthAlgorithm::EdDsa, Some(issuer))?;
        Ok(keys)
    }

    fn server(auth_keys: AuthKeys) -> anyhow::Result<TestServer> {
        async fn whoami(subject: AuthSubject) -> String {
            subject.user_id().to_owned()
        }

        let router = Router::new().route("/whoami", get(whoami)).with_state(auth_keys);
        Ok(TestServer::new(router)?)
    }

    #[tokio::test]
    async fn valid_token_yields_subject() -> anyhow::Result<()> {
        let server = server(auth_keys(TEST_ISSUER)?)?;

        let response = server
            .get("/whoami")
            .authorization_bearer(sign_token("user_2abc")?)
            .await;

        response.assert_status_ok();
        response.assert_text("user_2abc");
        Ok(())
    }

    #[tokio::test]
    async fn missing_header_is_rejected() -> anyhow::Result<()> {
        let server = server(auth_keys(TEST_ISSUER)?)?;

        let response = server.get("/whoami").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<ErrorResponse>();
        assert_eq!(body.name, "missing_auth_token");
        assert_eq!(body.resource.as_deref(), Some("authentication"));
        Ok(())
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() -> anyhow::Result<()> {
        let server = server(auth_keys(TEST_ISSUER)?)?;

        let response = server.get("/whoami").authorization_bearer("not-a-jwt").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn expired_token_is_rejected() -> anyhow::Result<()> {
        let server = server(auth_keys(TEST_ISSUER)?)?;
        let token = sign_claims(&TestClaims::new("user_2abc").expired())?;

        let response = server.get("/whoami").authorization_bearer(token).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<ErrorResponse>();
        assert_eq!(body.name, "unauthorized");
        Ok(())
    }

    #[tokio::test]
    async fn foreign_issuer_is_rejected() -> anyhow::Result<()> {
        let server = server(auth_keys("https://someone.else")?)?;

        let response = server
            .get("/whoami")
            .authorization_bearer(sign_token("user_2abc")?)
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn blank_subject_is_rejected() -> anyhow::Result<()> {
        let server = server(auth_keys(TEST_ISSUER)?)?;

        let response = server
            .get("/whoami")
            .authorization_bearer(sign_token("   ")?)
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[test]
    fn jwt_errors_map_to_auth_kinds() {
        let expired = Error::from(JwtError::from(JwtErrorKind::ExpiredSignature));
        assert_eq!(expired.kind(), ErrorKind::Unauthorized);
        assert_eq!(expired.resource(), Some("authentication"));

        let invalid = Error::from(JwtError::from(JwtErrorKind::InvalidToken));
        assert_eq!(invalid.kind(), ErrorKind::MalformedAuthToken);
    }
}
