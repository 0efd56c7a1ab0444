//! Reqwest-based HTTP client for fetching user profiles.

use std::fmt;
use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use url::Url;

use super::{Error, IdentityConfig, Result, TRACING_TARGET};
use crate::{IdentityProvider, IdentityService, UserProfile};

/// Inner client that holds the HTTP client and configuration.
struct IdentityClientInner {
    http: Client,
    base_url: Url,
    config: IdentityConfig,
}

/// HTTP client for the identity provider's backend API.
///
/// Profiles are read from `GET {api_url}/users/{user_id}`, authenticated
/// with the configured secret key as a bearer token.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

impl IdentityClient {
    /// Creates a new client after validating the configuration.
    pub fn new(config: IdentityConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config.api_url()?;
        let timeout = config.effective_timeout();

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.effective_user_agent())
            .build()?;

        tracing::debug!(
            target: TRACING_TARGET,
            api_url = %base_url,
            timeout_ms = timeout.as_millis(),
            "Identity client created"
        );

        Ok(Self {
            inner: Arc::new(IdentityClientInner {
                http,
                base_url,
                config,
            }),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &IdentityConfig {
        &self.inner.config
    }

    /// Converts this client into an [`IdentityService`] for dependency injection.
    pub fn into_service(self) -> IdentityService {
        IdentityService::new(self)
    }

    /// Builds the profile URL for a user, percent-encoding the identifier.
    fn profile_url(&self, user_id: &str) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config("identity API URL cannot be a base".into()))?
            .pop_if_empty()
            .push("users")
            .push(user_id);
        Ok(url)
    }

    async fn request_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let url = self.profile_url(user_id)?;

        let response = self
            .inner
            .http
            .get(url)
            .bearer_auth(self.inner.config.secret_key())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(target: TRACING_TARGET, status = status.as_u16(), "Profile response received");

        match status {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.bytes().await?;
                let profile = serde_json::from_slice::<UserProfile>(&body)?;
                Ok(Some(profile))
            }
            status => Err(Error::Status { status }),
        }
    }
}

impl fmt::Debug for IdentityClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for IdentityClient {
    async fn fetch_profile(&self, user_id: &str) -> crate::Result<Option<UserProfile>> {
        if user_id.trim().is_empty() {
            return Err(crate::Error::invalid_input().with_message("user id cannot be empty"));
        }

        self.request_profile(user_id).await.map_err(crate::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use tokio::net::TcpListener;

    use super::*;
    use crate::ErrorKind;

    const SECRET: &str = "sk_test_identity";

    async fn user_handler(Path(user_id): Path<String>, headers: HeaderMap) -> Response {
        let expected = format!("Bearer {SECRET}");
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some(expected.as_str());
        if !authorized {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        match user_id.as_str() {
            "user_2" => (
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"id":"user_2","email_addresses":[{"id":"idn_1","email_address":"b@y.com"}]}"#,
            )
                .into_response(),
            "user 3/x" => (
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"id":"user 3/x","email_addresses":[]}"#,
            )
                .into_response(),
            "user_garbled" => "not json".into_response(),
            "user_down" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn spawn_provider() -> String {
        let app = Router::new().route("/v1/users/{user_id}", get(user_handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/v1")
    }

    async fn client_with_secret(secret: &str) -> IdentityClient {
        let api_url = spawn_provider().await;
        IdentityClient::new(IdentityConfig::new(api_url, secret).with_timeout(5))
            .expect("valid client config")
    }

    #[tokio::test]
    async fn fetches_existing_profile() {
        let client = client_with_secret(SECRET).await;
        let profile = client
            .fetch_profile("user_2")
            .await
            .expect("request succeeds")
            .expect("profile exists");

        assert_eq!(profile.id, "user_2");
        assert_eq!(profile.first_email_address(), Some("b@y.com"));
    }

    #[tokio::test]
    async fn unknown_user_is_none() {
        let client = client_with_secret(SECRET).await;
        let profile = client.fetch_profile("user_404").await.expect("request succeeds");
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn user_id_is_percent_encoded() {
        let client = client_with_secret(SECRET).await;
        let profile = client
            .fetch_profile("user 3/x")
            .await
            .expect("request succeeds")
            .expect("profile exists");
        assert!(profile.email_addresses.is_empty());
    }

    #[tokio::test]
    async fn failures_map_to_error_kinds() {
        let client = client_with_secret(SECRET).await;

        let down = client.fetch_profile("user_down").await.unwrap_err();
        assert_eq!(down.kind, ErrorKind::ServiceUnavailable);

        let garbled = client.fetch_profile("user_garbled").await.unwrap_err();
        assert_eq!(garbled.kind, ErrorKind::Serialization);

        let blank = client.fetch_profile("  ").await.unwrap_err();
        assert_eq!(blank.kind, ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn wrong_secret_is_an_authentication_error() {
        let client = client_with_secret("sk_wrong").await;
        let error = client.fetch_profile("user_2").await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Authentication);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(IdentityClient::new(IdentityConfig::new("::", SECRET)).is_err());
    }
}
