//! OAuth client credential smoke test.

use crate::core::{DEFAULT_OAUTH_ENDPOINT, OAuthSettings};
use crate::error::{Validation, ValidationError, ValidationKind};
use reqwest::{Client, StatusCode};

/// Checks OAuth client credentials with one authenticated GET.
///
/// The HTTP client is supplied by the caller, so timeouts, proxies and TLS roots are
/// under its control and tests can point the check at a local server.
///
/// # Examples
///
/// ```rust,no_run
/// use preflight_config::validators::OAuthCheck;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = reqwest::Client::builder()
///     .timeout(Duration::from_secs(3))
///     .build()?;
/// let check = OAuthCheck::new(client);
/// check
///     .validate("client-id", "client-secret", "GITHUB_CLIENT_ID", "GitHub")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OAuthCheck {
    client: Client,
    endpoint: String,
}

impl OAuthCheck {
    /// Create a check against the default endpoint.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: DEFAULT_OAUTH_ENDPOINT.to_string(),
        }
    }

    /// Create a check configured from loaded settings.
    pub fn from_settings(client: Client, settings: &OAuthSettings) -> Self {
        Self::new(client).with_endpoint(settings.endpoint.clone())
    }

    /// Probe a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Send `client_id:client_secret` as basic auth and require a 200 answer.
    ///
    /// The secret never appears in the error message.
    pub async fn validate(
        &self,
        client_id: &str,
        client_secret: &str,
        field: &str,
        field_group: &str,
    ) -> Validation {
        let fail = |detail: String| {
            ValidationError::for_field(
                ValidationKind::CredentialsRejected,
                field,
                field_group,
                format!("Credentials in {} were not accepted by {}: {}", field, self.endpoint, detail),
            )
        };

        let response = self
            .client
            .get(&self.endpoint)
            .basic_auth(client_id, Some(client_secret))
            .send()
            .await
            .map_err(|e| {
                let detail = e.without_url().to_string();
                tracing::warn!(endpoint = %self.endpoint, error = %detail, "OAuth endpoint not reachable");
                fail(detail)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(endpoint = %self.endpoint, %status, "OAuth credentials rejected");
            return Err(fail(format!("status {}", status)));
        }
        Ok(())
    }
}
