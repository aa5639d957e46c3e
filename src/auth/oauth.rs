//! OAuth2 client-credentials flow for the B2C service principal.

use crate::auth::secure::SecureString;
use crate::config::{Config, Credentials};
use crate::error::AuthError;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// HTTP request timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// HTTP connection timeout.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// AADSTS code for a scope that is not of the shape `resource/.default`.
const AADSTS_INVALID_SCOPE: &str = "AADSTS70011";

/// Error markers meaning the app registration lacks granted permissions.
const PERMISSION_MARKERS: &[&str] = &[
    "interaction_required",
    "consent_required",
    "AADSTS65001",
    "AADSTS7000229",
    "AADSTS500011",
];

/// Bearer token for a single Graph call.
#[derive(Debug)]
pub struct AccessToken {
    pub value: SecureString,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }
}

/// OAuth2 client for Azure AD client-credentials token acquisition.
pub struct OAuth2Client {
    graph_resource: String,
    http_client: reqwest::Client,
}

impl OAuth2Client {
    /// Create a new OAuth2 client from configuration.
    pub fn new(config: &Config) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Unknown(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            graph_resource: config.api.graph_resource.clone(),
            http_client,
        })
    }

    /// Acquire an application token for `{graph_resource}/.default`.
    ///
    /// With client credentials the scope is always `resource/.default`: the
    /// application permissions are set statically and granted by a tenant admin.
    pub async fn acquire_token(&self, credentials: &Credentials) -> Result<AccessToken, AuthError> {
        let scope = default_scope(&self.graph_resource)?;
        let token_endpoint = token_url(&credentials.authority);

        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", scope.as_str()),
        ];

        debug!("Requesting token from {} for scope {}", token_endpoint, scope);

        let response = self
            .http_client
            .post(&token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Unknown(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            debug!("Token request failed: HTTP {} - {}", status, error_body);
            return Err(classify_token_error(status.as_u16(), &error_body));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Unknown(format!("Malformed token response: {}", e)))?;

        debug!("Token type: {}", token_response.token_type);
        let token = token_response.into_access_token(Utc::now());
        info!("Acquired application token, expires at {}", token.expires_at);
        debug!("Authorization: Bearer {}", token.value.preview(80));

        Ok(token)
    }
}

/// Token response from Azure AD.
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: SecureString,
    #[serde(default)]
    pub token_type: String,
    pub expires_in: u64,
}

impl TokenResponse {
    fn into_access_token(self, now: DateTime<Utc>) -> AccessToken {
        let seconds = i64::from(u32::try_from(self.expires_in).unwrap_or(u32::MAX));
        AccessToken {
            value: self.access_token,
            expires_at: now + ChronoDuration::seconds(seconds),
        }
    }
}

/// OAuth error payload from the token endpoint.
#[derive(Debug, Default, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
    #[serde(default)]
    error_codes: Vec<u64>,
}

/// Build the client-credentials scope for a resource URL.
pub fn default_scope(resource: &str) -> Result<String, AuthError> {
    let url = Url::parse(resource)
        .map_err(|e| AuthError::InvalidScope(format!("{} ({})", resource, e)))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AuthError::InvalidScope(format!(
            "{} (expected https://resourceurl)",
            resource
        )));
    }

    Ok(format!("{}/.default", resource.trim_end_matches('/')))
}

/// Token endpoint for an authority URL.
pub fn token_url(authority: &str) -> String {
    format!("{}/oauth2/v2.0/token", authority.trim_end_matches('/'))
}

/// Map a rejected token request onto the auth error taxonomy.
fn classify_token_error(status: u16, body: &str) -> AuthError {
    let payload: TokenErrorResponse = serde_json::from_str(body).unwrap_or_default();

    let codes: Vec<String> = payload
        .error_codes
        .iter()
        .map(|code| format!("AADSTS{}", code))
        .collect();
    let mentions = |marker: &str| {
        payload.error == marker
            || payload.error_description.contains(marker)
            || codes.iter().any(|c| c == marker)
    };

    let detail = if payload.error_description.is_empty() {
        format!("HTTP {}", status)
    } else {
        payload.error_description.clone()
    };

    if mentions(AADSTS_INVALID_SCOPE) {
        AuthError::InvalidScope(detail)
    } else if PERMISSION_MARKERS.iter().copied().any(mentions) {
        AuthError::InsufficientPermissions(detail)
    } else if payload.error.is_empty() {
        AuthError::Unknown(detail)
    } else {
        AuthError::Unknown(format!("{}: {}", payload.error, detail))
    }
}
