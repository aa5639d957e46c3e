//! Microsoft Graph request dispatcher for the B2C tenant.

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use std::time::Duration;
use tracing::{debug, info};

use super::models::{pretty_json, GraphRequest, GraphResponse};
use crate::auth::oauth::AccessToken;
use crate::config::Config;
use crate::error::GraphError;

/// HTTP request timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// HTTP connection timeout.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Microsoft Graph API client scoped to one tenant.
pub struct GraphClient {
    http_client: reqwest::Client,
    graph_endpoint: String,
    tenant: String,
}

impl GraphClient {
    /// Create a new Graph client from configuration.
    pub fn new(config: &Config) -> Result<Self, GraphError> {
        let http_client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| GraphError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            graph_endpoint: config.api.graph_endpoint.clone(),
            tenant: config.b2c.tenant.clone(),
        })
    }

    /// Target URL for a request.
    pub fn url_for(&self, request: &GraphRequest) -> String {
        build_url(&self.graph_endpoint, &self.tenant, request)
    }

    /// Send one request with the bearer token attached.
    ///
    /// Non-2xx responses become `GraphError::Api` carrying the pretty-printed
    /// error body. Successful bodies are returned untouched.
    pub async fn send(
        &self,
        request: &GraphRequest,
        token: &AccessToken,
    ) -> Result<GraphResponse, GraphError> {
        let url = self.url_for(request);
        info!("{} {}", request.method, url);

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .bearer_auth(token.as_str());

        if sends_body(&request.method) {
            let body = request.body.clone().unwrap_or_default();
            debug!("Content-Type: application/json\n{}", body);
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        if !status.is_success() {
            debug!("{} {} failed: HTTP {}", request.method, url, status);
            return Err(GraphError::Api {
                status: status.as_u16(),
                body: pretty_json(&body),
            });
        }

        Ok(GraphResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

fn sends_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PATCH
}

/// `graph_endpoint + tenant + path`, then the query.
///
/// The query argument is dual-purpose: when it contains `filter` it is an OData
/// expression joined with `?`, otherwise it is a path segment (an object id or
/// user principal name) joined with `/`.
pub fn build_url(graph_endpoint: &str, tenant: &str, request: &GraphRequest) -> String {
    let mut url = format!("{}{}{}", graph_endpoint, tenant, request.path);

    if let Some(query) = request.query.as_deref().filter(|q| !q.is_empty()) {
        if query.contains("filter") {
            url.push('?');
        } else {
            url.push('/');
        }
        url.push_str(query);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::secure::SecureString;
    use chrono::Utc;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "https://graph.microsoft.com/v1.0/";
    const TENANT: &str = "contoso.onmicrosoft.com";

    fn token() -> AccessToken {
        AccessToken {
            value: SecureString::new("test-token".into()),
            expires_at: Utc::now(),
        }
    }

    fn client_for(server: &MockServer) -> GraphClient {
        let mut config = Config::parse(include_str!("../../config.toml")).unwrap();
        config.api.graph_endpoint = format!("{}/", server.uri());
        config.b2c.tenant = TENANT.to_string();
        GraphClient::new(&config).unwrap()
    }

    #[test]
    fn test_build_url_without_query() {
        let url = build_url(ENDPOINT, TENANT, &GraphRequest::get_users(None));
        assert_eq!(url, "https://graph.microsoft.com/v1.0/contoso.onmicrosoft.com/users");

        let url = build_url(ENDPOINT, TENANT, &GraphRequest::get_users(Some(String::new())));
        assert!(url.ends_with("/users"));
    }

    #[test]
    fn test_build_url_filter_query() {
        let request = GraphRequest::get_users(Some(
            "$filter=startswith(displayName,'a')".to_string(),
        ));
        let url = build_url(ENDPOINT, TENANT, &request);
        assert!(url.ends_with("/users?$filter=startswith(displayName,'a')"));
    }

    #[test]
    fn test_build_url_path_segment_query() {
        let request = GraphRequest::get_users(Some("someuser@contoso.com".to_string()));
        let url = build_url(ENDPOINT, TENANT, &request);
        assert!(url.ends_with("/users/someuser@contoso.com"));
    }

    #[tokio::test]
    async fn test_send_get_returns_raw_body() {
        let server = MockServer::start().await;
        let raw = r#"{"id":"abc","displayName":"Jane"}"#;
        Mock::given(method("GET"))
            .and(path(format!("/{}/users/abc", TENANT)))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(raw))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send(&GraphRequest::get_user_by_id("abc"), &token())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.status_line(), "200: OK");
        assert_eq!(response.body, raw);
    }

    #[tokio::test]
    async fn test_send_filter_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/{}/applications", TENANT)))
            .and(query_param(
                "$filter",
                "startswith(displayName,'b2c-extensions-app')",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"value":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send(&GraphRequest::get_b2c_extensions_app(), &token())
            .await
            .unwrap();
        assert_eq!(response.body, r#"{"value":[]}"#);
    }

    #[tokio::test]
    async fn test_send_post_sets_json_body() {
        let server = MockServer::start().await;
        let json = r#"{"displayName":"Jane"}"#;
        Mock::given(method("POST"))
            .and(path(format!("/{}/users", TENANT)))
            .and(header("content-type", "application/json"))
            .and(body_string(json))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":"new-id"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send(&GraphRequest::create_user(json.to_string()), &token())
            .await
            .unwrap();
        assert_eq!(response.status_line(), "201: Created");
    }

    #[tokio::test]
    async fn test_send_delete_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("/{}/users/abc", TENANT)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .send(&GraphRequest::delete_user("abc"), &token())
            .await
            .unwrap();
        assert_eq!(response.status, 204);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_send_non_success_embeds_pretty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string(
                r#"{"error":{"code":"Request_ResourceNotFound","message":"Resource 'abc' does not exist."}}"#,
            ))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send(&GraphRequest::get_user_by_id("abc"), &token())
            .await
            .unwrap_err();

        match err {
            GraphError::Api { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("\n    \"code\": \"Request_ResourceNotFound\""));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_transport_failure() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        drop(server);

        let err = client
            .send(&GraphRequest::get_users(None), &token())
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::Transport(_)));
    }
}
