//! Graph request/response types and the JSON helpers used around them.

use reqwest::Method;
use serde::Deserialize;

/// Display name prefix of the application that owns B2C extension properties.
pub const B2C_EXTENSIONS_APP: &str = "b2c-extensions-app";

/// A single Graph call, built from CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
    pub method: Method,
    /// Resource path below the tenant, starting with `/`.
    pub path: String,
    /// Either an OData expression or a trailing path segment, see `build_url`.
    pub query: Option<String>,
    /// JSON body text, sent verbatim.
    pub body: Option<String>,
}

impl GraphRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }

    fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn get_user_by_id(object_id: &str) -> Self {
        Self::new(Method::GET, format!("/users/{}", object_id))
    }

    pub fn get_users(query: Option<String>) -> Self {
        Self::new(Method::GET, "/users").with_query(query)
    }

    pub fn create_user(json: String) -> Self {
        Self::new(Method::POST, "/users").with_body(json)
    }

    pub fn update_user(object_id: &str, json: String) -> Self {
        Self::new(Method::PATCH, format!("/users/{}", object_id)).with_body(json)
    }

    pub fn delete_user(object_id: &str) -> Self {
        Self::new(Method::DELETE, format!("/users/{}", object_id))
    }

    pub fn get_extensions(app_object_id: &str) -> Self {
        Self::new(
            Method::GET,
            format!("/applications/{}/extensionProperties", app_object_id),
        )
    }

    pub fn register_extension(app_object_id: &str, json: String) -> Self {
        Self::new(
            Method::POST,
            format!("/applications/{}/extensionProperties", app_object_id),
        )
        .with_body(json)
    }

    pub fn unregister_extension(app_object_id: &str, extension_object_id: &str) -> Self {
        Self::new(
            Method::DELETE,
            format!(
                "/applications/{}/extensionProperties/{}",
                app_object_id, extension_object_id
            ),
        )
    }

    pub fn get_applications(query: Option<String>) -> Self {
        Self::new(Method::GET, "/applications").with_query(query)
    }

    /// The application holding the tenant's extension properties.
    pub fn get_b2c_extensions_app() -> Self {
        Self::get_applications(Some(format!(
            "$filter=startswith(displayName,'{}')",
            B2C_EXTENSIONS_APP
        )))
    }
}

/// Raw Graph response. The body is left exactly as received.
#[derive(Debug, Clone)]
pub struct GraphResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl GraphResponse {
    /// e.g. `201: Created`
    pub fn status_line(&self) -> String {
        format!("{}: {}", self.status, self.reason)
    }
}

/// Any directory object; only the id is of interest.
#[derive(Debug, Deserialize)]
pub struct DirectoryObject {
    pub id: Option<String>,
}

/// OData collection wrapper (`{"value": [...]}`).
#[derive(Debug, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub value: Vec<DirectoryObject>,
}

/// Pretty-print JSON text with two-space indentation, keeping field order and
/// values. Text that isn't JSON is returned unchanged.
///
/// Values are the decoded JSON values, not the wire bytes: string escapes are
/// re-rendered (`\/` prints as `/`) and a repeated key keeps its last value.
pub fn pretty_json(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| text.to_string())
}

/// `id` of the object in a create response.
pub fn object_id(body: &str) -> Option<String> {
    serde_json::from_str::<DirectoryObject>(body)
        .ok()
        .and_then(|object| object.id)
}

/// `value[0].id` of a collection response.
pub fn first_value_id(body: &str) -> Option<String> {
    serde_json::from_str::<Collection>(body)
        .ok()
        .and_then(|collection| collection.value.into_iter().next())
        .and_then(|object| object.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_paths() {
        let id = "6d51065f-2e1d-4707-8ec9-ad491bae55dd";
        assert_eq!(GraphRequest::get_user_by_id(id).path, format!("/users/{}", id));
        assert_eq!(GraphRequest::delete_user(id).method, Method::DELETE);

        let update = GraphRequest::update_user(id, "{}".into());
        assert_eq!(update.method, Method::PATCH);
        assert_eq!(update.body.as_deref(), Some("{}"));

        assert_eq!(
            GraphRequest::unregister_extension("app", "ext").path,
            "/applications/app/extensionProperties/ext"
        );
    }

    #[test]
    fn test_b2c_extensions_app_filter() {
        let request = GraphRequest::get_b2c_extensions_app();
        assert_eq!(request.path, "/applications");
        assert_eq!(
            request.query.as_deref(),
            Some("$filter=startswith(displayName,'b2c-extensions-app')")
        );
    }

    #[test]
    fn test_pretty_json_keeps_order_and_values() {
        let raw = r#"{"zeta":1.50,"alpha":"café","id":"abc"}"#;
        let pretty = pretty_json(raw);
        assert_eq!(
            pretty,
            "{\n  \"zeta\": 1.50,\n  \"alpha\": \"café\",\n  \"id\": \"abc\"\n}"
        );
    }

    #[test]
    fn test_pretty_json_renders_decoded_values() {
        let pretty = pretty_json(r#"{"url":"https:\/\/x","dup":1,"dup":2}"#);
        assert!(pretty.contains(r#""url": "https://x""#));
        assert!(pretty.contains(r#""dup": 2"#));
        assert!(!pretty.contains(r#""dup": 1"#));
    }

    #[test]
    fn test_pretty_json_passthrough_for_non_json() {
        assert_eq!(pretty_json(""), "");
        assert_eq!(pretty_json("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_object_id() {
        let body = r#"{"@odata.context":"x","id":"a1b2","displayName":"Jane"}"#;
        assert_eq!(object_id(body).as_deref(), Some("a1b2"));
        assert_eq!(object_id(r#"{"displayName":"Jane"}"#), None);
    }

    #[test]
    fn test_first_value_id() {
        let body = r#"{"value":[{"id":"909544d8","displayName":"b2c-extensions-app"},{"id":"other"}]}"#;
        assert_eq!(first_value_id(body).as_deref(), Some("909544d8"));
        assert_eq!(first_value_id(r#"{"value":[]}"#), None);
        assert_eq!(first_value_id(r#"{"error":{}}"#), None);
    }
}
