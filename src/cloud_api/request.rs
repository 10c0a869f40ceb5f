use crate::cloud_api::types::RequestError;
use reqwest::Method;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

/// An authenticated call against the cloud API
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL, including the region origin
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Attach the `user-id` header carrying the token's username
    pub send_user_id: bool,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
            send_user_id: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, url).with_body(body)
    }

    /// Add a query parameter (builder pattern)
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the JSON body (builder pattern)
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Send the `user-id` header (builder pattern)
    pub fn with_user_id(mut self) -> Self {
        self.send_user_id = true;
        self
    }
}

/// The slice of the client that device-level operations need
///
/// Implementors attach `Authorization: Bearer {jwt}` to every request, fail
/// with [`RequestError`] on transport errors and non-2xx statuses, and return
/// the parsed JSON body. No retries.
pub trait AuthenticatedApi: Send + Sync {
    /// Origin every endpoint path is appended to
    fn base_url(&self) -> &str;

    /// Send an authenticated request and parse the JSON response
    fn send_authenticated_request(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Value, RequestError>> + Send + '_>>;
}
