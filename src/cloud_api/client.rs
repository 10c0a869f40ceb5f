use crate::cloud_api::config::ClientConfig;
use crate::cloud_api::models::{
    Account, Device, DevicesResponse, LoginResponse, Task, TasksResponse,
};
use crate::cloud_api::region::Region;
use crate::cloud_api::request::{ApiRequest, AuthenticatedApi};
use crate::cloud_api::token::Token;
use crate::cloud_api::types::{CloudError, LoginError, RequestError};
use crate::validation::{self, WireModel};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use url::Url;

/// Fixed page size of the task history request
pub const TASK_PAGE_LIMIT: u32 = 500;

/// Authenticated HTTP client for the Bambu Cloud API
///
/// A `CloudClient` only exists once a login succeeded (or a token was handed
/// in), and [`close`](CloudClient::close) consumes it, so calls before login
/// or after shutdown do not compile. Every method takes `&self`; concurrent
/// calls share the one HTTP session.
///
/// Tokens are never refreshed. When the service starts answering 401, log in
/// again.
#[derive(Debug)]
pub struct CloudClient {
    region: Region,
    token: Token,
    /// Region origin, or the configured override
    base_url: String,
    /// HTTP session shared by all requests
    http: reqwest::Client,
}

/// Request payload for login
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    account: &'a str,
    password: &'a str,
}

impl CloudClient {
    /// Log in with email and password
    ///
    /// Credentials are sent in plain text over TLS to
    /// `{region.base_url()}/user-service/user/login`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bambu_cloud::{CloudClient, Region};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = CloudClient::login("me@example.com", "hunter2", Region::Europe).await?;
    ///
    /// for device in client.get_devices().await? {
    ///     println!("{} ({}) online={}", device.name, device.dev_id, device.online);
    /// }
    ///
    /// client.close();
    /// # Ok(())
    /// # }
    /// ```
    pub async fn login(email: &str, password: &str, region: Region) -> Result<Self, LoginError> {
        Self::login_with_config(email, password, region, ClientConfig::default()).await
    }

    /// Log in with an explicit [`ClientConfig`]
    pub async fn login_with_config(
        email: &str,
        password: &str,
        region: Region,
        config: ClientConfig,
    ) -> Result<Self, LoginError> {
        let http = config.build_http_client().map_err(LoginError::Request)?;
        let base_url = config.base_url_for(region);
        let url = format!("{}/user-service/user/login", base_url);

        tracing::info!("Logging in to Bambu Cloud: region={}", region);
        tracing::debug!("Sending login request to: {}", url);

        let request = http.post(&url).json(&LoginRequest {
            account: email,
            password,
        });
        let body = send_json(request).await.map_err(|e| {
            tracing::error!("Login request failed: {}", e);
            LoginError::Request(e)
        })?;

        let login: LoginResponse = validation::decode(&body).map_err(|e| {
            tracing::error!("Failed to parse login response: {}", e);
            LoginError::InvalidResponse(e)
        })?;

        let token = Token::try_from(login.access_token).map_err(LoginError::Token)?;

        tracing::info!("Logged in successfully: username={}", token.username());

        Ok(Self {
            region,
            token,
            base_url,
            http,
        })
    }

    /// Build a client around a token obtained elsewhere
    pub fn from_token(token: Token, region: Region, config: ClientConfig) -> Result<Self, RequestError> {
        let http = config.build_http_client()?;
        let base_url = config.base_url_for(region);

        tracing::debug!(
            "Creating CloudClient for {} with base URL: {}",
            token.username(),
            base_url
        );

        Ok(Self {
            region,
            token,
            base_url,
            http,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn username(&self) -> &str {
        self.token.username()
    }

    /// Origin all endpoints are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// MQTT broker for this client's region; no network call
    pub fn mqtt_host(&self) -> &'static str {
        self.region.mqtt_host()
    }

    /// Fetch the account profile
    pub async fn get_profile(&self) -> Result<Account, CloudError> {
        let request = ApiRequest::get(self.endpoint("/user-service/my/profile"));
        self.fetch(request).await
    }

    /// Fetch the printers bound to the account
    ///
    /// Order is whatever the server returns and may differ between calls.
    pub async fn get_devices(&self) -> Result<Vec<Device>, CloudError> {
        let request = ApiRequest::get(self.endpoint("/iot-service/api/user/bind"));
        let response: DevicesResponse = self.fetch(request).await?;

        tracing::debug!("Fetched {} bound devices", response.devices.len());
        Ok(response.devices)
    }

    /// Fetch up to [`TASK_PAGE_LIMIT`] tasks, optionally for one device only
    ///
    /// Sends `limit=500` and `deviceId` (empty when `only_device` is `None`).
    /// There is no pagination past the first page.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bambu_cloud::{CloudClient, Region};
    ///
    /// # tokio_test::block_on(async {
    /// let client = CloudClient::login("me@example.com", "hunter2", Region::China)
    ///     .await
    ///     .unwrap();
    ///
    /// let all = client.get_tasks(None).await.unwrap();
    /// let one = client.get_tasks(Some("01S00C000000001")).await.unwrap();
    /// println!("{} tasks in total, {} on that printer", all.len(), one.len());
    /// # });
    /// ```
    pub async fn get_tasks(&self, only_device: Option<&str>) -> Result<Vec<Task>, CloudError> {
        Ok(self.get_task_page(only_device).await?.hits)
    }

    /// Like [`get_tasks`](Self::get_tasks) but keeps the server's `total`
    ///
    /// Only the first page is fetched; `total` can exceed `hits.len()`.
    pub async fn get_task_page(&self, only_device: Option<&str>) -> Result<TasksResponse, CloudError> {
        let request = ApiRequest::get(self.endpoint("/user-service/my/tasks"))
            .with_query("limit", TASK_PAGE_LIMIT.to_string())
            .with_query("deviceId", only_device.unwrap_or_default());
        let response: TasksResponse = self.fetch(request).await?;

        tracing::debug!(
            "Fetched {} of {} tasks (device filter: {:?})",
            response.hits.len(),
            response.total,
            only_device
        );
        Ok(response)
    }

    /// Camera streaming URL for `device`, see [`Device::camera_url`]
    pub async fn camera_url(&self, device: &Device) -> Result<Url, CloudError> {
        device.camera_url(self).await
    }

    /// Release the HTTP session
    pub fn close(self) {
        tracing::info!("Closing Bambu Cloud client for {}", self.token.username());
        drop(self.http);
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send an authenticated request and decode the body as `T`
    async fn fetch<T: WireModel>(&self, request: ApiRequest) -> Result<T, CloudError> {
        let body = self.execute(request).await?;
        validation::decode(&body).map_err(|e| {
            tracing::error!("Response did not match {}: {}", T::SCHEMA.name, e);
            CloudError::Validation(e)
        })
    }

    /// The single seam every authenticated call goes through
    async fn execute(&self, request: ApiRequest) -> Result<Value, RequestError> {
        tracing::debug!("Sending {} request to: {}", request.method, request.url);

        let mut builder = self
            .http
            .request(request.method, &request.url)
            .header("Authorization", format!("Bearer {}", self.token.jwt()));

        if request.send_user_id {
            builder = builder.header("user-id", self.token.username());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        send_json(builder).await
    }
}

impl AuthenticatedApi for CloudClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send_authenticated_request(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Value, RequestError>> + Send + '_>> {
        Box::pin(self.execute(request))
    }
}

/// Send a request, fail on non-2xx, and parse the body as JSON
async fn send_json(request: reqwest::RequestBuilder) -> Result<Value, RequestError> {
    let response = request.send().await.map_err(|e| {
        tracing::error!("Failed to send request: {}", e);
        RequestError::from(e)
    })?;

    let status = response.status();
    tracing::debug!("Received response with status: {}", status);

    if !status.is_success() {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!("Request failed: HTTP {} - {}", status.as_u16(), error_body);

        return Err(RequestError::Http {
            status: status.as_u16(),
            message: error_body,
        });
    }

    let response_text = response.text().await.map_err(|e| {
        tracing::error!("Failed to read response body: {}", e);
        RequestError::Parse(format!("Failed to read response: {}", e))
    })?;

    serde_json::from_str(&response_text).map_err(|e| {
        tracing::error!("Failed to parse response JSON: {}", e);
        RequestError::Parse(format!("Failed to parse response JSON: {}", e))
    })
}
