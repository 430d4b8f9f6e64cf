//! Network transport for the admin REST backend using [`reqwest`].

use tracing::debug;

use crate::client::errors::RequestError;
use crate::client::types::{ApiRequest, ApiResponse, Method, Transport};
use crate::config::AdminConfig;

/// Header carrying the static admin credential.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// HTTP transport bound to one backend base URL.
///
/// The admin credential is captured at construction and never changes for
/// the lifetime of the transport. No timeout or retry policy is applied.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    admin_token: Option<String>,
    session_token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        admin_token: Option<String>,
        session_token: Option<String>,
    ) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dk-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RequestError::Setup {
                message: e.to_string(),
            })?;

        Ok(Self::with_client(
            client,
            base_url,
            admin_token,
            session_token,
        ))
    }

    /// Create a transport reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        admin_token: Option<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_token,
            session_token,
        }
    }

    pub fn from_config(config: &AdminConfig) -> Result<Self, RequestError> {
        Self::new(
            config.base_url(),
            config.admin_token().map(str::to_string),
            config.session_token().map(str::to_string),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, RequestError> {
        let url = self.url_for(&request.path);
        debug!(
            event = "core.client.http_send_started",
            method = %request.method,
            url = %url
        );

        let mut builder = self
            .client
            .request(reqwest_method(request.method), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &self.admin_token {
            builder = builder.header(ADMIN_TOKEN_HEADER, token);
        }
        if let Some(token) = &self.session_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let network_error = |e: reqwest::Error| RequestError::Network {
            method: request.method,
            path: request.path.clone(),
            message: e.to_string(),
        };

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(network_error)?;

        Ok(ApiResponse { status, body })
    }
}
