use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::errors::{RequestError, backend_message};
use crate::client::http::HttpTransport;
use crate::client::types::{ApiRequest, Method, Query, Transport};
use crate::config::AdminConfig;

/// Remote Resource Client: the single point of egress to the backend.
///
/// Every call is a fresh round trip; there is no retry, caching or timeout
/// policy. Responses are decoded into typed records at this boundary so a
/// malformed payload is rejected here instead of leaking into a store.
pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
}

impl ApiClient<HttpTransport> {
    /// Build a network client from the effective configuration.
    pub fn from_config(config: &AdminConfig) -> Result<Self, RequestError> {
        Ok(Self::new(HttpTransport::from_config(config)?))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get<D: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<D, RequestError> {
        self.execute(ApiRequest::new(Method::Get, path).with_query(query))
            .await
    }

    pub async fn post<B, D>(&self, path: &str, body: &B) -> Result<D, RequestError>
    where
        B: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        let body = encode(path, body)?;
        self.execute(ApiRequest::new(Method::Post, path).with_body(body))
            .await
    }

    /// POST without a request body (action endpoints).
    pub async fn post_empty<D: DeserializeOwned>(&self, path: &str) -> Result<D, RequestError> {
        self.execute(ApiRequest::new(Method::Post, path)).await
    }

    pub async fn put<B, D>(&self, path: &str, body: &B) -> Result<D, RequestError>
    where
        B: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        let body = encode(path, body)?;
        self.execute(ApiRequest::new(Method::Put, path).with_body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<(), RequestError> {
        self.execute::<serde_json::Value>(ApiRequest::new(Method::Delete, path))
            .await
            .map(|_| ())
    }

    async fn execute<D: DeserializeOwned>(&self, request: ApiRequest) -> Result<D, RequestError> {
        let method = request.method;
        let path = request.path.clone();

        debug!(
            event = "core.client.request_started",
            method = %method,
            path = %path
        );

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    event = "core.client.request_failed",
                    method = %method,
                    path = %path,
                    error = %e
                );
                return Err(e);
            }
        };

        if !response.is_success() {
            let message = backend_message(response.status, &response.body);
            warn!(
                event = "core.client.request_rejected",
                method = %method,
                path = %path,
                status = response.status,
                message = %message
            );
            return Err(RequestError::Status {
                method,
                path,
                status: response.status,
                message,
            });
        }

        debug!(
            event = "core.client.request_completed",
            method = %method,
            path = %path,
            status = response.status
        );

        decode(&path, &response.body)
    }
}

fn encode<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<serde_json::Value, RequestError> {
    serde_json::to_value(body).map_err(|e| RequestError::Encode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Decode a success body. An empty body decodes as JSON `null`.
fn decode<D: DeserializeOwned>(path: &str, body: &str) -> Result<D, RequestError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| RequestError::MalformedResponse {
        path: path.to_string(),
        message: e.to_string(),
    })
}
