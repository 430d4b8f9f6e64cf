//! Push campaigns: registered device tokens, send history, and the
//! confirmed one-shot broadcast.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::client::{ApiClient, RequestError, Transport};
use crate::errors::AdminError;

const TOKENS_PATH: &str = "/admin/push-tokens";
const LOGS_PATH: &str = "/admin/push/logs";
const SEND_PATH: &str = "/admin/push/send";

/// `data.type` attached to every admin broadcast.
pub const ADMIN_PUSH_TYPE: &str = "admin_push";

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("Required push fields missing: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error(transparent)]
    Request {
        #[from]
        source: RequestError,
    },
}

impl AdminError for PushError {
    fn error_code(&self) -> &'static str {
        match self {
            PushError::MissingFields { .. } => "PUSH_MISSING_FIELDS",
            PushError::Request { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            PushError::MissingFields { .. } => true,
            PushError::Request { source } => source.is_user_error(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushToken {
    pub id: i64,
    pub token: String,
    pub device_id: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub device_model: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushLog {
    pub id: i64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub sent_count: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub fail_count: u64,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

/// Aggregated delivery counters returned by a send.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendStats {
    #[serde(default)]
    pub total_devices: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub fail_count: u64,
    #[serde(default)]
    pub invalid_tokens_removed: u64,
}

#[derive(Debug, Deserialize)]
struct TokensResponse {
    #[serde(default)]
    tokens: Vec<PushToken>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    stats: SendStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Sent(SendStats),
    /// The operator declined; nothing was sent.
    Declined,
}

#[derive(Debug, Default)]
pub struct PushConsole {
    tokens: Vec<PushToken>,
    logs: Vec<PushLog>,
}

impl PushConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[PushToken] {
        &self.tokens
    }

    pub fn logs(&self) -> &[PushLog] {
        &self.logs
    }

    pub fn active_token_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_active).count()
    }

    /// Fetch tokens and send history together.
    pub async fn load<T: Transport>(&mut self, client: &ApiClient<T>) -> Result<(), PushError> {
        let (tokens, logs) = futures::try_join!(
            client.get::<TokensResponse>(TOKENS_PATH, Vec::new()),
            client.get::<Option<Vec<PushLog>>>(LOGS_PATH, Vec::new()),
        )?;
        self.tokens = tokens.tokens;
        self.logs = logs.unwrap_or_default();

        info!(
            event = "core.push.load_completed",
            tokens = self.tokens.len(),
            logs = self.logs.len()
        );
        Ok(())
    }

    /// Broadcast `message` to every registered device once `confirm` accepts
    /// a prompt naming the device count.
    pub async fn send<T, F>(
        &mut self,
        client: &ApiClient<T>,
        message: &PushMessage,
        confirm: F,
    ) -> Result<SendOutcome, PushError>
    where
        T: Transport,
        F: FnOnce(&str) -> bool,
    {
        let mut missing = Vec::new();
        if message.title.trim().is_empty() {
            missing.push("title".to_string());
        }
        if message.body.trim().is_empty() {
            missing.push("body".to_string());
        }
        if !missing.is_empty() {
            return Err(PushError::MissingFields { fields: missing });
        }

        let prompt = format!(
            "Send \"{}\" to {} devices?",
            message.title,
            self.tokens.len()
        );
        if !confirm(&prompt) {
            info!(event = "core.push.send_declined");
            return Ok(SendOutcome::Declined);
        }

        info!(event = "core.push.send_started", devices = self.tokens.len());

        let body = json!({
            "title": message.title,
            "body": message.body,
            "data": { "type": ADMIN_PUSH_TYPE },
        });
        let response: SendResponse = client.post(SEND_PATH, &body).await.inspect_err(|e| {
            warn!(event = "core.push.send_failed", error = %e);
        })?;

        info!(
            event = "core.push.send_completed",
            total = response.stats.total_devices,
            success = response.stats.success_count,
            failed = response.stats.fail_count,
            invalid_removed = response.stats.invalid_tokens_removed
        );

        if let Err(e) = self.load(client).await {
            warn!(event = "core.push.reload_failed", error = %e);
        }
        Ok(SendOutcome::Sent(response.stats))
    }
}
