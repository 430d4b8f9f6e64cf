//! Runtime knobs stored by the backend as `(key, value, description)`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::client::{ApiClient, RequestError, Transport};
use crate::errors::AdminError;

const CONFIG_PATH: &str = "/admin/config";

/// Keys whose values must be whole numbers.
const NUMERIC_KEYS: &[&str] = &["requiredAdsCount", "adUnlockDurationHours"];

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Unknown setting '{key}'")]
    UnknownKey { key: String },

    #[error("Setting '{key}' needs a value")]
    EmptyValue { key: String },

    #[error("Setting '{key}' expects a whole number, got '{value}'")]
    InvalidValue { key: String, value: String },

    #[error(transparent)]
    Request {
        #[from]
        source: RequestError,
    },
}

impl AdminError for SettingsError {
    fn error_code(&self) -> &'static str {
        match self {
            SettingsError::UnknownKey { .. } => "UNKNOWN_SETTING",
            SettingsError::EmptyValue { .. } => "EMPTY_SETTING_VALUE",
            SettingsError::InvalidValue { .. } => "INVALID_SETTING_VALUE",
            SettingsError::Request { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            SettingsError::Request { source } => source.is_user_error(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItem {
    pub key: String,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl ConfigItem {
    pub fn display_name(&self) -> &str {
        display_name(&self.key)
    }
}

/// Operator-facing name of a known key; other keys show as-is.
pub fn display_name(key: &str) -> &str {
    match key {
        "requiredAdsCount" => "Required ad views",
        "adUnlockDurationHours" => "Unlock duration (hours)",
        other => other,
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

#[derive(Debug, Default)]
pub struct SettingsPanel {
    items: Vec<ConfigItem>,
    load_error: Option<RequestError>,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ConfigItem] {
        &self.items
    }

    pub fn get(&self, key: &str) -> Option<&ConfigItem> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Error from the most recent load, cleared by the next successful one.
    pub fn load_error(&self) -> Option<&RequestError> {
        self.load_error.as_ref()
    }

    /// Fetch every setting. On failure the previous items stay in place.
    pub async fn load<T: Transport>(&mut self, client: &ApiClient<T>) -> Result<(), SettingsError> {
        match client.get(CONFIG_PATH, Vec::new()).await {
            Ok(items) => {
                self.items = items;
                self.load_error = None;
                info!(event = "core.settings.load_completed", count = self.items.len());
                Ok(())
            }
            Err(e) => {
                warn!(event = "core.settings.load_failed", error = %e);
                self.load_error = Some(e.clone());
                Err(e.into())
            }
        }
    }

    /// Save one loaded key, keeping its description, then reload.
    ///
    /// A failed reload after the save is kept on
    /// [`SettingsPanel::load_error`] and does not fail the save.
    pub async fn save<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
        key: &str,
        value: &str,
    ) -> Result<(), SettingsError> {
        let item = self.get(key).ok_or_else(|| SettingsError::UnknownKey {
            key: key.to_string(),
        })?;
        let value = value.trim();
        if value.is_empty() {
            return Err(SettingsError::EmptyValue {
                key: key.to_string(),
            });
        }
        if NUMERIC_KEYS.contains(&key) && value.parse::<u64>().is_err() {
            return Err(SettingsError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        let body = serde_json::json!({
            "key": key,
            "value": value,
            "description": item.description,
        });
        client.post::<_, Value>(CONFIG_PATH, &body).await?;

        info!(event = "core.settings.save_completed", key = key);
        if self.load(client).await.is_err() {
            warn!(event = "core.settings.refresh_failed", key = key);
        }
        Ok(())
    }
}
