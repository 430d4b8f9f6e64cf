//! Usage analytics shown on the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{ApiClient, RequestError, Transport};

/// Devices listed on the dashboard.
pub const DASHBOARD_DEVICE_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformCount {
    pub platform: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DayCount {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsageStats {
    pub total_downloads: u64,
    pub live_active: u64,
    pub daily_active: u64,
    pub weekly_active: u64,
    pub monthly_active: u64,
    pub platform_stats: Vec<PlatformCount>,
    #[serde(rename = "last7Days")]
    pub last_7_days: Vec<DayCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: String,
    pub label: String,
    pub active_users: u64,
    pub new_users: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeeklyActivity {
    pub week_start: String,
    pub week_end: String,
    pub label: String,
    pub active_users: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonthlyActivity {
    pub month: String,
    pub label: String,
    pub active_users: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformShare {
    pub platform: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtendedStats {
    pub daily: Vec<DailyActivity>,
    pub weekly: Vec<WeeklyActivity>,
    pub monthly: Vec<MonthlyActivity>,
    pub platform_breakdown: Vec<PlatformShare>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveUsers {
    pub daily: u64,
    pub weekly: u64,
    pub monthly: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdImpressions {
    pub daily_banner: u64,
    pub daily_interstitial: u64,
    pub weekly_banner: u64,
    pub weekly_interstitial: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatedRevenue {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
    #[serde(rename = "dailyUSD")]
    pub daily_usd: f64,
    #[serde(rename = "monthlyUSD")]
    pub monthly_usd: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevenueStats {
    pub active_users: ActiveUsers,
    pub impressions: AdImpressions,
    pub estimated_revenue: EstimatedRevenue,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub device_id: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub device_model: Option<String>,
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(default)]
    pub first_seen_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_active_at: Option<DateTime<Utc>>,
}

/// Everything the dashboard shows, fetched in one round.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stats: UsageStats,
    pub extended: ExtendedStats,
    pub revenue: RevenueStats,
    pub devices: Vec<Device>,
    pub fetched_at: DateTime<Utc>,
}

/// Fetch the four dashboard aggregates concurrently. Any failure fails the
/// whole snapshot.
pub async fn fetch_dashboard<T: Transport>(
    client: &ApiClient<T>,
) -> Result<DashboardSnapshot, RequestError> {
    let device_query = vec![("limit".to_string(), DASHBOARD_DEVICE_LIMIT.to_string())];

    let (stats, extended, revenue, devices) = futures::try_join!(
        client.get::<UsageStats>("/analytics/stats", Vec::new()),
        client.get::<ExtendedStats>("/analytics/stats/extended", Vec::new()),
        client.get::<RevenueStats>("/analytics/stats/revenue", Vec::new()),
        client.get::<Vec<Device>>("/analytics/devices", device_query),
    )?;

    info!(
        event = "core.telemetry.dashboard_fetched",
        total_downloads = stats.total_downloads,
        devices = devices.len()
    );

    Ok(DashboardSnapshot {
        stats,
        extended,
        revenue,
        devices,
        fetched_at: Utc::now(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct CleanupResponse {
    message: Option<String>,
    deleted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Backend message, or a count-based summary when it sent none.
    Cleaned { deleted: u64, message: String },
    /// The operator declined; nothing was sent.
    Declined,
}

/// Remove older duplicate device records once `confirm` accepts.
pub async fn cleanup_duplicates<T, F>(
    client: &ApiClient<T>,
    confirm: F,
) -> Result<CleanupOutcome, RequestError>
where
    T: Transport,
    F: FnOnce(&str) -> bool,
{
    let prompt = "Older records of the same device model (other app versions) will be deleted. Continue?";
    if !confirm(prompt) {
        return Ok(CleanupOutcome::Declined);
    }

    let response: Option<CleanupResponse> =
        client.post_empty("/analytics/cleanup-duplicates").await?;
    let response = response.unwrap_or_default();
    let message = response
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("{} records deleted", response.deleted));

    info!(
        event = "core.telemetry.cleanup_completed",
        deleted = response.deleted
    );

    Ok(CleanupOutcome::Cleaned {
        deleted: response.deleted,
        message,
    })
}
