//! API monitoring: traffic statistics, backend health, recent requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{ApiClient, RequestError, Transport};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrafficOverview {
    pub total_requests: u64,
    pub today_requests: u64,
    #[serde(rename = "last24HoursRequests")]
    pub last_24_hours_requests: u64,
    pub last_hour_requests: u64,
    pub requests_per_minute: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorSummary {
    #[serde(rename = "totalErrors24h")]
    pub total_errors_24h: u64,
    pub server_errors: u64,
    pub client_errors: u64,
    /// Percentage as formatted by the backend.
    pub error_rate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointTiming {
    pub path: String,
    pub avg_time: f64,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Performance {
    pub avg_response_time: f64,
    pub slowest_endpoints: Vec<EndpointTiming>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimit {
    #[serde(rename = "exceeded24h")]
    pub exceeded_24h: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathCount {
    pub path: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodCount {
    pub method: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusCount {
    pub status_code: u16,
    pub count: u64,
}

/// One day of the traffic trend. The backend sends these fields in
/// snake_case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendDay {
    pub date: String,
    pub count: u64,
    pub avg_response_time: f64,
    pub error_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitoringStats {
    pub overview: TrafficOverview,
    pub errors: ErrorSummary,
    pub performance: Performance,
    pub rate_limit: RateLimit,
    pub top_endpoints: Vec<PathCount>,
    pub error_endpoints: Vec<PathCount>,
    pub method_distribution: Vec<MethodCount>,
    pub status_distribution: Vec<StatusCount>,
    pub daily_trend: Vec<TrendDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub status: String,
    pub response_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemoryUsage {
    pub heap_used: u64,
    pub heap_total: u64,
    pub rss: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Seconds.
    #[serde(default)]
    pub uptime: f64,
    #[serde(default)]
    pub database: DatabaseHealth,
    #[serde(default)]
    pub memory: MemoryUsage,
    #[serde(default)]
    pub node_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentRequest {
    pub id: i64,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSnapshot {
    pub stats: MonitoringStats,
    pub health: SystemHealth,
    pub fetched_at: DateTime<Utc>,
}

/// Fetch traffic statistics and health together.
pub async fn fetch_monitoring<T: Transport>(
    client: &ApiClient<T>,
) -> Result<MonitoringSnapshot, RequestError> {
    let (stats, health) = futures::try_join!(
        client.get::<MonitoringStats>("/monitoring/stats", Vec::new()),
        client.get::<SystemHealth>("/monitoring/health", Vec::new()),
    )?;

    info!(
        event = "core.telemetry.monitoring_fetched",
        status = %health.status,
        requests_24h = stats.overview.last_24_hours_requests
    );

    Ok(MonitoringSnapshot {
        stats,
        health,
        fetched_at: Utc::now(),
    })
}

/// Status filter for the recent request listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatusFilter {
    #[default]
    All,
    Error,
    Success,
}

impl RequestStatusFilter {
    /// Value of the `status` query parameter; empty for all.
    pub fn as_param(&self) -> &'static str {
        match self {
            RequestStatusFilter::All => "",
            RequestStatusFilter::Error => "error",
            RequestStatusFilter::Success => "success",
        }
    }
}

impl std::str::FromStr for RequestStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(RequestStatusFilter::All),
            "error" => Ok(RequestStatusFilter::Error),
            "success" => Ok(RequestStatusFilter::Success),
            _ => Err(format!("Unknown status filter '{}'. Use all, error or success", s)),
        }
    }
}

pub async fn recent_requests<T: Transport>(
    client: &ApiClient<T>,
    limit: u32,
    status: RequestStatusFilter,
) -> Result<Vec<RecentRequest>, RequestError> {
    let query = vec![
        ("limit".to_string(), limit.to_string()),
        ("status".to_string(), status.as_param().to_string()),
    ];
    client.get("/monitoring/requests", query).await
}
