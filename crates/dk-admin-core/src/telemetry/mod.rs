//! Operational telemetry: dashboard analytics and API monitoring.
//!
//! Each snapshot is fetched with its endpoints in flight together and one
//! combined resolution point; the [`crate::polling`] module re-runs these on
//! a schedule.

pub mod analytics;
pub mod format;
pub mod monitoring;

pub use analytics::{
    CleanupOutcome, DashboardSnapshot, Device, ExtendedStats, RevenueStats, UsageStats,
    cleanup_duplicates, fetch_dashboard,
};
pub use format::{format_megabytes, format_uptime, relative_time};
pub use monitoring::{
    MonitoringSnapshot, MonitoringStats, RecentRequest, RequestStatusFilter, SystemHealth,
    fetch_monitoring, recent_requests,
};
