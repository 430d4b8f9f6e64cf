//! Editorial content: in-app notifications and recommended builds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resources::schema::{FieldSpec, FormSchema};
use crate::resources::{FilterKey, KeyKind, Resource, ResourceKey, cell, yes_no};

pub const RESOLUTIONS: &[&str] = &["1080p", "1440p", "4k"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

static NOTIFICATION_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::text("title").required(),
        FieldSpec::text("message").required(),
        FieldSpec::text("category").default("system_recommendation"),
        FieldSpec::flag("isActive").default("true"),
    ],
    rows: None,
};

pub struct NotificationResource;

impl Resource for NotificationResource {
    type Record = Notification;

    const NAME: &'static str = "notification";
    const LIST_PATH: &'static str = "/admin/notifications";
    const WRITE_PATH: &'static str = "/admin/notifications";
    const KEY_KIND: KeyKind = KeyKind::Id;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Category];

    fn key(record: &Notification) -> ResourceKey {
        ResourceKey::Id(record.id)
    }

    fn label(record: &Notification) -> String {
        record.title.clone()
    }

    fn search_text(record: &Notification) -> String {
        format!("{} {}", record.title, record.message)
    }

    fn facet(record: &Notification, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Category => record.category.as_deref(),
            _ => None,
        }
    }

    fn schema() -> &'static FormSchema {
        &NOTIFICATION_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["ID", "Title", "Category", "Active", "Created"]
    }

    fn cells(record: &Notification) -> Vec<String> {
        vec![
            record.id.to_string(),
            record.title.clone(),
            cell(&record.category),
            yes_no(record.is_active),
            record
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

/// A curated build: one named component per slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedSystem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub resolution: String,
    #[serde(default)]
    pub category: Option<String>,
    pub cpu: String,
    pub motherboard: String,
    pub gpu: String,
    pub ram: String,
    pub storage: String,
    pub psu: String,
    pub pc_case: String,
    #[serde(default)]
    pub notes: Option<String>,
}

static RECOMMENDED_SYSTEM_SCHEMA: FormSchema = FormSchema {
    fields: &[
        FieldSpec::text("title").required(),
        FieldSpec::slug(),
        FieldSpec::choice("resolution", RESOLUTIONS)
            .required()
            .default("1080p"),
        FieldSpec::text("category").default("Ayın Sistemi"),
        FieldSpec::text("cpu").required(),
        FieldSpec::text("motherboard").required(),
        FieldSpec::text("gpu").required(),
        FieldSpec::text("ram").required(),
        FieldSpec::text("storage").required(),
        FieldSpec::text("psu").required(),
        FieldSpec::text("pcCase").required(),
        FieldSpec::text("notes"),
    ],
    rows: None,
};

pub struct RecommendedSystemResource;

impl Resource for RecommendedSystemResource {
    type Record = RecommendedSystem;

    const NAME: &'static str = "recommended_system";
    const LIST_PATH: &'static str = "/admin/recommended-systems";
    const WRITE_PATH: &'static str = "/admin/recommended-systems";
    const KEY_KIND: KeyKind = KeyKind::Slug;
    const FILTERS: &'static [FilterKey] = &[FilterKey::Resolution, FilterKey::Category];
    const SERVER_FILTERS: &'static [FilterKey] = &[FilterKey::Resolution];

    fn key(record: &RecommendedSystem) -> ResourceKey {
        ResourceKey::Slug(record.slug.clone())
    }

    fn label(record: &RecommendedSystem) -> String {
        record.title.clone()
    }

    fn search_text(record: &RecommendedSystem) -> String {
        format!("{} {} {} {}", record.title, record.slug, record.cpu, record.gpu)
    }

    fn facet(record: &RecommendedSystem, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Resolution => Some(&record.resolution),
            FilterKey::Category => record.category.as_deref(),
            FilterKey::Brand => None,
        }
    }

    fn schema() -> &'static FormSchema {
        &RECOMMENDED_SYSTEM_SCHEMA
    }

    fn columns() -> &'static [&'static str] {
        &["Title", "Slug", "Resolution", "Category", "CPU", "GPU"]
    }

    fn cells(record: &RecommendedSystem) -> Vec<String> {
        vec![
            record.title.clone(),
            record.slug.clone(),
            record.resolution.clone(),
            cell(&record.category),
            record.cpu.clone(),
            record.gpu.clone(),
        ]
    }
}
