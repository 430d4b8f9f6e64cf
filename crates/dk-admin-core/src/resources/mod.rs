//! Per-entity configuration for the generic list editor.
//!
//! Each managed entity implements [`Resource`]: where its collection is read
//! and written, how a record is keyed, which fields the form edits, and how a
//! record is shown in a table. The store, form and page modules are generic
//! over this trait, so adding an entity means adding one impl here.

pub mod catalog;
pub mod content;
pub mod key;
pub mod parts;
pub mod schema;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::Query;

pub use catalog::{
    Cpu, CpuBenchmarks, CpuResource, FpsByResolution, Gpu, GpuBenchmarks, GpuFps, GpuResource,
    Laptop, LaptopFormOptions, LaptopRef, LaptopResource, fetch_laptop_form_options,
};
pub use content::{Notification, NotificationResource, RecommendedSystem, RecommendedSystemResource};
pub use key::{KeyKind, ResourceKey};
pub use parts::{
    Cooler, CoolerResource, Motherboard, MotherboardResource, PcCase, PcCaseResource, Psu,
    PsuResource, Ram, RamResource, Storage, StorageResource,
};
pub use schema::{FieldKind, FieldSpec, FormSchema, RowColumn, RowSpec};

/// Facets a list can be narrowed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Brand,
    Category,
    Resolution,
}

impl FilterKey {
    /// Query parameter name used when the backend filters on this facet.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Brand => "brand",
            FilterKey::Category => "category",
            FilterKey::Resolution => "resolution",
        }
    }
}

impl std::fmt::Display for FilterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A managed entity collection.
pub trait Resource: Send + Sync + 'static {
    type Record: Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync;

    /// Singular name used in logs and messages ("cpu", "notification").
    const NAME: &'static str;
    /// Path the collection is listed from.
    const LIST_PATH: &'static str;
    /// Path records are created under; `{WRITE_PATH}/{key}` addresses one.
    const WRITE_PATH: &'static str;
    const KEY_KIND: KeyKind;
    /// Facets the list can be narrowed by.
    const FILTERS: &'static [FilterKey] = &[];
    /// Facets also sent to the backend as query parameters on reload.
    const SERVER_FILTERS: &'static [FilterKey] = &[];

    fn key(record: &Self::Record) -> ResourceKey;

    /// Human-readable name for prompts and messages.
    fn label(record: &Self::Record) -> String;

    /// Text the list search matches against.
    fn search_text(record: &Self::Record) -> String {
        Self::label(record)
    }

    fn facet(_record: &Self::Record, _key: FilterKey) -> Option<&str> {
        None
    }

    /// Query parameters sent with every reload, before active filters.
    fn base_query(_fetch_limit: u32) -> Query {
        Vec::new()
    }

    fn schema() -> &'static FormSchema;

    fn columns() -> &'static [&'static str];

    fn cells(record: &Self::Record) -> Vec<String>;

    fn item_path(key: &ResourceKey) -> String {
        format!("{}/{}", Self::WRITE_PATH, key)
    }
}

/// Render an optional value as a table cell.
pub fn cell<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub(crate) fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

pub(crate) fn limit_query(fetch_limit: u32) -> Query {
    vec![("limit".to_string(), fetch_limit.to_string())]
}
