//! dk-admin-core: Core library for the Donanım Kıyasla admin panel
//!
//! This library holds the business logic behind the admin tooling: a typed
//! client for the admin REST backend, the generic list/form machinery every
//! catalog entity is edited through, and the special-purpose consoles for
//! rankings, push campaigns, runtime settings and telemetry.
//!
//! # Main Entry Points
//!
//! - [`client`] - Authenticated REST client and transport abstraction
//! - [`resources`] - Entity definitions (CPUs, GPUs, laptops, parts, content)
//! - [`page`] - List store plus form controller for one entity
//! - [`rankings`] - Ranking boards with reorder
//! - [`telemetry`] and [`polling`] - Dashboard and monitoring snapshots
//! - [`config`] - Configuration management

pub mod client;
pub mod config;
pub mod errors;
pub mod events;
pub mod form;
pub mod logging;
pub mod page;
pub mod polling;
pub mod push;
pub mod rankings;
pub mod resources;
pub mod settings;
pub mod store;
pub mod telemetry;

// Re-export commonly used types at crate root for convenience
pub use client::{ApiClient, HttpTransport, RequestError, Transport};
pub use config::AdminConfig;
pub use errors::{AdminError, AdminResult};
pub use form::{FormController, FormError, FormMode, Submitted};
pub use page::{DeleteOutcome, PageError, ResourcePage};
pub use polling::{PollHandle, PollSummary, Poller};
pub use resources::{FilterKey, KeyKind, Resource, ResourceKey};
pub use store::{ListFilters, ListStore};

// Re-export logging initialization
pub use logging::init_logging;
