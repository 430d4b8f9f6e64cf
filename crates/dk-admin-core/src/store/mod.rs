//! List/Filter/Paginate Store.
//!
//! Owns the in-memory copy of one entity collection and derives the visible
//! page from (collection, filters, search text, page). Nothing else is kept,
//! so the same inputs always yield the same rows.

mod filters;

pub use filters::ListFilters;

use tracing::{debug, info, warn};

use crate::client::{ApiClient, Query, RequestError, Transport};
use crate::config::AdminConfig;
use crate::resources::{FilterKey, Resource, ResourceKey};

pub struct ListStore<R: Resource> {
    items: Vec<R::Record>,
    filters: ListFilters,
    page: usize,
    page_size: usize,
    fetch_limit: u32,
    load_error: Option<RequestError>,
}

impl<R: Resource> ListStore<R> {
    /// A zero page size is treated as 1.
    pub fn new(page_size: usize, fetch_limit: u32) -> Self {
        Self {
            items: Vec::new(),
            filters: ListFilters::default(),
            page: 1,
            page_size: page_size.max(1),
            fetch_limit,
            load_error: None,
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.page_size(), config.fetch_limit())
    }

    /// Query sent on reload: the resource's base parameters, then every
    /// active filter the backend also understands.
    pub fn query(&self) -> Query {
        let mut query = R::base_query(self.fetch_limit);
        for (key, value) in self.filters.facets() {
            if R::SERVER_FILTERS.contains(&key) {
                query.push((key.as_str().to_string(), value.to_string()));
            }
        }
        query
    }

    /// Fetch the collection and replace the in-memory copy wholesale.
    ///
    /// On failure the previous collection stays in place and the error is
    /// kept in [`ListStore::load_error`] as well as returned.
    pub async fn reload<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
    ) -> Result<usize, RequestError> {
        info!(event = "core.store.reload_started", resource = R::NAME);

        match client.get::<Vec<R::Record>>(R::LIST_PATH, self.query()).await {
            Ok(items) => {
                self.items = items;
                self.load_error = None;
                self.page = self.clamp(self.page);
                info!(
                    event = "core.store.reload_completed",
                    resource = R::NAME,
                    count = self.items.len()
                );
                Ok(self.items.len())
            }
            Err(e) => {
                warn!(
                    event = "core.store.reload_failed",
                    resource = R::NAME,
                    kept = self.items.len(),
                    error = %e
                );
                self.load_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.filters.set_search(text);
        self.page = 1;
    }

    /// Narrow by a facet (`None` or blank clears it) and reset to page 1.
    ///
    /// Returns `false` without changing anything when the resource has no
    /// such facet.
    pub fn set_filter(&mut self, key: FilterKey, value: Option<&str>) -> bool {
        if !R::FILTERS.contains(&key) {
            debug!(
                event = "core.store.filter_ignored",
                resource = R::NAME,
                filter = %key
            );
            return false;
        }
        self.filters.set_facet(key, value);
        self.page = 1;
        true
    }

    /// Move to page `n`, clamped to `[1, page_count]`. Returns the page set.
    pub fn set_page(&mut self, n: usize) -> usize {
        self.page = self.clamp(n);
        self.page
    }

    fn clamp(&self, n: usize) -> usize {
        n.clamp(1, self.page_count())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Never less than 1, even for an empty list.
    pub fn page_count(&self) -> usize {
        self.filtered_count().div_ceil(self.page_size).max(1)
    }

    pub fn filters(&self) -> &ListFilters {
        &self.filters
    }

    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    pub fn filtered(&self) -> Vec<&R::Record> {
        self.items
            .iter()
            .filter(|record| self.filters.matches::<R>(record))
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.items
            .iter()
            .filter(|record| self.filters.matches::<R>(record))
            .count()
    }

    /// Rows of the current page.
    pub fn visible(&self) -> Vec<&R::Record> {
        let start = (self.clamp(self.page) - 1) * self.page_size;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    pub fn find(&self, key: &ResourceKey) -> Option<&R::Record> {
        self.items.iter().find(|record| &R::key(record) == key)
    }

    pub fn load_error(&self) -> Option<&RequestError> {
        self.load_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;
    use crate::client::fake::FakeBackend;
    use crate::resources::{CpuResource, RecommendedSystemResource};
    use serde_json::{Value, json};

    fn cpus(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| {
                json!({
                    "brand": if i % 2 == 0 { "AMD" } else { "Intel" },
                    "model": format!("Model {}", i),
                    "slug": format!("model-{}", i),
                })
            })
            .collect()
    }

    async fn loaded_store(count: usize) -> ListStore<CpuResource> {
        let client = ApiClient::new(FakeBackend::new().with_collection(
            "/cpus",
            "/admin/cpus",
            "slug",
            cpus(count),
        ));
        let mut store = ListStore::<CpuResource>::new(20, 200);
        store.reload(&client).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_reload_replaces_collection() {
        let backend = FakeBackend::new().with_collection("/cpus", "/admin/cpus", "slug", cpus(3));
        let client = ApiClient::new(backend);
        let mut store = ListStore::<CpuResource>::new(20, 200);

        assert_eq!(store.reload(&client).await.unwrap(), 3);
        client.delete("/admin/cpus/model-0").await.unwrap();
        assert_eq!(store.reload(&client).await.unwrap(), 2);
        assert!(store.find(&ResourceKey::Slug("model-0".to_string())).is_none());
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_previous_collection() {
        let backend = FakeBackend::new().with_collection("/cpus", "/admin/cpus", "slug", cpus(3));
        let client = ApiClient::new(backend);
        let mut store = ListStore::<CpuResource>::new(20, 200);
        store.reload(&client).await.unwrap();

        client.transport().fail_next(500, "db down");
        let err = store.reload(&client).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(store.items().len(), 3);
        assert_eq!(store.load_error().and_then(|e| e.status()), Some(500));

        store.reload(&client).await.unwrap();
        assert!(store.load_error().is_none());
    }

    #[tokio::test]
    async fn test_reload_sends_base_query_and_server_filters() {
        let backend = FakeBackend::new().with_collection("/cpus", "/admin/cpus", "slug", cpus(4));
        let client = ApiClient::new(backend);
        let mut store = ListStore::<CpuResource>::new(20, 150);
        store.set_filter(FilterKey::Brand, Some("Intel"));
        store.reload(&client).await.unwrap();

        let request = &client.transport().requests()[0];
        assert_eq!(request.query_value("limit"), Some("150"));
        assert_eq!(request.query_value("sort"), Some("year"));
        assert_eq!(request.query_value("brand"), Some("Intel"));
        assert_eq!(store.items().len(), 2);
    }

    #[tokio::test]
    async fn test_client_only_filters_not_sent() {
        let backend = FakeBackend::new().with_response(
            Method::Get,
            "/admin/recommended-systems",
            200,
            json!([]),
        );
        let client = ApiClient::new(backend);
        let mut store = ListStore::<RecommendedSystemResource>::new(20, 200);
        store.set_filter(FilterKey::Category, Some("Ayın Sistemi"));
        store.set_filter(FilterKey::Resolution, Some("4k"));
        store.reload(&client).await.unwrap();

        let request = &client.transport().requests()[0];
        assert_eq!(request.query_value("resolution"), Some("4k"));
        assert_eq!(request.query_value("category"), None);
    }

    #[tokio::test]
    async fn test_set_page_clamps_to_valid_range() {
        let mut store = loaded_store(45).await;
        assert_eq!(store.page_count(), 3);
        assert_eq!(store.set_page(0), 1);
        assert_eq!(store.set_page(99), 3);
        assert_eq!(store.visible().len(), 5);
        assert_eq!(store.set_page(2), 2);
        assert_eq!(store.visible().len(), 20);
    }

    #[tokio::test]
    async fn test_empty_list_has_one_page() {
        let mut store = loaded_store(0).await;
        assert_eq!(store.page_count(), 1);
        assert_eq!(store.set_page(5), 1);
        assert!(store.visible().is_empty());
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let mut store = loaded_store(45).await;
        store.set_page(3);
        store.set_search_text("model 1");
        assert_eq!(store.page(), 1);

        store.set_page(2);
        assert!(store.set_filter(FilterKey::Brand, Some("AMD")));
        assert_eq!(store.page(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_filter_is_ignored() {
        let mut store = loaded_store(5).await;
        store.set_page(1);
        assert!(!store.set_filter(FilterKey::Resolution, Some("4k")));
        assert_eq!(store.filtered_count(), 5);
    }

    #[tokio::test]
    async fn test_visible_page_is_pure_function_of_inputs() {
        let mut store = loaded_store(45).await;
        store.set_filter(FilterKey::Brand, Some("AMD"));
        store.set_search_text("model");
        store.set_page(2);
        let first: Vec<String> = store.visible().iter().map(|c| c.slug.clone()).collect();

        store.set_filter(FilterKey::Brand, Some("AMD"));
        store.set_search_text("model");
        store.set_page(2);
        let second: Vec<String> = store.visible().iter().map(|c| c.slug.clone()).collect();

        assert_eq!(first, second);
        assert_eq!(store.filtered_count(), 23);
        assert_eq!(first.len(), 3);
    }
}
