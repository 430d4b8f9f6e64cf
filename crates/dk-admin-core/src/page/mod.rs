//! One mounted entity page: a list store and a form controller owned
//! together, plus the confirmation-gated delete.

use tracing::{info, warn};

use crate::client::{ApiClient, RequestError, Transport};
use crate::config::AdminConfig;
use crate::errors::AdminError;
use crate::form::{FormController, FormError, FormMode, Submitted};
use crate::resources::{Resource, ResourceKey};
use crate::store::ListStore;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("No {resource} with key '{key}'")]
    NotFound {
        resource: &'static str,
        key: ResourceKey,
    },

    #[error(transparent)]
    Form {
        #[from]
        source: FormError,
    },

    #[error(transparent)]
    Request {
        #[from]
        source: RequestError,
    },
}

impl AdminError for PageError {
    fn error_code(&self) -> &'static str {
        match self {
            PageError::NotFound { .. } => "RECORD_NOT_FOUND",
            PageError::Form { source } => source.error_code(),
            PageError::Request { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            PageError::NotFound { .. } => true,
            PageError::Form { source } => source.is_user_error(),
            PageError::Request { source } => source.is_user_error(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The operator declined; nothing was sent.
    Declined,
}

pub struct ResourcePage<R: Resource> {
    store: ListStore<R>,
    form: FormController<R>,
}

impl<R: Resource> ResourcePage<R> {
    pub fn new(store: ListStore<R>) -> Self {
        Self {
            store,
            form: FormController::new(),
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(ListStore::from_config(config))
    }

    pub fn store(&self) -> &ListStore<R> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ListStore<R> {
        &mut self.store
    }

    pub fn form(&self) -> &FormController<R> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController<R> {
        &mut self.form
    }

    pub async fn load<T: Transport>(&mut self, client: &ApiClient<T>) -> Result<usize, PageError> {
        Ok(self.store.reload(client).await?)
    }

    /// Start editing the loaded record with `key`.
    pub fn edit(&mut self, key: &ResourceKey) -> Result<(), PageError> {
        let record = self.store.find(key).ok_or_else(|| PageError::NotFound {
            resource: R::NAME,
            key: key.clone(),
        })?;
        self.form.start_edit(record)?;
        Ok(())
    }

    pub async fn submit<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
    ) -> Result<Submitted, PageError> {
        Ok(self.form.submit(client, &mut self.store).await?)
    }

    /// Delete the loaded record with `key` once `confirm` accepts the prompt.
    ///
    /// `confirm` is asked before anything is sent; declining leaves the list
    /// and the backend untouched.
    pub async fn delete<T, F>(
        &mut self,
        client: &ApiClient<T>,
        key: &ResourceKey,
        confirm: F,
    ) -> Result<DeleteOutcome, PageError>
    where
        T: Transport,
        F: FnOnce(&str) -> bool,
    {
        let record = self.store.find(key).ok_or_else(|| PageError::NotFound {
            resource: R::NAME,
            key: key.clone(),
        })?;
        let prompt = format!("Delete {} '{}'?", R::NAME, R::label(record));

        if !confirm(&prompt) {
            info!(
                event = "core.page.delete_declined",
                resource = R::NAME,
                key = %key
            );
            return Ok(DeleteOutcome::Declined);
        }

        info!(event = "core.page.delete_started", resource = R::NAME, key = %key);

        if let Err(e) = client.delete(&R::item_path(key)).await {
            warn!(
                event = "core.page.delete_failed",
                resource = R::NAME,
                key = %key,
                error = %e
            );
            return Err(e.into());
        }

        if self.form.mode() == &FormMode::Edit(key.clone()) {
            self.form.cancel();
        }

        info!(event = "core.page.delete_completed", resource = R::NAME, key = %key);

        // Reload errors are kept on the store.
        let _ = self.store.reload(client).await;
        Ok(DeleteOutcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;
    use crate::client::fake::FakeBackend;
    use crate::resources::{CpuResource, NotificationResource};
    use serde_json::json;
    use std::cell::Cell;

    fn notifications() -> FakeBackend {
        FakeBackend::new().with_collection(
            "/admin/notifications",
            "/admin/notifications",
            "id",
            vec![
                json!({"id": 4, "title": "Eski", "message": "m", "isActive": false}),
                json!({"id": 5, "title": "Yeni sistem", "message": "m", "isActive": true}),
            ],
        )
    }

    async fn loaded_page(client: &ApiClient<FakeBackend>) -> ResourcePage<NotificationResource> {
        let mut page = ResourcePage::new(ListStore::new(20, 200));
        page.load(client).await.unwrap();
        page
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let client = ApiClient::new(notifications());
        let mut page = loaded_page(&client).await;
        let asked = Cell::new(String::new());

        let outcome = page
            .delete(&client, &ResourceKey::Id(5), |prompt| {
                asked.set(prompt.to_string());
                true
            })
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(asked.take(), "Delete notification 'Yeni sistem'?");
        let delete = client.transport().writes().pop().unwrap();
        assert_eq!(delete.method, Method::Delete);
        assert_eq!(delete.path, "/admin/notifications/5");
        assert_eq!(page.store().items().len(), 1);
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let client = ApiClient::new(notifications());
        let mut page = loaded_page(&client).await;
        let before = client.transport().request_count();

        let outcome = page
            .delete(&client, &ResourceKey::Id(5), |_| false)
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(client.transport().request_count(), before);
        assert_eq!(page.store().items().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_key_is_not_found_without_prompt() {
        let client = ApiClient::new(notifications());
        let mut page = loaded_page(&client).await;

        let err = page
            .delete(&client, &ResourceKey::Id(99), |_| panic!("should not prompt"))
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::NotFound { .. }));
        assert_eq!(err.error_code(), "RECORD_NOT_FOUND");
        assert!(page.edit(&ResourceKey::Id(99)).is_err());
    }

    #[tokio::test]
    async fn test_deleting_edited_record_cancels_form() {
        let client = ApiClient::new(notifications());
        let mut page = loaded_page(&client).await;
        page.edit(&ResourceKey::Id(5)).unwrap();
        assert!(page.form().is_editing());

        page.delete(&client, &ResourceKey::Id(5), |_| true)
            .await
            .unwrap();
        assert!(!page.form().is_editing());
    }

    #[tokio::test]
    async fn test_edit_then_submit_round_trip() {
        let client = ApiClient::new(FakeBackend::new().with_collection(
            "/cpus",
            "/admin/cpus",
            "slug",
            vec![json!({"brand": "Intel", "model": "i5-14600K", "slug": "i5-14600k"})],
        ));
        let mut page = ResourcePage::<CpuResource>::new(ListStore::new(20, 200));
        page.load(&client).await.unwrap();

        let key = ResourceKey::Slug("i5-14600k".to_string());
        page.edit(&key).unwrap();
        page.form_mut().update_field("cores", "14").unwrap();
        page.submit(&client).await.unwrap();

        assert_eq!(page.store().find(&key).unwrap().cores, Some(14));
    }
}
