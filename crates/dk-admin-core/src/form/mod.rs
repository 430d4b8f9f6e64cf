//! Form-Edit Controller: one draft record in create or edit mode.

pub mod draft;
pub mod errors;

pub use draft::{Draft, DraftRow};
pub use errors::FormError;

use std::marker::PhantomData;

use serde_json::Value;
use tracing::{info, warn};

use crate::client::{ApiClient, Transport};
use crate::resources::{Resource, ResourceKey};
use crate::store::ListStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the record with this key.
    Edit(ResourceKey),
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Created,
    Updated(ResourceKey),
}

pub struct FormController<R: Resource> {
    draft: Draft,
    mode: FormMode,
    _resource: PhantomData<R>,
}

impl<R: Resource> Default for FormController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> FormController<R> {
    pub fn new() -> Self {
        Self {
            draft: Draft::defaults(R::schema()),
            mode: FormMode::Create,
            _resource: PhantomData,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// Reset the draft to create-mode defaults.
    pub fn start_create(&mut self) {
        self.draft = Draft::defaults(R::schema());
        self.mode = FormMode::Create;
    }

    /// Load `record` into the draft and lock its key.
    pub fn start_edit(&mut self, record: &R::Record) -> Result<(), FormError> {
        let value = serde_json::to_value(record).map_err(|e| FormError::Encode {
            message: e.to_string(),
        })?;
        self.draft = Draft::from_record(R::schema(), &value);
        self.mode = FormMode::Edit(R::key(record));
        Ok(())
    }

    /// Discard the draft without a network call.
    pub fn cancel(&mut self) {
        self.start_create();
    }

    /// Store the raw `value` for field `name`.
    pub fn update_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let schema = R::schema();
        let field = schema.field(name).ok_or_else(|| FormError::UnknownField {
            field: name.to_string(),
        })?;
        if field.key && self.is_editing() {
            return Err(FormError::FieldLocked {
                field: name.to_string(),
            });
        }
        self.draft.set(name, value);
        Ok(())
    }

    /// Append a row keyed by `key` (e.g. a game name). Returns its index.
    pub fn add_row(&mut self, key: &str) -> Result<usize, FormError> {
        let spec = R::schema().rows.ok_or_else(|| FormError::UnknownField {
            field: "rows".to_string(),
        })?;
        Ok(self
            .draft
            .push_row(DraftRow::from([(spec.key_column.to_string(), key.to_string())])))
    }

    /// Set or add the row keyed by `key` in one step. Returns its index.
    pub fn upsert_row(&mut self, key: &str, values: &[(&str, &str)]) -> Result<usize, FormError> {
        let spec = R::schema().rows.ok_or_else(|| FormError::UnknownField {
            field: "rows".to_string(),
        })?;
        let existing = self
            .draft
            .rows()
            .iter()
            .position(|row| row.get(spec.key_column).is_some_and(|k| k == key));
        let index = match existing {
            Some(index) => index,
            None => self.add_row(key)?,
        };
        for (column, value) in values {
            self.update_row(index, column, value)?;
        }
        Ok(index)
    }

    pub fn update_row(&mut self, index: usize, column: &str, value: &str) -> Result<(), FormError> {
        let spec = R::schema().rows.ok_or_else(|| FormError::UnknownField {
            field: column.to_string(),
        })?;
        if !spec.has_column(column) {
            return Err(FormError::UnknownField {
                field: column.to_string(),
            });
        }
        self.draft.set_row_value(index, column, value)
    }

    /// Validate the draft and assemble the request body without sending it.
    pub fn payload(&self) -> Result<Value, FormError> {
        self.draft.to_payload(R::schema())
    }

    /// Validate, write, reload `store`, and return to create mode.
    ///
    /// Validation failures return before any request is made. A failed
    /// write leaves the draft and mode untouched so the operator can retry.
    /// A failed reload after a successful write is logged and left on
    /// `store.load_error()`.
    pub async fn submit<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
        store: &mut ListStore<R>,
    ) -> Result<Submitted, FormError> {
        let payload = match self.payload() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    event = "core.form.validation_failed",
                    resource = R::NAME,
                    error = %e
                );
                return Err(e);
            }
        };

        info!(
            event = "core.form.submit_started",
            resource = R::NAME,
            mode = if self.is_editing() { "edit" } else { "create" }
        );

        let written = match &self.mode {
            FormMode::Create => client
                .post::<_, Value>(R::WRITE_PATH, &payload)
                .await
                .map(|_| Submitted::Created),
            FormMode::Edit(key) => client
                .put::<_, Value>(&R::item_path(key), &payload)
                .await
                .map(|_| Submitted::Updated(key.clone())),
        };

        let submitted = match written {
            Ok(submitted) => submitted,
            Err(e) => {
                warn!(
                    event = "core.form.submit_failed",
                    resource = R::NAME,
                    error = %e
                );
                return Err(e.into());
            }
        };

        info!(event = "core.form.submit_completed", resource = R::NAME);

        // Reload errors are kept on the store.
        let _ = store.reload(client).await;
        self.start_create();

        Ok(submitted)
    }
}
