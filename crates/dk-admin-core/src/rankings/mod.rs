//! Ranking Reorder: client-computed total order of GPUs or CPUs within one
//! category, edited one neighbour swap at a time.

mod types;

pub use types::{NewRanking, RankedItem, RankingCategory, RankingEntry, RankingTarget};

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::client::{ApiClient, RequestError, Transport};
use crate::errors::AdminError;
use crate::page::DeleteOutcome;

#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("Required ranking fields missing: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("Index {index} is out of range for {len} rankings")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No ranking with id {id}")]
    NotFound { id: i64 },

    #[error(transparent)]
    Request {
        #[from]
        source: RequestError,
    },
}

impl AdminError for RankingError {
    fn error_code(&self) -> &'static str {
        match self {
            RankingError::MissingFields { .. } => "RANKING_MISSING_FIELDS",
            RankingError::IndexOutOfRange { .. } => "RANKING_INDEX_OUT_OF_RANGE",
            RankingError::NotFound { .. } => "RANKING_NOT_FOUND",
            RankingError::Request { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            RankingError::Request { source } => source.is_user_error(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// One (target, category) ranking list plus the entities that can be added.
pub struct RankingBoard {
    target: RankingTarget,
    category: RankingCategory,
    entries: Vec<RankingEntry>,
    available: Vec<RankedItem>,
    load_error: Option<RequestError>,
}

impl RankingBoard {
    pub fn new(target: RankingTarget, category: RankingCategory) -> Self {
        Self {
            target,
            category,
            entries: Vec::new(),
            available: Vec::new(),
            load_error: None,
        }
    }

    pub fn target(&self) -> RankingTarget {
        self.target
    }

    pub fn category(&self) -> RankingCategory {
        self.category
    }

    /// Entries in display order (rank ascending; ties keep backend order).
    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn available(&self) -> &[RankedItem] {
        &self.available
    }

    /// Error from the most recent load, cleared by the next successful one.
    pub fn load_error(&self) -> Option<&RequestError> {
        self.load_error.as_ref()
    }

    /// Fetch the ranking list and the available entities together.
    ///
    /// On failure the previous lists stay in place and the error is kept in
    /// [`RankingBoard::load_error`] as well as returned.
    pub async fn load<T: Transport>(&mut self, client: &ApiClient<T>) -> Result<(), RankingError> {
        match self.fetch(client).await {
            Ok(()) => {
                self.load_error = None;
                Ok(())
            }
            Err(e) => {
                self.load_error = Some(e.clone());
                Err(e.into())
            }
        }
    }

    /// Reload after a successful write. A failure is logged and kept on
    /// [`RankingBoard::load_error`]; the write itself already succeeded.
    async fn refresh<T: Transport>(&mut self, client: &ApiClient<T>) {
        if self.load(client).await.is_err() {
            warn!(
                event = "core.ranking.refresh_failed",
                target = %self.target,
                category = %self.category
            );
        }
    }

    async fn fetch<T: Transport>(&mut self, client: &ApiClient<T>) -> Result<(), RequestError> {
        let base = self.target.base_path();
        let available_path = format!("{}/available", base);
        let query = vec![("category".to_string(), self.category.as_str().to_string())];

        let (mut entries, available) = futures::try_join!(
            client.get::<Vec<RankingEntry>>(&base, query),
            client.get::<Vec<RankedItem>>(&available_path, Vec::new()),
        )
        .inspect_err(|e| {
            warn!(
                event = "core.ranking.load_failed",
                target = %self.target,
                category = %self.category,
                error = %e
            )
        })?;

        entries.sort_by_key(|e| e.rank);
        self.entries = entries;
        self.available = available;

        info!(
            event = "core.ranking.load_completed",
            target = %self.target,
            category = %self.category,
            count = self.entries.len()
        );
        Ok(())
    }

    /// Add an entity. Requires an entity id and a non-zero score.
    pub async fn add<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
        new: NewRanking,
    ) -> Result<(), RankingError> {
        let mut missing = Vec::new();
        if new.entity_id == 0 {
            missing.push(self.target.id_field().to_string());
        }
        if new.score == 0.0 || !new.score.is_finite() {
            missing.push("score".to_string());
        }
        if !missing.is_empty() {
            return Err(RankingError::MissingFields { fields: missing });
        }

        let rank = new.rank.unwrap_or(self.entries.len() as i64 + 1);
        let mut payload = json!({
            "rank": rank,
            "score": new.score,
            "category": self.category.as_str(),
            "isActive": new.is_active,
        });
        payload[self.target.id_field()] = json!(new.entity_id);
        if let Some(description) = new.description.filter(|d| !d.trim().is_empty()) {
            payload["description"] = json!(description);
        }

        client
            .post::<_, Value>(&self.target.base_path(), &payload)
            .await?;

        info!(
            event = "core.ranking.add_completed",
            target = %self.target,
            entity_id = new.entity_id,
            rank = rank
        );
        self.refresh(client).await;
        Ok(())
    }

    /// Remove the ranking row `id` once `confirm` accepts the prompt.
    pub async fn remove<T, F>(
        &mut self,
        client: &ApiClient<T>,
        id: i64,
        confirm: F,
    ) -> Result<DeleteOutcome, RankingError>
    where
        T: Transport,
        F: FnOnce(&str) -> bool,
    {
        let entry = self
            .entries
            .iter()
            .find(|e| e.id == id)
            .ok_or(RankingError::NotFound { id })?;
        let prompt = format!("Remove {} from the {} ranking?", entry.label(), self.category);
        if !confirm(&prompt) {
            return Ok(DeleteOutcome::Declined);
        }

        client
            .delete(&format!("{}/{}", self.target.base_path(), id))
            .await?;

        info!(event = "core.ranking.remove_completed", target = %self.target, id = id);
        self.refresh(client).await;
        Ok(DeleteOutcome::Deleted)
    }

    /// Swap ranks with the entry above. Returns `false` for the first entry
    /// (no request made).
    pub async fn move_up<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
        index: usize,
    ) -> Result<bool, RankingError> {
        self.swap(client, index, Direction::Up).await
    }

    /// Swap ranks with the entry below. Returns `false` for the last entry
    /// (no request made).
    pub async fn move_down<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
        index: usize,
    ) -> Result<bool, RankingError> {
        self.swap(client, index, Direction::Down).await
    }

    async fn swap<T: Transport>(
        &mut self,
        client: &ApiClient<T>,
        index: usize,
        direction: Direction,
    ) -> Result<bool, RankingError> {
        let len = self.entries.len();
        if index >= len {
            return Err(RankingError::IndexOutOfRange { index, len });
        }
        let neighbour = match direction {
            Direction::Up if index == 0 => return Ok(false),
            Direction::Down if index + 1 == len => return Ok(false),
            Direction::Up => index - 1,
            Direction::Down => index + 1,
        };

        // The board only changes through the reload below.
        let mut reordered = self.entries.clone();
        let rank = reordered[index].rank;
        reordered[index].rank = reordered[neighbour].rank;
        reordered[neighbour].rank = rank;

        let payload = reorder_payload(self.target, &reordered);
        client
            .put::<_, Value>(&format!("{}/reorder", self.target.base_path()), &payload)
            .await
            .inspect_err(|e| {
                warn!(
                    event = "core.ranking.reorder_failed",
                    target = %self.target,
                    index = index,
                    error = %e
                )
            })?;

        info!(
            event = "core.ranking.reorder_completed",
            target = %self.target,
            index = index,
            neighbour = neighbour
        );
        self.refresh(client).await;
        Ok(true)
    }
}

/// Bulk reorder body: every entry as `{<id field>, rank}` in display order.
pub fn reorder_payload(target: RankingTarget, entries: &[RankingEntry]) -> Value {
    let rankings: Vec<Value> = entries
        .iter()
        .map(|e| {
            let mut item = json!({ "rank": e.rank });
            item[target.id_field()] = json!(e.entity_id);
            item
        })
        .collect();
    json!({ "rankings": rankings })
}
