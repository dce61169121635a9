//! The dish list: a snapshot from the last successful load plus a local
//! search filter.

use std::sync::Arc;

use dishbook_core::dish::Dish;
use dishbook_core::search::filter_dishes;
use dishbook_core::types::DishId;
use tokio::sync::RwLock;

use crate::error::ClientError;
use crate::guard::RequestGuard;
use crate::ports::{DishReader, DishWriter};
use crate::session::AuthGate;
use crate::views::{Confirm, DeleteOutcome, DELETE_PROMPT};

/// Everything the list screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    /// Authoritative snapshot from the last successful load.
    pub all_dishes: Vec<Dish>,
    pub search_term: String,
    /// Page-level error from the last failed load.
    pub load_error: Option<String>,
    /// Inline error from the last failed delete.
    pub action_error: Option<String>,
    pub loading: bool,
    /// One-off message carried over from the previous screen.
    pub flash: Option<String>,
}

impl ListState {
    /// Dishes matching the current search term.
    pub fn displayed(&self) -> Vec<Dish> {
        filter_dishes(&self.all_dishes, &self.search_term)
    }
}

pub struct DishListView {
    gate: Arc<AuthGate>,
    reader: Arc<dyn DishReader>,
    writer: Arc<dyn DishWriter>,
    state: RwLock<ListState>,
    guard: RequestGuard,
}

impl DishListView {
    pub fn new(gate: Arc<AuthGate>, reader: Arc<dyn DishReader>, writer: Arc<dyn DishWriter>) -> Self {
        Self {
            gate,
            reader,
            writer,
            state: RwLock::new(ListState::default()),
            guard: RequestGuard::new(),
        }
    }

    /// Show `message` once, e.g. the success text from a form.
    pub fn with_flash(mut self, message: Option<String>) -> Self {
        self.state.get_mut().flash = message;
        self
    }

    /// Fetch every dish and replace the snapshot. On failure the previous
    /// snapshot is kept and `load_error` is set.
    pub async fn load(&self) -> Result<(), ClientError> {
        let session = self.gate.require_session()?;
        let ticket = self.guard.begin();
        self.state.write().await.loading = true;

        let result = self.guard.run(ticket, self.reader.list_dishes(&session)).await;
        if let Err(ClientError::Cancelled) = result {
            return Err(ClientError::Cancelled);
        }

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(dishes) => {
                tracing::debug!(count = dishes.len(), "Dish list loaded");
                state.all_dishes = dishes;
                state.load_error = None;
                Ok(())
            }
            Err(err) => {
                self.gate.observe(&err);
                tracing::warn!(error = %err, "Dish list load failed");
                state.load_error = Some(err.message());
                Err(err)
            }
        }
    }

    /// Change the filter. Never refetches.
    pub async fn set_search_term(&self, term: impl Into<String>) {
        self.state.write().await.search_term = term.into();
    }

    pub async fn displayed(&self) -> Vec<Dish> {
        self.state.read().await.displayed()
    }

    /// Ask, then delete. The entry leaves the snapshot only after the
    /// server confirms; a failure leaves it in place and sets
    /// `action_error`.
    pub async fn delete(&self, id: DishId, confirm: &impl Confirm) -> Result<DeleteOutcome, ClientError> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }
        let session = self.gate.require_session()?;
        self.state.write().await.action_error = None;

        let result = self
            .guard
            .run_until_closed(self.writer.delete_dish(&session, id))
            .await;
        if let Err(ClientError::Cancelled) = result {
            return Err(ClientError::Cancelled);
        }

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                state.all_dishes.retain(|dish| dish.id != id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                self.gate.observe(&err);
                state.action_error = Some(err.message());
                Err(err)
            }
        }
    }

    pub async fn snapshot(&self) -> ListState {
        self.state.read().await.clone()
    }

    /// The flash message, cleared once read.
    pub async fn take_flash(&self) -> Option<String> {
        self.state.write().await.flash.take()
    }

    /// Stop applying responses; pending requests resolve as cancelled.
    pub fn unmount(&self) {
        self.guard.close();
    }
}
