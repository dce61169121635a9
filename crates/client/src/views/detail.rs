//! Single-dish screen.

use std::sync::Arc;

use dishbook_core::dish::Dish;
use dishbook_core::types::DishId;
use tokio::sync::RwLock;

use crate::error::ClientError;
use crate::guard::RequestGuard;
use crate::ports::{DishReader, DishWriter};
use crate::session::AuthGate;
use crate::views::{Confirm, Navigation, DELETE_PROMPT, DISH_DELETED};

/// `Loading` moves to exactly one of the other three states per fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Found {
        dish: Dish,
        /// Inline error from a failed delete.
        error: Option<String>,
        deleting: bool,
    },
    /// The fetch succeeded but no dish has this id.
    NotFound,
    Error(String),
}

pub struct DishDetailView {
    gate: Arc<AuthGate>,
    reader: Arc<dyn DishReader>,
    writer: Arc<dyn DishWriter>,
    id: RwLock<DishId>,
    state: RwLock<DetailState>,
    guard: RequestGuard,
}

impl DishDetailView {
    pub fn new(
        gate: Arc<AuthGate>,
        reader: Arc<dyn DishReader>,
        writer: Arc<dyn DishWriter>,
        id: DishId,
    ) -> Self {
        Self {
            gate,
            reader,
            writer,
            id: RwLock::new(id),
            state: RwLock::new(DetailState::Loading),
            guard: RequestGuard::new(),
        }
    }

    pub async fn id(&self) -> DishId {
        *self.id.read().await
    }

    /// Fetch the current dish.
    pub async fn load(&self) -> Result<(), ClientError> {
        let id = self.id().await;
        self.fetch(id).await
    }

    /// Switch to another dish. A response still pending for the previous
    /// id is discarded when it lands.
    pub async fn show(&self, id: DishId) -> Result<(), ClientError> {
        *self.id.write().await = id;
        self.fetch(id).await
    }

    async fn fetch(&self, id: DishId) -> Result<(), ClientError> {
        let session = self.gate.require_session()?;
        let ticket = self.guard.begin();
        *self.state.write().await = DetailState::Loading;

        let result = self.guard.run(ticket, self.reader.get_dish(&session, id)).await;
        if let Err(ClientError::Cancelled) = result {
            return Err(ClientError::Cancelled);
        }

        let mut state = self.state.write().await;
        match result {
            Ok(Some(dish)) => {
                *state = DetailState::Found {
                    dish,
                    error: None,
                    deleting: false,
                };
                Ok(())
            }
            Ok(None) => {
                tracing::debug!(dish_id = %id, "Dish not found");
                *state = DetailState::NotFound;
                Ok(())
            }
            Err(err) => {
                self.gate.observe(&err);
                *state = DetailState::Error(err.message());
                Err(err)
            }
        }
    }

    /// Ask, then delete the shown dish. Returns where to go on success,
    /// `None` when declined or when no dish is shown. On failure the dish
    /// stays shown with an error.
    pub async fn delete(&self, confirm: &impl Confirm) -> Result<Option<Navigation>, ClientError> {
        let shown = match &*self.state.read().await {
            DetailState::Found { deleting: true, .. } => return Err(ClientError::InFlight),
            DetailState::Found { dish, .. } => dish.id,
            _ => return Ok(None),
        };
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(None);
        }
        let session = self.gate.require_session()?;

        // The state may have moved on while the prompt was open.
        let id = {
            let mut state = self.state.write().await;
            match &mut *state {
                DetailState::Found { deleting: true, .. } => return Err(ClientError::InFlight),
                DetailState::Found { dish, error, deleting } if dish.id == shown => {
                    *error = None;
                    *deleting = true;
                    dish.id
                }
                _ => return Ok(None),
            }
        };

        let result = self
            .guard
            .run_until_closed(self.writer.delete_dish(&session, id))
            .await;
        if let Err(ClientError::Cancelled) = result {
            return Err(ClientError::Cancelled);
        }

        let mut state = self.state.write().await;
        if let DetailState::Found { error, deleting, .. } = &mut *state {
            *deleting = false;
            if let Err(err) = &result {
                *error = Some(err.message());
            }
        }
        match result {
            Ok(()) => Ok(Some(Navigation::list_with(DISH_DELETED))),
            Err(err) => {
                self.gate.observe(&err);
                Err(err)
            }
        }
    }

    pub async fn state(&self) -> DetailState {
        self.state.read().await.clone()
    }

    pub fn unmount(&self) {
        self.guard.close();
    }
}
