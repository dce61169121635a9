//! Create/edit form for a single dish.

use std::sync::Arc;

use dishbook_core::dish::{Dish, DishFields};
use dishbook_core::photo::image_dimensions;
use dishbook_core::types::DishId;
use tokio::sync::RwLock;

use crate::error::ClientError;
use crate::guard::RequestGuard;
use crate::ports::{DishPayload, DishWriter, ImageFile};
use crate::session::AuthGate;
use crate::views::{Navigation, DISH_ADDED, DISH_UPDATED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(DishId),
}

/// Unsaved form input. Ingredients stay raw text until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub name: String,
    pub ingredients_text: String,
    pub selected_image: Option<ImageFile>,
    /// Image currently stored for the dish being edited.
    pub existing_image_url: Option<String>,
}

impl FormDraft {
    pub fn from_dish(dish: &Dish) -> Self {
        Self {
            name: dish.dish_name.clone(),
            ingredients_text: dish.ingredients_text(),
            selected_image: None,
            existing_image_url: dish.image_url.clone(),
        }
    }

    /// What the image slot shows: a newly selected file wins over the
    /// stored image.
    pub fn preview(&self) -> ImagePreview {
        match (&self.selected_image, &self.existing_image_url) {
            (Some(file), _) => ImagePreview::Selected {
                file_name: file.file_name.clone(),
                size_bytes: file.bytes.len(),
                dimensions: image_dimensions(&file.bytes).ok(),
            },
            (None, Some(url)) => ImagePreview::Existing(url.clone()),
            (None, None) => ImagePreview::None,
        }
    }
}

/// Local preview of the image slot. Nothing is uploaded until submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePreview {
    None,
    Existing(String),
    Selected {
        file_name: String,
        size_bytes: usize,
        /// `None` when the header could not be decoded.
        dimensions: Option<(u32, u32)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub draft: FormDraft,
    pub preview: ImagePreview,
    pub submitting: bool,
    pub error: Option<String>,
}

impl FormState {
    fn from_draft(draft: FormDraft) -> Self {
        let preview = draft.preview();
        Self {
            draft,
            preview,
            submitting: false,
            error: None,
        }
    }
}

/// A successful submit: the saved dish and where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub dish: Dish,
    pub navigation: Navigation,
}

pub struct DishFormView {
    gate: Arc<AuthGate>,
    writer: Arc<dyn DishWriter>,
    mode: FormMode,
    state: RwLock<FormState>,
    guard: RequestGuard,
}

impl DishFormView {
    /// An empty form for a new dish.
    pub fn create(gate: Arc<AuthGate>, writer: Arc<dyn DishWriter>) -> Self {
        Self::new(gate, writer, FormMode::Create, FormDraft::default())
    }

    /// A form pre-populated from `dish`.
    pub fn edit(gate: Arc<AuthGate>, writer: Arc<dyn DishWriter>, dish: &Dish) -> Self {
        Self::new(gate, writer, FormMode::Edit(dish.id), FormDraft::from_dish(dish))
    }

    fn new(gate: Arc<AuthGate>, writer: Arc<dyn DishWriter>, mode: FormMode, draft: FormDraft) -> Self {
        Self {
            gate,
            writer,
            mode,
            state: RwLock::new(FormState::from_draft(draft)),
            guard: RequestGuard::new(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Reset the draft, from `existing` when given. Ignored mid-submit.
    pub async fn initialize(&self, existing: Option<&Dish>) {
        let mut state = self.state.write().await;
        if state.submitting {
            return;
        }
        let draft = existing.map(FormDraft::from_dish).unwrap_or_default();
        *state = FormState::from_draft(draft);
    }

    pub async fn set_name(&self, name: impl Into<String>) {
        let mut state = self.state.write().await;
        if !state.submitting {
            state.draft.name = name.into();
        }
    }

    pub async fn set_ingredients_text(&self, text: impl Into<String>) {
        let mut state = self.state.write().await;
        if !state.submitting {
            state.draft.ingredients_text = text.into();
        }
    }

    /// Hold `file` for upload and preview it locally.
    pub async fn select_image(&self, file: ImageFile) {
        let mut state = self.state.write().await;
        if state.submitting {
            return;
        }
        state.draft.selected_image = Some(file);
        state.preview = state.draft.preview();
    }

    /// Drop the pending file; the stored image (if any) shows again.
    pub async fn clear_image(&self) {
        let mut state = self.state.write().await;
        if state.submitting {
            return;
        }
        state.draft.selected_image = None;
        state.preview = state.draft.preview();
    }

    /// Validate and save. Blank fields fail without a network call; a
    /// second call while one is pending fails with
    /// [`ClientError::InFlight`]. On failure the draft is left untouched
    /// and `error` is set.
    pub async fn submit(&self) -> Result<Submitted, ClientError> {
        let (session, payload) = {
            let mut state = self.state.write().await;
            if state.submitting {
                return Err(ClientError::InFlight);
            }
            state.error = None;

            let fields = DishFields::from_form(&state.draft.name, &state.draft.ingredients_text);
            if let Err(err) = fields.check() {
                let err = ClientError::from(err);
                state.error = Some(err.message());
                return Err(err);
            }
            let session = self.gate.require_session()?;

            state.submitting = true;
            let payload = DishPayload {
                dish_name: fields.dish_name,
                ingredients: fields.ingredients,
                image: state.draft.selected_image.clone(),
            };
            (session, payload)
        };

        let write = async {
            match self.mode {
                FormMode::Create => self.writer.create_dish(&session, &payload).await,
                FormMode::Edit(id) => self.writer.update_dish(&session, id, &payload).await,
            }
        };
        let result = self.guard.run_until_closed(write).await;
        if let Err(ClientError::Cancelled) = result {
            return Err(ClientError::Cancelled);
        }

        let mut state = self.state.write().await;
        state.submitting = false;
        match result {
            Ok(dish) => {
                state.draft.selected_image = None;
                state.draft.existing_image_url.clone_from(&dish.image_url);
                state.preview = state.draft.preview();
                let message = match self.mode {
                    FormMode::Create => DISH_ADDED,
                    FormMode::Edit(_) => DISH_UPDATED,
                };
                Ok(Submitted {
                    dish,
                    navigation: Navigation::list_with(message),
                })
            }
            Err(err) => {
                self.gate.observe(&err);
                tracing::warn!(error = %err, "Dish save failed");
                state.error = Some(err.message());
                Err(err)
            }
        }
    }

    pub async fn snapshot(&self) -> FormState {
        self.state.read().await.clone()
    }

    pub fn unmount(&self) {
        self.guard.close();
    }
}
