//! Front-end-agnostic view controllers.
//!
//! Each controller owns its state behind a [`tokio::sync::RwLock`] so a
//! front end can render from [`snapshot`](list::DishListView::snapshot)
//! style accessors while a request is pending. No lock is held across a
//! network call.

pub mod detail;
pub mod form;
pub mod list;

pub use detail::{DetailState, DishDetailView};
pub use form::{DishFormView, FormDraft, FormMode, FormState, ImagePreview, Submitted};
pub use list::{DishListView, ListState};

/// Question asked before any irreversible delete.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this dish?";

pub const DISH_ADDED: &str = "Dish added successfully!";
pub const DISH_UPDATED: &str = "Dish updated successfully!";
pub const DISH_DELETED: &str = "Dish deleted successfully!";

/// Where the front end should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The dish list, optionally showing a one-off message.
    List { message: Option<String> },
    /// The sign-in screen.
    SignIn,
}

impl Navigation {
    pub fn list_with(message: &str) -> Self {
        Self::List {
            message: Some(message.to_string()),
        }
    }
}

/// The yes/no gate in front of a delete.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a delete request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user said no; nothing was sent.
    Declined,
}
