//! The dish record and its write payloads.
//!
//! A [`Dish`] is the only persisted entity. `id` and `created_at` are
//! assigned by the store on insert and never change afterwards; the
//! remaining fields are replaced wholesale on every update.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::ingredients;
use crate::types::{DishId, Timestamp};

/// Fallback text shown when a dish has no notes.
pub const NO_NOTES_PLACEHOLDER: &str = "No notes added for this dish.";

/// A stored dish as returned by the store and the mutation API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub dish_name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

impl Dish {
    /// Whether this dish carries exactly `other` as its ingredients,
    /// ignoring order.
    pub fn has_ingredients<S: AsRef<str>>(&self, other: &[S]) -> bool {
        if self.ingredients.len() != other.len() {
            return false;
        }
        let mut mine: Vec<&str> = self.ingredients.iter().map(String::as_str).collect();
        let mut theirs: Vec<&str> = other.iter().map(AsRef::as_ref).collect();
        mine.sort_unstable();
        theirs.sort_unstable();
        mine == theirs
    }

    /// Ingredients rendered for an editable text field.
    pub fn ingredients_text(&self) -> String {
        ingredients::join_for_display(&self.ingredients)
    }

    /// Notes for display, falling back to [`NO_NOTES_PLACEHOLDER`].
    pub fn notes_or_placeholder(&self) -> &str {
        match self.notes.as_deref() {
            Some(notes) if !notes.is_empty() => notes,
            _ => NO_NOTES_PLACEHOLDER,
        }
    }
}

/// The user-editable fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DishFields {
    #[validate(custom(function = "validate_dish_name"))]
    pub dish_name: String,
    #[validate(length(min = 1, message = "At least one ingredient is required"))]
    pub ingredients: Vec<String>,
}

impl DishFields {
    /// Build fields from the raw form inputs, splitting the ingredients
    /// text. Blank text yields no ingredients at all, so it fails
    /// validation instead of producing one empty entry.
    pub fn from_form(dish_name: &str, ingredients_text: &str) -> Self {
        let ingredients = if ingredients_text.trim().is_empty() {
            Vec::new()
        } else {
            ingredients::parse_ingredients(ingredients_text)
        };
        Self {
            dish_name: dish_name.trim().to_string(),
            ingredients,
        }
    }

    /// Validate, mapping failures to [`CoreError::Validation`].
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(CoreError::from)
    }
}

fn validate_dish_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::from("Dish name is required")));
    }
    Ok(())
}

/// Insert payload. `id` and `created_at` are left to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDish {
    pub dish_name: String,
    pub ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewDish {
    pub fn new(fields: DishFields, image_url: Option<String>) -> Self {
        Self {
            dish_name: fields.dish_name,
            ingredients: fields.ingredients,
            image_url,
        }
    }
}

/// Update payload. An absent `image_url` leaves the stored image untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DishChanges {
    pub dish_name: String,
    pub ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl DishChanges {
    pub fn new(fields: DishFields, image_url: Option<String>) -> Self {
        Self {
            dish_name: fields.dish_name,
            ingredients: fields.ingredients,
            image_url,
        }
    }

    /// Apply these changes to an existing record in place.
    pub fn apply_to(&self, dish: &mut Dish) {
        dish.dish_name.clone_from(&self.dish_name);
        dish.ingredients.clone_from(&self.ingredients);
        if let Some(url) = &self.image_url {
            dish.image_url = Some(url.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
