//! Local dish search.
//!
//! This module lives in `core` (zero internal deps) so the list view and
//! the server's search endpoint share one definition of "matches".

use crate::dish::Dish;

/// Whether `dish` matches `term`: a case-insensitive substring of the dish
/// name or of any ingredient. An empty term matches everything.
pub fn matches(dish: &Dish, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    dish.dish_name.to_lowercase().contains(&needle)
        || dish
            .ingredients
            .iter()
            .any(|ingredient| ingredient.to_lowercase().contains(&needle))
}

/// The subset of `dishes` matching `term`, in their original order.
pub fn filter_dishes(dishes: &[Dish], term: &str) -> Vec<Dish> {
    dishes
        .iter()
        .filter(|dish| matches(dish, term))
        .cloned()
        .collect()
}

/// Sort by `created_at`, newest first.
pub fn sort_newest_first(dishes: &mut [Dish]) {
    dishes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
