//! Conversion between comma-separated ingredient text and ingredient lists.
//!
//! Tokens are trimmed but never dropped: `"Eggs,,Milk"` yields three
//! entries, the middle one empty.

/// Separator used on the wire (multipart `ingredients` field).
pub const PAYLOAD_SEPARATOR: &str = ",";

/// Separator used when presenting ingredients as editable text.
pub const DISPLAY_SEPARATOR: &str = ", ";

/// Split `text` on commas and trim every token.
pub fn parse_ingredients(text: &str) -> Vec<String> {
    text.split(',').map(|token| token.trim().to_string()).collect()
}

/// Join ingredients for the multipart payload.
pub fn join_for_payload<S: AsRef<str>>(ingredients: &[S]) -> String {
    join(ingredients, PAYLOAD_SEPARATOR)
}

/// Join ingredients for an editable text field.
pub fn join_for_display<S: AsRef<str>>(ingredients: &[S]) -> String {
    join(ingredients, DISPLAY_SEPARATOR)
}

fn join<S: AsRef<str>>(ingredients: &[S], separator: &str) -> String {
    ingredients
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(separator)
}
