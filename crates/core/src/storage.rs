//! Object storage naming for dish photos.

use crate::photo::IMAGE_EXTENSION;

/// Bucket holding every dish photo.
pub const DISH_IMAGE_BUCKET: &str = "dish-images";

/// Folder inside the bucket.
pub const DISH_IMAGE_FOLDER: &str = "dishes";

/// Object path for a photo named after `key` (a fresh UUID on create, the
/// dish id on update).
pub fn object_path(key: impl std::fmt::Display) -> String {
    format!("{DISH_IMAGE_FOLDER}/{key}.{IMAGE_EXTENSION}")
}

/// Recover the object path from a public URL by keeping everything from
/// the first `dishes` segment onwards.
///
/// Returns `None` when the URL does not point into [`DISH_IMAGE_FOLDER`].
pub fn object_path_from_url(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segments: Vec<&str> = without_query.split('/').collect();
    let start = segments.iter().position(|s| *s == DISH_IMAGE_FOLDER)?;
    if segments[start + 1..].iter().all(|s| s.is_empty()) {
        return None;
    }
    Some(segments[start..].join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_uses_folder_and_jpeg_extension() {
        assert_eq!(object_path("abc"), "dishes/abc.jpg");
    }

    #[test]
    fn path_recovered_from_public_url() {
        let url = "https://x.supabase.co/storage/v1/object/public/dish-images/dishes/abc.jpg";
        assert_eq!(object_path_from_url(url).as_deref(), Some("dishes/abc.jpg"));
    }

    #[test]
    fn query_string_is_ignored() {
        let url = "http://localhost:8000/images/dishes/abc.jpg?v=2";
        assert_eq!(object_path_from_url(url).as_deref(), Some("dishes/abc.jpg"));
    }

    #[test]
    fn foreign_url_has_no_path() {
        assert_eq!(object_path_from_url("https://cdn.example.com/photo.jpg"), None);
        assert_eq!(object_path_from_url("https://cdn.example.com/dishes/"), None);
    }
}
