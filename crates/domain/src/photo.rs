//! Photo Domain Model

use serde::{Deserialize, Serialize};

use crate::id::PhotoId;

/// A photo attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Backend identifier of the photo.
    pub photo_id: PhotoId,

    /// Where the image file is served from.
    pub url: String,

    /// Optional alternative text for accessibility.
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Result of uploading a standalone image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedPhoto {
    /// Where the uploaded image is served from.
    pub url: String,

    /// Name the backend stored the file under.
    pub filename: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn photo_parses_without_alt_text() {
        let json = r#"{"photo_id": 3, "url": "/media/abc.jpg"}"#;
        let photo: Photo = serde_json::from_str(json).unwrap();
        assert_eq!(photo.url, "/media/abc.jpg");
        assert_eq!(photo.alt_text, None);
    }
}
