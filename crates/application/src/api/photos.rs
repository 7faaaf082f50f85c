//! Listing photo upload and management.

use std::sync::Arc;

use agora_domain::{ListingId, Photo, PhotoId, UploadedPhoto};

use crate::error::ApiError;
use crate::ports::{ApiRequest, ApiTransport, MultipartFile};

/// Form field name the upload endpoints read the file from.
const FILE_FIELD: &str = "file";

/// Typed access to the photo endpoints.
///
/// Uploads require a signed-in session; listing photos are public.
pub struct PhotosApi {
    transport: Arc<dyn ApiTransport>,
}

impl PhotosApi {
    /// Creates the wrapper over a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// Uploads a standalone image.
    ///
    /// The MIME type is guessed from the file name. The backend only
    /// accepts images, so anything else is rejected before the upload
    /// starts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBody`] for non-image files and the
    /// classified [`ApiError`] when the request fails.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadedPhoto, ApiError> {
        let file = image_part(file_name, bytes)?;
        let request = ApiRequest::post("/api/photos/upload").with_multipart(file);
        self.transport.execute(request).await?.json()
    }

    /// Uploads an image and attaches it to an owned listing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBody`] for non-image files and the
    /// classified [`ApiError`] when the request fails.
    pub async fn attach(
        &self,
        listing_id: ListingId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Photo, ApiError> {
        let file = image_part(file_name, bytes)?;
        let request =
            ApiRequest::post(format!("/api/photos/listing/{listing_id}")).with_multipart(file);
        self.transport.execute(request).await?.json()
    }

    /// Lists the photos of a listing.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn for_listing(&self, listing_id: ListingId) -> Result<Vec<Photo>, ApiError> {
        self.transport
            .execute(ApiRequest::get(format!("/api/photos/listing/{listing_id}")))
            .await?
            .json()
    }

    /// Removes a photo from an owned listing.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] when the request fails.
    pub async fn delete(&self, photo_id: PhotoId) -> Result<(), ApiError> {
        let request = ApiRequest::delete(format!("/api/photos/{photo_id}"));
        self.transport.execute(request).await?;
        Ok(())
    }
}

fn image_part(file_name: &str, bytes: Vec<u8>) -> Result<MultipartFile, ApiError> {
    let mime = mime_guess::from_path(file_name).first_or_octet_stream();
    if mime.type_() != mime::IMAGE {
        return Err(ApiError::InvalidBody(format!(
            "{file_name:?} is not an image file"
        )));
    }
    Ok(MultipartFile {
        field: FILE_FIELD.to_string(),
        file_name: file_name.to_string(),
        content_type: mime.essence_str().to_string(),
        bytes,
    })
}
