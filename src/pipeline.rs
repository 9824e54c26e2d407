use anyhow::Result;
use image::{DynamicImage, GenericImageView};
use log::{info, warn};

use crate::detector::FaceDetector;
use crate::evaluator::{self, ImageDimensions, Verdict};
use crate::uploader::{FileHandle, UploadError, Uploader};

/// Destination name for an accepted photo: `{identifier}.jpg`.
///
/// The identifier is caller-supplied; the evaluator never sees it.
pub fn destination_name(identifier: &str) -> String {
    format!("{identifier}.jpg")
}

/// Result of checking (and possibly uploading) a single photo.
#[derive(Debug)]
pub struct PhotoOutcome {
    /// The acceptability decision.
    pub verdict: Verdict,
    /// Handle to the uploaded file, when the photo was accepted and the
    /// upload succeeded.
    pub uploaded: Option<FileHandle>,
    /// Upload failure, when the photo was accepted but the destination
    /// refused it. Terminal for the request; the verdict stands.
    pub upload_error: Option<UploadError>,
}

/// Run detection and the acceptance rule over one image.
pub fn check_photo(detector: &mut dyn FaceDetector, image: &DynamicImage) -> Result<Verdict> {
    let faces = detector.detect_faces(image)?;
    let (width, height) = image.dimensions();
    let verdict = evaluator::evaluate(&faces, ImageDimensions { width, height })?;
    Ok(verdict)
}

/// Check one photo and, if accepted, hand it to the upload destination
/// under `{identifier}.jpg`.
///
/// Upload failures are caught here and recorded on the outcome rather
/// than propagated: evaluation already completed, and the failure is
/// surfaced to the user as a warning with no retry.
pub fn check_and_upload(
    detector: &mut dyn FaceDetector,
    uploader: Option<&dyn Uploader>,
    image: &DynamicImage,
    image_bytes: &[u8],
    identifier: &str,
) -> Result<PhotoOutcome> {
    let verdict = check_photo(detector, image)?;

    let mut outcome = PhotoOutcome {
        verdict,
        uploaded: None,
        upload_error: None,
    };

    if let (Verdict::Accepted(_), Some(uploader)) = (&outcome.verdict, uploader) {
        let name = destination_name(identifier);
        match uploader.upload(image_bytes, &name) {
            Ok(handle) => {
                info!("Uploaded accepted photo to {}", handle.location);
                outcome.uploaded = Some(handle);
            }
            Err(err) => {
                warn!("Photo accepted but upload of {} failed: {}", name, err);
                outcome.upload_error = Some(err);
            }
        }
    }

    Ok(outcome)
}
