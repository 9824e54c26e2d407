use anyhow::{Context, Result};
use image::DynamicImage;
use log::{info, warn};
use rustface::{Detector, ImageData};
use std::path::Path;

use crate::evaluator::DetectedFace;

/// Minimum detectable face size in pixels. Faces smaller than this are
/// below the acceptance threshold anyway, so the detector skips them.
const MIN_FACE_SIZE: u32 = 100;

/// Detection score cutoff for the SeetaFace engine.
const SCORE_THRESHOLD: f64 = 2.0;

/// Trait for face detector implementations.
pub trait FaceDetector {
    /// Detect faces in an image, returning their bounding boxes.
    fn detect_faces(&mut self, image: &DynamicImage) -> Result<Vec<DetectedFace>>;
}

/// RustFace (SeetaFace) detector implementation.
pub struct RustFaceDetector {
    detector: Box<dyn Detector>,
}

impl RustFaceDetector {
    pub fn new() -> Result<Self> {
        // Download the model file if it doesn't exist
        let model_path = "model/seeta_fd_frontal_v1.0.bin";

        if !Path::new(model_path).exists() {
            info!("Downloading face detection model...");

            // Create the model directory
            std::fs::create_dir_all("model")?;

            // Try multiple URLs for the model
            let model_urls = [
                // Direct link from the raw GitHub content
                "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin",
                // Alternative raw content URL
                "https://raw.githubusercontent.com/atomashpolskiy/rustface/master/model/seeta_fd_frontal_v1.0.bin",
            ];

            let mut downloaded = false;
            let mut last_error = None;

            for url in &model_urls {
                info!("Trying to download from: {}", url);

                match ureq::get(url).call() {
                    Ok(response) => {
                        let mut reader = response.into_reader();
                        let mut file = std::fs::File::create(model_path)?;
                        std::io::copy(&mut reader, &mut file)?;
                        info!("Model downloaded successfully from {}", url);
                        downloaded = true;
                        break;
                    }
                    Err(err) => {
                        warn!("Failed to download from {}: {}", url, err);
                        last_error = Some(err);
                        continue;
                    }
                }
            }

            if !downloaded {
                return Err(anyhow::anyhow!(
                    "Failed to download model from all sources. Last error: {:?}\n\
                    Please download the model manually from:\n\
                    https://github.com/atomashpolskiy/rustface/tree/master/model\n\
                    and place it at: {}",
                    last_error,
                    model_path
                ));
            }
        }

        // Create and tune the detector. The 100x100 minimum face size matches
        // the acceptance rule's notion of a legible passport face; the rest
        // are the standard SeetaFace frontal-model settings.
        let mut detector = rustface::create_detector(model_path)
            .context("Failed to create face detector")?;
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        Ok(Self { detector })
    }
}

impl FaceDetector for RustFaceDetector {
    fn detect_faces(&mut self, image: &DynamicImage) -> Result<Vec<DetectedFace>> {
        let gray_image = image.to_luma8();

        // Convert to rustface ImageData format
        let (width, height) = gray_image.dimensions();
        let mut image_data = ImageData::new(gray_image.as_raw(), width, height);

        // Detect faces
        let faces = self.detector.detect(&mut image_data);

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                DetectedFace {
                    x: bbox.x(),
                    y: bbox.y(),
                    width: bbox.width(),
                    height: bbox.height(),
                }
            })
            .collect())
    }
}

/// Factory function to create detectors by name.
pub fn create_detector(name: &str) -> Result<Box<dyn FaceDetector>> {
    match name.to_lowercase().as_str() {
        "rustface" => Ok(Box::new(RustFaceDetector::new()?)),
        // Add other detectors here as needed
        _ => Err(anyhow::anyhow!("Unknown detector: {}", name)),
    }
}
