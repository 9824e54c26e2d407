pub mod config;
pub mod detector;
pub mod evaluator;
pub mod pipeline;
pub mod uploader;

// Re-export commonly used items
pub use detector::{FaceDetector, RustFaceDetector, create_detector};
pub use evaluator::{DetectedFace, EvaluateError, ImageDimensions, Verdict, evaluate};
pub use pipeline::{PhotoOutcome, check_and_upload, check_photo};
pub use uploader::{FileHandle, FolderUploader, HttpUploader, UploadError, Uploader};
