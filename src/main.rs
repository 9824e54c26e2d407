use anyhow::{Context, Result};
use clap::Parser;
use facegate::config::CredentialSource;
use facegate::detector::{FaceDetector, create_detector};
use facegate::pipeline::{self, PhotoOutcome};
use facegate::uploader::{FolderUploader, HttpUploader, Uploader};
use image::DynamicImage;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use walkdir::WalkDir;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Check that a photo shows exactly one acceptably sized face, then upload it"
)]
struct Args {
    /// Photo to check, or a directory of photos to check in batch
    #[clap(value_parser)]
    input: PathBuf,

    /// Identifier the accepted photo is stored under (e.g. a student ID)
    #[clap(short, long)]
    identifier: String,

    /// Local folder to place accepted photos into
    #[clap(long)]
    upload_dir: Option<PathBuf>,

    /// HTTP endpoint to upload accepted photos to
    #[clap(long, conflicts_with = "upload_dir")]
    upload_url: Option<String>,

    /// Credential source for HTTP uploads: file:<path>, env:<VAR>, or interactive
    #[clap(long)]
    credentials: Option<CredentialSource>,

    /// Face detector to use (rustface, etc.)
    #[clap(long, default_value = "rustface")]
    detector: String,
}

/// Build the configured upload destination, if any.
fn build_uploader(args: &Args) -> Result<Option<Box<dyn Uploader>>> {
    if let Some(dir) = &args.upload_dir {
        let uploader = FolderUploader::new(dir)
            .with_context(|| format!("Failed to prepare upload folder {:?}", dir))?;
        return Ok(Some(Box::new(uploader)));
    }

    if let Some(url) = &args.upload_url {
        let token = args
            .credentials
            .as_ref()
            .map(CredentialSource::resolve)
            .transpose()
            .context("Failed to resolve upload credentials")?;
        return Ok(Some(Box::new(HttpUploader::new(url.clone(), token))));
    }

    if args.credentials.is_some() {
        warn!("--credentials given without --upload-url, ignoring");
    }

    Ok(None)
}

/// Load a photo, keeping the original bytes for upload.
fn load_photo(path: &Path) -> Result<(DynamicImage, Vec<u8>)> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read photo: {:?}", path))?;
    let image = image::load_from_memory(&bytes)
        .with_context(|| format!("Failed to decode photo: {:?}", path))?;
    Ok((image, bytes))
}

/// Print the verdict and any upload result for one photo.
fn report(path: &Path, outcome: &PhotoOutcome) {
    println!("{}: {}", path.display(), outcome.verdict);
    if let Some(handle) = &outcome.uploaded {
        println!("  uploaded to {}", handle.location);
    }
    if let Some(err) = &outcome.upload_error {
        println!("  warning: photo accepted but upload failed: {err}");
    }
}

/// Check a single photo; returns whether it was accepted.
fn check_one(
    path: &Path,
    detector: &mut dyn FaceDetector,
    uploader: Option<&dyn Uploader>,
    identifier: &str,
) -> Result<bool> {
    let (image, bytes) = load_photo(path)?;
    let outcome = pipeline::check_and_upload(detector, uploader, &image, &bytes, identifier)?;
    report(path, &outcome);
    Ok(outcome.verdict.is_accepted())
}

fn is_image_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        let ext_str = ext.to_string_lossy().to_lowercase();
        return ["jpg", "jpeg", "png", "bmp"].contains(&ext_str.as_str());
    }
    false
}

/// Check every photo under a directory; accepted ones are uploaded as
/// `{identifier}-{stem}.jpg`. Returns whether all photos were accepted.
fn check_batch(
    dir: &Path,
    detector: &mut dyn FaceDetector,
    uploader: Option<&dyn Uploader>,
    identifier: &str,
) -> Result<bool> {
    info!("Scanning input directory for photos: {:?}", dir);
    let photo_paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && is_image_file(e.path()))
        .map(|e| e.path().to_owned())
        .collect();

    info!("Found {} photos", photo_paths.len());

    if photo_paths.is_empty() {
        warn!("No photos found in input directory");
        return Ok(true);
    }

    let mut accepted = 0;
    let mut rejected = 0;
    let mut failed = 0;
    let start_time = Instant::now();

    for path in &photo_paths {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let per_photo_identifier = format!("{identifier}-{stem}");

        match check_one(path, detector, uploader, &per_photo_identifier) {
            Ok(true) => accepted += 1,
            Ok(false) => rejected += 1,
            Err(err) => {
                error!("Failed to process {:?}: {}", path, err);
                failed += 1;
            }
        }
    }

    info!(
        "Checked {} photos in {} seconds: {} accepted, {} rejected, {} failed",
        photo_paths.len(),
        start_time.elapsed().as_secs(),
        accepted,
        rejected,
        failed
    );

    Ok(rejected == 0 && failed == 0)
}

/// Main program logic; returns whether every checked photo was accepted.
fn run(args: Args) -> Result<bool> {
    // Initialize logger
    env_logger::init();

    // Initialize face detector
    info!("Initializing face detector: {}", args.detector);
    let mut detector =
        create_detector(&args.detector).context("Failed to initialize face detector")?;

    let uploader = build_uploader(&args)?;

    if args.input.is_dir() {
        check_batch(
            &args.input,
            detector.as_mut(),
            uploader.as_deref(),
            &args.identifier,
        )
    } else {
        check_one(
            &args.input,
            detector.as_mut(),
            uploader.as_deref(),
            &args.identifier,
        )
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        // Rejections are outcomes, not errors: reported on stdout,
        // signalled through the exit code
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
