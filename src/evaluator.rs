use std::fmt;
use thiserror::Error;

/// Smallest face-area ratio still considered acceptable (exclusive).
///
/// Below this the face is too small to make a legible passport photo.
pub const MIN_FACE_AREA_RATIO: f64 = 0.1;

/// Largest face-area ratio still considered acceptable (exclusive).
///
/// Above this the photo looks cropped or zoomed. Both bounds are strict:
/// a ratio of exactly 0.1 or 0.6 is rejected.
pub const MAX_FACE_AREA_RATIO: f64 = 0.6;

/// Axis-aligned bounding box of a detected face, origin top-left,
/// in pixel coordinates of the source image.
///
/// Positive width/height and containment within the image are the
/// detector's invariants; the evaluator does not re-check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedFace {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DetectedFace {
    /// Bounding-box area in pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Width and height of the source image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// Total image area in pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Outcome of the acceptability evaluation.
///
/// Rejections are valid terminal outcomes of the decision policy, not
/// errors; their `Display` form is the explanation shown to the end user.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Exactly one face, occupying a plausible fraction of the image.
    Accepted(DetectedFace),
    /// No face was detected.
    RejectedNoFace,
    /// More than one face was detected; carries the count.
    RejectedMultipleFaces(usize),
    /// Exactly one face, but its area ratio falls outside (0.1, 0.6);
    /// carries the computed ratio.
    RejectedBadFraction(f64),
}

impl Verdict {
    /// Whether the photo passed the acceptance rule.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted(_) => write!(f, "acceptable: full face is visible"),
            Verdict::RejectedNoFace => write!(f, "not acceptable: no face detected"),
            Verdict::RejectedMultipleFaces(count) => {
                write!(f, "not acceptable: {count} faces detected, expected exactly one")
            }
            Verdict::RejectedBadFraction(ratio) => write!(
                f,
                "not acceptable: face size seems incorrect (covers {:.1}% of the image, too small or too zoomed)",
                ratio * 100.0
            ),
        }
    }
}

/// Error returned when the evaluator is handed unusable geometry.
#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("image dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Decide whether a photo is acceptable given the detector's findings.
///
/// Exactly one face whose bounding-box area is strictly between 10% and
/// 60% of the image area is accepted; everything else is rejected with
/// the reason. Pure and deterministic; concurrent calls need no
/// synchronization.
pub fn evaluate(
    faces: &[DetectedFace],
    dims: ImageDimensions,
) -> Result<Verdict, EvaluateError> {
    if dims.width == 0 || dims.height == 0 {
        return Err(EvaluateError::InvalidDimensions {
            width: dims.width,
            height: dims.height,
        });
    }

    match faces {
        [] => Ok(Verdict::RejectedNoFace),
        [face] => {
            let ratio = face.area() as f64 / dims.area() as f64;
            if ratio > MIN_FACE_AREA_RATIO && ratio < MAX_FACE_AREA_RATIO {
                Ok(Verdict::Accepted(*face))
            } else {
                Ok(Verdict::RejectedBadFraction(ratio))
            }
        }
        many => Ok(Verdict::RejectedMultipleFaces(many.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(x: i32, y: i32, width: u32, height: u32) -> DetectedFace {
        DetectedFace {
            x,
            y,
            width,
            height,
        }
    }

    fn dims(width: u32, height: u32) -> ImageDimensions {
        ImageDimensions { width, height }
    }

    #[test]
    fn empty_input_is_rejected_no_face() {
        let verdict = evaluate(&[], dims(1000, 1000)).unwrap();
        assert_eq!(verdict, Verdict::RejectedNoFace);
    }

    #[test]
    fn two_faces_are_rejected_with_count() {
        let faces = [face(0, 0, 100, 100), face(500, 500, 100, 100)];
        let verdict = evaluate(&faces, dims(1000, 1000)).unwrap();
        assert_eq!(verdict, Verdict::RejectedMultipleFaces(2));
    }

    #[test]
    fn many_faces_report_exact_count() {
        let faces = vec![face(0, 0, 50, 50); 5];
        let verdict = evaluate(&faces, dims(1000, 1000)).unwrap();
        assert_eq!(verdict, Verdict::RejectedMultipleFaces(5));
    }

    #[test]
    fn plausible_single_face_is_accepted() {
        // 400x400 of 1000x1000 → ratio 0.16
        let f = face(100, 100, 400, 400);
        let verdict = evaluate(&[f], dims(1000, 1000)).unwrap();
        assert_eq!(verdict, Verdict::Accepted(f));
    }

    #[test]
    fn tiny_face_is_rejected_with_ratio() {
        // 50x50 of 1000x1000 → ratio 0.0025
        let verdict = evaluate(&[face(0, 0, 50, 50)], dims(1000, 1000)).unwrap();
        assert_eq!(verdict, Verdict::RejectedBadFraction(0.0025));
    }

    #[test]
    fn oversized_face_is_rejected_with_ratio() {
        // 900x900 of 1000x1000 → ratio 0.81
        let verdict = evaluate(&[face(0, 0, 900, 900)], dims(1000, 1000)).unwrap();
        assert_eq!(verdict, Verdict::RejectedBadFraction(0.81));
    }

    #[test]
    fn lower_bound_is_strict() {
        // 250x400 of 1000x1000 → ratio exactly 0.1, must be rejected
        let verdict = evaluate(&[face(0, 0, 250, 400)], dims(1000, 1000)).unwrap();
        assert_eq!(verdict, Verdict::RejectedBadFraction(0.1));
    }

    #[test]
    fn upper_bound_is_strict() {
        // 600x1000 of 1000x1000 → ratio exactly 0.6, must be rejected
        let verdict = evaluate(&[face(0, 0, 600, 1000)], dims(1000, 1000)).unwrap();
        assert_eq!(verdict, Verdict::RejectedBadFraction(0.6));
    }

    #[test]
    fn just_inside_lower_bound_is_accepted() {
        // 101x1000 of 1000x1000 → ratio 0.101
        let f = face(0, 0, 101, 1000);
        let verdict = evaluate(&[f], dims(1000, 1000)).unwrap();
        assert_eq!(verdict, Verdict::Accepted(f));
    }

    #[test]
    fn just_inside_upper_bound_is_accepted() {
        // 599x1000 of 1000x1000 → ratio 0.599
        let f = face(0, 0, 599, 1000);
        let verdict = evaluate(&[f], dims(1000, 1000)).unwrap();
        assert_eq!(verdict, Verdict::Accepted(f));
    }

    #[test]
    fn zero_width_dimensions_fail() {
        let err = evaluate(&[], dims(0, 1000)).unwrap_err();
        assert!(matches!(
            err,
            EvaluateError::InvalidDimensions {
                width: 0,
                height: 1000
            }
        ));
    }

    #[test]
    fn zero_height_dimensions_fail() {
        let err = evaluate(&[face(0, 0, 100, 100)], dims(1000, 0)).unwrap_err();
        assert!(matches!(err, EvaluateError::InvalidDimensions { .. }));
    }

    #[test]
    fn face_order_does_not_matter_for_multiple_rejection() {
        let a = face(0, 0, 400, 400);
        let b = face(600, 600, 100, 100);
        let forward = evaluate(&[a, b], dims(1000, 1000)).unwrap();
        let reversed = evaluate(&[b, a], dims(1000, 1000)).unwrap();
        assert_eq!(forward, reversed);
        assert_eq!(forward, Verdict::RejectedMultipleFaces(2));
    }

    #[test]
    fn non_square_geometry_uses_exact_areas() {
        // 300x200 of 800x500 → 60000 / 400000 = 0.15
        let f = face(250, 150, 300, 200);
        let verdict = evaluate(&[f], dims(800, 500)).unwrap();
        assert_eq!(verdict, Verdict::Accepted(f));
    }

    #[test]
    fn rejection_messages_explain_the_reason() {
        assert_eq!(
            Verdict::RejectedNoFace.to_string(),
            "not acceptable: no face detected"
        );
        assert!(Verdict::RejectedMultipleFaces(3)
            .to_string()
            .contains("3 faces"));
        assert!(Verdict::RejectedBadFraction(0.81)
            .to_string()
            .contains("81.0%"));
        assert!(Verdict::Accepted(face(0, 0, 400, 400))
            .to_string()
            .starts_with("acceptable"));
    }
}
