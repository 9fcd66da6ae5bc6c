// Boundary contracts for the external capabilities the pipeline consumes.
// Each capability is wired in at construction time; call sites never probe
// process-wide flags.

use std::collections::HashMap;

use image::DynamicImage;

use crate::utils::VerifyError;

/// Detector confidence floor for card-field regions.
pub const FIELD_CONFIDENCE_THRESHOLD: f32 = 0.25;
/// Detector confidence floor for face-shaped regions.
pub const FACE_CONFIDENCE_THRESHOLD: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BoundingBox {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }
}

/// One labeled region reported by the field detector.
#[derive(Debug, Clone)]
pub struct DetectedField {
    pub label: String,
    pub bbox: BoundingBox,
    pub confidence: f32,
}

/// Object-detection collaborator: locates semantic field regions on the card
/// and counts face-shaped regions at a caller-supplied confidence floor.
pub trait FieldDetector {
    fn detect_fields(
        &self,
        image: &DynamicImage,
        min_confidence: f32,
    ) -> Result<Vec<DetectedField>, VerifyError>;

    fn count_faces(&self, image: &DynamicImage, min_confidence: f32)
        -> Result<usize, VerifyError>;
}

/// OCR collaborator. `label_hint` names the field being read so engines can
/// restrict the character set for identifier-like regions. Implementations
/// must bound recognition time and fail soft rather than hang.
pub trait OcrEngine {
    fn recognize(&self, image: &DynamicImage, label_hint: &str) -> Result<String, VerifyError>;

    fn full_page_text(&self, image: &DynamicImage) -> Result<String, VerifyError>;
}

/// Outcome of a secure-QR decode attempt. The failure shapes are kept apart
/// so the aggregator can report them separately.
#[derive(Debug, Clone, PartialEq)]
pub enum QrOutcome {
    Decoded(HashMap<String, String>),
    NotFound,
    NotSecureFormat,
    DecodeFailed(String),
}

pub trait QrDecoder {
    fn decode(&self, image: &DynamicImage) -> QrOutcome;
}

/// The set of external collaborators available to a pipeline instance.
/// Absence of a capability is fixed at construction.
#[derive(Default)]
pub struct Capabilities {
    pub detector: Option<Box<dyn FieldDetector>>,
    pub ocr: Option<Box<dyn OcrEngine>>,
    pub qr: Option<Box<dyn QrDecoder>>,
}
