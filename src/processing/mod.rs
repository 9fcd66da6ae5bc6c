pub mod authenticity;
pub mod collaborators;
pub mod extractors;
pub mod ocr;
pub mod text_correction;

pub use authenticity::assess_authenticity;
pub use collaborators::{
    BoundingBox, Capabilities, DetectedField, FieldDetector, OcrEngine, QrDecoder, QrOutcome,
};
pub use ocr::TesseractOcr;
pub use text_correction::correct_common_errors;
