use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Item too large: {0} bytes")]
    TooLarge(usize),
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("Field detection error: {0}")]
    Detection(String),
    #[error("OCR error: {0}")]
    Ocr(String),
    #[error("QR decode error: {0}")]
    Qr(String),
    #[error("Processing error: {0}")]
    Processing(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
