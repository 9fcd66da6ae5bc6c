// Tesseract-backed implementation of the OCR collaborator.

use std::io::Write;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use image::DynamicImage;
use log::warn;
use tempfile::NamedTempFile;
use tesseract::{PageSegMode, Tesseract};

use crate::processing::collaborators::OcrEngine;
use crate::utils::VerifyError;

/// OCR engine built on Tesseract. Each call writes the image to a temporary
/// PNG and runs recognition on a watchdog thread, so an engine that stalls
/// degrades to empty text after the configured timeout instead of hanging
/// the batch. Identifier-like fields are recognized with a digit whitelist.
pub struct TesseractOcr {
    language: String,
    timeout_ms: u64,
}

impl TesseractOcr {
    pub fn new(language: &str, timeout_ms: u64) -> Self {
        Self {
            language: language.to_string(),
            timeout_ms,
        }
    }

    fn run_with_timeout(
        &self,
        image: &DynamicImage,
        numeric_only: bool,
        seg_mode: PageSegMode,
    ) -> Result<String, VerifyError> {
        let mut temp_file = NamedTempFile::new()
            .map_err(|e| VerifyError::Ocr(format!("failed to create temporary file: {}", e)))?;
        let mut png_bytes = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut png_bytes),
                image::ImageOutputFormat::Png,
            )
            .map_err(|e| VerifyError::Ocr(format!("failed to encode image: {}", e)))?;
        temp_file
            .write_all(&png_bytes)
            .map_err(|e| VerifyError::Ocr(format!("failed to write temporary file: {}", e)))?;

        let path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| VerifyError::Ocr("temporary path is not valid UTF-8".to_string()))?
            .to_string();
        let language = self.language.clone();

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The temp file must outlive recognition, not this scope.
            let _keep_alive = temp_file;
            let result = recognize_file(&path, &language, numeric_only, seg_mode);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(Duration::from_millis(self.timeout_ms)) {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "OCR exceeded {} ms time bound, returning empty text",
                    self.timeout_ms
                );
                Ok(String::new())
            }
        }
    }
}

fn recognize_file(
    path: &str,
    language: &str,
    numeric_only: bool,
    seg_mode: PageSegMode,
) -> Result<String, VerifyError> {
    let mut tess = Tesseract::new(None, Some(language))
        .map_err(|e| VerifyError::Ocr(format!("failed to initialize Tesseract: {}", e)))?;
    if numeric_only {
        tess = tess
            .set_variable("tessedit_char_whitelist", "0123456789")
            .map_err(|e| VerifyError::Ocr(format!("failed to set Tesseract variable: {}", e)))?;
    }
    tess.set_page_seg_mode(seg_mode);

    let mut tess = tess
        .set_image(path)
        .map_err(|e| VerifyError::Ocr(format!("failed to set image: {}", e)))?;
    let text = tess
        .get_text()
        .map_err(|e| VerifyError::Ocr(format!("failed to extract text: {}", e)))?;

    Ok(text.trim().replace('\n', " "))
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &DynamicImage, label_hint: &str) -> Result<String, VerifyError> {
        let label = label_hint.to_lowercase();
        let (numeric_only, seg_mode) = if label.contains("aadhaar") || label.contains("number") {
            (true, PageSegMode::PsmSingleLine)
        } else if label.contains("dob") || label.contains("date") {
            (false, PageSegMode::PsmSingleLine)
        } else {
            (false, PageSegMode::PsmSingleBlock)
        };
        self.run_with_timeout(image, numeric_only, seg_mode)
    }

    fn full_page_text(&self, image: &DynamicImage) -> Result<String, VerifyError> {
        self.run_with_timeout(image, false, PageSegMode::PsmSingleBlock)
    }
}
