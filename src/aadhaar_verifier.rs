// Single-item verification pipeline and the batch loop around it.
//
// An item moves through: authenticity gate, field detection + OCR, face
// scan, extraction, validation, QR cross-check, risk aggregation. Any stage
// may short-circuit to a terminal INVALID_INPUT or ERROR record; nothing in
// here panics on bad input, and a batch always yields one record per
// submitted item.

use std::thread;
use std::time::Duration;

use image::{DynamicImage, GenericImageView};
use log::{debug, info, warn};
use serde::Serialize;

use crate::models::{
    Assessment, AssessmentRecord, BatchSummary, Indicator, PipelineConfig, RawFieldText, Severity,
    ERROR_MODEL_UNAVAILABLE, ERROR_NOT_AADHAAR, ERROR_PROCESSING, ERROR_TOO_LARGE,
};
use crate::processing::authenticity::assess_authenticity;
use crate::processing::collaborators::{
    Capabilities, DetectedField, QrOutcome, FACE_CONFIDENCE_THRESHOLD, FIELD_CONFIDENCE_THRESHOLD,
};
use crate::processing::extractors::extract_fields;
use crate::scoring::RiskReport;
use crate::validation::{validate_aadhaar_number, validate_dob, validate_gender, validate_name};

/// One input to batch verification.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Records plus the folded summary for a completed batch.
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub records: Vec<AssessmentRecord>,
    pub summary: BatchSummary,
}

pub struct AadhaarVerifier {
    config: PipelineConfig,
    caps: Capabilities,
}

impl AadhaarVerifier {
    pub fn new(config: PipelineConfig, caps: Capabilities) -> Self {
        Self { config, caps }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Verifies a single image supplied as raw bytes. Decode failures yield
    /// an ERROR record rather than an Err, so batch callers keep a record
    /// per submitted item.
    pub fn verify_bytes(&self, bytes: &[u8], filename: &str, qr_check: bool) -> AssessmentRecord {
        if self.caps.detector.is_none() {
            return self.model_unavailable_record(filename);
        }
        match image::load_from_memory(bytes) {
            Ok(img) => self.verify_image(&img, filename, qr_check),
            Err(e) => {
                warn!("failed to decode {}: {}", filename, e);
                let mut record = AssessmentRecord::new(filename, Assessment::Error);
                record.error = Some(ERROR_PROCESSING.to_string());
                record.indicators.push(Indicator::new(
                    Severity::Info,
                    format!("Image could not be decoded: {}", e),
                ));
                record
            }
        }
    }

    /// Runs the full pipeline over an already decoded image.
    pub fn verify_image(
        &self,
        image: &DynamicImage,
        filename: &str,
        qr_check: bool,
    ) -> AssessmentRecord {
        let Some(detector) = self.caps.detector.as_deref() else {
            return self.model_unavailable_record(filename);
        };

        // Authenticity gate before any field work.
        let full_text = self.caps.ocr.as_deref().and_then(|ocr| {
            match ocr.full_page_text(image) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("{}: full-page OCR failed: {}", filename, e);
                    None
                }
            }
        });
        let verdict = assess_authenticity(image, full_text.as_deref());
        if !verdict.is_card {
            info!(
                "{}: rejected by authenticity gate (confidence {})",
                filename, verdict.confidence
            );
            let mut record = AssessmentRecord::new(filename, Assessment::InvalidInput);
            record.error = Some(ERROR_NOT_AADHAAR.to_string());
            record.indicators.push(Indicator::new(
                Severity::Info,
                "The image does not appear to be an Aadhaar card.",
            ));
            record.authenticity = Some(verdict);
            return record;
        }

        let mut report = RiskReport::new();

        // Field detection and per-region OCR.
        let ocr_data = match detector.detect_fields(image, FIELD_CONFIDENCE_THRESHOLD) {
            Ok(fields) => self.read_fields(image, &fields),
            Err(e) => {
                warn!("{}: field detection failed: {}", filename, e);
                report.record_detection_failure();
                RawFieldText::new()
            }
        };

        // Face presence on the card.
        match detector.count_faces(image, FACE_CONFIDENCE_THRESHOLD) {
            Ok(0) => report.record_no_face(),
            Ok(_) => report.record_face_present(),
            Err(e) => {
                warn!("{}: face detection failed: {}", filename, e);
                report.record_face_scan_failed();
            }
        }

        // Extraction, then validation in the fixed field order.
        let extracted = extract_fields(&ocr_data);
        report.record_aadhaar(&extracted.aadhaar, &validate_aadhaar_number(&extracted.aadhaar));
        report.record_name(&extracted.name, &validate_name(&extracted.name));
        report.record_dob(&extracted.dob, &validate_dob(&extracted.dob));
        report.record_gender(&extracted.gender, &validate_gender(&extracted.gender));

        // Secure-QR cross-check, informational unless it decodes.
        let mut qr_data = None;
        match (qr_check, self.caps.qr.as_deref()) {
            (true, Some(qr)) => match qr.decode(image) {
                QrOutcome::Decoded(payload) => {
                    qr_data = Some(payload);
                    report.record_qr_decoded();
                }
                QrOutcome::NotFound => {
                    report.record_qr_failure("QR Code not found or could not be read")
                }
                QrOutcome::NotSecureFormat => {
                    report.record_qr_failure("QR code is not a valid Secure Aadhaar QR")
                }
                QrOutcome::DecodeFailed(reason) => report.record_qr_failure(&reason),
            },
            _ => report.record_qr_disabled(),
        }

        let (fraud_score, indicators, assessment) = report.finish();
        debug!(
            "{}: fraud_score={} assessment={}",
            filename, fraud_score, assessment
        );

        let mut record = AssessmentRecord::new(filename, assessment);
        record.fraud_score = fraud_score;
        record.indicators = indicators;
        record.extracted = extracted;
        record.authenticity = Some(verdict);
        record.qr_data = qr_data;
        record
    }

    /// Applies the single-item pipeline across a batch, strictly in
    /// sequence. Items beyond `max_batch_items` are dropped before iteration
    /// begins; oversized items become SKIPPED records; per-item failures
    /// never abort the remainder.
    pub fn verify_batch(&self, mut items: Vec<BatchItem>, qr_check: bool) -> BatchOutcome {
        if let Some(max) = self.config.max_batch_items {
            if items.len() > max {
                warn!("truncating batch from {} to {} items", items.len(), max);
                items.truncate(max);
            }
        }

        let total = items.len();
        let mut records = Vec::with_capacity(total);
        for (index, item) in items.into_iter().enumerate() {
            info!("[{}/{}] processing {}", index + 1, total, item.filename);
            if item.bytes.len() > self.config.max_item_bytes {
                warn!(
                    "skipping {}: {} bytes exceeds the {} byte ceiling",
                    item.filename,
                    item.bytes.len(),
                    self.config.max_item_bytes
                );
                let mut record = AssessmentRecord::new(&item.filename, Assessment::Skipped);
                record.error = Some(ERROR_TOO_LARGE.to_string());
                record.indicators.push(Indicator::new(
                    Severity::Info,
                    "File exceeds the configured size limit.",
                ));
                records.push(record);
            } else {
                records.push(self.verify_bytes(&item.bytes, &item.filename, qr_check));
            }
            if self.config.pacing_ms > 0 && index + 1 < total {
                thread::sleep(Duration::from_millis(self.config.pacing_ms));
            }
        }

        let summary = BatchSummary::from_records(&records);
        info!(
            "batch complete: {} valid, {} non-card, {} errors out of {}",
            summary.valid, summary.non_card, summary.errors, summary.total
        );
        BatchOutcome { records, summary }
    }

    fn model_unavailable_record(&self, filename: &str) -> AssessmentRecord {
        let mut record = AssessmentRecord::new(filename, Assessment::Unknown);
        record.error = Some(ERROR_MODEL_UNAVAILABLE.to_string());
        record.indicators.push(Indicator::new(
            Severity::Info,
            "Running in basic mode - field detector not available.",
        ));
        record
    }

    fn read_fields(&self, image: &DynamicImage, fields: &[DetectedField]) -> RawFieldText {
        let mut data = RawFieldText::new();
        let Some(ocr) = self.caps.ocr.as_deref() else {
            debug!("no OCR collaborator, leaving field text empty");
            return data;
        };

        let (width, height) = image.dimensions();
        for field in fields {
            let x = field.bbox.x1.min(width);
            let y = field.bbox.y1.min(height);
            let w = field.bbox.width().min(width - x);
            let h = field.bbox.height().min(height - y);
            if w == 0 || h == 0 {
                continue;
            }
            let crop = image.crop_imm(x, y, w, h);
            match ocr.recognize(&crop, &field.label) {
                Ok(text) if !text.trim().is_empty() => {
                    data.insert(field.label.clone(), text);
                }
                Ok(_) => {}
                Err(e) => warn!("OCR failed for field '{}': {}", field.label, e),
            }
        }
        data
    }
}
