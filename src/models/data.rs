use std::collections::HashMap;
use std::fmt;

use chrono::Local;
use serde::Serialize;

/// Raw OCR text keyed by the detector's field label. Keys are not guaranteed
/// present and values may be empty or garbled.
pub type RawFieldText = HashMap<String, String>;

/// Canonical field values derived from [`RawFieldText`]. Every field is
/// either empty or in its extractor's output format; in particular `aadhaar`
/// is all-digit whenever it is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedFields {
    pub name: String,
    pub dob: String,
    pub gender: String,
    pub aadhaar: String,
}

/// Per-field rule check result. `Missing` applies exactly when the extracted
/// value is empty; `Valid`/`Invalid` only describe non-empty values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Missing,
    Invalid(String),
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationOutcome::Valid => write!(f, "Valid"),
            ValidationOutcome::Missing => write!(f, "Missing"),
            ValidationOutcome::Invalid(reason) => write!(f, "Invalid ({})", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
        }
    }
}

/// One human-readable finding attached to an assessment, in evaluation order.
#[derive(Debug, Clone, Serialize)]
pub struct Indicator {
    pub severity: Severity,
    pub message: String,
}

impl Indicator {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Terminal categorical assessment for one processed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Assessment {
    Low,
    Moderate,
    High,
    InvalidInput,
    Error,
    Skipped,
    Unknown,
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Assessment::Low => write!(f, "LOW"),
            Assessment::Moderate => write!(f, "MODERATE"),
            Assessment::High => write!(f, "HIGH"),
            Assessment::InvalidInput => write!(f, "INVALID_INPUT"),
            Assessment::Error => write!(f, "ERROR"),
            Assessment::Skipped => write!(f, "SKIPPED"),
            Assessment::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// Wire-visible error tokens carried on records alongside the assessment.
pub const ERROR_NOT_AADHAAR: &str = "NOT_AADHAAR";
pub const ERROR_MODEL_UNAVAILABLE: &str = "MODEL_UNAVAILABLE";
pub const ERROR_TOO_LARGE: &str = "TOO_LARGE";
pub const ERROR_PROCESSING: &str = "PROCESSING_ERROR";

/// Detail breakdown behind an authenticity verdict.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticityDetails {
    pub keywords_found: usize,
    pub id_numbers_found: usize,
    pub aspect_ratio_valid: bool,
    pub size_valid: bool,
    pub text_snippet: String,
}

/// Whether the input plausibly depicts an Aadhaar card at all. Computed once
/// per image, before any field extraction.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticityVerdict {
    pub is_card: bool,
    pub confidence: u8,
    pub details: AuthenticityDetails,
}

/// Terminal output for one processed item. Built once by the risk
/// aggregation stage and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentRecord {
    pub filename: String,
    pub timestamp: String,
    pub assessment: Assessment,
    pub fraud_score: u32,
    pub indicators: Vec<Indicator>,
    pub extracted: ExtractedFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticity: Option<AuthenticityVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_data: Option<HashMap<String, String>>,
}

impl AssessmentRecord {
    pub fn new(filename: &str, assessment: Assessment) -> Self {
        Self {
            filename: filename.to_string(),
            timestamp: now_timestamp(),
            assessment,
            fraud_score: 0,
            indicators: Vec::new(),
            extracted: ExtractedFields::default(),
            error: None,
            authenticity: None,
            qr_data: None,
        }
    }
}

pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Aggregate counts over a completed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub non_card: usize,
    pub errors: usize,
    pub success_rate: String,
}

impl BatchSummary {
    /// Folds completed records into counts. `valid` counts records carrying
    /// no error token; the rate is a one-decimal percentage, "0%" when the
    /// batch was empty.
    pub fn from_records(records: &[AssessmentRecord]) -> Self {
        let total = records.len();
        let non_card = records
            .iter()
            .filter(|r| r.error.as_deref() == Some(ERROR_NOT_AADHAAR))
            .count();
        let errors = records
            .iter()
            .filter(|r| matches!(r.error.as_deref(), Some(e) if e != ERROR_NOT_AADHAAR))
            .count();
        let valid = total - non_card - errors;
        let success_rate = if total == 0 {
            "0%".to_string()
        } else {
            format!("{:.1}%", valid as f64 / total as f64 * 100.0)
        };
        Self {
            total,
            valid,
            non_card,
            errors,
            success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_serializes_to_wire_names() {
        assert_eq!(
            serde_json::to_value(Assessment::InvalidInput).unwrap(),
            serde_json::json!("INVALID_INPUT")
        );
        assert_eq!(
            serde_json::to_value(Assessment::Low).unwrap(),
            serde_json::json!("LOW")
        );
    }

    #[test]
    fn outcome_display_includes_reason() {
        let outcome = ValidationOutcome::Invalid("must be 12 digits".to_string());
        assert_eq!(outcome.to_string(), "Invalid (must be 12 digits)");
        assert_eq!(ValidationOutcome::Valid.to_string(), "Valid");
    }

    #[test]
    fn summary_counts_error_classes_separately() {
        let ok = AssessmentRecord::new("a.jpg", Assessment::Low);
        let mut not_card = AssessmentRecord::new("b.jpg", Assessment::InvalidInput);
        not_card.error = Some(ERROR_NOT_AADHAAR.to_string());
        let mut failed = AssessmentRecord::new("c.jpg", Assessment::Error);
        failed.error = Some(ERROR_PROCESSING.to_string());
        let mut skipped = AssessmentRecord::new("d.jpg", Assessment::Skipped);
        skipped.error = Some(ERROR_TOO_LARGE.to_string());

        let summary = BatchSummary::from_records(&[ok, not_card, failed, skipped]);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.non_card, 1);
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.success_rate, "25.0%");
    }

    #[test]
    fn empty_batch_reports_zero_rate() {
        let summary = BatchSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, "0%");
    }
}
