// Risk aggregation for a single item. Effects are recorded in the fixed
// evaluation order (detection, face, identifier, name, dob, gender, QR);
// indicator order is part of the output contract, not incidental.

use crate::models::{Assessment, Indicator, Severity, ValidationOutcome};

const HIGH_RISK_THRESHOLD: u32 = 3;
const MODERATE_RISK_THRESHOLD: u32 = 1;

/// Accumulates scoring penalties and indicators for one processed item and
/// seals them into a categorical assessment.
#[derive(Debug, Default)]
pub struct RiskReport {
    fraud_score: u32,
    indicators: Vec<Indicator>,
}

impl RiskReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fraud_score(&self) -> u32 {
        self.fraud_score
    }

    fn add(&mut self, points: u32, severity: Severity, message: impl Into<String>) {
        self.fraud_score += points;
        self.indicators.push(Indicator::new(severity, message));
    }

    pub fn record_detection_failure(&mut self) {
        self.add(5, Severity::High, "Error in field detection.");
    }

    pub fn record_face_present(&mut self) {
        self.add(0, Severity::Low, "Face detected on card.");
    }

    pub fn record_no_face(&mut self) {
        self.add(3, Severity::High, "No face detected on the card.");
    }

    pub fn record_face_scan_failed(&mut self) {
        self.add(0, Severity::Info, "Face detection failed.");
    }

    pub fn record_aadhaar(&mut self, value: &str, outcome: &ValidationOutcome) {
        match outcome {
            ValidationOutcome::Missing => {
                self.add(2, Severity::High, "Aadhaar number is missing.")
            }
            ValidationOutcome::Invalid(_) => self.add(
                3,
                Severity::High,
                format!("Aadhaar number '{}' is {}.", value, outcome),
            ),
            ValidationOutcome::Valid => self.add(
                0,
                Severity::Low,
                format!("Aadhaar number '{}' is valid.", value),
            ),
        }
    }

    pub fn record_name(&mut self, value: &str, outcome: &ValidationOutcome) {
        match outcome {
            ValidationOutcome::Missing => self.add(1, Severity::Medium, "Name is missing."),
            ValidationOutcome::Invalid(_) => self.add(
                1,
                Severity::Medium,
                format!("Name '{}' is {}.", value, outcome),
            ),
            ValidationOutcome::Valid => self.add(
                0,
                Severity::Low,
                format!("Name '{}' format is valid.", value),
            ),
        }
    }

    pub fn record_dob(&mut self, value: &str, outcome: &ValidationOutcome) {
        match outcome {
            ValidationOutcome::Missing => {
                self.add(1, Severity::Medium, "Date of Birth is missing.")
            }
            ValidationOutcome::Invalid(_) => {
                self.add(2, Severity::High, format!("DOB '{}' is {}.", value, outcome))
            }
            ValidationOutcome::Valid => self.add(
                0,
                Severity::Low,
                format!("DOB '{}' format is valid.", value),
            ),
        }
    }

    pub fn record_gender(&mut self, value: &str, outcome: &ValidationOutcome) {
        match outcome {
            ValidationOutcome::Missing => self.add(1, Severity::Medium, "Gender is missing."),
            ValidationOutcome::Invalid(_) => self.add(
                1,
                Severity::Medium,
                format!("Gender '{}' is {}.", value, outcome),
            ),
            ValidationOutcome::Valid => self.add(
                0,
                Severity::Low,
                format!("Gender '{}' format is valid.", value),
            ),
        }
    }

    pub fn record_qr_decoded(&mut self) {
        self.add(0, Severity::Low, "Secure QR Code decoded successfully.");
    }

    pub fn record_qr_failure(&mut self, reason: &str) {
        self.add(0, Severity::Info, format!("QR Code: {}", reason));
    }

    pub fn record_qr_disabled(&mut self) {
        self.add(0, Severity::Info, "QR Code check was disabled.");
    }

    /// Seals the report. A score of 3 or more is HIGH, 1 or 2 MODERATE, 0
    /// LOW; a fully clean run gains an explicit closing indicator so the
    /// record never reads empty.
    pub fn finish(mut self) -> (u32, Vec<Indicator>, Assessment) {
        let assessment = if self.fraud_score >= HIGH_RISK_THRESHOLD {
            Assessment::High
        } else if self.fraud_score >= MODERATE_RISK_THRESHOLD {
            Assessment::Moderate
        } else {
            let flagged = self
                .indicators
                .iter()
                .any(|i| matches!(i.severity, Severity::High | Severity::Medium));
            if !flagged {
                self.indicators
                    .push(Indicator::new(Severity::Low, "All checks passed."));
            }
            Assessment::Low
        };
        (self.fraud_score, self.indicators, assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_report() -> RiskReport {
        let mut report = RiskReport::new();
        report.record_face_present();
        report.record_aadhaar("234567890124", &ValidationOutcome::Valid);
        report.record_name("Rahul Sharma", &ValidationOutcome::Valid);
        report.record_dob("05/06/1990", &ValidationOutcome::Valid);
        report.record_gender("Male", &ValidationOutcome::Valid);
        report.record_qr_disabled();
        report
    }

    #[test]
    fn clean_report_is_low_with_closing_indicator() {
        let (score, indicators, assessment) = clean_report().finish();
        assert_eq!(score, 0);
        assert_eq!(assessment, Assessment::Low);
        let last = indicators.last().unwrap();
        assert_eq!(last.severity, Severity::Low);
        assert_eq!(last.message, "All checks passed.");
    }

    #[test]
    fn single_medium_defect_is_moderate() {
        let mut report = RiskReport::new();
        report.record_face_present();
        report.record_aadhaar("234567890124", &ValidationOutcome::Valid);
        report.record_name("", &ValidationOutcome::Missing);
        report.record_dob("05/06/1990", &ValidationOutcome::Valid);
        report.record_gender("Male", &ValidationOutcome::Valid);
        let (score, indicators, assessment) = report.finish();
        assert_eq!(score, 1);
        assert_eq!(assessment, Assessment::Moderate);
        // No closing indicator outside the LOW path.
        assert!(indicators.iter().all(|i| i.message != "All checks passed."));
    }

    #[test]
    fn invalid_identifier_scores_three_and_high() {
        let mut report = RiskReport::new();
        report.record_face_present();
        report.record_aadhaar(
            "234567890123",
            &ValidationOutcome::Invalid("checksum failed - possible tampering".to_string()),
        );
        report.record_name("Rahul Sharma", &ValidationOutcome::Valid);
        report.record_dob("05/06/1990", &ValidationOutcome::Valid);
        report.record_gender("Male", &ValidationOutcome::Valid);
        let (score, indicators, assessment) = report.finish();
        assert_eq!(score, 3);
        assert_eq!(assessment, Assessment::High);
        let flagged: Vec<_> = indicators
            .iter()
            .filter(|i| i.severity == Severity::High)
            .collect();
        assert_eq!(flagged.len(), 1);
        assert!(flagged[0].message.contains("234567890123"));
    }

    #[test]
    fn extra_high_defect_never_lowers_score_or_category() {
        let mut base = clean_report();
        base.record_aadhaar("", &ValidationOutcome::Missing);
        base.record_no_face();
        let base_score = base.fraud_score();

        let mut worse = clean_report();
        worse.record_aadhaar("", &ValidationOutcome::Missing);
        worse.record_no_face();
        worse.record_detection_failure();
        assert!(worse.fraud_score() >= base_score);

        let (_, _, base_assessment) = base.finish();
        let (_, _, worse_assessment) = worse.finish();
        assert_eq!(base_assessment, Assessment::High);
        assert_eq!(worse_assessment, Assessment::High);
    }

    #[test]
    fn indicators_keep_evaluation_order() {
        let mut report = RiskReport::new();
        report.record_detection_failure();
        report.record_no_face();
        report.record_aadhaar("", &ValidationOutcome::Missing);
        report.record_name("", &ValidationOutcome::Missing);
        report.record_dob("", &ValidationOutcome::Missing);
        report.record_gender("", &ValidationOutcome::Missing);
        report.record_qr_disabled();
        let (score, indicators, _) = report.finish();
        assert_eq!(score, 5 + 3 + 2 + 1 + 1 + 1);
        let messages: Vec<_> = indicators.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Error in field detection.",
                "No face detected on the card.",
                "Aadhaar number is missing.",
                "Name is missing.",
                "Date of Birth is missing.",
                "Gender is missing.",
                "QR Code check was disabled.",
            ]
        );
    }
}
