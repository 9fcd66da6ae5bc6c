// Card-authenticity heuristic. Runs before any field extraction and gates
// whether the pipeline proceeds at all.

use image::{DynamicImage, GenericImageView};
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{AuthenticityDetails, AuthenticityVerdict};

/// Phrases expected somewhere on the printed face of a genuine card.
const CARD_KEYWORDS: [&str; 11] = [
    "aadhaar",
    "aadhar",
    "uidai",
    "government of india",
    "unique identification authority",
    "dob",
    "date of birth",
    "year of birth",
    "male",
    "female",
    "gender",
];

const ACCEPT_THRESHOLD: u8 = 50;
const MIN_DIMENSION: u32 = 300;
const SNIPPET_CHARS: usize = 200;

lazy_static! {
    // The identifier is printed as three groups of four digits.
    static ref GROUPED_ID: Regex = Regex::new(r"\b\d{4}\s?\d{4}\s?\d{4}\b").unwrap();
}

/// Scores the input out of 100: distinct keyword hits (two or more +40, one
/// +20), a grouped 12-digit number (+30), card-like aspect ratio (+15) and a
/// minimum dimension (+15). Accepted at 50 or above. Without page text the
/// verdict falls back to geometry alone, pinned at 50 or 20.
pub fn assess_authenticity(image: &DynamicImage, full_text: Option<&str>) -> AuthenticityVerdict {
    let (width, height) = image.dimensions();
    let aspect_ratio = width as f64 / height as f64;
    let aspect_ratio_valid = (1.5..=2.0).contains(&aspect_ratio);
    let size_valid = width.min(height) >= MIN_DIMENSION;

    let Some(text) = full_text else {
        let confidence = if aspect_ratio_valid && size_valid { 50 } else { 20 };
        return AuthenticityVerdict {
            is_card: confidence >= ACCEPT_THRESHOLD,
            confidence,
            details: AuthenticityDetails {
                keywords_found: 0,
                id_numbers_found: 0,
                aspect_ratio_valid,
                size_valid,
                text_snippet: "OCR not available".to_string(),
            },
        };
    };

    let lowered = text.to_lowercase();
    let keywords_found = CARD_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(**kw))
        .count();
    let id_numbers_found = GROUPED_ID.find_iter(&lowered).count();

    let mut confidence: u8 = 0;
    confidence += match keywords_found {
        0 => 0,
        1 => 20,
        _ => 40,
    };
    if id_numbers_found > 0 {
        confidence += 30;
    }
    if aspect_ratio_valid {
        confidence += 15;
    }
    if size_valid {
        confidence += 15;
    }

    let text_snippet = if text.chars().count() > SNIPPET_CHARS {
        let head: String = text.chars().take(SNIPPET_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    };

    AuthenticityVerdict {
        is_card: confidence >= ACCEPT_THRESHOLD,
        confidence,
        details: AuthenticityDetails {
            keywords_found,
            id_numbers_found,
            aspect_ratio_valid,
            size_valid,
            text_snippet,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_shaped_image() -> DynamicImage {
        DynamicImage::new_rgb8(600, 380)
    }

    #[test]
    fn strong_text_and_geometry_score_full_marks() {
        let text = "Government of India  Aadhaar  DOB: 05/06/1990  Male  2345 6789 0124";
        let verdict = assess_authenticity(&card_shaped_image(), Some(text));
        assert!(verdict.is_card);
        assert_eq!(verdict.confidence, 100);
        assert!(verdict.details.keywords_found >= 2);
        assert_eq!(verdict.details.id_numbers_found, 1);
    }

    #[test]
    fn single_keyword_scores_twenty() {
        let verdict = assess_authenticity(&DynamicImage::new_rgb8(200, 200), Some("gender"));
        assert!(!verdict.is_card);
        assert_eq!(verdict.confidence, 20);
    }

    #[test]
    fn unrelated_text_and_geometry_is_rejected() {
        let verdict =
            assess_authenticity(&DynamicImage::new_rgb8(200, 200), Some("a shopping list"));
        assert!(!verdict.is_card);
        assert_eq!(verdict.confidence, 0);
    }

    #[test]
    fn geometry_only_fallback_pins_confidence() {
        let accepted = assess_authenticity(&card_shaped_image(), None);
        assert!(accepted.is_card);
        assert_eq!(accepted.confidence, 50);
        assert_eq!(accepted.details.text_snippet, "OCR not available");

        let rejected = assess_authenticity(&DynamicImage::new_rgb8(200, 200), None);
        assert!(!rejected.is_card);
        assert_eq!(rejected.confidence, 20);
    }

    #[test]
    fn ungrouped_identifier_still_matches_pattern() {
        // Geometry contributes nothing here; keywords plus the number do.
        let verdict = assess_authenticity(
            &DynamicImage::new_rgb8(200, 200),
            Some("aadhaar uidai 234567890124"),
        );
        assert!(verdict.is_card);
        assert_eq!(verdict.confidence, 70);
    }
}
