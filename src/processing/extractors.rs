// Field-specific extraction from raw recognized text. Pattern order matters:
// the most specific pattern for each field is tried first and later ones are
// only reached on no-match.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{ExtractedFields, RawFieldText};
use crate::processing::text_correction::{correct_common_errors, normalize_digit_confusions};
use crate::validation::verhoeff;

lazy_static! {
    // "0OB" covers the frequent misread of the label itself.
    static ref LABELED_DOB: Regex =
        Regex::new(r"(?i)(DOB|DoB|0OB)\s*[:\-]?\s*(\d{2}/\d{2}/\d{4})").unwrap();
    static ref BARE_DATE: Regex = Regex::new(r"(\d{1,2}/\d{1,2}/\d{4})").unwrap();
    static ref LABELED_YEAR: Regex =
        Regex::new(r"(?i)(Year\s*of\s*Birth)\s*[:\-]?\s*(\d{4})").unwrap();
    static ref BARE_YEAR: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
}

/// Pulls a date of birth out of the raw DOB-line text. Tries, in order: a
/// labeled DOB with a full date, any bare full date, a labeled year of
/// birth, and finally any bare 4-digit number treated as a birth year.
pub fn extract_dob_from_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let cleaned = correct_common_errors(raw);

    if let Some(caps) = LABELED_DOB.captures(&cleaned) {
        return caps[2].trim().to_string();
    }
    if let Some(caps) = BARE_DATE.captures(&cleaned) {
        return caps[1].trim().to_string();
    }
    if let Some(caps) = LABELED_YEAR.captures(&cleaned) {
        return caps[2].trim().to_string();
    }
    if let Some(caps) = BARE_YEAR.captures(&cleaned) {
        return caps[1].trim().to_string();
    }
    String::new()
}

/// Applies the identifier correction heuristics to raw OCR output. The
/// leading-digit rescue is deliberately narrow: only a 12-digit reading that
/// starts with '9' and fails the checksum is retried with '8', the one
/// misread pair observed in practice. The result keeps only digits.
pub fn correct_aadhaar_number(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let cleaned: String = raw.split_whitespace().collect();

    if cleaned.len() == 12 && cleaned.starts_with('9') && !verhoeff::validate_checksum(&cleaned) {
        let candidate = format!("8{}", &cleaned[1..]);
        if verhoeff::validate_checksum(&candidate) {
            return candidate;
        }
    }

    normalize_digit_confusions(&cleaned)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect()
}

/// Fuzzy lookup: returns the trimmed value of the first entry whose label
/// contains `substr`, case-insensitively.
pub fn find_field_by_substr(data: &RawFieldText, substr: &str) -> String {
    let needle = substr.to_lowercase();
    for (key, value) in data {
        if key.to_lowercase().contains(&needle) {
            return value.trim().to_string();
        }
    }
    String::new()
}

/// Derives the canonical field record from raw per-label OCR text.
pub fn extract_fields(raw: &RawFieldText) -> ExtractedFields {
    let aadhaar_raw = find_field_by_substr(raw, "number");
    let name = find_field_by_substr(raw, "name");
    let gender = find_field_by_substr(raw, "gender");

    let dob_raw = raw
        .iter()
        .find(|(key, _)| {
            let key = key.to_lowercase();
            key.contains("dob") || key.contains("date")
        })
        .map(|(_, value)| value.as_str())
        .unwrap_or("");

    ExtractedFields {
        name,
        dob: extract_dob_from_text(dob_raw),
        gender,
        aadhaar: correct_aadhaar_number(&aadhaar_raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_dob_wins_over_bare_year() {
        assert_eq!(
            extract_dob_from_text("DOB: 05/06/1990 code 2468"),
            "05/06/1990"
        );
    }

    #[test]
    fn bare_date_matches_without_label() {
        assert_eq!(extract_dob_from_text("5/6/1990"), "5/6/1990");
    }

    #[test]
    fn separators_are_normalized_before_matching() {
        assert_eq!(extract_dob_from_text("DOB 05-06-1990"), "05/06/1990");
        assert_eq!(extract_dob_from_text("DOB 05.06.1990"), "05/06/1990");
    }

    #[test]
    fn misread_label_variant_is_tolerated() {
        assert_eq!(extract_dob_from_text("0OB: 05/06/1990"), "05/06/1990");
    }

    #[test]
    fn year_of_birth_label_yields_year() {
        assert_eq!(extract_dob_from_text("Year of Birth: 1985"), "1985");
    }

    #[test]
    fn bare_year_is_last_resort() {
        assert_eq!(extract_dob_from_text("DOB: 1985"), "1985");
        assert_eq!(extract_dob_from_text("no date here"), "");
        assert_eq!(extract_dob_from_text(""), "");
    }

    #[test]
    fn identifier_whitespace_is_stripped() {
        assert_eq!(correct_aadhaar_number("2345 6789 0124"), "234567890124");
    }

    #[test]
    fn leading_nine_is_retried_as_eight_on_checksum_failure() {
        // 876543210988 passes the checksum, the leading-9 misread does not.
        assert_eq!(correct_aadhaar_number("9765 4321 0988"), "876543210988");
        // A failing number that does not start with 9 is left untouched.
        assert_eq!(correct_aadhaar_number("234567890123"), "234567890123");
    }

    #[test]
    fn digit_confusions_are_mapped() {
        assert_eq!(correct_aadhaar_number("23456789O124"), "234567890124");
        assert_eq!(correct_aadhaar_number("23456789Ol24"), "234567890124");
    }

    #[test]
    fn output_is_digits_only() {
        let corrected = correct_aadhaar_number("23x456");
        assert!(corrected.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn fuzzy_key_lookup_is_case_insensitive() {
        let mut data = RawFieldText::new();
        data.insert("Aadhaar Number".to_string(), " 2345 6789 0124 ".to_string());
        assert_eq!(find_field_by_substr(&data, "number"), "2345 6789 0124");
        assert_eq!(find_field_by_substr(&data, "gender"), "");
    }

    #[test]
    fn extract_fields_fills_the_record() {
        let mut data = RawFieldText::new();
        data.insert("aadhaar_number".to_string(), "2345 6789 0124".to_string());
        data.insert("name".to_string(), "Rahul Sharma".to_string());
        data.insert("dob".to_string(), "DOB: 05/06/1990".to_string());
        data.insert("gender".to_string(), "MALE".to_string());

        let fields = extract_fields(&data);
        assert_eq!(fields.aadhaar, "234567890124");
        assert_eq!(fields.name, "Rahul Sharma");
        assert_eq!(fields.dob, "05/06/1990");
        assert_eq!(fields.gender, "MALE");
    }

    #[test]
    fn absent_labels_leave_fields_empty() {
        let fields = extract_fields(&RawFieldText::new());
        assert_eq!(fields, ExtractedFields::default());
    }
}
