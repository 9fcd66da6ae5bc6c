// Rule checks for extracted card fields. Every function is total: any input
// maps to Valid, Missing, or Invalid with a reason, never a panic.

use chrono::{Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::ValidationOutcome;
use crate::validation::verhoeff;

lazy_static! {
    static ref NAME_SHAPE: Regex = Regex::new(r"^[A-Za-z. ]{3,50}$").unwrap();
}

/// Exactly 12 decimal digits after whitespace removal, and the Verhoeff
/// checksum must hold.
pub fn validate_aadhaar_number(value: &str) -> ValidationOutcome {
    if value.is_empty() {
        return ValidationOutcome::Missing;
    }
    let cleaned: String = value.split_whitespace().collect();
    if cleaned.chars().count() != 12 || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return ValidationOutcome::Invalid("must be 12 digits".to_string());
    }
    if !verhoeff::validate_checksum(&cleaned) {
        return ValidationOutcome::Invalid("checksum failed - possible tampering".to_string());
    }
    ValidationOutcome::Valid
}

pub fn validate_name(value: &str) -> ValidationOutcome {
    if value.is_empty() {
        return ValidationOutcome::Missing;
    }
    if !NAME_SHAPE.is_match(value.trim()) {
        return ValidationOutcome::Invalid("special characters or too short/long".to_string());
    }
    ValidationOutcome::Valid
}

/// Branches purely on length: a 4-character value is treated as a year of
/// birth, anything else must parse as a DD/MM/YYYY date that is not in the
/// future.
pub fn validate_dob(value: &str) -> ValidationOutcome {
    if value.is_empty() {
        return ValidationOutcome::Missing;
    }
    if value.chars().count() == 4 {
        match value.parse::<i32>() {
            Ok(year) => {
                let current_year = Local::now().year();
                if (1900..=current_year).contains(&year) {
                    ValidationOutcome::Valid
                } else {
                    ValidationOutcome::Invalid("year out of range".to_string())
                }
            }
            Err(_) => ValidationOutcome::Invalid("wrong format or impossible date".to_string()),
        }
    } else {
        match NaiveDate::parse_from_str(value, "%d/%m/%Y") {
            Ok(date) => {
                let today = Local::now().naive_local().date();
                if date > today {
                    ValidationOutcome::Invalid("future date".to_string())
                } else {
                    ValidationOutcome::Valid
                }
            }
            Err(_) => ValidationOutcome::Invalid("wrong format or impossible date".to_string()),
        }
    }
}

pub fn validate_gender(value: &str) -> ValidationOutcome {
    if value.is_empty() {
        return ValidationOutcome::Missing;
    }
    match value.to_lowercase().as_str() {
        "male" | "female" | "m" | "f" => ValidationOutcome::Valid,
        _ => ValidationOutcome::Invalid("must be Male/Female".to_string()),
    }
}
