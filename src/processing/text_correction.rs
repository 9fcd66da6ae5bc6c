// Corrections for recognition errors seen repeatedly on scanned Aadhaar
// cards, applied before any field-specific parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // '1' printed before a date separator is regularly read as '4'.
    static ref FOUR_BEFORE_SEPARATOR: Regex = Regex::new(r"4([/.\-])").unwrap();
}

/// Cleans raw OCR text ahead of field parsing: strips all whitespace, undoes
/// the 4-for-1 misread in front of date separators and normalizes '-' and
/// '.' separators to '/'.
pub fn correct_common_errors(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let corrected = FOUR_BEFORE_SEPARATOR.replace_all(&stripped, "1$1");
    corrected.replace('-', "/").replace('.', "/")
}

/// Maps letter shapes that engines regularly swap in for digits when reading
/// numeric fields.
pub fn normalize_digit_confusions(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'O' | 'o' => '0',
            'I' | 'l' => '1',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_all_whitespace() {
        assert_eq!(correct_common_errors("05 / 06 / 1990"), "05/06/1990");
        assert_eq!(correct_common_errors("\t05/06/1990 \n"), "05/06/1990");
    }

    #[test]
    fn fixes_misread_one_before_separator() {
        assert_eq!(correct_common_errors("04/06/1990"), "01/06/1990");
        assert_eq!(correct_common_errors("04-06-1990"), "01/06/1990");
        // A '4' not followed by a separator is left alone.
        assert_eq!(correct_common_errors("14/06/1994"), "11/06/1994");
    }

    #[test]
    fn normalizes_separators() {
        assert_eq!(correct_common_errors("31-12-1999"), "31/12/1999");
        assert_eq!(correct_common_errors("31.12.1999"), "31/12/1999");
    }

    #[test]
    fn idempotent_on_clean_input() {
        let once = correct_common_errors("31-12-1999");
        assert_eq!(correct_common_errors(&once), once);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(correct_common_errors(""), "");
    }

    #[test]
    fn maps_digit_confusions() {
        assert_eq!(normalize_digit_confusions("O0Il"), "0011");
        assert_eq!(normalize_digit_confusions("23456789O124"), "234567890124");
    }
}
