pub mod fields;
pub mod verhoeff;

pub use fields::{validate_aadhaar_number, validate_dob, validate_gender, validate_name};
pub use verhoeff::validate_checksum;
