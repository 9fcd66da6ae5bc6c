pub mod config;
pub mod data;

pub use config::PipelineConfig;
pub use data::{
    now_timestamp, Assessment, AssessmentRecord, AuthenticityDetails, AuthenticityVerdict,
    BatchSummary, ExtractedFields, Indicator, RawFieldText, Severity, ValidationOutcome,
    ERROR_MODEL_UNAVAILABLE, ERROR_NOT_AADHAAR, ERROR_PROCESSING, ERROR_TOO_LARGE,
};
