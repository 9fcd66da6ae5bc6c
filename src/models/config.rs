use std::path::PathBuf;

/// Pipeline construction options. Collaborator model locations live here so
/// callers wire paths in explicitly instead of reading process environment.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Location of the card-field detection model, if a detector is wired in.
    pub detector_model_path: Option<PathBuf>,
    /// Location of the face detection model, if a detector is wired in.
    pub face_model_path: Option<PathBuf>,
    /// Upper bound for a single OCR invocation; past it the stage yields
    /// empty text instead of stalling the item.
    pub ocr_timeout_ms: u64,
    /// Batch truncation limit, applied before iteration begins.
    pub max_batch_items: Option<usize>,
    /// Per-item size ceiling; larger items are skipped, not processed.
    pub max_item_bytes: usize,
    /// Optional delay between batch items.
    pub pacing_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detector_model_path: None,
            face_model_path: None,
            ocr_timeout_ms: 10_000,
            max_batch_items: None,
            max_item_bytes: 6 * 1024 * 1024,
            pacing_ms: 0,
        }
    }
}
