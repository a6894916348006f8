use safeframe_types::serde::ArrayType;
use thiserror::Error;

/// Fatal conditions raised by the adapters.
///
/// Adapters return [`anyhow::Result`]; a caller that needs the kind recovers it
/// with [`FrameError::of`].
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum FrameError {
    #[error("{entity} version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    #[error("Disallowed element type {0:?}")]
    DisallowedElementType(String),

    #[error("Element type {0:?} not implemented")]
    UnimplementedElementType(String),

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Element type {tag:?} cannot be backed by {found:?} storage")]
    StorageMismatch { tag: String, found: ArrayType },

    #[error("Length mismatch in {what}: expected {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Category {value} at position {at} repeats an earlier category")]
    DuplicateCategory { at: usize, value: String },

    #[error("Categorical code {code} is out of range for {categories} categories")]
    InvalidCode { code: i64, categories: usize },

    #[error("Expected a {expected} record, found a {found} record")]
    UnexpectedRecord {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Range index with step 0 ({start}..{stop})")]
    InvalidRange { start: i64, stop: i64 },

    #[error("Invalid label {0}")]
    InvalidLabel(String),
}

impl FrameError {
    pub fn of(err: &anyhow::Error) -> Option<&FrameError> {
        err.downcast_ref::<FrameError>()
    }
}
