//! Error types shared by every operation in the crate.
//!
//! Each fallible operation returns exactly one [`AdvisorError`] variant, so callers can
//! branch on [`AdvisorError::kind`] instead of matching on message text.

use std::io;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Top-level error for loading, training, inference and placement.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// A required column is missing or a cell does not satisfy the record schema.
    #[error("schema error: {0}")]
    Schema(String),

    /// Zero usable rows or features were supplied.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// Training data is insufficient or degenerate, or optimization diverged.
    #[error("training error: {0}")]
    Training(String),

    /// Inference was requested before any model was trained or loaded.
    #[error("model is not trained; train or load a model before predicting")]
    NotTrained,

    /// A persisted model artifact could not be loaded.
    #[error("model load error: {0}")]
    ModelLoad(#[from] ArtifactError),

    /// Geographic input is not a valid WGS84 feature collection.
    #[error("geo format error: {0}")]
    GeoFormat(String),

    /// An uploaded payload was refused before being staged.
    #[error("upload rejected: {0}")]
    UploadRejected(String),

    /// Configuration file or environment override is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure outside the model artifact path.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure modes of the versioned model artifact envelope.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The bytes do not start with the artifact header, or carry another format tag.
    #[error("unknown artifact format: {0}")]
    UnknownFormat(String),

    /// The header is valid but written by an incompatible format version.
    #[error("unsupported artifact version {found} (supported: {supported})")]
    UnsupportedVersion { found: u16, supported: u16 },

    /// The header is valid but the payload cannot be decoded.
    #[error("corrupt artifact payload: {0}")]
    CorruptPayload(String),

    /// The artifact could not be read from or written to storage.
    #[error("artifact I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Plain discriminant of [`AdvisorError`], convenient for assertions and UI mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Schema,
    EmptyData,
    Training,
    NotTrained,
    ModelLoad,
    GeoFormat,
    UploadRejected,
    Config,
    Io,
}

impl AdvisorError {
    /// Returns the error kind without its payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdvisorError::Schema(_) => ErrorKind::Schema,
            AdvisorError::EmptyData(_) => ErrorKind::EmptyData,
            AdvisorError::Training(_) => ErrorKind::Training,
            AdvisorError::NotTrained => ErrorKind::NotTrained,
            AdvisorError::ModelLoad(_) => ErrorKind::ModelLoad,
            AdvisorError::GeoFormat(_) => ErrorKind::GeoFormat,
            AdvisorError::UploadRejected(_) => ErrorKind::UploadRejected,
            AdvisorError::Config(_) => ErrorKind::Config,
            AdvisorError::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<csv::Error> for AdvisorError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io_err) => AdvisorError::Io(io_err),
                other => AdvisorError::Schema(format!("{:?}", other)),
            }
        } else {
            AdvisorError::Schema(err.to_string())
        }
    }
}

impl From<geojson::Error> for AdvisorError {
    fn from(err: geojson::Error) -> Self {
        AdvisorError::GeoFormat(err.to_string())
    }
}
