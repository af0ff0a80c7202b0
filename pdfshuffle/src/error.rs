//! Error types for pdfshuffle.
//!
//! This module defines all error types that can occur while ingesting,
//! arranging, and exporting pages. Errors carry the name of the file they
//! concern so they can be shown to the user as-is.
//!
//! # Error Categories
//!
//! - **Per-file errors**: decode failures and password-protected inputs.
//!   These are recoverable: the batch continues without the file.
//! - **Precondition errors**: exporting an empty collection, exporting while
//!   another export is running, out-of-range indices.
//! - **Fatal errors**: serialization failures and output write failures.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfshuffle operations.
pub type Result<T> = std::result::Result<T, PdfShuffleError>;

/// Main error type for pdfshuffle operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfShuffleError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// File could not be read or is not a usable PDF.
    #[error("Failed to decode PDF \"{file}\"\n  Reason: {reason}")]
    DecodeFailure {
        /// Display name of the file.
        file: String,
        /// Reason for the failure.
        reason: String,
    },

    /// File is encrypted and needs a password.
    #[error(
        "The file \"{file}\" is password protected and cannot be processed\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    PasswordProtected {
        /// Display name of the file.
        file: String,
    },

    /// Export was requested with no pages in the collection.
    #[error("There are no pages to export")]
    EmptyCollectionExport,

    /// Export was requested while another export is running.
    #[error("An export is already in progress")]
    ExportInProgress,

    /// Every file contributing to the export failed to decode.
    #[error("None of the {} source file(s) could be exported", .failures.len())]
    NothingToExport {
        /// The per-file failures that emptied the export.
        failures: Vec<FileFailure>,
    },

    /// The assembled document could not be serialized.
    #[error("Failed to serialize the merged PDF: {reason}")]
    SerializationFailure {
        /// Details about the failure.
        reason: String,
    },

    /// An arrangement index is outside the collection.
    #[error("Page index {index} is out of range (collection has {len} page(s))")]
    InvalidIndex {
        /// Requested index.
        index: usize,
        /// Collection length at the time of the request.
        len: usize,
    },

    /// An edit instruction could not be parsed.
    #[error("Invalid edit '{input}': {reason}")]
    InvalidEdit {
        /// The raw instruction.
        input: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Failed to write the download or a thumbnail.
    #[error("Failed to write output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to read input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", .path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

/// A per-file error recorded during ingestion or export.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct FileFailure {
    /// Display name of the file that failed.
    pub file_name: String,
    /// What went wrong.
    pub error: PdfShuffleError,
}

impl FileFailure {
    /// Pair an error with the file it concerns.
    pub fn new(file_name: impl Into<String>, error: PdfShuffleError) -> Self {
        Self {
            file_name: file_name.into(),
            error,
        }
    }
}

impl PdfShuffleError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a DecodeFailure error.
    pub fn decode_failure(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DecodeFailure {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a PasswordProtected error.
    pub fn password_protected(file: impl Into<String>) -> Self {
        Self::PasswordProtected { file: file.into() }
    }

    /// Create a SerializationFailure error.
    pub fn serialization_failure(reason: impl Into<String>) -> Self {
        Self::SerializationFailure {
            reason: reason.into(),
        }
    }

    /// Create an InvalidEdit error.
    pub fn invalid_edit(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEdit {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether the error was caused by encryption.
    pub fn is_password_protected(&self) -> bool {
        matches!(self, Self::PasswordProtected { .. })
    }

    /// Check if this error only affects a single file of a batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. } | Self::DecodeFailure { .. } | Self::PasswordProtected { .. }
        )
    }

    /// Check if this error aborts the whole operation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SerializationFailure { .. }
                | Self::NothingToExport { .. }
                | Self::FailedToWrite { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::DecodeFailure { .. } => 3,
            Self::PasswordProtected { .. } => 3,
            Self::NothingToExport { .. } => 3,
            Self::EmptyCollectionExport => 4,
            Self::ExportInProgress => 4,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::SerializationFailure { .. } => 6,
            Self::InvalidIndex { .. } => 1,
            Self::InvalidEdit { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
        }
    }
}

impl From<lopdf::Error> for PdfShuffleError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for PdfShuffleError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<PdfShuffleError>() {
            Ok(inner) => inner,
            Err(err) => Self::other(format!("{err:#}")),
        }
    }
}
