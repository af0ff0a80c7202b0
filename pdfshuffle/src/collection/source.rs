//! Source file handles.
//!
//! A [`SourceFile`] is what every page descriptor points back to. It holds a
//! reference to the file content only; bytes are read when ingestion renders
//! the pages and again when export copies them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{PdfShuffleError, Result};

/// Per-file token allocated by the session on ingestion.
///
/// Two files sharing a display name still get different tokens, which keeps
/// page ids unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(u64);

impl SourceId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw token value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the bytes of a file live.
#[derive(Debug, Clone)]
pub enum SourceContent {
    /// A file on disk, read on demand.
    Path(PathBuf),
    /// Bytes already in memory.
    Memory(Arc<Vec<u8>>),
}

impl SourceContent {
    /// Read the full content.
    ///
    /// In-memory content is shared, not copied.
    pub async fn read(&self) -> std::io::Result<Arc<Vec<u8>>> {
        match self {
            Self::Path(path) => tokio::fs::read(path).await.map(Arc::new),
            Self::Memory(bytes) => Ok(Arc::clone(bytes)),
        }
    }
}

/// A candidate file handed to ingestion.
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Display name, usually the file name without directories.
    pub name: String,
    /// The file content.
    pub content: SourceContent,
}

impl InputFile {
    /// Reference a file on disk. The display name is its file name.
    ///
    /// # Errors
    ///
    /// Returns [`PdfShuffleError::FileNotFound`] if the path does not exist
    /// or is not a regular file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PdfShuffleError::file_not_found(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            content: SourceContent::Path(path.to_path_buf()),
        })
    }

    /// Wrap bytes already in memory.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: SourceContent::Memory(Arc::new(bytes.into())),
        }
    }
}

/// An ingested file, shared by all of its page descriptors.
#[derive(Debug)]
pub struct SourceFile {
    id: SourceId,
    name: String,
    content: SourceContent,
}

impl SourceFile {
    pub(crate) fn new(id: SourceId, input: InputFile) -> Self {
        Self {
            id,
            name: input.name,
            content: input.content,
        }
    }

    /// Session-unique token of this file.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content handle.
    pub fn content(&self) -> &SourceContent {
        &self.content
    }
}

impl PartialEq for SourceFile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SourceFile {}
