//! The raw document handed to the extraction stage.

/// An uploaded document: raw bytes plus the filename it arrived under.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    /// Original filename.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl Document {
    /// Creates a document.
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns the size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the document has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}
