// Document retrieval: passage search over one uploaded resume.
// The index is built once per run from the staged PDF and bound to that document only.

pub mod index;
pub mod tool;

use serde::Serialize;
use thiserror::Error;

pub use index::DocumentIndex;
pub use tool::ResumeSearchTool;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Could not read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not extract text from PDF: {0}")]
    Pdf(String),

    #[error("Document contains no extractable text")]
    EmptyDocument,

    #[error("Search index error: {0}")]
    Index(#[from] tantivy::TantivyError),
}

/// A ranked slice of the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Passage {
    /// Position of the chunk in the document, starting at 0.
    pub chunk: usize,
    pub text: String,
    pub score: f32,
}

/// Text search over a single document. Results are ordered best first.
pub trait DocumentSearch: Send + Sync {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Passage>, RetrievalError>;
}
