//! Document inspection abstraction.
//!
//! The validator only needs three things from a downloaded file: how many
//! pages it has, its title/author metadata, and the text of a given page.
//! [`PdfInspector`] provides them for PDF files.

mod pdf;

use std::path::Path;

use crate::error::InspectError;

pub use pdf::PdfInspector;

/// Title and author as declared by the document itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl DocumentMetadata {
    /// Title and author joined for text matching.
    pub fn joined(&self) -> String {
        [self.title.as_deref(), self.author.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An opened document.
pub trait Document {
    fn page_count(&self) -> usize;

    fn metadata(&self) -> DocumentMetadata;

    /// Text of the page at zero-based `index`.
    fn page_text(&self, index: usize) -> Result<String, InspectError>;
}

/// Opens files as documents.
pub trait DocumentInspector: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, InspectError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_joined() {
        let meta = DocumentMetadata {
            title: Some("Clean Code".into()),
            author: Some("Robert C. Martin".into()),
        };
        assert_eq!(meta.joined(), "Clean Code Robert C. Martin");

        let meta = DocumentMetadata {
            title: None,
            author: Some("Anon".into()),
        };
        assert_eq!(meta.joined(), "Anon");
        assert_eq!(DocumentMetadata::default().joined(), "");
    }
}
