// src/inspector/pdf.rs

//! PDF inspection backed by `lopdf`.

use std::path::Path;

use lopdf::{Dictionary, Object};

use crate::error::InspectError;
use crate::inspector::{Document, DocumentInspector, DocumentMetadata};

/// Opens PDF files with `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfInspector;

impl PdfInspector {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentInspector for PdfInspector {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, InspectError> {
        let doc = lopdf::Document::load(path)
            .map_err(|e| InspectError::Unreadable(format!("{}: {e}", path.display())))?;
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        if pages.is_empty() {
            return Err(InspectError::Unreadable(format!(
                "{}: no pages",
                path.display()
            )));
        }
        Ok(Box::new(PdfDocument { doc, pages }))
    }
}

struct PdfDocument {
    doc: lopdf::Document,
    /// Page numbers in document order
    pages: Vec<u32>,
}

impl PdfDocument {
    fn info(&self) -> Option<&Dictionary> {
        match self.doc.trailer.get(b"Info").ok()? {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    fn info_string(&self, key: &[u8]) -> Option<String> {
        let value = match self.info()?.get(key).ok()? {
            Object::Reference(id) => self.doc.get_object(*id).ok()?,
            other => other,
        };
        match value {
            Object::String(bytes, _) => Some(decode_text_string(bytes)).filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}

impl Document for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            title: self.info_string(b"Title"),
            author: self.info_string(b"Author"),
        }
    }

    fn page_text(&self, index: usize) -> Result<String, InspectError> {
        let page = self
            .pages
            .get(index)
            .copied()
            .ok_or(InspectError::PageOutOfRange {
                index,
                count: self.pages.len(),
            })?;

        // Pages with broken content streams read as empty rather than failing
        // the whole document.
        Ok(self.doc.extract_text(&[page]).unwrap_or_else(|e| {
            log::debug!("Text extraction failed on page {page}: {e}");
            String::new()
        }))
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, UTF-8 with BOM, else Latin-1.
fn decode_text_string(bytes: &[u8]) -> String {
    let text = if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8_lossy(utf8).into_owned()
    } else {
        bytes.iter().map(|&b| char::from(b)).collect()
    };
    text.trim().to_string()
}
