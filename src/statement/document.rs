// src/statement/document.rs
use std::fs;
use std::path::Path;

use crate::utils::error::StatementError;

/// Page separator used by `pdftotext` style plain-text exports.
const FORM_FEED: char = '\u{c}';

/// A statement as a sequence of pages of extracted text.
///
/// A page may have no text at all (scanned image, broken content stream).
/// Such pages are reported as `None` and the extractor skips them.
pub trait StatementDocument {
    fn page_count(&self) -> usize;

    fn page_text(&self, index: usize) -> Option<&str>;
}

/// How the statement file should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Pdf,
    Text,
}

impl StatementFormat {
    /// Picks a format from the file extension.
    pub fn detect(path: &Path) -> Result<Self, StatementError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(StatementFormat::Pdf),
            Some("txt") | Some("text") => Ok(StatementFormat::Text),
            _ => Err(StatementError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Pages of text held in memory, whichever way they were obtained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStatement {
    pages: Vec<Option<String>>,
}

impl TextStatement {
    pub fn from_pages(pages: Vec<Option<String>>) -> Self {
        Self { pages }
    }

    /// Splits a plain-text export on form feeds, one page per chunk.
    pub fn from_text(text: &str) -> Self {
        Self::from_pages(text.split(FORM_FEED).map(|p| Some(p.to_string())).collect())
    }

    /// Reads a plain-text export from disk.
    pub fn open_text<P: AsRef<Path>>(path: P) -> Result<Self, StatementError> {
        let text = fs::read_to_string(path.as_ref())?;
        tracing::debug!("Read {} bytes of statement text from {}", text.len(), path.as_ref().display());
        Ok(Self::from_text(&text))
    }

    /// Reads a PDF and extracts text page by page.
    /// A document that cannot be parsed at all is a fatal error.
    pub fn open_pdf<P: AsRef<Path>>(path: P) -> Result<Self, StatementError> {
        let bytes = fs::read(path.as_ref())?;
        tracing::debug!("Read {} bytes of PDF from {}", bytes.len(), path.as_ref().display());

        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
            .map_err(|e| StatementError::Pdf(e.to_string()))?;

        tracing::info!("Extracted text from {} PDF pages", pages.len());
        Ok(Self::from_pages(pages.into_iter().map(Some).collect()))
    }

    /// Opens a statement in the given format.
    pub fn open<P: AsRef<Path>>(path: P, format: StatementFormat) -> Result<Self, StatementError> {
        match format {
            StatementFormat::Pdf => Self::open_pdf(path),
            StatementFormat::Text => Self::open_text(path),
        }
    }

    /// All page texts joined with form feeds, empty pages included as blanks.
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(&FORM_FEED.to_string())
    }
}

impl StatementDocument for TextStatement {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Option<&str> {
        self.pages.get(index).and_then(|p| p.as_deref())
    }
}
