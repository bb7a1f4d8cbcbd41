use thiserror::Error;

use parser::backend::LopdfBackend;
use parser::text::{group_spans_into_lines, TextSpan};

pub mod normalize;
pub mod parser;
pub mod types;

pub use types::*;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// A parsed PDF with its text runs and document text laid out once.
///
/// Constructed via [`ParsedDocument::from_bytes`].
pub struct ParsedDocument {
    backend: LopdfBackend,
    runs: Vec<TextRun>,
    text: String,
}

impl ParsedDocument {
    /// Parse PDF bytes and lay out the text of every page.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        let pages = parser::text::extract_all_pages(&backend)?;
        let (runs, text) = layout_pages(pages);

        log::debug!(
            "parsed {} pages: {} runs, {} chars",
            backend.page_count(),
            runs.len(),
            text.len()
        );

        Ok(ParsedDocument {
            backend,
            runs,
            text,
        })
    }

    pub fn metadata(&self) -> DocumentMetadata {
        extract_metadata(&self.backend)
    }

    /// Text runs in reading order, and the text of every page top to bottom
    /// with one line per text line.
    pub fn into_parts(self) -> (Vec<TextRun>, String) {
        (self.runs, self.text)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn extract_metadata(backend: &LopdfBackend) -> DocumentMetadata {
    let raw = backend.metadata();
    DocumentMetadata {
        title: raw.get("Title").cloned(),
        author: raw.get("Author").cloned(),
        page_count: backend.page_count(),
        creator: raw.get("Creator").cloned(),
    }
}

/// Build runs and document text from the same assembled lines.
fn layout_pages(pages: Vec<(usize, Vec<TextSpan>)>) -> (Vec<TextRun>, String) {
    let mut runs = Vec::new();
    let mut text = String::new();

    for (page, spans) in pages {
        let lines = group_spans_into_lines(spans);
        let page_lines: Vec<String> = lines.iter().map(|line| line.text()).collect();

        runs.extend(lines.into_iter().flat_map(|line| line.spans).map(|span| {
            TextRun {
                page,
                font: span.font_name,
                size: span.font_size,
                text: span.text,
            }
        }));

        if !page_lines.is_empty() {
            text.push_str(&page_lines.join("\n"));
            text.push('\n');
        }
    }

    (runs, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, font: &str, size: f32, y: f32) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            x: 72.0,
            y,
            width: text.len() as f32 * size * 0.5,
            font_size: size,
            font_name: font.to_string(),
        }
    }

    #[test]
    fn test_layout_runs_are_substrings_of_text() {
        let pages = vec![
            (
                1,
                vec![
                    span("Abstract", "Bold", 14.0, 700.0),
                    span("We study things.", "Roman", 10.0, 680.0),
                ],
            ),
            (2, vec![span("1 Introduction", "Bold", 14.0, 700.0)]),
        ];

        let (runs, text) = layout_pages(pages);

        assert_eq!(text, "Abstract\nWe study things.\n1 Introduction\n");
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[2].page, 2);
        assert_eq!(runs[2].font, "Bold");
        assert!(runs.iter().all(|run| text.contains(&run.text)));
    }

    #[test]
    fn test_layout_skips_empty_pages() {
        let (runs, text) = layout_pages(vec![(1, vec![]), (2, vec![])]);
        assert!(runs.is_empty());
        assert!(text.is_empty());
    }

    fn span_at(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan {
            x,
            ..span(text, "Bold", 14.0, y)
        }
    }

    #[test]
    fn test_layout_merges_jittered_heading_in_reading_order() {
        let pages = vec![(
            1,
            vec![
                span_at("1", 72.0, 700.0),
                span_at("Introduction", 84.0, 700.4),
            ],
        )];

        let (runs, text) = layout_pages(pages);

        assert_eq!(text, "1 Introduction\n");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "1 Introduction");
        assert!(text.contains(&runs[0].text));
    }

    #[test]
    fn test_from_bytes_rejects_empty_input() {
        assert!(ParsedDocument::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            ParsedDocument::from_bytes(b"%PDF-nope"),
            Err(PdfError::Parse(_))
        ));
    }
}
