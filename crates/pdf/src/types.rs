use serde::{Deserialize, Serialize};

/// A piece of text shown in one font at one size.
///
/// Runs come out of line assembly, so the text of every run appears verbatim
/// in the document text returned alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// 1-based page number.
    pub page: usize,
    /// `BaseFont` name, or the resource key when the font declares none.
    pub font: String,
    /// Rendered size in points.
    pub size: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_count: usize,
    pub creator: Option<String>,
}
