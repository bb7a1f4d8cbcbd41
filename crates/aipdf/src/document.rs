use std::path::Path;

use aipdf_core::fontmap::FontMap;
use pdf::{ParsedDocument, TextRun};

use crate::prelude::*;

/// What the pipeline needs from a PDF: its font map and its text.
#[derive(Debug)]
pub struct Document {
    pub fontmap: FontMap,
    pub text: String,
    pub page_count: usize,
}

pub fn load(path: &Path) -> Result<Document> {
    let bytes =
        std::fs::read(path).wrap_err_with(|| f!("Failed to read {}", path.display()))?;
    let parsed = ParsedDocument::from_bytes(&bytes)
        .map_err(|e| eyre!(e))
        .wrap_err_with(|| f!("Failed to parse {}", path.display()))?;

    let page_count = parsed.metadata().page_count;
    let (runs, text) = parsed.into_parts();
    let fontmap = fontmap_from_runs(&runs);
    log::info!(
        "{}: {} pages, {} fonts",
        path.display(),
        page_count,
        fontmap.len()
    );

    Ok(Document {
        fontmap,
        text,
        page_count,
    })
}

pub fn fontmap_from_runs(runs: &[TextRun]) -> FontMap {
    FontMap::from_runs(
        runs.iter()
            .map(|run| (run.font.as_str(), run.size, run.text.as_str())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aipdf_core::fontmap::FontSize;

    fn run(font: &str, size: f32, text: &str) -> TextRun {
        TextRun {
            page: 1,
            font: font.to_string(),
            size,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_fontmap_from_runs_groups_by_font_and_size() {
        let fontmap = fontmap_from_runs(&[
            run("Bold", 14.0, "Abstract"),
            run("Roman", 10.0, "Body text."),
            run("Bold", 14.0, "1 Introduction"),
        ]);

        assert_eq!(fontmap.len(), 2);
        assert_eq!(
            fontmap.texts("Bold", FontSize::new(14.0)),
            ["Abstract".to_string(), "1 Introduction".to_string()]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("missing.pdf")).is_err());
    }

    #[test]
    fn test_load_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, "plain text").unwrap();
        assert!(load(&path).is_err());
    }
}
