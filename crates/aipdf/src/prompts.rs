use std::fs;
use std::path::Path;

use aipdf_core::prompt::{PromptTemplates, CLEANUP_TEMPLATE_FILE, SUMMARY_TEMPLATE_FILE};

use crate::prelude::*;

/// Load prompt templates, letting files in `dir` override the built-in ones.
///
/// Each template is overridden on its own; a missing file keeps the default.
pub fn load_templates(dir: Option<&Path>) -> Result<PromptTemplates> {
    let mut templates = PromptTemplates::default();

    let Some(dir) = dir else {
        return Ok(templates);
    };

    if !dir.is_dir() {
        return Err(Error::Generic(f!("prompts directory {} does not exist", dir.display())).into());
    }

    if let Some(cleanup) = read_template(dir, CLEANUP_TEMPLATE_FILE)? {
        templates.cleanup = cleanup;
    }
    if let Some(summary) = read_template(dir, SUMMARY_TEMPLATE_FILE)? {
        templates.summary = summary;
    }

    Ok(templates)
}

fn read_template(dir: &Path, name: &str) -> Result<Option<String>> {
    let path = dir.join(name);
    if !path.exists() {
        return Ok(None);
    }

    log::debug!("loading prompt template {}", path.display());
    fs::read_to_string(&path)
        .map(Some)
        .wrap_err_with(|| f!("Failed to read prompt template {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_dir() {
        assert_eq!(load_templates(None).unwrap(), PromptTemplates::default());
    }

    #[test]
    fn test_override_single_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SUMMARY_TEMPLATE_FILE), "Summarize:\n").unwrap();

        let templates = load_templates(Some(dir.path())).unwrap();

        assert_eq!(templates.summary, "Summarize:\n");
        assert_eq!(templates.cleanup, PromptTemplates::default().cleanup);
    }

    #[test]
    fn test_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_templates(Some(&dir.path().join("absent"))).is_err());
    }
}
