use aipdf_core::prompt::{CompletionRequest, PromptTemplates};
use aipdf_core::reconcile::{parse_suggestions, rank_pairs, reconcile, select_matches};

use crate::llm::AiBackend;
use crate::prelude::{eprintln, *};

/// Ask the model which candidates are real section headings.
///
/// The model's answer is only used to pick among `candidates`; every
/// returned heading is one of the original strings, so it can still be found
/// verbatim in the document text.
pub async fn filter_section_names<B: AiBackend>(
    backend: &B,
    templates: &PromptTemplates,
    candidates: &[String],
    verbose: bool,
) -> Result<Vec<String>> {
    let request = CompletionRequest::cleanup(templates, candidates);
    if verbose {
        eprintln!("Heading clean-up prompt:\n{}\n", request.prompt);
    }

    let response = backend
        .complete(&request)
        .await
        .wrap_err("Heading clean-up request failed")?;
    if verbose {
        eprintln!("Heading clean-up response:\n{}\n", response);
    }

    let suggestions = parse_suggestions(&response)?;

    if verbose {
        let ranked = rank_pairs(candidates, &suggestions);
        let kept = select_matches(&ranked, candidates.len()).len();
        eprintln!("Ranked pairs ({} kept):", kept);
        for pair in &ranked {
            eprintln!("  {:>3}  {:?} ~ {:?}", pair.score, pair.candidate, pair.suggestion);
        }
    }

    let headings = reconcile(candidates, &suggestions);
    log::info!(
        "kept {} of {} candidate headings",
        headings.len(),
        candidates.len()
    );

    Ok(headings)
}

/// Summarize one section. The completion is returned as-is.
pub async fn summarize_section<B: AiBackend>(
    backend: &B,
    templates: &PromptTemplates,
    section_text: &str,
    verbose: bool,
) -> Result<String> {
    let request = CompletionRequest::summary(templates, section_text);
    if verbose {
        eprintln!("Summary prompt:\n{}\n", request.prompt);
    }

    let summary = backend.complete(&request).await?;
    if verbose {
        eprintln!("Summary response:\n{}\n", summary);
    }

    Ok(summary)
}
