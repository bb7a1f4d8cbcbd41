/// System message sent with every request made by the pipeline.
pub const CONCISE_SYSTEM_MESSAGE: &str =
    "You're a helpful AI, please help the user the best you can. Be as concise and short as possible.";

/// Default heading clean-up prompt, followed by the candidate list.
pub const DEFAULT_CLEANUP_TEMPLATE: &str = include_str!("../prompts/clean_up_maybe_sections.txt");

/// Default summarization prompt, followed by the section text.
pub const DEFAULT_SUMMARY_TEMPLATE: &str = include_str!("../prompts/summarize_section_prompt.txt");

/// File names the templates are loaded from when a prompts directory is given.
pub const CLEANUP_TEMPLATE_FILE: &str = "clean_up_maybe_sections.txt";
pub const SUMMARY_TEMPLATE_FILE: &str = "summarize_section_prompt.txt";

pub const CLEANUP_MAX_TOKENS: u32 = 512;
pub const SUMMARY_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// The two prompt bodies the pipeline appends user content to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    pub cleanup: String,
    pub summary: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            cleanup: DEFAULT_CLEANUP_TEMPLATE.to_string(),
            summary: DEFAULT_SUMMARY_TEMPLATE.to_string(),
        }
    }
}

/// A single completion request, independent of any provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Overrides the model's default system message when set.
    pub system_message: Option<String>,
}

impl CompletionRequest {
    /// Ask the model which of `candidates` are real section headings.
    pub fn cleanup<S: AsRef<str>>(templates: &PromptTemplates, candidates: &[S]) -> Self {
        Self {
            prompt: build_cleanup_prompt(&templates.cleanup, candidates),
            max_tokens: CLEANUP_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_message: Some(CONCISE_SYSTEM_MESSAGE.to_string()),
        }
    }

    /// Ask the model to summarize one section.
    pub fn summary(templates: &PromptTemplates, section_text: &str) -> Self {
        Self {
            prompt: build_summary_prompt(&templates.summary, section_text),
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_message: Some(CONCISE_SYSTEM_MESSAGE.to_string()),
        }
    }
}

/// Template body followed by one candidate per line.
pub fn build_cleanup_prompt<S: AsRef<str>>(template: &str, candidates: &[S]) -> String {
    let list = candidates
        .iter()
        .map(AsRef::<str>::as_ref)
        .collect::<Vec<_>>()
        .join("\n");

    format!("{template}{list}")
}

/// Template body followed by the section text.
pub fn build_summary_prompt(template: &str, section_text: &str) -> String {
    format!("{template}{section_text}")
}
