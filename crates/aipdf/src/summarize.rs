use std::path::PathBuf;
use std::time::Duration;

use aipdf_core::fontmap::FontMap;
use aipdf_core::headings::{candidate_headings, infer_heading_style};
use aipdf_core::models::Model;
use aipdf_core::prompt::PromptTemplates;
use aipdf_core::sections::{split_text_into_sections, SectionMap};
use aipdf_core::summary::{is_skipped_section, seed_summaries, SummaryMap};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::credentials::ChainedCredentials;
use crate::llm::openrouter::DEFAULT_BASE_URL;
use crate::llm::{AiBackend, OpenRouter, OpenRouterConfig};
use crate::prelude::{eprintln, println, *};
use crate::sections::{filter_section_names, summarize_section};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, clap::Args, Clone)]
pub struct SummarizeOptions {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Stop after finding the sections; print them with their lengths
    #[arg(long)]
    pub dry_run: bool,

    /// Model to use (mixtral, zephyr, gpt4-turbo)
    #[arg(long, env = "AIPDF_MODEL", default_value = "mixtral")]
    pub model: Model,

    /// Seconds to wait between summary requests
    #[arg(long, env = "AIPDF_DELAY_SECS", default_value = "5")]
    pub delay_secs: u64,

    /// HTTP timeout for each model request, in seconds
    #[arg(long, env = "AIPDF_TIMEOUT_SECS", default_value = "120")]
    pub timeout_secs: u64,

    /// Directory with prompt templates overriding the built-in ones
    #[arg(long, env = "AIPDF_PROMPTS_DIR")]
    pub prompts_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// OpenRouter API base URL
    #[arg(long, env = "OPENROUTER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Value for the HTTP-Referer header
    #[arg(long)]
    pub referer: Option<String>,

    /// Value for the X-Title header
    #[arg(long)]
    pub title: Option<String>,
}

/// Headings that survived reconciliation, and the sections they select from.
#[derive(Debug)]
pub struct SectionPlan {
    /// Runs in the inferred heading style, in document order.
    pub candidates: Vec<String>,
    /// Reconciled headings, best match first.
    pub headings: Vec<String>,
    /// Every candidate's section.
    pub sections: SectionMap,
}

#[derive(Debug, Serialize)]
pub struct SectionLength {
    pub heading: String,
    pub chars: usize,
}

impl SectionPlan {
    pub fn lengths(&self) -> Vec<SectionLength> {
        self.headings
            .iter()
            .map(|heading| SectionLength {
                heading: heading.clone(),
                chars: self
                    .sections
                    .get(heading)
                    .map(|text| text.chars().count())
                    .unwrap_or_default(),
            })
            .collect()
    }
}

pub async fn run(options: SummarizeOptions, global: crate::Global) -> Result<()> {
    let document = crate::document::load(&options.path)?;
    let templates = crate::prompts::load_templates(options.prompts_dir.as_deref())?;

    let credentials = ChainedCredentials::standard()?;
    let backend = OpenRouter::new(
        OpenRouterConfig {
            base_url: options.base_url.clone(),
            model: options.model,
            timeout: Duration::from_secs(options.timeout_secs),
            referer: options.referer.clone(),
            title: options.title.clone(),
        },
        &credentials,
    )?;

    let plan = plan_sections(
        &backend,
        &templates,
        &document.fontmap,
        &document.text,
        global.verbose,
    )
    .await?;

    if options.dry_run {
        return output_lengths(&plan.lengths(), options.format);
    }

    let progress = new_progress_bar(&plan, global.verbose);
    let summaries = summarize_sections(
        &backend,
        &templates,
        &plan,
        Duration::from_secs(options.delay_secs),
        &progress,
        global.verbose,
    )
    .await?;
    progress.finish_and_clear();

    output_summaries(&summaries, options.format)
}

/// Infer the heading style, reconcile its runs with the model and split the
/// text on them.
pub async fn plan_sections<B: AiBackend>(
    backend: &B,
    templates: &PromptTemplates,
    fontmap: &FontMap,
    text: &str,
    verbose: bool,
) -> Result<SectionPlan> {
    let style = infer_heading_style(fontmap)
        .ok_or_eyre("No text runs found in the document; is it a scanned PDF?")?;
    log::info!("heading style: {} at {}pt", style.font, style.size);

    let candidates = candidate_headings(fontmap, &style);
    if candidates.is_empty() {
        return Err(eyre!("No candidate headings in {} at {}pt", style.font, style.size));
    }
    if verbose {
        eprintln!(
            "Heading style {} {}pt, {} candidates",
            style.font,
            style.size,
            candidates.len()
        );
    }

    let headings = filter_section_names(backend, templates, &candidates, verbose).await?;
    if headings.is_empty() {
        return Err(eyre!(
            "None of the {} candidate headings matched the model's answer",
            candidates.len()
        ));
    }

    let sections = split_text_into_sections(text, &candidates)?;

    Ok(SectionPlan {
        candidates,
        headings,
        sections,
    })
}

/// Summarize the planned sections one at a time.
///
/// Reference and appendix sections are skipped and keep an empty summary.
/// `delay` is waited between two consecutive requests, never before the
/// first.
pub async fn summarize_sections<B: AiBackend>(
    backend: &B,
    templates: &PromptTemplates,
    plan: &SectionPlan,
    delay: Duration,
    progress: &ProgressBar,
    verbose: bool,
) -> Result<SummaryMap> {
    let mut summaries = seed_summaries(&plan.headings);
    let mut requested = false;

    for heading in &plan.headings {
        if is_skipped_section(heading) {
            log::info!("skipping section {:?}", heading);
            continue;
        }

        let section_text = plan
            .sections
            .get(heading)
            .ok_or_else(|| eyre!("No section text for heading {:?}", heading))?;

        if requested && !delay.is_zero() {
            progress.set_message(f!("waiting {}s", delay.as_secs()));
            tokio::time::sleep(delay).await;
        }
        requested = true;

        progress.set_message(heading.clone());
        let summary = summarize_section(backend, templates, section_text, verbose)
            .await
            .wrap_err_with(|| f!("Failed to summarize {:?}", heading))?;
        summaries.insert(heading.clone(), summary);
        progress.inc(1);
    }

    Ok(summaries)
}

fn new_progress_bar(plan: &SectionPlan, verbose: bool) -> ProgressBar {
    // The bar and verbose output share stderr.
    if verbose {
        return ProgressBar::hidden();
    }

    let total = plan
        .headings
        .iter()
        .filter(|heading| !is_skipped_section(heading))
        .count();
    let progress = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}") {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(120));
    progress
}

fn output_summaries(summaries: &SummaryMap, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summaries)?),
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_titles(prettytable::row!["Section", "Summary"]);
            for (heading, summary) in summaries {
                table.add_row(prettytable::row![heading, summary.trim()]);
            }
            table.printstd();
        }
    }
    Ok(())
}

fn output_lengths(lengths: &[SectionLength], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(lengths)?),
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_titles(prettytable::row!["Section", "Chars"]);
            for entry in lengths {
                table.add_row(prettytable::row![entry.heading, entry.chars]);
            }
            table.printstd();
        }
    }
    Ok(())
}
