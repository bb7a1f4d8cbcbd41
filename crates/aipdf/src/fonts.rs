use std::path::PathBuf;

use aipdf_core::headings::{
    candidate_headings, infer_heading_style, score_heading_styles, HeadingStyle, StyleScore,
};
use serde::Serialize;

use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct FontsOptions {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct FontsReport {
    pub page_count: usize,
    pub styles: Vec<StyleScore>,
    pub heading_style: Option<HeadingStyle>,
    pub candidates: Vec<String>,
}

pub async fn run(options: FontsOptions, global: crate::Global) -> Result<()> {
    let document = crate::document::load(&options.path)?;
    if global.verbose {
        eprintln!("Read {} pages", document.page_count);
    }

    let heading_style = infer_heading_style(&document.fontmap);
    let report = FontsReport {
        page_count: document.page_count,
        styles: score_heading_styles(&document.fontmap),
        candidates: heading_style
            .as_ref()
            .map(|style| candidate_headings(&document.fontmap, style))
            .unwrap_or_default(),
        heading_style,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = new_table();
    table.set_titles(prettytable::row!["Font", "Size", "Runs", "Hits"]);
    for score in &report.styles {
        table.add_row(prettytable::row![score.font, score.size, score.runs, score.hits]);
    }
    table.printstd();

    match &report.heading_style {
        Some(style) => {
            println!("\nHeading style: {} at {}pt", style.font, style.size);
            for candidate in &report.candidates {
                println!("  {}", candidate);
            }
        }
        None => println!("\nNo text runs found"),
    }

    Ok(())
}
