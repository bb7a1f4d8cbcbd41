use crate::prelude::*;
use clap::Parser;

mod credentials;
mod document;
mod error;
mod fonts;
mod llm;
mod prelude;
mod prompts;
mod secrets;
mod sections;
mod summarize;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Find the sections of a PDF paper and summarize each one with an LLM"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Print prompts, model responses and match scores to stderr.
    #[clap(long, env = "AIPDF_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Summarize every section of a PDF
    Summarize(crate::summarize::SummarizeOptions),

    /// Show the font buckets and the inferred heading style
    Fonts(crate::fonts::FontsOptions),

    /// Manage stored API keys
    Secrets(crate::secrets::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Summarize(options) => crate::summarize::run(options, app.global).await,
        SubCommands::Fonts(options) => crate::fonts::run(options, app.global).await,
        SubCommands::Secrets(sub_app) => crate::secrets::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aipdf_core::models::Model;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        App::command().debug_assert();
    }

    #[test]
    fn test_parse_summarize_flags() {
        let app = App::try_parse_from([
            "aipdf",
            "--verbose",
            "summarize",
            "paper.pdf",
            "--dry-run",
            "--model",
            "zephyr",
            "--delay-secs",
            "0",
            "--format",
            "table",
        ])
        .unwrap();

        assert!(app.global.verbose);
        let SubCommands::Summarize(options) = app.command else {
            panic!("expected summarize");
        };
        assert!(options.dry_run);
        assert_eq!(options.model, Model::Zephyr7b);
        assert_eq!(options.delay_secs, 0);
        assert_eq!(options.format, crate::summarize::OutputFormat::Table);
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        assert!(App::try_parse_from(["aipdf", "summarize", "paper.pdf", "--model", "llama"]).is_err());
    }
}
