use crate::credentials::{CredentialProvider, StoredCredentials, OPEN_ROUTER_SERVICE};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Parser)]
#[command(name = "secrets")]
#[command(about = "Manage stored API keys")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Store an API key
    #[clap(name = "set")]
    Set(SetOptions),

    /// Print a stored API key
    #[clap(name = "get")]
    Get(GetOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct SetOptions {
    /// Service the key belongs to
    #[arg(long, default_value = OPEN_ROUTER_SERVICE)]
    pub service: String,

    /// The API key
    #[arg(long)]
    pub key: String,

    /// Replace an existing key
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct GetOptions {
    /// Service the key belongs to
    #[arg(long, default_value = OPEN_ROUTER_SERVICE)]
    pub service: String,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let store = StoredCredentials::default_location()?;

    if global.verbose {
        eprintln!("Using credentials file {}", store.path().display());
    }

    match app.command {
        Commands::Set(options) => {
            store.set(&options.service, &options.key, options.force)?;
            println!("Stored key for {}", options.service);
        }
        Commands::Get(options) => {
            println!("{}", store.get_credential(&options.service)?);
        }
    }

    Ok(())
}
