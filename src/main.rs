use anyhow::Result;
use clap::Parser;
use quillpost::build::build_site;
use quillpost::config::Config;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Builds the blog in the project directory: `posts/` and `templates/` in,
/// `public/` out.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The project directory
    #[arg(default_value = ".")]
    project: PathBuf,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = Config::from_directory(&cli.project)?;
    build_site(&config)?;
    Ok(())
}
