//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::ContentKind;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Read the projects and updates of a markdown portfolio site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects or updates, newest first
    #[command(alias = "ls")]
    List {
        /// Type of content to list (project, update)
        #[arg(default_value = "project")]
        kind: ContentKind,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single project or update with its body
    Show {
        /// Type of content (project, update)
        kind: ContentKind,

        /// Slug (file name without extension)
        slug: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the slugs of every project or update
    Slugs {
        /// Type of content (project, update)
        kind: ContentKind,
    },

    /// Generate sitemap.xml
    Sitemap {
        /// Output file, or `-` for stdout (defaults to the configured path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { kind, json } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&site, kind, json)?;
        }

        Commands::Show { kind, slug, json } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::show::run(&site, kind, &slug, json)?;
        }

        Commands::Slugs { kind } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::list::slugs(&site, kind)?;
        }

        Commands::Sitemap { output } => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Generating sitemap for {}", site.config.url);
            folio::commands::sitemap::run(&site, output.as_deref())?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
