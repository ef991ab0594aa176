//! CLI entry point for folio

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::i18n::Locale;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Resolves markdown posts into localized page contexts", long_about = None)]
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
    /// Build page contexts into the public directory
    #[command(alias = "b")]
    Build {
        /// Build instant (RFC 3339) used for the outdated check; defaults to now
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,

        /// Rebuild whenever content or config changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Locale of the post (ko, en); defaults to the site's default locale
        #[arg(short, long)]
        locale: Option<Locale>,

        /// Explicit slug (lowercase kebab-case)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Remove the public directory
    Clean,

    /// List resolved site content
    List {
        /// Type of content to list (post, tag, source)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn main() {
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
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build { now, watch } => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Building page contexts...");
            folio::commands::build::run(&site, now)?;

            if watch {
                folio::commands::build::watch(&site, now)?;
            }
        }

        Commands::New {
            title,
            locale,
            slug,
        } => {
            let site = folio::Folio::new(&base_dir)?;
            let locale = locale.unwrap_or(site.config.default_locale);
            tracing::info!("Creating new {} post with title: {}", locale, title);
            let path = folio::commands::new::create_post(&site, &title, locale, slug.as_deref())?;
            println!("Created: {}", path.display());
        }

        Commands::Clean => {
            let site = folio::Folio::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
