//! folio: resolves markdown posts into localized page contexts
//!
//! A build runs in four linear phases, each finishing before the next starts:
//! load sources, resolve identifiers and paths, aggregate tags, and build the
//! immutable page contexts handed to an external renderer.

pub mod commands;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod i18n;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::path::{Path, PathBuf};

pub use error::{BuildError, ContentError, ContentErrors};

/// The main application handle for one site directory
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Site timezone, validated
    pub tz: Tz,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory (one subtree per locale)
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, BuildError> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Create a new instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(
        base_dir: P,
        config: config::SiteConfig,
    ) -> Result<Self, BuildError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let tz = config.tz()?;
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            tz,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Run the load, resolve and aggregate phases
    pub fn load_site(&self) -> Result<content::Site, BuildError> {
        content::Site::load(self)
    }

    /// Build every page context and tag listing as of `now`
    pub fn build(&self, now: DateTime<Utc>) -> Result<generator::BuildOutput, BuildError> {
        let site = self.load_site()?;
        Ok(generator::Generator::new(self, now).build(&site))
    }

    /// Build and write the outputs to the public directory
    pub fn generate(&self, now: DateTime<Utc>) -> Result<generator::BuildOutput, BuildError> {
        let output = self.build(now)?;
        generator::Generator::new(self, now).write(&output)?;
        Ok(output)
    }

    /// Clean the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}
