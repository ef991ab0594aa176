//! Generator module - builds every context and writes them as JSON files

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::Site;
use crate::context::{ContextBuilder, PageContext, TagListing};
use crate::error::BuildError;
use crate::helpers;
use crate::Folio;

/// Output file name inside each page directory
const CONTEXT_FILE: &str = "index.json";

/// Index of everything a build emitted
const MANIFEST_FILE: &str = "manifest.json";

/// Every context produced by one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutput {
    pub pages: Vec<PageContext>,
    pub tags: Vec<TagListing>,
}

impl BuildOutput {
    /// Every canonical path, posts first then tags
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .map(|p| p.og().canonical_path.as_str())
            .chain(self.tags.iter().map(|t| t.og().canonical_path.as_str()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    built_at: String,
    pages: Vec<&'a str>,
    tags: Vec<&'a str>,
}

/// Builds and writes contexts for a fixed build instant
pub struct Generator<'a> {
    folio: &'a Folio,
    now: DateTime<Utc>,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(folio: &'a Folio, now: DateTime<Utc>) -> Self {
        Self { folio, now }
    }

    /// Build one context per post and one listing per tag
    pub fn build(&self, site: &Site) -> BuildOutput {
        let builder = ContextBuilder::new(&self.folio.config, self.folio.tz, self.now);

        let pages: Vec<PageContext> = site
            .posts()
            .iter()
            .map(|post| builder.page_context(site, post))
            .collect();

        let tags: Vec<TagListing> = site
            .tags()
            .iter()
            .map(|tag| builder.tag_listing(site, tag))
            .collect();

        let outdated = pages.iter().filter(|p| p.post().outdated).count();
        tracing::info!(
            "Built {} page contexts ({} outdated) and {} tag listings",
            pages.len(),
            outdated,
            tags.len()
        );

        BuildOutput { pages, tags }
    }

    /// Write every context to `<public_dir>/<path>/index.json`
    pub fn write(&self, output: &BuildOutput) -> Result<(), BuildError> {
        let public_dir = &self.folio.public_dir;
        fs::create_dir_all(public_dir)?;

        for page in &output.pages {
            write_json(public_dir, &page.og().canonical_path, page)?;
        }
        for listing in &output.tags {
            write_json(public_dir, &listing.og().canonical_path, listing)?;
        }

        let manifest = Manifest {
            built_at: self.now.to_rfc3339(),
            pages: output
                .pages
                .iter()
                .map(|p| p.og().canonical_path.as_str())
                .collect(),
            tags: output
                .tags
                .iter()
                .map(|t| t.og().canonical_path.as_str())
                .collect(),
        };
        let manifest_path = public_dir.join(MANIFEST_FILE);
        fs::write(&manifest_path, to_json(&manifest)?)?;

        tracing::info!(
            "Wrote {} files to {:?}",
            output.pages.len() + output.tags.len() + 1,
            public_dir
        );
        Ok(())
    }
}

fn write_json<T: Serialize>(public_dir: &Path, path: &str, value: &T) -> Result<PathBuf, BuildError> {
    let relative = helpers::output_dir_for(path).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("path `{}` does not map into the output directory", path),
        )
    })?;
    let dir = public_dir.join(relative);
    fs::create_dir_all(&dir)?;
    let file = dir.join(CONTEXT_FILE);
    fs::write(&file, to_json(value)?)?;
    tracing::debug!("Wrote {:?}", file);
    Ok(file)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, BuildError> {
    let mut json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_write_layout() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::with_config(dir.path(), SiteConfig::default()).unwrap();
        let post_dir = folio.content_dir.join("en");
        fs::create_dir_all(&post_dir).unwrap();
        fs::write(
            post_dir.join("cpp.md"),
            "---\ntitle: Templates\npublishedAt: 2024-01-01\nlocale: en\ntags: [C++]\n---\nBody\n",
        )
        .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let output = folio.generate(now).unwrap();
        assert_eq!(
            output.paths().collect::<Vec<_>>(),
            vec!["/en/posts/templates", "/en/tags/c%2B%2B"]
        );

        let public = &folio.public_dir;
        assert!(public.join("en/posts/templates/index.json").is_file());
        assert!(public.join("en/tags/c++/index.json").is_file());

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(public.join("manifest.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["builtAt"], "2024-06-01T00:00:00+00:00");
        assert_eq!(manifest["tags"][0], "/en/tags/c%2B%2B");
    }
}
