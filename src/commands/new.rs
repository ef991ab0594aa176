//! Scaffold a new post

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::content::resolver::validate_slug;
use crate::i18n::Locale;
use crate::Folio;

/// Create a new post under `<content_dir>/<locale>/<slug>.md`
pub fn create_post(
    folio: &Folio,
    title: &str,
    locale: Locale,
    slug: Option<&str>,
) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => {
            validate_slug(s).map_err(|msg| anyhow::anyhow!("invalid slug `{}`: {}", s, msg))?;
            s.to_string()
        }
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Title `{}` does not produce a usable slug; pass --slug", title);
    }

    let target_dir = folio.content_dir.join(locale.code());
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = Utc::now().with_timezone(&folio.tz);
    let content = format!(
        "---\ntitle: {}\npublishedAt: {}\nlocale: {}\nslug: {}\ntags: []\n---\n",
        serde_json::to_string(title)?,
        now.format("%Y-%m-%d %H:%M:%S"),
        locale,
        slug
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
