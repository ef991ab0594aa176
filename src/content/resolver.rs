//! Identifier and path assignment

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;

use super::frontmatter::TagEntry;
use super::RawPost;
use crate::error::{ContentError, ContentErrors};
use crate::helpers;
use crate::i18n::Locale;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// A tag reference as resolved for one post, before aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub id: String,
    pub name: String,
}

/// A post with its identifier, slug and canonical path assigned
#[derive(Debug, Clone)]
pub struct ResolvedPost {
    pub raw: RawPost,
    pub id: String,
    pub slug: String,
    pub path: String,
    pub tags: Vec<TagRef>,
}

/// Check that an explicit slug is lowercase kebab-case
pub fn validate_slug(slug: &str) -> Result<(), &'static str> {
    let is_valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if is_valid {
        Ok(())
    } else {
        Err("slug must be lowercase kebab-case")
    }
}

/// Identifier of a tag: its explicit id, or its name normalized
///
/// `TypeScript`, `typescript` and `#typescript` all share the id `typescript`.
pub fn tag_id(tag: &TagEntry) -> String {
    let source = tag.explicit_id().unwrap_or_else(|| tag.name());
    let trimmed = source.trim().trim_start_matches('#').trim();
    WHITESPACE.replace_all(&trimmed.to_lowercase(), "-").into_owned()
}

/// Display name of a tag, without a leading `#`
pub fn tag_name(tag: &TagEntry) -> String {
    tag.name().trim().trim_start_matches('#').trim().to_string()
}

/// Assigns ids and paths, rejecting slug collisions within a locale
pub struct PathAssigner {
    default_locale: Locale,
}

impl PathAssigner {
    pub fn new(default_locale: Locale) -> Self {
        Self { default_locale }
    }

    /// Slug of a post: explicit front-matter slug or its slugified title
    pub fn slug_for(&self, raw: &RawPost) -> String {
        raw.slug
            .clone()
            .unwrap_or_else(|| slug::slugify(&raw.title))
    }

    /// Resolve every post, reporting all collisions
    pub fn assign(&self, raws: Vec<RawPost>) -> Result<Vec<ResolvedPost>, ContentErrors> {
        let (resolved, errors) = self.assign_partial(raws);
        if errors.is_empty() {
            Ok(resolved)
        } else {
            Err(ContentErrors(errors))
        }
    }

    /// Resolve every post that does not collide, returning the collisions
    /// alongside
    pub fn assign_partial(&self, raws: Vec<RawPost>) -> (Vec<ResolvedPost>, Vec<ContentError>) {
        let mut errors = Vec::new();
        let mut seen: HashMap<(Locale, String), PathBuf> = HashMap::new();
        let mut resolved = Vec::with_capacity(raws.len());

        for raw in raws {
            let slug = self.slug_for(&raw);
            if slug.is_empty() {
                errors.push(ContentError::parse(
                    &raw.source,
                    format!("title `{}` does not produce a usable slug", raw.title),
                ));
                continue;
            }

            if let Some(first) = seen.get(&(raw.locale, slug.clone())) {
                errors.push(ContentError::DuplicateSlug {
                    locale: raw.locale,
                    slug,
                    first: first.clone(),
                    second: raw.source.clone(),
                });
                continue;
            }
            seen.insert((raw.locale, slug.clone()), raw.source.clone());

            let path = helpers::post_path(&slug, raw.locale, self.default_locale);
            let tags = raw
                .tags
                .iter()
                .map(|t| TagRef {
                    id: tag_id(t),
                    name: tag_name(t),
                })
                .collect();

            tracing::debug!("Resolved {:?} -> {}", raw.source, path);
            resolved.push(ResolvedPost {
                id: format!("{}/{}", raw.locale, slug),
                slug,
                path,
                tags,
                raw,
            });
        }

        (resolved, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn raw(source: &str, title: &str, locale: Locale, slug: Option<&str>) -> RawPost {
        RawPost {
            source: PathBuf::from(source),
            title: title.to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            locale,
            tags: vec![],
            slug: slug.map(str::to_string),
            description: String::new(),
            body: String::new(),
            html: String::new(),
        }
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("hello-world-2").is_ok());
        assert!(validate_slug("Hello").is_err());
        assert!(validate_slug("-x").is_err());
        assert!(validate_slug("a--b").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_tag_id_normalizes_name() {
        assert_eq!(tag_id(&TagEntry::Name("TypeScript".into())), "typescript");
        assert_eq!(tag_id(&TagEntry::Name("#typescript".into())), "typescript");
        assert_eq!(tag_id(&TagEntry::Name(" Web  Dev ".into())), "web-dev");
        assert_eq!(
            tag_id(&TagEntry::Full {
                id: Some("ts".into()),
                name: "TypeScript".into()
            }),
            "ts"
        );
        assert_eq!(tag_name(&TagEntry::Name("#Rust".into())), "Rust");
    }

    #[test]
    fn test_assign_paths_per_locale() {
        let assigner = PathAssigner::new(Locale::Ko);
        let posts = assigner
            .assign(vec![
                raw("content/ko/a.md", "Hello World", Locale::Ko, None),
                raw("content/en/a.md", "Hello World", Locale::En, None),
            ])
            .unwrap();

        assert_eq!(posts[0].id, "ko/hello-world");
        assert_eq!(posts[0].path, "/posts/hello-world");
        assert_eq!(posts[1].id, "en/hello-world");
        assert_eq!(posts[1].path, "/en/posts/hello-world");
    }

    #[test]
    fn test_duplicate_slug_names_both_files() {
        let assigner = PathAssigner::new(Locale::Ko);
        let errors = assigner
            .assign(vec![
                raw("content/en/one.md", "First", Locale::En, Some("hello")),
                raw("content/en/two.md", "Second", Locale::En, Some("hello")),
                raw("content/en/three.md", "Hello", Locale::En, None),
            ])
            .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.0[0],
            ContentError::DuplicateSlug {
                locale: Locale::En,
                slug: "hello".to_string(),
                first: PathBuf::from("content/en/one.md"),
                second: PathBuf::from("content/en/two.md"),
            }
        );
        assert_eq!(errors.0[1].kind(), "DuplicateSlugError");
    }

    #[test]
    fn test_unsluggable_title_is_a_parse_error() {
        let assigner = PathAssigner::new(Locale::Ko);
        let errors = assigner
            .assign(vec![raw("content/ko/x.md", "!!!", Locale::Ko, None)])
            .unwrap_err();
        assert_eq!(errors.0[0].kind(), "ParseError");
    }
}
