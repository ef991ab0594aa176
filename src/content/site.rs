//! The resolved site: post and tag arenas for one build

use std::time::Instant;

use super::loader::ContentLoader;
use super::resolver::PathAssigner;
use super::tags::{TagAggregator, TagIndex};
use super::{Post, PostKey, RawPost, Tag, TagKey};
use crate::error::{BuildError, ContentError, ContentErrors};
use crate::i18n::Locale;
use crate::Folio;

/// All posts and tags of one build, linked by arena keys
#[derive(Debug, Clone)]
pub struct Site {
    posts: Vec<Post>,
    tags: TagIndex,
}

impl Site {
    /// Load content from disk and resolve it
    ///
    /// Each phase runs to completion over its whole input before the next
    /// starts. Later phases still run over the posts that passed the earlier
    /// ones, so the build fails once with every error from every phase.
    pub fn load(folio: &Folio) -> Result<Self, BuildError> {
        let start = Instant::now();
        let (raws, mut errors) = ContentLoader::new(folio).load_partial();
        tracing::info!(
            "Loaded {} post sources in {:.2}s",
            raws.len(),
            start.elapsed().as_secs_f64()
        );
        if !errors.is_empty() {
            tracing::debug!("{} sources failed to load", errors.len());
        }

        let (site, resolve_errors) = Self::resolve_partial(raws, folio.config.default_locale);
        errors.extend(resolve_errors);
        if !errors.is_empty() {
            return Err(ContentErrors(errors).into());
        }

        tracing::info!(
            "Resolved {} posts and {} tags",
            site.posts.len(),
            site.tags.len()
        );
        Ok(site)
    }

    /// Assign identifiers and paths, then aggregate tags
    pub fn resolve(raws: Vec<RawPost>, default_locale: Locale) -> Result<Self, ContentErrors> {
        let (site, errors) = Self::resolve_partial(raws, default_locale);
        if errors.is_empty() {
            Ok(site)
        } else {
            Err(ContentErrors(errors))
        }
    }

    fn resolve_partial(raws: Vec<RawPost>, default_locale: Locale) -> (Self, Vec<ContentError>) {
        let (resolved, mut errors) = PathAssigner::new(default_locale).assign_partial(raws);
        let (posts, tags, tag_errors) = TagAggregator::new(default_locale).aggregate_partial(resolved);
        errors.extend(tag_errors);
        (Self { posts, tags }, errors)
    }

    /// All posts in source-path order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, key: PostKey) -> Option<&Post> {
        self.posts.get(key.0)
    }

    pub fn find_post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    pub fn tag(&self, key: TagKey) -> Option<&Tag> {
        self.tags.get(key)
    }

    /// Posts of one locale, newest first
    pub fn posts_by_date(&self, locale: Locale) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.iter().filter(|p| p.locale == locale).collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(a.path.cmp(&b.path)));
        posts
    }

    /// Tags of a post, in front-matter order
    pub fn tags_of<'a>(&'a self, post: &'a Post) -> impl Iterator<Item = &'a Tag> + 'a {
        post.tags.iter().filter_map(move |key| self.tags.get(*key))
    }

    /// Posts carrying a tag, in order of appearance
    pub fn posts_of<'a>(&'a self, tag: &'a Tag) -> impl Iterator<Item = &'a Post> + 'a {
        tag.posts.iter().filter_map(move |key| self.post(*key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TagEntry;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn raw(source: &str, title: &str, day: u32, tags: &[&str]) -> RawPost {
        RawPost {
            source: PathBuf::from(source),
            title: title.to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            locale: Locale::Ko,
            tags: tags.iter().map(|t| TagEntry::Name(t.to_string())).collect(),
            slug: None,
            description: String::new(),
            body: String::new(),
            html: String::new(),
        }
    }

    #[test]
    fn test_navigate_between_arenas() {
        let site = Site::resolve(
            vec![
                raw("a.md", "Older", 1, &["Rust", "CLI"]),
                raw("b.md", "Newer", 2, &["rust"]),
            ],
            Locale::Ko,
        );
        // `Rust` and `rust` share an id but not a name
        assert!(site.is_err());

        let site = Site::resolve(
            vec![
                raw("a.md", "Older", 1, &["Rust", "CLI"]),
                raw("b.md", "Newer", 2, &["Rust"]),
            ],
            Locale::Ko,
        )
        .unwrap();

        let older = site.find_post("ko/older").unwrap();
        let names: Vec<&str> = site.tags_of(older).map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "CLI"]);

        let rust = site.tags().find(Locale::Ko, "rust").unwrap();
        let titles: Vec<&str> = site.posts_of(rust).map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Older", "Newer"]);

        let by_date: Vec<&str> = site
            .posts_by_date(Locale::Ko)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(by_date, vec!["Newer", "Older"]);
    }

    #[test]
    fn test_resolve_reports_slug_and_tag_errors_together() {
        let errors = Site::resolve(
            vec![
                raw("a.md", "Same", 1, &["Rust"]),
                raw("b.md", "Same", 2, &["Rust"]),
                raw("c.md", "Other", 3, &["RUST"]),
            ],
            Locale::Ko,
        )
        .unwrap_err();

        let kinds: Vec<&str> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["DuplicateSlugError", "TagConflictError"]);
    }
}
