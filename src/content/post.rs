//! Post and Tag models
//!
//! Posts and tags live in separate arenas owned by [`crate::content::Site`].
//! They refer to each other only through [`PostKey`] and [`TagKey`] indices.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::frontmatter::TagEntry;
use crate::i18n::Locale;

/// Index of a post in the site's post arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostKey(pub usize);

/// Index of a tag in the site's tag arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagKey(pub usize);

/// A post source as read from disk, with validated front-matter
#[derive(Debug, Clone)]
pub struct RawPost {
    /// Source file path, relative to the site directory
    pub source: PathBuf,

    pub title: String,
    pub published_at: DateTime<Utc>,
    pub locale: Locale,
    pub tags: Vec<TagEntry>,

    /// Explicit slug from front-matter
    pub slug: Option<String>,

    /// Explicit or body-derived description
    pub description: String,

    /// Markdown body (front-matter removed)
    pub body: String,

    /// Rendered HTML body
    pub html: String,
}

/// A blog post with resolved identifiers
#[derive(Debug, Clone)]
pub struct Post {
    pub key: PostKey,

    /// Stable identifier, `{locale}/{slug}`
    pub id: String,

    /// URL-safe short name
    pub slug: String,

    pub title: String,

    /// Rendered HTML content
    pub html: String,

    pub description: String,

    pub locale: Locale,

    pub published_at: DateTime<Utc>,

    /// Tags in front-matter order, duplicates removed
    pub tags: Vec<TagKey>,

    /// Canonical URL path
    pub path: String,

    /// Source file path (relative)
    pub source: PathBuf,
}

/// A tag shared by any number of posts within one locale
#[derive(Debug, Clone)]
pub struct Tag {
    pub key: TagKey,

    /// Identifier, unique within `locale`
    pub id: String,

    /// Display name, taken from the first occurrence
    pub name: String,

    pub locale: Locale,

    /// Canonical URL path of the tag index
    pub path: String,

    /// Tagged posts in order of appearance
    pub posts: Vec<PostKey>,

    /// Source file where the tag first appeared
    pub first_source: PathBuf,
}
