//! Tag aggregation across all posts

use indexmap::IndexMap;

use super::resolver::ResolvedPost;
use super::{Post, PostKey, Tag, TagKey};
use crate::error::{ContentError, ContentErrors};
use crate::helpers;
use crate::i18n::Locale;

/// Tag arena keyed by (locale, tag id), in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: IndexMap<(Locale, String), Tag>,
}

impl TagIndex {
    pub fn get(&self, key: TagKey) -> Option<&Tag> {
        self.tags.get_index(key.0).map(|(_, tag)| tag)
    }

    pub fn find(&self, locale: Locale, id: &str) -> Option<&Tag> {
        self.tags.get(&(locale, id.to_string()))
    }

    /// All tags in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    pub fn in_locale(&self, locale: Locale) -> impl Iterator<Item = &Tag> {
        self.iter().filter(move |t| t.locale == locale)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Single-threaded reduction of resolved posts into the post and tag arenas
pub struct TagAggregator {
    default_locale: Locale,
}

impl TagAggregator {
    pub fn new(default_locale: Locale) -> Self {
        Self { default_locale }
    }

    /// Build both arenas, reporting every tag name conflict
    ///
    /// A tag's display name comes from its first occurrence; any later
    /// occurrence of the same id under a different name is a conflict.
    pub fn aggregate(
        &self,
        resolved: Vec<ResolvedPost>,
    ) -> Result<(Vec<Post>, TagIndex), ContentErrors> {
        let (posts, index, errors) = self.aggregate_partial(resolved);
        if errors.is_empty() {
            Ok((posts, index))
        } else {
            Err(ContentErrors(errors))
        }
    }

    /// Build both arenas, returning the conflicts alongside
    ///
    /// A conflicting tag reference is left off its post; everything else is
    /// aggregated as usual.
    pub fn aggregate_partial(
        &self,
        resolved: Vec<ResolvedPost>,
    ) -> (Vec<Post>, TagIndex, Vec<ContentError>) {
        let mut errors = Vec::new();
        let mut index = TagIndex::default();
        let mut posts = Vec::with_capacity(resolved.len());

        for (i, rp) in resolved.into_iter().enumerate() {
            let post_key = PostKey(i);
            let locale = rp.raw.locale;
            let mut keys: Vec<TagKey> = Vec::with_capacity(rp.tags.len());

            for tag_ref in &rp.tags {
                let map_key = (locale, tag_ref.id.clone());
                match index.tags.get_full_mut(&map_key) {
                    Some((idx, _, tag)) => {
                        if tag.name != tag_ref.name {
                            errors.push(ContentError::TagConflict {
                                locale,
                                id: tag_ref.id.clone(),
                                first_name: tag.name.clone(),
                                first_path: tag.first_source.clone(),
                                second_name: tag_ref.name.clone(),
                                second_path: rp.raw.source.clone(),
                            });
                            continue;
                        }
                        let key = TagKey(idx);
                        if !keys.contains(&key) {
                            tag.posts.push(post_key);
                            keys.push(key);
                        }
                    }
                    None => {
                        let key = TagKey(index.tags.len());
                        let tag = Tag {
                            key,
                            id: tag_ref.id.clone(),
                            name: tag_ref.name.clone(),
                            locale,
                            path: helpers::tag_path(&tag_ref.id, locale, self.default_locale),
                            posts: vec![post_key],
                            first_source: rp.raw.source.clone(),
                        };
                        index.tags.insert(map_key, tag);
                        keys.push(key);
                    }
                }
            }

            let raw = rp.raw;
            posts.push(Post {
                key: post_key,
                id: rp.id,
                slug: rp.slug,
                title: raw.title,
                html: raw.html,
                description: raw.description,
                locale,
                published_at: raw.published_at,
                tags: keys,
                path: rp.path,
                source: raw.source,
            });
        }

        (posts, index, errors)
    }
}
