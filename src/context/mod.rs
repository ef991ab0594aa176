//! Page contexts handed to the renderer
//!
//! A [`PageContext`] is the complete data bundle one post page needs and a
//! [`TagListing`] the bundle for one tag index page. Both are built once per
//! build and expose their contents read-only.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::{Post, Site, Tag};
use crate::helpers;
use crate::i18n::{Locale, OutdatedNote};

/// SEO metadata for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoProps {
    pub title: String,
    pub description: String,
    /// Locale code of the page (`ko`, `en`)
    pub locale: Locale,
    /// `og:locale` value (`ko_KR`, `en_US`)
    pub og_locale: String,
    pub canonical_path: String,
    pub canonical_url: String,
    pub site_name: String,
    #[serde(rename = "type")]
    pub og_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<String>,
}

/// A tag as shown on a post page or tag index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagView {
    pub id: String,
    pub name: String,
    pub path: String,
}

impl TagView {
    fn of(tag: &Tag) -> Self {
        Self {
            id: tag.id.clone(),
            name: tag.name.clone(),
            path: tag.path.clone(),
        }
    }
}

/// A post as the post template sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub html: String,
    pub description: String,
    pub locale: Locale,
    /// RFC 3339 timestamp in the site timezone
    pub published_at: String,
    /// Locale-formatted publish date
    pub published_at_display: String,
    pub path: String,
    pub tags: Vec<TagView>,
    /// Whole years between publication and the build
    pub years_since_published: i64,
    pub outdated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outdated_note: Option<OutdatedNote>,
}

/// A post as listed on a tag index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub path: String,
    pub published_at: String,
    pub published_at_display: String,
}

/// Everything the post template needs: `{ og, post }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContext {
    og: SeoProps,
    post: PostView,
}

impl PageContext {
    pub fn og(&self) -> &SeoProps {
        &self.og
    }

    pub fn post(&self) -> &PostView {
        &self.post
    }
}

/// Everything the tag index template needs: `{ og, tag, locale, posts }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagListing {
    og: SeoProps,
    tag: TagView,
    locale: Locale,
    posts: Vec<PostSummary>,
}

impl TagListing {
    pub fn og(&self) -> &SeoProps {
        &self.og
    }

    pub fn tag(&self) -> &TagView {
        &self.tag
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }
}

/// Builds contexts from a resolved site as of a fixed build instant
pub struct ContextBuilder<'a> {
    config: &'a SiteConfig,
    tz: Tz,
    now: DateTime<Utc>,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(config: &'a SiteConfig, tz: Tz, now: DateTime<Utc>) -> Self {
        Self { config, tz, now }
    }

    /// Context for one post page
    pub fn page_context(&self, site: &Site, post: &Post) -> PageContext {
        let strategy = post.locale.strategy();
        let years = helpers::whole_years_between(post.published_at, self.now, self.tz);
        let outdated = helpers::is_outdated(years);

        let og = SeoProps {
            title: post.title.clone(),
            description: post.description.clone(),
            locale: post.locale,
            og_locale: strategy.og_locale.to_string(),
            canonical_path: post.path.clone(),
            canonical_url: helpers::full_url_for(self.config, &post.path),
            site_name: self.config.title.clone(),
            og_type: "article".to_string(),
            published_time: Some(helpers::date_xml(post.published_at, self.tz)),
        };

        let post_view = PostView {
            id: post.id.clone(),
            slug: post.slug.clone(),
            title: post.title.clone(),
            html: post.html.clone(),
            description: post.description.clone(),
            locale: post.locale,
            published_at: helpers::date_xml(post.published_at, self.tz),
            published_at_display: self.display_date(post),
            path: post.path.clone(),
            tags: site.tags_of(post).map(TagView::of).collect(),
            years_since_published: years,
            outdated,
            outdated_note: outdated.then(|| strategy.outdated_note(years)),
        };

        PageContext { og, post: post_view }
    }

    /// Listing for one tag index page
    pub fn tag_listing(&self, site: &Site, tag: &Tag) -> TagListing {
        let strategy = tag.locale.strategy();
        let posts: Vec<PostSummary> = site
            .posts_of(tag)
            .map(|post| PostSummary {
                id: post.id.clone(),
                title: post.title.clone(),
                path: post.path.clone(),
                published_at: helpers::date_xml(post.published_at, self.tz),
                published_at_display: self.display_date(post),
            })
            .collect();

        let og = SeoProps {
            title: format!("#{}", tag.name),
            description: self.config.description.clone(),
            locale: tag.locale,
            og_locale: strategy.og_locale.to_string(),
            canonical_path: tag.path.clone(),
            canonical_url: helpers::full_url_for(self.config, &tag.path),
            site_name: self.config.title.clone(),
            og_type: "website".to_string(),
            published_time: None,
        };

        TagListing {
            og,
            tag: TagView::of(tag),
            locale: tag.locale,
            posts,
        }
    }

    fn display_date(&self, post: &Post) -> String {
        let local = post.published_at.with_timezone(&self.tz).date_naive();
        post.locale.strategy().format_date(local)
    }
}
