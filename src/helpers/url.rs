//! URL and path helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Component, Path, PathBuf};

use crate::config::SiteConfig;
use crate::i18n::Locale;

/// Characters escaped by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Path prefix for a locale: empty for the default locale, `/{code}` otherwise
pub fn locale_prefix(locale: Locale, default_locale: Locale) -> String {
    if locale == default_locale {
        String::new()
    } else {
        format!("/{}", locale.code())
    }
}

/// Place an absolute site path under a locale's prefix
///
/// # Examples
/// ```ignore
/// localize_path("/tags/rust", Locale::En, Locale::Ko) // -> "/en/tags/rust"
/// ```
pub fn localize_path(path: &str, locale: Locale, default_locale: Locale) -> String {
    let path = path.trim_start_matches('/');
    format!("{}/{}", locale_prefix(locale, default_locale), path)
}

/// Canonical path of a post
pub fn post_path(slug: &str, locale: Locale, default_locale: Locale) -> String {
    localize_path(&format!("/posts/{}", slug), locale, default_locale)
}

/// Canonical path of a tag index
pub fn tag_path(tag_id: &str, locale: Locale, default_locale: Locale) -> String {
    localize_path(
        &format!("/tags/{}", encode_component(tag_id)),
        locale,
        default_locale,
    )
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/posts/hello") // -> "https://example.com/posts/hello"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}/{}", base, path.trim_start_matches('/'))
}

/// Percent-encode one path component the way `encodeURIComponent` does
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// File system location for a site path, relative to the output directory
///
/// Percent-escapes are decoded so the file matches what a static server
/// looks up for the request. Returns `None` when a decoded segment is not a
/// plain file name (`..`, `.`, or one that carries a separator), since it
/// would land outside the path's own directory.
pub fn output_dir_for(path: &str) -> Option<PathBuf> {
    let mut dir = PathBuf::new();
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        let decoded = percent_decode_str(segment).decode_utf8_lossy();
        if decoded.contains('\\') {
            return None;
        }
        let mut components = Path::new(&*decoded).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => dir.push(name),
            _ => return None,
        }
    }
    Some(dir)
}
