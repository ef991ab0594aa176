//! Content loader - reads post sources from the content directory

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::frontmatter::{FrontMatter, TagEntry};
use super::resolver::{tag_id, validate_slug};
use super::{MarkdownRenderer, RawPost};
use crate::error::{ContentError, ContentErrors};
use crate::i18n::Locale;
use crate::Folio;

/// A markdown file found under a locale subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Locale named by the subtree the file lives in
    pub locale: Locale,
    /// Full path on disk
    pub path: PathBuf,
}

/// Loads post sources from `<content_dir>/<locale>/**`
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        Self {
            folio,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Lazily walk the content directory for markdown files
    ///
    /// Files are yielded in file-name order per locale subtree. Anything
    /// outside a locale subtree is skipped with a warning.
    pub fn discover(&self) -> impl Iterator<Item = Result<SourceFile, ContentError>> + '_ {
        let content_dir = &self.folio.content_dir;
        if !content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", content_dir);
        }

        content_dir
            .exists()
            .then(|| {
                WalkDir::new(content_dir)
                    .min_depth(1)
                    .follow_links(true)
                    .sort_by_file_name()
            })
            .into_iter()
            .flatten()
            .filter_map(move |entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        let path = e.path().unwrap_or(content_dir.as_path()).to_path_buf();
                        return Some(Err(ContentError::Read {
                            path: self.relative(&path),
                            message: e.to_string(),
                        }));
                    }
                };

                let path = entry.path();
                if !entry.file_type().is_file() || !is_markdown_file(path) {
                    return None;
                }

                let relative = path.strip_prefix(content_dir).unwrap_or(path);
                let first_component = relative
                    .components()
                    .next()
                    .and_then(|c| c.as_os_str().to_str());

                match first_component.and_then(|c| c.parse::<Locale>().ok()) {
                    Some(locale) if relative.components().count() > 1 => Some(Ok(SourceFile {
                        locale,
                        path: path.to_path_buf(),
                    })),
                    _ => {
                        tracing::warn!("Skipping {:?}: not inside a locale directory", path);
                        None
                    }
                }
            })
    }

    /// Lazily read and parse each discovered source, one at a time
    pub fn sources(&self) -> impl Iterator<Item = Result<RawPost, ContentErrors>> + '_ {
        self.discover().map(move |file| {
            let file = file.map_err(|e| ContentErrors(vec![e]))?;
            self.load_post(&file).map_err(ContentErrors)
        })
    }

    /// Read and parse every source concurrently
    ///
    /// Returns the posts in source-path order, or every error found across
    /// all files.
    pub fn load_all(&self) -> Result<Vec<RawPost>, ContentErrors> {
        let (posts, errors) = self.load_partial();
        if errors.is_empty() {
            Ok(posts)
        } else {
            Err(ContentErrors(errors))
        }
    }

    /// Like [`load_all`](Self::load_all), but keeps the posts that loaded
    /// cleanly alongside the errors of the ones that did not
    pub fn load_partial(&self) -> (Vec<RawPost>, Vec<ContentError>) {
        let mut errors = Vec::new();
        let mut files = Vec::new();
        for file in self.discover() {
            match file {
                Ok(file) => files.push(file),
                Err(e) => errors.push(e),
            }
        }

        let results: Vec<Result<RawPost, Vec<ContentError>>> =
            files.par_iter().map(|file| self.load_post(file)).collect();

        let mut posts = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(post) => posts.push(post),
                Err(errs) => errors.extend(errs),
            }
        }

        posts.sort_by(|a, b| a.source.cmp(&b.source));
        (posts, errors)
    }

    /// Load a single post from a file, reporting every problem it has
    fn load_post(&self, file: &SourceFile) -> Result<RawPost, Vec<ContentError>> {
        let source = self.relative(&file.path);
        tracing::debug!("Loading {:?}", source);

        let content = fs::read_to_string(&file.path).map_err(|e| {
            vec![ContentError::Read {
                path: source.clone(),
                message: e.to_string(),
            }]
        })?;

        let (fm, body) =
            FrontMatter::parse(&content).map_err(|msg| vec![ContentError::parse(&source, msg)])?;

        let mut problems = Vec::new();

        let title = fm
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        if title.is_none() {
            problems.push("missing required field `title`".to_string());
        }

        let published_at = match fm.published_at.as_deref() {
            None => {
                problems.push("missing required field `publishedAt`".to_string());
                None
            }
            Some(raw) => {
                let parsed = fm.parse_published_at(self.folio.tz);
                if parsed.is_none() {
                    problems.push(format!("invalid `publishedAt` value `{}`", raw));
                }
                parsed
            }
        };

        let locale = match fm.locale.as_deref() {
            None => {
                problems.push("missing required field `locale`".to_string());
                None
            }
            Some(raw) => match raw.parse::<Locale>() {
                Ok(locale) if locale != file.locale => {
                    problems.push(format!(
                        "front-matter locale `{}` does not match directory locale `{}`",
                        locale, file.locale
                    ));
                    None
                }
                Ok(locale) => Some(locale),
                Err(e) => {
                    problems.push(e.to_string());
                    None
                }
            },
        };

        for (i, tag) in fm.tags.iter().enumerate() {
            problems.extend(tag_problem(i, tag));
        }

        let slug = fm.slug.as_deref().map(str::trim).map(str::to_string);
        if let Some(slug) = &slug {
            if let Err(msg) = validate_slug(slug) {
                problems.push(format!("invalid slug `{}`: {}", slug, msg));
            }
        }

        match (title, published_at, locale) {
            (Some(title), Some(published_at), Some(locale)) if problems.is_empty() => {
                let description = fm
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        MarkdownRenderer::summarize(body, self.folio.config.description_length)
                    });

                Ok(RawPost {
                    source,
                    title,
                    published_at,
                    locale,
                    tags: fm.tags,
                    slug,
                    description,
                    body: body.to_string(),
                    html: self.renderer.render(body),
                })
            }
            _ => Err(problems
                .into_iter()
                .map(|msg| ContentError::parse(&source, msg))
                .collect()),
        }
    }

    /// Path relative to the site directory, for reports
    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.folio.base_dir)
            .unwrap_or(path)
            .to_path_buf()
    }
}

fn tag_problem(index: usize, tag: &TagEntry) -> Option<String> {
    if tag.name().trim().trim_start_matches('#').trim().is_empty() {
        return Some(format!("tag #{} has an empty name", index + 1));
    }
    if matches!(tag.explicit_id(), Some(id) if id.trim().is_empty()) {
        return Some(format!("tag `{}` has an empty id", tag.name()));
    }

    // The id becomes a single segment of the tag's output path
    let id = tag_id(tag);
    if id == "." || id == ".." || id.contains(['/', '\\']) || id.chars().any(char::is_control) {
        return Some(format!(
            "tag `{}` has id `{}`, which is not a valid path segment",
            tag.name(),
            id.escape_debug()
        ));
    }
    None
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn site() -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let folio = Folio::with_config(dir.path(), SiteConfig::default()).unwrap();
        (dir, folio)
    }

    fn write(folio: &Folio, rel: &str, content: &str) {
        let path = folio.content_dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_valid_post() {
        let (_dir, folio) = site();
        write(
            &folio,
            "en/hello.md",
            "---\ntitle: Hello\npublishedAt: 2024-01-15\nlocale: en\ntags: [rust]\n---\nHi **there**.\n",
        );

        let posts = ContentLoader::new(&folio).load_all().unwrap();
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.title, "Hello");
        assert_eq!(post.locale, Locale::En);
        assert_eq!(post.source, Path::new("content").join("en").join("hello.md"));
        assert_eq!(post.description, "Hi there.");
        assert!(post.html.contains("<strong>there</strong>"));
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let (_dir, folio) = site();
        write(&folio, "ko/empty.md", "---\ntags: [a]\n---\nbody\n");

        let errors = ContentLoader::new(&folio).load_all().unwrap_err();
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(errors.len(), 3);
        assert!(messages[0].ends_with("missing required field `title`"));
        assert!(messages[1].ends_with("missing required field `publishedAt`"));
        assert!(messages[2].ends_with("missing required field `locale`"));
    }

    #[test]
    fn test_errors_are_collected_across_files() {
        let (_dir, folio) = site();
        write(&folio, "en/a.md", "no front-matter here\n");
        write(
            &folio,
            "en/b.md",
            "---\ntitle: B\npublishedAt: someday\nlocale: en\n---\n",
        );
        write(
            &folio,
            "ko/c.md",
            "---\ntitle: C\npublishedAt: 2024-01-01\nlocale: en\n---\n",
        );

        let errors = ContentLoader::new(&folio).load_all().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.kind() == "ParseError"));
        let report = errors.to_string();
        assert!(report.contains("missing front-matter"));
        assert!(report.contains("invalid `publishedAt` value `someday`"));
        assert!(report.contains("does not match directory locale `ko`"));
    }

    #[test]
    fn test_invalid_slug_and_empty_tag() {
        let (_dir, folio) = site();
        write(
            &folio,
            "ko/a.md",
            "---\ntitle: A\npublishedAt: 2024-01-01\nlocale: ko\nslug: Not Valid\ntags: ['#']\n---\n",
        );

        let errors = ContentLoader::new(&folio).load_all().unwrap_err();
        let report = errors.to_string();
        assert!(report.contains("tag #1 has an empty name"));
        assert!(report.contains("invalid slug `Not Valid`"));
    }

    #[test]
    fn test_tag_ids_must_be_single_path_segments() {
        let (_dir, folio) = site();
        write(
            &folio,
            "ko/a.md",
            "---\ntitle: A\npublishedAt: 2024-01-01\nlocale: ko\ntags: ['../en/posts/hello', '..', 'a\\\\b', {id: 'x/y', name: XY}, node.js]\n---\n",
        );

        let errors = ContentLoader::new(&folio).load_all().unwrap_err();
        assert_eq!(errors.len(), 4);
        let report = errors.to_string();
        assert!(report.contains("id `../en/posts/hello`"));
        assert!(report.contains("id `..`"));
        assert!(report.contains("id `x/y`"));
        assert!(!report.contains("node.js"));
    }

    #[test]
    fn test_load_partial_keeps_good_posts() {
        let (_dir, folio) = site();
        write(&folio, "en/bad.md", "---\ntitle: [oops\n---\n");
        write(
            &folio,
            "en/good.md",
            "---\ntitle: Good\npublishedAt: 2024-01-01\nlocale: en\n---\n",
        );

        let (posts, errors) = ContentLoader::new(&folio).load_partial();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Good");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), "ParseError");
    }

    #[test]
    fn test_files_outside_locale_dirs_are_skipped() {
        let (_dir, folio) = site();
        write(&folio, "README.md", "# not a post\n");
        write(&folio, "drafts/x.md", "# not a post either\n");
        write(&folio, "ko/notes.txt", "ignored\n");

        let loader = ContentLoader::new(&folio);
        assert_eq!(loader.discover().count(), 0);
        assert!(loader.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_sources_is_lazy_and_ordered() {
        let (_dir, folio) = site();
        for name in ["b", "a"] {
            write(
                &folio,
                &format!("en/{}.md", name),
                &format!("---\ntitle: {}\npublishedAt: 2024-01-01\nlocale: en\n---\n", name),
            );
        }

        let loader = ContentLoader::new(&folio);
        let mut sources = loader.sources();
        assert_eq!(sources.next().unwrap().unwrap().title, "a");
        assert_eq!(sources.next().unwrap().unwrap().title, "b");
        assert!(sources.next().is_none());
    }

    #[test]
    fn test_missing_content_dir_yields_nothing() {
        let (_dir, folio) = site();
        assert!(ContentLoader::new(&folio).load_all().unwrap().is_empty());
    }
}
