//! Error types for the content pipeline

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::i18n::Locale;

/// A problem with a single piece of authored content.
///
/// Every variant is fatal for the build. The pipeline collects them across
/// all phases and aborts once with the full list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("{}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{}: failed to read: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error(
        "duplicate slug `{slug}` in locale `{locale}`: {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateSlug {
        locale: Locale,
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error(
        "tag `{id}` in locale `{locale}` is named `{first_name}` in {} but `{second_name}` in {}",
        .first_path.display(),
        .second_path.display()
    )]
    TagConflict {
        locale: Locale,
        id: String,
        first_name: String,
        first_path: PathBuf,
        second_name: String,
        second_path: PathBuf,
    },
}

impl ContentError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ContentError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Short name of the error kind, used in build reports
    pub fn kind(&self) -> &'static str {
        match self {
            ContentError::Parse { .. } => "ParseError",
            ContentError::Read { .. } => "ReadError",
            ContentError::DuplicateSlug { .. } => "DuplicateSlugError",
            ContentError::TagConflict { .. } => "TagConflictError",
        }
    }
}

/// All content errors found by one build phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentErrors(pub Vec<ContentError>);

impl ContentErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ContentError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContentErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "build failed with {} error(s):", self.0.len())?;
        for (i, err) in self.0.iter().enumerate() {
            write!(f, "\n  {}. [{}] {}", i + 1, err.kind(), err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ContentErrors {}

/// Errors that abort a build
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Content(#[from] ContentErrors),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// The content errors carried by this failure, if any
    pub fn content_errors(&self) -> Option<&ContentErrors> {
        match self {
            BuildError::Content(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_every_error() {
        let errors = ContentErrors(vec![
            ContentError::parse("content/en/a.md", "missing required field `title`"),
            ContentError::DuplicateSlug {
                locale: Locale::En,
                slug: "hello".to_string(),
                first: PathBuf::from("content/en/a.md"),
                second: PathBuf::from("content/en/b.md"),
            },
        ]);

        let report = errors.to_string();
        assert!(report.starts_with("build failed with 2 error(s):"));
        assert!(report.contains("1. [ParseError] content/en/a.md: missing required field `title`"));
        assert!(report.contains("2. [DuplicateSlugError] duplicate slug `hello` in locale `en`"));
        assert!(report.contains("content/en/b.md"));
    }
}
