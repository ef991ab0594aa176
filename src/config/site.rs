//! Site configuration (_config.yml)

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::BuildError;
use crate::i18n::Locale;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,

    // Locale
    /// Locale served without a path prefix
    pub default_locale: Locale,
    /// IANA timezone used for naive dates and calendar arithmetic
    pub timezone: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // SEO
    /// Maximum length of a description derived from the post body
    pub description_length: usize,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),

            url: "http://example.com".to_string(),

            default_locale: Locale::Ko,
            timezone: "Asia/Seoul".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),

            description_length: 160,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BuildError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content).map_err(|e| {
            BuildError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        config.tz()?;
        Ok(config)
    }

    /// The configured timezone
    pub fn tz(&self) -> Result<Tz, BuildError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| BuildError::Config(format!("unknown timezone `{}`", self.timezone)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.default_locale, Locale::Ko);
        assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Seoul);
        assert_eq!(config.content_dir, "content");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
url: https://blog.example.com
default_locale: en
timezone: Europe/London
comments_repo: me/blog-comments
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.default_locale, Locale::En);
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::London);
        assert_eq!(config.description_length, 160);
        assert!(config.extra.contains_key("comments_repo"));
    }

    #[test]
    fn test_invalid_timezone() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.tz(), Err(BuildError::Config(_))));
    }

    #[test]
    fn test_unknown_default_locale_rejected() {
        let yaml = "default_locale: fr\n";
        assert!(serde_yaml::from_str::<SiteConfig>(yaml).is_err());
    }
}
