//! Locales and their per-locale formatting strategies
//!
//! The site ships in a closed set of locales. Everything that varies by
//! locale (date display, the outdated-post note, Open Graph locale tags)
//! lives in one strategy table instead of being scattered as conditionals.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported site locale
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ko,
    En,
}

impl Locale {
    /// Every supported locale, in table order
    pub const ALL: [Locale; 2] = [Locale::Ko, Locale::En];

    /// The locale code used in front-matter, directory names and paths
    pub fn code(self) -> &'static str {
        match self {
            Locale::Ko => "ko",
            Locale::En => "en",
        }
    }

    /// The formatting strategy for this locale
    pub fn strategy(self) -> &'static LocaleStrategy {
        match self {
            Locale::Ko => &STRATEGIES[0],
            Locale::En => &STRATEGIES[1],
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string names no supported locale
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale `{0}` (expected one of: ko, en)")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" => Ok(Locale::Ko),
            "en" => Ok(Locale::En),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

/// The caution block shown on posts older than a year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutdatedNote {
    pub title: String,
    pub descriptions: Vec<String>,
}

/// Pure formatting functions for one locale
pub struct LocaleStrategy {
    pub locale: Locale,
    /// Value for the `og:locale` meta property
    pub og_locale: &'static str,
    format_date: fn(NaiveDate) -> String,
    outdated_note: fn(i64) -> OutdatedNote,
}

impl LocaleStrategy {
    /// Format a publish date for display
    pub fn format_date(&self, date: NaiveDate) -> String {
        (self.format_date)(date)
    }

    /// Build the outdated note for a post written `years` whole years ago
    pub fn outdated_note(&self, years: i64) -> OutdatedNote {
        (self.outdated_note)(years)
    }
}

static STRATEGIES: [LocaleStrategy; 2] = [
    LocaleStrategy {
        locale: Locale::Ko,
        og_locale: "ko_KR",
        format_date: ko_date,
        outdated_note: ko_outdated_note,
    },
    LocaleStrategy {
        locale: Locale::En,
        og_locale: "en_US",
        format_date: en_date,
        outdated_note: en_outdated_note,
    },
];

fn ko_date(date: NaiveDate) -> String {
    format!("{}년 {}월 {}일", date.year(), date.month(), date.day())
}

fn en_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn ko_outdated_note(years: i64) -> OutdatedNote {
    OutdatedNote {
        title: "주의 ⛔️".to_string(),
        descriptions: vec![
            format!("이 글이 작성된지 {}년이 넘었어요.", years),
            "누구나 숨기고 싶은 흑역사가 있답니다.".to_string(),
        ],
    }
}

fn en_outdated_note(years: i64) -> OutdatedNote {
    OutdatedNote {
        title: "Caution ⛔️".to_string(),
        descriptions: vec![
            format!("I wrote this post more than {} years ago.", years),
            "Everyone has a shameful past.".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("ko".parse::<Locale>(), Ok(Locale::Ko));
        assert_eq!(" EN ".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(
            "fr".parse::<Locale>(),
            Err(UnknownLocale("fr".to_string()))
        );
    }

    #[test]
    fn test_strategy_table_covers_every_locale() {
        for locale in Locale::ALL {
            assert_eq!(locale.strategy().locale, locale);
            assert_eq!(locale.code().parse::<Locale>(), Ok(locale));
        }
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        assert_eq!(Locale::Ko.strategy().format_date(date), "2021년 3월 7일");
        assert_eq!(Locale::En.strategy().format_date(date), "2021-03-07");
    }

    #[test]
    fn test_outdated_note() {
        let ko = Locale::Ko.strategy().outdated_note(3);
        assert_eq!(ko.title, "주의 ⛔️");
        assert_eq!(ko.descriptions[0], "이 글이 작성된지 3년이 넘었어요.");

        let en = Locale::En.strategy().outdated_note(2);
        assert_eq!(en.title, "Caution ⛔️");
        assert_eq!(
            en.descriptions,
            vec![
                "I wrote this post more than 2 years ago.".to_string(),
                "Everyone has a shameful past.".to_string(),
            ]
        );
    }
}
