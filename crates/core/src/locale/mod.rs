//! Locale handling for localized storefront URLs.
//!
//! The default locale never appears in a canonical URL; every other locale
//! is a path prefix (`/es/products`, `/hi`). This module decides which
//! locale a request is in and whether the client should be redirected.
//!
//! - [`LocaleSettings`] - Supported locales and the default
//! - [`strategy`] - Ordered resolution strategies (path, `Accept-Language`)
//! - [`LocaleResolver`] - Runs the strategies and makes the routing decision

pub mod resolver;
pub mod routing;
pub mod strategy;

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use resolver::{LocaleResolver, Resolution};
pub use routing::{ExcludedPaths, RouteDecision};
pub use strategy::{AcceptLanguageStrategy, LocaleRequest, LocaleSource, LocaleStrategy, PathSegmentStrategy};

/// Errors building locale settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("unknown locale code: {0}")]
    Unknown(String),
    #[error("at least one locale must be supported")]
    NoLocales,
    #[error("default locale {0} is not in the supported list")]
    DefaultNotSupported(Locale),
}

/// A language the storefront is translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Es,
    Hi,
}

impl Locale {
    /// Every locale the storefront knows about, in menu order.
    pub const ALL: [Self; 3] = [Self::En, Self::Es, Self::Hi];

    /// The code used in URL prefixes and `Accept-Language` subtags.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Hi => "hi",
        }
    }

    /// The language's own name, for the language switcher.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Español",
            Self::Hi => "हिन्दी",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.code() == s)
            .ok_or_else(|| LocaleError::Unknown(s.to_owned()))
    }
}

/// Which locales are enabled, in preference order, and which is the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSettings {
    supported: Vec<Locale>,
    default_locale: Locale,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            supported: Locale::ALL.to_vec(),
            default_locale: Locale::En,
        }
    }
}

impl LocaleSettings {
    /// Build settings, checking the default is one of the supported locales.
    ///
    /// Duplicates in `supported` are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError::NoLocales`] for an empty list and
    /// [`LocaleError::DefaultNotSupported`] if `default_locale` is missing.
    pub fn new(supported: Vec<Locale>, default_locale: Locale) -> Result<Self, LocaleError> {
        let mut unique: Vec<Locale> = Vec::with_capacity(supported.len());
        for locale in supported {
            if !unique.contains(&locale) {
                unique.push(locale);
            }
        }
        if unique.is_empty() {
            return Err(LocaleError::NoLocales);
        }
        if !unique.contains(&default_locale) {
            return Err(LocaleError::DefaultNotSupported(default_locale));
        }
        Ok(Self {
            supported: unique,
            default_locale,
        })
    }

    /// Parse a comma-separated list such as `en,es,hi`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown codes or an invalid default.
    pub fn parse(list: &str, default_locale: &str) -> Result<Self, LocaleError> {
        let supported = list
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(Locale::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(supported, default_locale.trim().parse()?)
    }

    #[must_use]
    pub fn supported(&self) -> &[Locale] {
        &self.supported
    }

    #[must_use]
    pub const fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// The supported locale whose code is exactly `code`.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<Locale> {
        self.supported.iter().copied().find(|l| l.code() == code)
    }

    /// The locale named by the first segment of `path`, if it is supported.
    ///
    /// `/es` and `/es/about` match; `/espresso` does not.
    #[must_use]
    pub fn locale_segment(&self, path: &str) -> Option<Locale> {
        let rest = path.strip_prefix('/')?;
        let segment = rest.split('/').next()?;
        self.find(segment)
    }

    /// `path` with its locale segment removed; `/` if nothing remains.
    ///
    /// Leading separators are collapsed to a single `/`, so the result is
    /// always a same-origin path (`/en//host` strips to `/host`, never
    /// `//host`).
    #[must_use]
    pub fn strip_locale(&self, path: &str) -> String {
        let rest = match self.locale_segment(path) {
            Some(locale) => path.get(1 + locale.code().len()..).unwrap_or(""),
            None => path,
        };
        format!("/{}", rest.trim_start_matches(['/', '\\']))
    }

    /// The canonical URL of `path` in `target`.
    ///
    /// Any existing locale segment is replaced. The default locale gets no
    /// prefix at all.
    #[must_use]
    pub fn localized_path(&self, path: &str, target: Locale) -> String {
        let base = self.strip_locale(path);
        if target == self.default_locale {
            return base;
        }
        if base == "/" {
            format!("/{target}")
        } else {
            format!("/{target}{base}")
        }
    }

    /// The canonical URL of `path` in every supported locale.
    #[must_use]
    pub fn alternates(&self, path: &str) -> Vec<(Locale, String)> {
        self.supported
            .iter()
            .map(|&locale| (locale, self.localized_path(path, locale)))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings() {
        let settings = LocaleSettings::parse("en, es", "en").unwrap();
        assert_eq!(settings.supported(), &[Locale::En, Locale::Es]);
        assert_eq!(settings.default_locale(), Locale::En);
    }

    #[test]
    fn test_parse_settings_errors() {
        assert_eq!(
            LocaleSettings::parse("en,fr", "en"),
            Err(LocaleError::Unknown("fr".to_owned()))
        );
        assert_eq!(LocaleSettings::parse("", "en"), Err(LocaleError::NoLocales));
        assert_eq!(
            LocaleSettings::parse("es,hi", "en"),
            Err(LocaleError::DefaultNotSupported(Locale::En))
        );
    }

    #[test]
    fn test_locale_segment() {
        let settings = LocaleSettings::default();
        assert_eq!(settings.locale_segment("/es/about"), Some(Locale::Es));
        assert_eq!(settings.locale_segment("/hi"), Some(Locale::Hi));
        assert_eq!(settings.locale_segment("/en/"), Some(Locale::En));
        assert_eq!(settings.locale_segment("/espresso"), None);
        assert_eq!(settings.locale_segment("/about/es"), None);
        assert_eq!(settings.locale_segment("/"), None);
        assert_eq!(settings.locale_segment(""), None);
    }

    #[test]
    fn test_locale_segment_respects_supported_list() {
        let settings = LocaleSettings::new(vec![Locale::En, Locale::Es], Locale::En).unwrap();
        assert_eq!(settings.locale_segment("/hi/about"), None);
    }

    #[test]
    fn test_strip_locale() {
        let settings = LocaleSettings::default();
        assert_eq!(settings.strip_locale("/en/about"), "/about");
        assert_eq!(settings.strip_locale("/en"), "/");
        assert_eq!(settings.strip_locale("/es/"), "/");
        assert_eq!(settings.strip_locale("/about"), "/about");
    }

    #[test]
    fn test_strip_locale_keeps_paths_same_origin() {
        let settings = LocaleSettings::default();
        assert_eq!(settings.strip_locale("/en//evil.example"), "/evil.example");
        assert_eq!(settings.strip_locale("/en/\\evil.example"), "/evil.example");
        assert_eq!(settings.strip_locale("//evil.example"), "/evil.example");
        assert_eq!(settings.strip_locale("/en///"), "/");
        assert_eq!(
            settings.localized_path("//evil.example", Locale::Es),
            "/es/evil.example"
        );
    }

    #[test]
    fn test_localized_path() {
        let settings = LocaleSettings::default();
        assert_eq!(settings.localized_path("/about", Locale::Es), "/es/about");
        assert_eq!(settings.localized_path("/es/about", Locale::Hi), "/hi/about");
        assert_eq!(settings.localized_path("/es/about", Locale::En), "/about");
        assert_eq!(settings.localized_path("/", Locale::Es), "/es");
        assert_eq!(settings.localized_path("/hi", Locale::En), "/");
    }

    #[test]
    fn test_alternates() {
        let settings = LocaleSettings::default();
        let alternates = settings.alternates("/es/contact");
        assert_eq!(
            alternates,
            vec![
                (Locale::En, "/contact".to_owned()),
                (Locale::Es, "/es/contact".to_owned()),
                (Locale::Hi, "/hi/contact".to_owned()),
            ]
        );
    }

    #[test]
    fn test_locale_serde() {
        assert_eq!(serde_json::to_string(&Locale::Hi).unwrap(), "\"hi\"");
        assert_eq!("es".parse::<Locale>(), Ok(Locale::Es));
    }
}
