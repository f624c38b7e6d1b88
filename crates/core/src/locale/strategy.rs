//! Locale resolution strategies.
//!
//! Each strategy looks at one signal in the request and either names a
//! supported locale or passes. [`super::LocaleResolver`] tries them in order
//! and falls back to the default locale when all of them pass.

use core::fmt;

use serde::Serialize;

use super::{Locale, LocaleSettings};

/// The parts of an incoming request that locale resolution looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleRequest<'a> {
    pub path: &'a str,
    pub accept_language: Option<&'a str>,
}

impl<'a> LocaleRequest<'a> {
    #[must_use]
    pub const fn new(path: &'a str, accept_language: Option<&'a str>) -> Self {
        Self {
            path,
            accept_language,
        }
    }
}

/// Where a resolved locale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleSource {
    Path,
    AcceptLanguage,
    Default,
    /// A strategy outside this crate, identified by name.
    Custom(&'static str),
}

/// One step in the resolution chain.
pub trait LocaleStrategy: fmt::Debug + Send + Sync {
    /// Label reported alongside locales this strategy resolves.
    fn source(&self) -> LocaleSource;

    /// A supported locale, or `None` to defer to the next strategy.
    fn resolve(&self, request: &LocaleRequest<'_>, settings: &LocaleSettings) -> Option<Locale>;
}

/// Uses the first path segment when it is a supported locale code.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSegmentStrategy;

impl LocaleStrategy for PathSegmentStrategy {
    fn source(&self) -> LocaleSource {
        LocaleSource::Path
    }

    fn resolve(&self, request: &LocaleRequest<'_>, settings: &LocaleSettings) -> Option<Locale> {
        settings.locale_segment(request.path)
    }
}

/// Uses the first `Accept-Language` entry whose primary subtag is supported.
///
/// Entries are taken in header order; quality values are stripped, not
/// ranked. Malformed entries simply fail to match.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptLanguageStrategy;

impl LocaleStrategy for AcceptLanguageStrategy {
    fn source(&self) -> LocaleSource {
        LocaleSource::AcceptLanguage
    }

    fn resolve(&self, request: &LocaleRequest<'_>, settings: &LocaleSettings) -> Option<Locale> {
        let header = request.accept_language?;
        primary_subtags(header).find_map(|subtag| {
            settings
                .supported()
                .iter()
                .copied()
                .find(|locale| locale.code().eq_ignore_ascii_case(subtag))
        })
    }
}

/// Primary language subtags of an `Accept-Language` value, in header order.
///
/// `es-ES,en;q=0.8` yields `es`, `en`.
pub fn primary_subtags(header: &str) -> impl Iterator<Item = &str> {
    header.split(',').filter_map(|entry| {
        let tag = entry.split(';').next().unwrap_or("").trim();
        let primary = tag.split('-').next().unwrap_or("").trim();
        (!primary.is_empty()).then_some(primary)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(value: &str) -> Option<Locale> {
        AcceptLanguageStrategy.resolve(
            &LocaleRequest::new("/", Some(value)),
            &LocaleSettings::default(),
        )
    }

    #[test]
    fn test_primary_subtags() {
        let tags: Vec<_> = primary_subtags("es-ES, en;q=0.8 ,, *;q=0.1").collect();
        assert_eq!(tags, ["es", "en", "*"]);
    }

    #[test]
    fn test_accept_language_first_supported_wins() {
        assert_eq!(header("es-ES,en;q=0.8"), Some(Locale::Es));
        assert_eq!(header("fr-FR,hi;q=0.9,es;q=0.8"), Some(Locale::Hi));
        assert_eq!(header("EN-us"), Some(Locale::En));
    }

    #[test]
    fn test_accept_language_header_order_not_quality() {
        assert_eq!(header("en;q=0.1,es;q=0.9"), Some(Locale::En));
    }

    #[test]
    fn test_accept_language_skips_garbage() {
        assert_eq!(header(";;;,==,-,q=1;es"), None);
        assert_eq!(header("de, ,;q=0.5, es"), Some(Locale::Es));
        assert_eq!(header(""), None);
    }

    #[test]
    fn test_path_segment_strategy() {
        let settings = LocaleSettings::default();
        let found = PathSegmentStrategy.resolve(&LocaleRequest::new("/hi/contact", None), &settings);
        assert_eq!(found, Some(Locale::Hi));
        let missing = PathSegmentStrategy.resolve(&LocaleRequest::new("/contact", None), &settings);
        assert_eq!(missing, None);
    }
}
