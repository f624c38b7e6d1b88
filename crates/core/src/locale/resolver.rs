//! The locale resolution chain.

use serde::Serialize;

use super::routing::ExcludedPaths;
use super::strategy::{
    AcceptLanguageStrategy, LocaleRequest, LocaleSource, LocaleStrategy, PathSegmentStrategy,
};
use super::{Locale, LocaleSettings};

/// A resolved locale and the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub locale: Locale,
    pub source: LocaleSource,
}

/// Resolves the locale of a request from an ordered list of strategies.
///
/// The stock chain is path segment, then `Accept-Language`, then the
/// default locale. Resolution never fails.
///
/// ```
/// use emporium_core::locale::{LocaleRequest, LocaleResolver, LocaleSource};
/// use emporium_core::{Locale, LocaleSettings};
///
/// let resolver = LocaleResolver::new(LocaleSettings::default());
/// let found = resolver.resolve(&LocaleRequest::new("/about", Some("es-ES,en;q=0.8")));
/// assert_eq!(found.locale, Locale::Es);
/// assert_eq!(found.source, LocaleSource::AcceptLanguage);
/// ```
#[derive(Debug)]
pub struct LocaleResolver {
    settings: LocaleSettings,
    strategies: Vec<Box<dyn LocaleStrategy>>,
    excluded: ExcludedPaths,
}

impl LocaleResolver {
    /// A resolver with the stock strategy chain and path exclusions.
    #[must_use]
    pub fn new(settings: LocaleSettings) -> Self {
        Self {
            settings,
            strategies: vec![
                Box::new(PathSegmentStrategy),
                Box::new(AcceptLanguageStrategy),
            ],
            excluded: ExcludedPaths::default(),
        }
    }

    /// A resolver that only consults the given strategies, in order.
    #[must_use]
    pub fn with_strategies(settings: LocaleSettings, strategies: Vec<Box<dyn LocaleStrategy>>) -> Self {
        Self {
            settings,
            strategies,
            excluded: ExcludedPaths::default(),
        }
    }

    /// Append a strategy to the end of the chain (before the default).
    #[must_use]
    pub fn push_strategy(mut self, strategy: impl LocaleStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Replace the set of paths that bypass locale handling.
    #[must_use]
    pub fn with_excluded(mut self, excluded: ExcludedPaths) -> Self {
        self.excluded = excluded;
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &LocaleSettings {
        &self.settings
    }

    #[must_use]
    pub const fn excluded(&self) -> &ExcludedPaths {
        &self.excluded
    }

    /// Run the chain; first strategy to name a locale wins.
    #[must_use]
    pub fn resolve(&self, request: &LocaleRequest<'_>) -> Resolution {
        self.strategies
            .iter()
            .find_map(|strategy| {
                strategy
                    .resolve(request, &self.settings)
                    .map(|locale| Resolution {
                        locale,
                        source: strategy.source(),
                    })
            })
            .unwrap_or(Resolution {
                locale: self.settings.default_locale(),
                source: LocaleSource::Default,
            })
    }
}

impl Default for LocaleResolver {
    fn default() -> Self {
        Self::new(LocaleSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always names the same locale, the way a saved-preference cookie would.
    #[derive(Debug)]
    struct FixedStrategy(Locale);

    impl LocaleStrategy for FixedStrategy {
        fn source(&self) -> LocaleSource {
            LocaleSource::Custom("fixed")
        }

        fn resolve(&self, _: &LocaleRequest<'_>, settings: &LocaleSettings) -> Option<Locale> {
            settings.find(self.0.code())
        }
    }

    #[test]
    fn test_path_beats_header() {
        let resolver = LocaleResolver::default();
        let found = resolver.resolve(&LocaleRequest::new("/hi/about", Some("es")));
        assert_eq!(found.locale, Locale::Hi);
        assert_eq!(found.source, LocaleSource::Path);
    }

    #[test]
    fn test_falls_back_to_default() {
        let resolver = LocaleResolver::default();
        let found = resolver.resolve(&LocaleRequest::new("/about", Some("fr-FR,de")));
        assert_eq!(found.locale, Locale::En);
        assert_eq!(found.source, LocaleSource::Default);

        let found = resolver.resolve(&LocaleRequest::new("/about", None));
        assert_eq!(found.source, LocaleSource::Default);
    }

    #[test]
    fn test_custom_strategy_runs_after_builtins() {
        let resolver = LocaleResolver::default().push_strategy(FixedStrategy(Locale::Hi));

        let found = resolver.resolve(&LocaleRequest::new("/about", Some("es")));
        assert_eq!(found.source, LocaleSource::AcceptLanguage);

        let found = resolver.resolve(&LocaleRequest::new("/about", None));
        assert_eq!(found.locale, Locale::Hi);
        assert_eq!(found.source, LocaleSource::Custom("fixed"));
    }

    #[test]
    fn test_empty_chain_always_defaults() {
        let settings = LocaleSettings::new(vec![Locale::Es, Locale::En], Locale::Es);
        let Ok(settings) = settings else {
            panic!("valid settings");
        };
        let resolver = LocaleResolver::with_strategies(settings, Vec::new());
        let found = resolver.resolve(&LocaleRequest::new("/en/about", Some("en")));
        assert_eq!(found.locale, Locale::Es);
    }
}
