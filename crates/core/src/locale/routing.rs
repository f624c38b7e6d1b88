//! The per-request redirect/serve decision.
//!
//! The HTTP layer calls [`LocaleResolver::route`] for every request and acts
//! on the returned [`RouteDecision`].

use super::resolver::LocaleResolver;
use super::strategy::LocaleRequest;
use super::Locale;

/// Paths that bypass locale handling entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedPaths {
    prefixes: Vec<String>,
    skip_dotted: bool,
}

impl Default for ExcludedPaths {
    /// API routes, static assets, the admin area and health checks, plus any
    /// path containing a `.` (files such as `/favicon.ico`).
    fn default() -> Self {
        Self {
            prefixes: ["/api/", "/static/", "/admin", "/health"]
                .into_iter()
                .map(String::from)
                .collect(),
            skip_dotted: true,
        }
    }
}

impl ExcludedPaths {
    /// Exclude exactly `prefixes`, plus dotted paths when `skip_dotted`.
    #[must_use]
    pub fn new(prefixes: impl IntoIterator<Item = impl Into<String>>, skip_dotted: bool) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            skip_dotted,
        }
    }

    /// Whether `path` bypasses locale handling.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        (self.skip_dotted && path.contains('.'))
            || self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// What the HTTP layer should do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Not a localized page; hand it on untouched.
    Passthrough,
    /// Serve the request as-is in `locale`, exposing `pathname` downstream.
    Serve { locale: Locale, pathname: String },
    /// Send the client to `location` instead.
    Redirect { location: String },
}

impl LocaleResolver {
    /// Decide how to handle a request for `path`.
    ///
    /// - Excluded paths pass through.
    /// - No locale segment: serve when the resolved locale is the default,
    ///   otherwise redirect to the prefixed path.
    /// - Default locale segment: redirect to the path without it.
    /// - Any other locale segment: serve.
    #[must_use]
    pub fn route(&self, path: &str, accept_language: Option<&str>) -> RouteDecision {
        if self.excluded().matches(path) {
            return RouteDecision::Passthrough;
        }

        let settings = self.settings();
        let default_locale = settings.default_locale();

        match settings.locale_segment(path) {
            Some(locale) if locale == default_locale => RouteDecision::Redirect {
                location: settings.strip_locale(path),
            },
            Some(locale) => RouteDecision::Serve {
                locale,
                pathname: path.to_owned(),
            },
            None => {
                let resolution = self.resolve(&LocaleRequest::new(path, accept_language));
                if resolution.locale == default_locale {
                    RouteDecision::Serve {
                        locale: default_locale,
                        pathname: path.to_owned(),
                    }
                } else {
                    RouteDecision::Redirect {
                        location: settings.localized_path(path, resolution.locale),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleSettings;

    fn route(path: &str, header: Option<&str>) -> RouteDecision {
        LocaleResolver::default().route(path, header)
    }

    fn redirect(location: &str) -> RouteDecision {
        RouteDecision::Redirect {
            location: location.to_owned(),
        }
    }

    #[test]
    fn test_locale_prefixed_path_is_served() {
        assert_eq!(
            route("/es/about", Some("hi")),
            RouteDecision::Serve {
                locale: Locale::Es,
                pathname: "/es/about".to_owned()
            }
        );
    }

    #[test]
    fn test_header_locale_redirects_to_prefix() {
        assert_eq!(route("/about", Some("es-ES,en;q=0.8")), redirect("/es/about"));
        assert_eq!(route("/", Some("hi")), redirect("/hi"));
    }

    #[test]
    fn test_default_locale_prefix_is_stripped() {
        assert_eq!(route("/en/about", None), redirect("/about"));
        assert_eq!(route("/en", Some("es")), redirect("/"));
        assert_eq!(route("/en/", None), redirect("/"));
    }

    #[test]
    fn test_default_locale_redirect_stays_on_origin() {
        assert_eq!(route("/en//localhost:8080", None), redirect("/localhost:8080"));
        assert_eq!(route("/en/\\localhost:8080", None), redirect("/localhost:8080"));
        assert_eq!(route("//localhost:8080", Some("es")), redirect("/es/localhost:8080"));
    }

    #[test]
    fn test_default_locale_served_without_prefix() {
        assert_eq!(
            route("/about", Some("en-GB")),
            RouteDecision::Serve {
                locale: Locale::En,
                pathname: "/about".to_owned()
            }
        );
        assert_eq!(
            route("/about", None),
            RouteDecision::Serve {
                locale: Locale::En,
                pathname: "/about".to_owned()
            }
        );
    }

    #[test]
    fn test_excluded_paths_pass_through() {
        assert_eq!(route("/api/pages", Some("es")), RouteDecision::Passthrough);
        assert_eq!(route("/static/app.css", Some("es")), RouteDecision::Passthrough);
        assert_eq!(route("/admin", Some("es")), RouteDecision::Passthrough);
        assert_eq!(route("/favicon.ico", Some("es")), RouteDecision::Passthrough);
        assert_eq!(route("/health/ready", Some("es")), RouteDecision::Passthrough);
    }

    #[test]
    fn test_unsupported_prefix_is_not_a_locale() {
        let settings = LocaleSettings::new(vec![Locale::En, Locale::Es], Locale::En);
        let Ok(settings) = settings else {
            panic!("valid settings");
        };
        let resolver = LocaleResolver::new(settings);
        assert_eq!(resolver.route("/hi/about", Some("hi")), RouteDecision::Serve {
            locale: Locale::En,
            pathname: "/hi/about".to_owned()
        });
    }

    #[test]
    fn test_custom_exclusions() {
        let resolver =
            LocaleResolver::default().with_excluded(ExcludedPaths::new(["/webhooks"], false));
        assert_eq!(resolver.route("/webhooks/stripe", Some("es")), RouteDecision::Passthrough);
        assert_eq!(resolver.route("/robots.txt", Some("es")), redirect("/es/robots.txt"));
    }
}
