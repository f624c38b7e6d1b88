//! Localized UI strings.
//!
//! Each locale has a dictionary of sections (`common`, `navigation`,
//! `products`, `cart`, ...) mapping keys to display text. The bundled
//! dictionaries are compiled into the binary. Entries a locale lacks are
//! filled in from the default locale's dictionary.

use std::collections::{BTreeMap, HashMap};

use emporium_core::Locale;

/// Section name to key to display text.
pub type Dictionary = BTreeMap<String, BTreeMap<String, String>>;

const EN: &str = include_str!("../content/dictionaries/en.json");
const ES: &str = include_str!("../content/dictionaries/es.json");
const HI: &str = include_str!("../content/dictionaries/hi.json");

/// Dictionaries shipped with the storefront.
pub const BUNDLED: [(Locale, &str); 3] = [(Locale::En, EN), (Locale::Es, ES), (Locale::Hi, HI)];

/// Every locale's dictionary, with default-locale fallback.
#[derive(Debug, Clone, Default)]
pub struct Dictionaries {
    fallback: Dictionary,
    by_locale: HashMap<Locale, Dictionary>,
}

impl Dictionaries {
    /// The bundled dictionaries, falling back to `default_locale`.
    #[must_use]
    pub fn bundled(default_locale: Locale) -> Self {
        Self::from_sources(default_locale, &BUNDLED)
    }

    /// Parse dictionaries from JSON sources.
    ///
    /// A source that fails to parse is logged and skipped; its locale then
    /// reads entirely from the default locale.
    #[must_use]
    pub fn from_sources(default_locale: Locale, sources: &[(Locale, &str)]) -> Self {
        let mut parsed: HashMap<Locale, Dictionary> = HashMap::with_capacity(sources.len());
        for (locale, raw) in sources {
            match serde_json::from_str::<Dictionary>(raw) {
                Ok(dictionary) => {
                    parsed.insert(*locale, dictionary);
                }
                Err(e) => {
                    tracing::warn!(%locale, error = %e, "Skipping unreadable dictionary");
                }
            }
        }

        let fallback = parsed.remove(&default_locale).unwrap_or_else(|| {
            tracing::warn!(locale = %default_locale, "No dictionary for the default locale");
            Dictionary::new()
        });

        let by_locale = parsed
            .into_iter()
            .map(|(locale, dictionary)| (locale, merge(&fallback, dictionary)))
            .collect();

        Self {
            fallback,
            by_locale,
        }
    }

    /// The dictionary for `locale`, or the default locale's if it has none.
    #[must_use]
    pub fn get(&self, locale: Locale) -> &Dictionary {
        self.by_locale.get(&locale).unwrap_or(&self.fallback)
    }

    /// A single entry, e.g. `lookup(Locale::Es, "cart", "title")`.
    #[must_use]
    pub fn lookup(&self, locale: Locale, section: &str, key: &str) -> Option<&str> {
        self.get(locale)
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }
}

/// `overlay` on top of `base`, entry by entry.
fn merge(base: &Dictionary, overlay: Dictionary) -> Dictionary {
    let mut merged = base.clone();
    for (section, entries) in overlay {
        merged.entry(section).or_default().extend(entries);
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_lookups() {
        let dictionaries = Dictionaries::bundled(Locale::En);

        assert_eq!(
            dictionaries.lookup(Locale::En, "cart", "title"),
            Some("Shopping Cart")
        );
        assert_eq!(
            dictionaries.lookup(Locale::Es, "cart", "title"),
            Some("Carrito de compras")
        );
        assert_eq!(
            dictionaries.lookup(Locale::Hi, "products", "add_to_cart"),
            Some("कार्ट में जोड़ें")
        );
        assert_eq!(dictionaries.lookup(Locale::Es, "cart", "nope"), None);
    }

    #[test]
    fn test_bundled_locales_are_complete() {
        let en: Dictionary = serde_json::from_str(EN).unwrap();
        for (locale, raw) in BUNDLED {
            let dictionary: Dictionary = serde_json::from_str(raw).unwrap();
            for (section, entries) in &en {
                for key in entries.keys() {
                    assert!(
                        dictionary.get(section).is_some_and(|s| s.contains_key(key)),
                        "{locale} is missing {section}.{key}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_missing_entries_fall_back_to_default_locale() {
        let dictionaries = Dictionaries::from_sources(
            Locale::En,
            &[
                (Locale::En, r#"{"cart": {"title": "Cart", "empty": "Empty"}}"#),
                (Locale::Es, r#"{"cart": {"title": "Carrito"}}"#),
                (Locale::Hi, "not json"),
            ],
        );

        assert_eq!(dictionaries.lookup(Locale::Es, "cart", "title"), Some("Carrito"));
        assert_eq!(dictionaries.lookup(Locale::Es, "cart", "empty"), Some("Empty"));
        assert_eq!(dictionaries.lookup(Locale::Hi, "cart", "title"), Some("Cart"));

        let empty = Dictionaries::from_sources(Locale::En, &[]);
        assert!(empty.get(Locale::Es).is_empty());
    }

    #[test]
    fn test_fallback_follows_configured_default() {
        let dictionaries = Dictionaries::from_sources(
            Locale::Es,
            &[
                (Locale::En, r#"{"cart": {"title": "Cart"}}"#),
                (Locale::Es, r#"{"cart": {"title": "Carrito", "empty": "Vacío"}}"#),
            ],
        );

        assert_eq!(dictionaries.lookup(Locale::En, "cart", "empty"), Some("Vacío"));
        assert_eq!(dictionaries.lookup(Locale::Hi, "cart", "title"), Some("Carrito"));
    }
}
