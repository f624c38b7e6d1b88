//! Localized page shells.
//!
//! Every path not claimed by another route lands here. The locale
//! middleware has already redirected or annotated the request; this handler
//! describes the page in the resolved locale along with its translations
//! and the UI strings for that locale.

use axum::{Json, extract::State};
use emporium_core::Locale;
use serde::Serialize;
use tracing::instrument;

use crate::dictionary::Dictionary;
use crate::middleware::RequestLocale;
use crate::state::AppState;

/// A translation of the current page.
#[derive(Debug, Clone, Serialize)]
pub struct Alternate {
    pub locale: Locale,
    pub name: &'static str,
    pub href: String,
}

/// Page shell data.
#[derive(Debug, Clone, Serialize)]
pub struct PageShell {
    pub locale: Locale,
    /// The path as requested, including any locale segment.
    pub pathname: String,
    /// The path with the locale segment removed.
    pub path: String,
    pub alternates: Vec<Alternate>,
    /// UI strings in `locale`.
    pub dictionary: Dictionary,
}

/// Describe the page at the requested path.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, request_locale: RequestLocale) -> Json<PageShell> {
    let settings = state.locale().settings();
    let RequestLocale { locale, pathname } = request_locale;

    let alternates = settings
        .alternates(&pathname)
        .into_iter()
        .map(|(locale, href)| Alternate {
            locale,
            name: locale.native_name(),
            href,
        })
        .collect();

    Json(PageShell {
        locale,
        path: settings.strip_locale(&pathname),
        pathname,
        alternates,
        dictionary: state.dictionaries().get(locale).clone(),
    })
}
