//! Locale routing middleware.
//!
//! Runs [`LocaleResolver::route`] for every request. Redirects are answered
//! here with `307 Temporary Redirect` (query string preserved). Served
//! requests carry a [`RequestLocale`] extension for handlers and get an
//! `x-pathname` response header. Everything else passes through untouched.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header::ACCEPT_LANGUAGE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use emporium_core::{Locale, RouteDecision};
use tracing::Span;

use crate::error::AppError;
use crate::state::AppState;

/// Response header exposing the path the locale was resolved for.
pub const PATHNAME_HEADER: &str = "x-pathname";

/// The locale a page request is being served in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale {
    pub locale: Locale,
    /// The request path as served, including any locale segment.
    pub pathname: String,
}

/// Middleware that redirects, annotates or passes through each request.
pub async fn locale_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|h| h.to_str().ok());

    match state.locale().route(&path, accept_language) {
        RouteDecision::Passthrough => next.run(request).await,
        RouteDecision::Redirect { location } => {
            let location = match request.uri().query() {
                Some(query) => format!("{location}?{query}"),
                None => location,
            };
            tracing::debug!(from = %path, to = %location, "Locale redirect");
            Redirect::temporary(&location).into_response()
        }
        RouteDecision::Serve { locale, pathname } => {
            Span::current().record("locale", locale.code());

            let header = HeaderValue::from_str(&pathname).ok();
            request
                .extensions_mut()
                .insert(RequestLocale { locale, pathname });

            let mut response = next.run(request).await;
            if let Some(value) = header {
                response.headers_mut().insert(PATHNAME_HEADER, value);
            }
            response
        }
    }
}

/// Extractor for the locale resolved by [`locale_middleware`].
///
/// Only page requests carry one; anything else is treated as not found.
impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::NotFound(parts.uri.path().to_owned()))
    }
}
