//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with `request_id` and `locale` fields)
//! 3. Request ID (add unique ID to each request)
//! 4. Locale routing (redirect, or tag the request with its locale)
//! 5. Session layer (tower-sessions with in-memory store)

pub mod locale;
pub mod request_id;
pub mod session;

pub use locale::{PATHNAME_HEADER, RequestLocale, locale_middleware};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
