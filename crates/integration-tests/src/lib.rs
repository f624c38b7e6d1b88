//! Integration tests for the Emporium storefront.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`;
//! no server or network is involved. A [`TestContext`] plays the part of one
//! browser: it remembers the session cookie between requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p emporium-integration-tests
//! ```

use std::str::FromStr;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use emporium_storefront::catalog::{Catalog, CatalogError, Product};
use emporium_storefront::config::{ConfigError, StorefrontConfig};
use emporium_storefront::state::AppState;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Errors setting up a test context.
#[derive(Debug)]
pub enum SetupError {
    Config(ConfigError),
    Catalog(CatalogError),
    Json(serde_json::Error),
}

impl From<ConfigError> for SetupError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<CatalogError> for SetupError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<serde_json::Error> for SetupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// A small catalog with predictable prices.
///
/// - `lamp`: 10.00, untracked stock, category `lighting`
/// - `chair`: 150.00, untracked stock, category `furniture`
/// - `rug`: 50.00, untracked stock, category `furniture`
/// - `vase`: 25.00, one unit left, no backorders
#[must_use]
pub fn test_products() -> Value {
    json!([
        {"id": "lamp", "title": "Desk Lamp", "slug": "desk-lamp", "price": "10.00", "category": "lighting"},
        {"id": "chair", "title": "Chair", "slug": "chair", "price": "150.00", "category": "furniture"},
        {"id": "rug", "title": "Rug", "slug": "rug", "price": "50.00", "category": "furniture"},
        {
            "id": "vase", "title": "Vase", "slug": "vase", "price": "25.00",
            "inventory": {"track_quantity": true, "quantity": 1, "allow_backorder": false}
        }
    ])
}

/// A response with its body decoded as JSON (`Value::Null` when empty,
/// `Value::String` when not JSON).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// A header value as text, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One client session against an in-process storefront.
pub struct TestContext {
    app: Router,
    cookie: Option<String>,
}

impl TestContext {
    /// A storefront with the default locales (`en`, `es`, `hi`; default `en`)
    /// and [`test_products`].
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture configuration or catalog is invalid.
    pub fn new() -> Result<Self, SetupError> {
        Self::with_env(&[])
    }

    /// Like [`TestContext::new`], with extra environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or catalog is invalid.
    pub fn with_env(vars: &[(&str, &str)]) -> Result<Self, SetupError> {
        let defaults = [("STOREFRONT_BASE_URL", "http://localhost:3000")];
        let config = StorefrontConfig::from_lookup(|key| {
            vars.iter()
                .chain(defaults.iter())
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        })?;
        let products: Vec<Product> = serde_json::from_value(test_products())?;
        let catalog = Catalog::from_products(products)?;

        Ok(Self {
            app: emporium_storefront::app(AppState::new(config, catalog)),
            cookie: None,
        })
    }

    /// A second browser against the same server, without this one's cookie.
    #[must_use]
    pub fn fresh_client(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// Send a request, carrying and updating the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    #[allow(clippy::unwrap_used)]
    pub async fn send(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();

        let session_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        if session_cookie.is_some() {
            self.cookie = session_cookie;
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, &[]).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), &[]).await
    }

    pub async fn patch(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body), &[]).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, &[]).await
    }

    /// Add `quantity` of `product_id` to the cart.
    pub async fn add_to_cart(&mut self, product_id: &str, quantity: u32) -> TestResponse {
        self.post(
            "/api/cart/items",
            json!({"product_id": product_id, "quantity": quantity}),
        )
        .await
    }
}

/// Decode a decimal serialized as a JSON string.
///
/// # Panics
///
/// Panics if `value` is not a decimal string.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

/// A complete checkout payload with the billing address same as shipping.
#[must_use]
pub fn checkout_payload() -> Value {
    json!({
        "customer": {
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace"
        },
        "shipping_address": {
            "street": "12 Analytical Way",
            "city": "London",
            "state": "Greater London",
            "postal_code": "N1 9GU",
            "country": "GB"
        },
        "payment_method": "credit_card"
    })
}
