//! Stripe Checkout Sessions client.
//!
//! Checkout is delegated entirely to Stripe's hosted payment page: the API
//! assembles line items, creates a session over the form-encoded REST API,
//! and hands the opaque session id back to the client. There is no webhook
//! handling, no retry, and no reconciliation; a failure surfaces directly
//! to the caller.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use pomelo_core::cart::CheckoutLineItem;

use crate::config::StripeConfig;

/// Errors that can occur when creating a checkout session.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe rejected the request.
    #[error("Stripe API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by Stripe.
        status: u16,
        /// Stripe's error message.
        message: String,
    },

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A created checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Opaque session identifier (`cs_...`), redirect-able by the client SDK.
    pub id: String,
}

/// Shape of Stripe error response bodies.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Client for the Stripe Checkout Sessions API.
#[derive(Clone)]
pub struct CheckoutClient {
    inner: Arc<CheckoutClientInner>,
}

struct CheckoutClientInner {
    client: reqwest::Client,
    endpoint: String,
    secret_key: SecretString,
    success_url: String,
    cancel_url: String,
}

impl CheckoutClient {
    /// Create a new checkout client.
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        let endpoint = format!(
            "{}/v1/checkout/sessions",
            config.api_base.trim_end_matches('/')
        );

        Self {
            inner: Arc::new(CheckoutClientInner {
                client: reqwest::Client::new(),
                endpoint,
                secret_key: config.secret_key.clone(),
                success_url: config.success_url.clone(),
                cancel_url: config.cancel_url.clone(),
            }),
        }
    }

    /// Create a hosted checkout session for the given line items.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Http` on transport failure and
    /// `StripeError::Api` when Stripe rejects the request.
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn create_session(
        &self,
        items: &[CheckoutLineItem],
    ) -> Result<CheckoutSession, StripeError> {
        let form = session_form(items, &self.inner.success_url, &self.inner.cancel_url);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .bearer_auth(self.inner.secret_key.expose_secret())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            tracing::error!(status = %status, %message, "Stripe session creation failed");
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: CheckoutSession = serde_json::from_str(&body)?;
        tracing::debug!(session_id = %session.id, "checkout session created");
        Ok(session)
    }
}

/// Build the form-encoded parameter list for a session creation request.
///
/// Stripe's nested parameter syntax wants indexed bracket keys, e.g.
/// `line_items[0][price_data][unit_amount]`.
fn session_form(
    items: &[CheckoutLineItem],
    success_url: &str,
    cancel_url: &str,
) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_owned(), "payment".to_owned()),
        ("payment_method_types[0]".to_owned(), "card".to_owned()),
        ("success_url".to_owned(), success_url.to_owned()),
        ("cancel_url".to_owned(), cancel_url.to_owned()),
    ];

    for (i, item) in items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        form.push((
            format!("{prefix}[price_data][currency]"),
            item.currency.to_string(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][name]"),
            item.name.clone(),
        ));
        form.push((
            format!("{prefix}[price_data][product_data][images][0]"),
            item.image_url.clone(),
        ));
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
    }

    form
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pomelo_core::CurrencyCode;

    use super::*;

    fn item(name: &str, unit_amount: i64, quantity: u32) -> CheckoutLineItem {
        CheckoutLineItem {
            name: name.to_owned(),
            image_url: format!("http://localhost:8000/images/{name}.jpg"),
            unit_amount,
            currency: CurrencyCode::Zar,
            quantity,
        }
    }

    fn lookup<'a>(form: &'a [(String, String)], key: &str) -> &'a str {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn form_carries_session_mode_and_urls() {
        let form = session_form(&[item("kettle", 5000, 2)], "http://s/success", "http://s/cancel");

        assert_eq!(lookup(&form, "mode"), "payment");
        assert_eq!(lookup(&form, "payment_method_types[0]"), "card");
        assert_eq!(lookup(&form, "success_url"), "http://s/success");
        assert_eq!(lookup(&form, "cancel_url"), "http://s/cancel");
    }

    #[test]
    fn form_indexes_line_items() {
        let items = [item("kettle", 5000, 2), item("mug", 999, 1)];
        let form = session_form(&items, "http://s/success", "http://s/cancel");

        assert_eq!(
            lookup(&form, "line_items[0][price_data][product_data][name]"),
            "kettle"
        );
        assert_eq!(lookup(&form, "line_items[0][price_data][unit_amount]"), "5000");
        assert_eq!(lookup(&form, "line_items[0][quantity]"), "2");
        assert_eq!(lookup(&form, "line_items[0][price_data][currency]"), "zar");
        assert_eq!(
            lookup(&form, "line_items[1][price_data][product_data][name]"),
            "mug"
        );
        assert_eq!(lookup(&form, "line_items[1][quantity]"), "1");
        assert_eq!(
            lookup(&form, "line_items[1][price_data][product_data][images][0]"),
            "http://localhost:8000/images/mug.jpg"
        );
    }

    #[test]
    fn error_body_parses_stripe_shape() {
        let body = r#"{"error": {"message": "Invalid currency: xyz", "type": "invalid_request_error"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message.as_deref(), Some("Invalid currency: xyz"));
    }
}
