//! Newsletter subscription route handlers.
//!
//! Subscriptions are acknowledged but not stored anywhere. HTMX posts get a
//! fragment that replaces the form; plain posts get a full page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::Email;

use crate::filters;
use crate::middleware::{CspNonce, HxRequest};
use crate::routes::PageChrome;
use crate::state::AppState;

/// Shown when the submitted address does not validate.
pub const INVALID_EMAIL: &str = "Please enter a valid email.";

/// Newsletter subscription form data.
#[derive(Debug, Default, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

/// Outcome of a subscription attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: String,
}

impl Acknowledgement {
    /// Validate the submitted address and build the message to show.
    #[must_use]
    pub fn for_submission(raw: &str) -> Self {
        match Email::parse(raw.trim()) {
            Ok(email) => Self {
                success: true,
                message: format!("Thank you! You are subscribed with: {email}"),
            },
            Err(e) => {
                tracing::debug!(error = %e, "Rejected newsletter address");
                Self {
                    success: false,
                    message: INVALID_EMAIL.to_string(),
                }
            }
        }
    }
}

/// Acknowledgement fragment template (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/newsletter_result.html")]
pub struct NewsletterResultTemplate {
    pub ack: Acknowledgement,
}

/// Acknowledgement page for plain form posts.
#[derive(Template, WebTemplate)]
#[template(path = "newsletter.html")]
pub struct NewsletterPageTemplate {
    pub chrome: PageChrome,
    pub ack: Acknowledgement,
}

/// Subscribe to the newsletter.
#[instrument(skip(state, session, nonce, form))]
pub async fn subscribe(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<SubscribeForm>,
) -> Response {
    let ack = Acknowledgement::for_submission(&form.email);
    if ack.success {
        tracing::info!("Newsletter subscription acknowledged");
    }

    if is_htmx {
        return NewsletterResultTemplate { ack }.into_response();
    }

    NewsletterPageTemplate {
        chrome: PageChrome::load(&state, &session, nonce).await,
        ack,
    }
    .into_response()
}
