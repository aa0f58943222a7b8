use crate::config::GmailConfig;
use crate::error::{MailError, Result};
use crate::gmail_api::auth::{AuthorizationContext, TokenSource};
use crate::types::{ApiErrorResponse, RawMessage, SentMessage};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// The authenticated account, as the Gmail API names it.
pub const ME: &str = "me";

// Define a trait for the send call so senders can run against a stub
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Submits an already base64url-encoded RFC 2822 message.
    async fn send_message(&self, user_id: &str, raw: &str) -> Result<SentMessage>;
}

/// Handle to the Gmail API for one authorized account.
///
/// Cloning is cheap and clones share the HTTP connection pool and token
/// cache, so one handle can serve concurrent senders.
#[derive(Clone)]
pub struct GmailService {
    client: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    api_base: String,
}

impl GmailService {
    pub fn new(client: reqwest::Client, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client,
            tokens,
            api_base: crate::config::GMAIL_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Validates `config`, sets up token refresh and returns a ready handle.
    pub async fn connect(config: &GmailConfig) -> Result<Self> {
        config.validate()?;

        let tokens = AuthorizationContext::from_config(config)
            .into_token_source()
            .await?;
        let service = Self::new(reqwest::Client::new(), Arc::new(tokens))
            .with_api_base(config.api_base.as_str());

        info!("Email service is initialized");
        Ok(service)
    }

    fn send_url(&self, user_id: &str) -> String {
        format!(
            "{}/gmail/v1/users/{}/messages/send",
            self.api_base, user_id
        )
    }
}

#[async_trait]
impl MailTransport for GmailService {
    async fn send_message(&self, user_id: &str, raw: &str) -> Result<SentMessage> {
        let token = self.tokens.access_token().await?;
        let request_body = RawMessage {
            raw: raw.to_string(),
        };

        debug!(user_id, payload_len = raw.len(), "Sending message");
        let response = self
            .client
            .post(self.send_url(user_id))
            .bearer_auth(&token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let sent: SentMessage = response.json().await?;
            Ok(sent)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ApiErrorResponse>(&error_text)
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or(error_text);
            Err(MailError::send_error(Some(status.as_u16()), message))
        }
    }
}
