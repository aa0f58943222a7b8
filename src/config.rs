use crate::error::{MailError, Result};
use tracing::warn;

pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";
pub const REFRESH_TOKEN_VAR: &str = "REFRESH_TOKEN";
pub const REDIRECT_URL_VAR: &str = "REDIRECT_URL";

/// Endpoint the refresh-token flow posts to. yup-oauth2 fixes it, so the
/// `token_url` field only reports it.
pub const GOOGLE_TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
pub const DEFAULT_REDIRECT_URL: &str = "https://developers.google.com/oauthplayground";
pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";

/// Credentials and endpoints needed to talk to the Gmail API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmailConfig {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,
    pub redirect_url: String,
    pub token_url: String,
    pub api_base: String,
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            access_token: String::new(),
            refresh_token: String::new(),
            redirect_url: DEFAULT_REDIRECT_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            api_base: GMAIL_API_BASE.to_string(),
        }
    }
}

impl GmailConfig {
    /// Reads credentials from the process environment.
    ///
    /// Missing variables are left empty and logged; call [`GmailConfig::validate`]
    /// (or let [`crate::GmailService::connect`] do it) to turn them into an error.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| match lookup(key) {
            Some(value) => value,
            None => {
                warn!(variable = key, "Environment variable is not set");
                String::new()
            }
        };

        Self {
            client_id: required(CLIENT_ID_VAR),
            client_secret: required(CLIENT_SECRET_VAR),
            access_token: required(ACCESS_TOKEN_VAR),
            refresh_token: required(REFRESH_TOKEN_VAR),
            redirect_url: lookup(REDIRECT_URL_VAR)
                .unwrap_or_else(|| DEFAULT_REDIRECT_URL.to_string()),
            ..Self::default()
        }
    }

    pub fn with_client(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = client_id.into();
        self.client_secret = client_secret.into();
        self
    }

    pub fn with_tokens(
        mut self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        self.access_token = access_token.into();
        self.refresh_token = refresh_token.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Checks that every value needed for a token refresh is present.
    ///
    /// The access token may be empty: it is refreshed on first use anyway.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            (CLIENT_ID_VAR, &self.client_id),
            (CLIENT_SECRET_VAR, &self.client_secret),
            (REFRESH_TOKEN_VAR, &self.refresh_token),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MailError::Configuration(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }
}
