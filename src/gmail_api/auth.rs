use crate::config::GmailConfig;
use crate::error::{MailError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::authorized_user::AuthorizedUserSecret;
use yup_oauth2::AuthorizedUserAuthenticator;

pub const GMAIL_SCOPE: &str = "https://mail.google.com/";
pub const BEARER: &str = "Bearer";

// Seeded tokens are treated as expired this long before their expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Everything needed to obtain access tokens for one Gmail account.
#[derive(Debug, Clone)]
pub struct AuthorizationContext {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub redirect_url: String,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expiry: DateTime<Utc>,
}

impl AuthorizationContext {
    /// The seeded access token expires immediately, so the first request
    /// always goes through a refresh.
    pub fn from_config(config: &GmailConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url: config.token_url.clone(),
            redirect_url: config.redirect_url.clone(),
            access_token: config.access_token.clone(),
            refresh_token: config.refresh_token.clone(),
            token_type: BEARER.to_string(),
            expiry: Utc::now(),
        }
    }

    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = expiry;
        self
    }

    /// True when the seeded access token can still be sent as-is.
    pub fn has_fresh_access_token(&self) -> bool {
        !self.access_token.is_empty()
            && Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expiry
    }

    /// Consumes the context and builds a refreshing token source from it.
    pub async fn into_token_source(self) -> Result<SeededTokenSource<YupTokenSource>> {
        debug!(token_url = %self.token_url, "Building refresh token authenticator");
        let secret = AuthorizedUserSecret {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            refresh_token: self.refresh_token.clone(),
            key_type: "authorized_user".to_string(),
        };
        let authenticator = AuthorizedUserAuthenticator::builder(secret)
            .build()
            .await
            .map_err(|e| MailError::Auth(format!("unable to build authenticator: {}", e)))?;

        Ok(SeededTokenSource::new(self, YupTokenSource::new(authenticator)))
    }
}

// Define a trait for token retrieval to allow mocking
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Returns an access token valid for the Gmail API.
    async fn access_token(&self) -> Result<String>;
}

/// Token source backed by a `yup-oauth2` authenticator, which caches tokens
/// and refreshes them when they expire.
pub struct YupTokenSource {
    authenticator: DefaultAuthenticator,
    scopes: Vec<String>,
}

impl YupTokenSource {
    pub fn new(authenticator: DefaultAuthenticator) -> Self {
        Self {
            authenticator,
            scopes: vec![GMAIL_SCOPE.to_string()],
        }
    }
}

#[async_trait]
impl TokenSource for YupTokenSource {
    async fn access_token(&self) -> Result<String> {
        let scopes_refs: Vec<&str> = self.scopes.iter().map(|s| s.as_str()).collect();
        let token = self
            .authenticator
            .token(&scopes_refs)
            .await
            .map_err(|e| MailError::Auth(e.to_string()))?;

        match token.token() {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(MailError::Auth("provider returned no access token".into())),
        }
    }
}

/// Serves the access token from the authorization context while it is
/// fresh, then defers to `inner`.
pub struct SeededTokenSource<S> {
    context: AuthorizationContext,
    inner: S,
}

impl<S: TokenSource> SeededTokenSource<S> {
    pub fn new(context: AuthorizationContext, inner: S) -> Self {
        Self { context, inner }
    }
}

#[async_trait]
impl<S: TokenSource> TokenSource for SeededTokenSource<S> {
    async fn access_token(&self) -> Result<String> {
        if self.context.has_fresh_access_token() {
            return Ok(self.context.access_token.clone());
        }
        debug!("Seeded access token expired, asking token source for a new one");
        self.inner.access_token().await
    }
}

/// Fixed token, for callers that manage tokens themselves.
#[derive(Debug, Clone)]
pub struct StaticTokenSource(String);

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> AuthorizationContext {
        let config = GmailConfig::default()
            .with_client("client-id", "client-secret")
            .with_tokens("seeded-access", "refresh");
        AuthorizationContext::from_config(&config)
    }

    #[test]
    fn test_context_from_config() {
        let ctx = context();
        assert_eq!(ctx.client_id, "client-id");
        assert_eq!(ctx.client_secret, "client-secret");
        assert_eq!(ctx.refresh_token, "refresh");
        assert_eq!(ctx.token_type, "Bearer");
        assert_eq!(ctx.redirect_url, crate::config::DEFAULT_REDIRECT_URL);
        // the endpoint yup-oauth2's authorized-user flow posts to
        assert_eq!(ctx.token_url, "https://accounts.google.com/o/oauth2/token");
        // seeded with expiry = now, so it is already stale
        assert!(!ctx.has_fresh_access_token());
    }

    #[test]
    fn test_fresh_access_token() {
        let ctx = context().with_expiry(Utc::now() + Duration::hours(1));
        assert!(ctx.has_fresh_access_token());

        let within_margin = context().with_expiry(Utc::now() + Duration::seconds(30));
        assert!(!within_margin.has_fresh_access_token());
    }

    #[test]
    fn test_empty_access_token_is_never_fresh() {
        let mut ctx = context().with_expiry(Utc::now() + Duration::hours(1));
        ctx.access_token.clear();
        assert!(!ctx.has_fresh_access_token());
    }

    #[tokio::test]
    async fn test_seeded_source_uses_fresh_seed() {
        let mut inner = MockTokenSource::new();
        inner.expect_access_token().times(0);

        let source = SeededTokenSource::new(
            context().with_expiry(Utc::now() + Duration::hours(1)),
            inner,
        );

        assert_eq!(source.access_token().await.unwrap(), "seeded-access");
    }

    #[tokio::test]
    async fn test_seeded_source_refreshes_stale_seed() {
        let mut inner = MockTokenSource::new();
        inner
            .expect_access_token()
            .times(1)
            .returning(|| Ok("refreshed".to_string()));

        let source = SeededTokenSource::new(context(), inner);

        assert_eq!(source.access_token().await.unwrap(), "refreshed");
    }

    #[tokio::test]
    async fn test_seeded_source_propagates_refresh_failure() {
        let mut inner = MockTokenSource::new();
        inner
            .expect_access_token()
            .returning(|| Err(MailError::Auth("invalid_grant".into())));

        let source = SeededTokenSource::new(context(), inner);

        assert!(matches!(
            source.access_token().await,
            Err(MailError::Auth(msg)) if msg == "invalid_grant"
        ));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticTokenSource::new("abc");
        assert_eq!(source.access_token().await.unwrap(), "abc");
    }
}
