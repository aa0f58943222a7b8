//! Gmail API module split into logical submodules
//!
//! This module provides all Gmail API functionality organized into:
//! - auth: Authorization context and access token sources
//! - operations: The service handle and its send call

pub mod auth;
pub mod operations;

pub use auth::{
    AuthorizationContext, SeededTokenSource, StaticTokenSource, TokenSource, YupTokenSource,
    GMAIL_SCOPE,
};
pub use operations::{GmailService, MailTransport, ME};

// Re-export mocks for in-crate tests
#[cfg(test)]
pub use auth::MockTokenSource;
#[cfg(test)]
pub use operations::MockMailTransport;
