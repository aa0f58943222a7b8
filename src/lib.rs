//! Send plain-text and attachment-bearing email through the Gmail API.
//!
//! ```ignore
//! use gmailer::{GmailConfig, GmailService, Mailer};
//! use std::sync::Arc;
//!
//! let service = GmailService::connect(&GmailConfig::from_env()).await?;
//! let mailer = Mailer::new(Arc::new(service));
//!
//! mailer
//!     .send_with_attachment("a@b.com", "Report", "See attached.", "reports", "q3.pdf")
//!     .await?;
//! ```

pub mod boundary;
pub mod config;
pub mod email_content;
pub mod error;
pub mod gmail_api;
pub mod mime_sniff;
pub mod sender;
pub mod template;
pub mod types;

pub use config::GmailConfig;
pub use email_content::Attachment;
pub use error::{MailError, Result};
pub use gmail_api::{GmailService, MailTransport, StaticTokenSource, TokenSource};
pub use sender::{Mailer, MailerOptions};
pub use template::{TemplateRenderer, TeraTemplateRenderer};
pub use types::SentMessage;
