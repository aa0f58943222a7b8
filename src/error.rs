use std::io;
use std::path::PathBuf;

/// Result type alias for mail operations.
pub type Result<T> = std::result::Result<T, MailError>;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Required configuration value is missing or empty.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Template could not be read, parsed or rendered.
    #[error("Unable to render email template: {0}")]
    TemplateRender(String),

    /// Attachment file could not be read.
    #[error("Unable to read attachment {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The provider rejected the message or the request never completed.
    #[error("Failed to send email{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Send {
        status: Option<u16>,
        message: String,
    },

    /// No access token could be obtained.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Recipient address is empty")]
    InvalidRecipient,

    #[error("Invalid header value for {0}: line breaks are not allowed")]
    InvalidHeader(String),
}

impl MailError {
    pub fn send_error(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Send {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        Self::Send {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<tera::Error> for MailError {
    fn from(err: tera::Error) -> Self {
        // tera keeps the useful detail in the source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        Self::TemplateRender(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_error_display_with_status() {
        let err = MailError::send_error(Some(403), "insufficient scopes");
        assert_eq!(
            err.to_string(),
            "Failed to send email (HTTP 403): insufficient scopes"
        );
    }

    #[test]
    fn test_send_error_display_without_status() {
        let err = MailError::send_error(None, "connection reset");
        assert_eq!(err.to_string(), "Failed to send email: connection reset");
    }

    #[test]
    fn test_file_read_display_includes_path() {
        let err = MailError::FileRead {
            path: PathBuf::from("/tmp/missing.pdf"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.pdf"));
    }
}
