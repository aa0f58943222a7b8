use crate::boundary::{generate_boundary, DEFAULT_LINE_WIDTH};
use crate::email_content::{build_multipart_message, build_plain_message, encode_raw, Attachment};
use crate::error::{MailError, Result};
use crate::gmail_api::{MailTransport, ME};
use crate::template::{TemplateRenderer, TeraTemplateRenderer};
use crate::types::SentMessage;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

pub const DEFAULT_SUBJECT: &str = "Test Email form Gmail API using OAuth";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailerOptions {
    /// Account messages are sent as.
    pub user_id: String,
    /// Subject used by [`Mailer::send_templated`].
    pub subject: String,
    /// Width of base64 lines in attachment parts.
    pub line_width: usize,
}

impl Default for MailerOptions {
    fn default() -> Self {
        Self {
            user_id: ME.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// Formats messages and hands them to a [`MailTransport`].
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
    renderer: Arc<dyn TemplateRenderer>,
    options: MailerOptions,
}

impl Mailer {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self {
            transport,
            renderer: Arc::new(TeraTemplateRenderer::new()),
            options: MailerOptions::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_options(mut self, options: MailerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &MailerOptions {
        &self.options
    }

    /// Renders `template` with `data` and sends the result as a plain-text
    /// message to `to`.
    ///
    /// Nothing is sent when rendering fails.
    pub async fn send_templated<T>(&self, to: &str, data: &T, template: &str) -> Result<SentMessage>
    where
        T: Serialize + ?Sized,
    {
        check_recipient(to)?;

        let data = serde_json::to_value(data)
            .map_err(|e| MailError::TemplateRender(format!("invalid template data: {}", e)))?;
        let body = self.renderer.render(template, &data).await?;

        let message = build_plain_message(to, &self.options.subject, &body)?;
        let sent = self.submit(&message).await?;

        info!(to, template, id = ?sent.id, "Templated message sent");
        Ok(sent)
    }

    /// Sends `content` with the file at `file_dir/file_name` attached.
    pub async fn send_with_attachment(
        &self,
        to: &str,
        subject: &str,
        content: &str,
        file_dir: impl AsRef<Path>,
        file_name: &str,
    ) -> Result<SentMessage> {
        check_recipient(to)?;

        let attachment = Attachment::from_path(file_dir, file_name)
            .await
            .map_err(|e| {
                error!(error = %e, "Unable to load attachment");
                e
            })?;

        self.send_attachment(to, subject, content, &attachment).await
    }

    /// Sends `content` with an in-memory attachment.
    pub async fn send_attachment(
        &self,
        to: &str,
        subject: &str,
        content: &str,
        attachment: &Attachment,
    ) -> Result<SentMessage> {
        check_recipient(to)?;

        let boundary = generate_boundary();
        let message = build_multipart_message(
            to,
            subject,
            content,
            attachment,
            &boundary,
            self.options.line_width,
        )?;

        match self.submit(&message).await {
            Ok(sent) => {
                info!(
                    to,
                    file_name = %attachment.file_name,
                    mime_type = %attachment.mime_type,
                    id = ?sent.id,
                    "Message sent!"
                );
                Ok(sent)
            }
            Err(e) => {
                error!(to, file_name = %attachment.file_name, error = %e, "Error sending message");
                Err(e)
            }
        }
    }

    async fn submit(&self, message: &[u8]) -> Result<SentMessage> {
        let raw = encode_raw(message);
        self.transport
            .send_message(&self.options.user_id, &raw)
            .await
    }
}

fn check_recipient(to: &str) -> Result<()> {
    if to.trim().is_empty() {
        return Err(MailError::InvalidRecipient);
    }
    Ok(())
}
