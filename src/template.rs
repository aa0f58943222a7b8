use crate::error::{MailError, Result};
use async_trait::async_trait;
use tera::{Context, Tera};

// Define a trait for template rendering to allow mocking
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    /// Renders the template identified by `template` with `data`.
    async fn render(&self, template: &str, data: &serde_json::Value) -> Result<String>;
}

/// Renders template files from disk with `tera`.
///
/// Templates are loaded on every call; output is plain text, so HTML
/// autoescaping is off.
#[derive(Debug, Clone, Default)]
pub struct TeraTemplateRenderer;

impl TeraTemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TemplateRenderer for TeraTemplateRenderer {
    async fn render(&self, template: &str, data: &serde_json::Value) -> Result<String> {
        let source = tokio::fs::read_to_string(template)
            .await
            .map_err(|e| MailError::TemplateRender(format!("{}: {}", template, e)))?;
        let context = Context::from_value(data.clone())?;
        Ok(Tera::one_off(&source, &context, false)?)
    }
}
