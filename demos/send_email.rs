//! Sends one message through the Gmail API.
//!
//! Credentials come from `CLIENT_ID`, `CLIENT_SECRET`, `ACCESS_TOKEN` and
//! `REFRESH_TOKEN`.
//!
//! ```bash
//! cargo run --example send_email -- --to someone@example.com --template welcome.txt
//! cargo run --example send_email -- --to someone@example.com --dir ./files/ --file report.pdf
//! ```

use clap::Parser;
use gmailer::{GmailConfig, GmailService, Mailer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Recipient address.
    #[clap(long)]
    to: String,

    /// Template file rendered into the body of a plain-text message.
    #[clap(long, conflicts_with = "file")]
    template: Option<String>,

    /// JSON object passed to the template.
    #[clap(long, default_value = "{}")]
    data: String,

    /// Subject of the attachment message.
    #[clap(long, default_value = "Attachment")]
    subject: String,

    /// Body of the attachment message.
    #[clap(long, default_value = "")]
    content: String,

    /// Directory holding the attachment.
    #[clap(long, default_value = ".")]
    dir: PathBuf,

    /// Attachment file name.
    #[clap(long)]
    file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gmailer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let service = GmailService::connect(&GmailConfig::from_env()).await?;
    let mailer = Mailer::new(Arc::new(service));

    let sent = match (&cli.template, &cli.file) {
        (Some(template), _) => {
            let data: serde_json::Value = serde_json::from_str(&cli.data)?;
            mailer.send_templated(&cli.to, &data, template).await?
        }
        (None, Some(file)) => {
            mailer
                .send_with_attachment(&cli.to, &cli.subject, &cli.content, &cli.dir, file)
                .await?
        }
        (None, None) => {
            eprintln!("Nothing to send: pass --template or --file");
            return Ok(());
        }
    };

    println!("Sent message {}", sent.id.unwrap_or_default());
    Ok(())
}
