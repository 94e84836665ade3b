//! Show command implementation

use anyhow::{Context, Result};
use clap::Args;
use collect::FileSource;
use url::Url;

use super::utils::format_data;

#[derive(Args)]
pub struct ShowArgs {
    /// Document to show, e.g. file://config.yml
    #[arg(value_name = "URL")]
    pub url: String,

    /// Label to mark as selected
    #[arg(short, long, default_value = "")]
    pub label: String,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let url = Url::parse(&args.url).with_context(|| format!("Invalid URL: {}", args.url))?;
    if url.scheme() != "file" {
        anyhow::bail!("Only file:// documents can be shown, got {}://", url.scheme());
    }

    let document = FileSource::open(&url, &args.url)
        .with_context(|| format!("Failed to load {}", args.url))?;
    let resolved = document.resolve_all()?;
    let selected = document.select_label(&args.label, &args.label);

    if resolved.is_empty() {
        println!("(no labels)");
        return Ok(());
    }

    for (label, data) in &resolved {
        let marker = if Some(label.as_str()) == selected { " (selected)" } else { "" };
        println!("[{label}]{marker}");
        for line in format_data(data).lines() {
            println!("  {line}");
        }
    }
    Ok(())
}
