//! Preview binary - renders the portfolio page and prints the resulting HTML
//!
//! Usage:
//!   cargo run                      # Render in the initial language
//!   cargo run -- --lang en         # Switch to English first (and persist it)
//!
//! Optional environment variables:
//! - PORTFOLIO_DATA_SOURCE (defaults to data/portfolio.json)
//! - PORTFOLIO_PAGE (defaults to data/page.json)
//! - PORTFOLIO_PREFERENCES_FILE (defaults to .portfolio/preferences.json)
//! - PORTFOLIO_RENDER_STRATEGY (full or content, defaults to full)

use anyhow::{bail, Context, Result};
use portfolio_i18n::config::Config;
use portfolio_i18n::i18n::FilePreferences;
use portfolio_i18n::view::{Markup, MemoryView};
use portfolio_i18n::Site;
use std::path::Path;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout carries only the page
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_i18n=info".parse()?),
        )
        .init();

    let requested = parse_lang_arg(std::env::args().skip(1))?;

    let config = Config::from_env()?;
    info!(
        "Rendering {} with data from {} ({} strategy)",
        config.page_path.display(),
        config.data_source,
        config.i18n.render_strategy
    );

    let page = load_page(&config.page_path).await?;
    let mut site = Site::new(
        &config.i18n,
        MemoryView::from_markup(page),
        Box::new(FilePreferences::new(&config.preferences_file)),
        config.locale.as_deref(),
    );

    site.load(&config.sources()).await;

    if let Some(code) = requested {
        site.set_language(&code);
    }

    let report = site.metrics().report();
    if report.is_complete() {
        let language = site.current_language();
        info!(
            "Rendered in {} ({}) with no missing translations",
            language.native_name(),
            language
        );
    } else {
        warn!(
            "Rendered in {} with {} missing translations: {:?}",
            site.current_language(),
            report.missing_translations,
            report.missing_keys
        );
    }

    println!("<!DOCTYPE html>\n{}", site.view().to_html());
    Ok(())
}

/// `--lang <code>` or `--lang=<code>`; anything else is a usage error.
fn parse_lang_arg(mut args: impl Iterator<Item = String>) -> Result<Option<String>> {
    let mut lang = None;

    while let Some(arg) = args.next() {
        if let Some(code) = arg.strip_prefix("--lang=") {
            lang = Some(code.to_string());
        } else if arg == "--lang" {
            lang = Some(args.next().context("--lang requires a language code")?);
        } else {
            bail!("Unknown argument '{}'. Usage: portfolio-i18n [--lang <code>]", arg);
        }
    }

    Ok(lang)
}

async fn load_page(path: &Path) -> Result<Markup> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read page manifest {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid page manifest {}", path.display()))
}
