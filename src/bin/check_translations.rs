//! Translation completeness check
//!
//! Loads every configured source, renders the page manifest once per supported
//! language, validates the dictionaries against each other, and prints a JSON
//! report. Exits with status 1 if any translation is missing.
//!
//! Usage:
//!   cargo run --bin check
//!
//! Uses the same environment variables as the preview binary.

use anyhow::{Context, Result};
use portfolio_i18n::config::Config;
use portfolio_i18n::i18n::{CompletenessValidator, Language, MemoryPreferences};
use portfolio_i18n::view::{Markup, MemoryView};
use portfolio_i18n::Site;
use serde_json::json;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let content = std::fs::read_to_string(&config.page_path)
        .with_context(|| format!("Failed to read page manifest {}", config.page_path.display()))?;
    let page: Markup = serde_json::from_str(&content)
        .with_context(|| format!("Invalid page manifest {}", config.page_path.display()))?;

    // Preferences stay in memory: a check must not change the saved language
    let mut site = Site::new(
        &config.i18n,
        MemoryView::from_markup(page),
        Box::new(MemoryPreferences::new()),
        None,
    );
    site.load(&config.sources()).await;

    for language in Language::all() {
        info!("Rendering page in {}", language.name());
        site.set_language(language.code());
    }

    let validation = CompletenessValidator::validate(site.store());
    let metrics = site.metrics().report();

    let report = json!({
        "languages": site
            .store()
            .loaded_languages()
            .iter()
            .map(|language| language.code())
            .collect::<Vec<_>>(),
        "validation": validation,
        "metrics": metrics,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if validation.has_errors() || !metrics.is_complete() {
        error!(
            "Translations incomplete: {} validation errors, {} missing keys",
            validation.errors.len(),
            metrics.missing_keys.len()
        );
        std::process::exit(1);
    }

    info!("All translations complete");
    Ok(())
}
