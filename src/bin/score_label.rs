// Score a product label from the command line
//
// Usage: score_label <label text...> [--lang en|es]
//   e.g. score_label "Merluza, FAO 27.8, arrastre, MSC" --lang en
//
// Prints the assessment as pretty JSON. Exits with status 1 when the species
// cannot be resolved.

use anyhow::Result;
use clap::Parser;
use seafood_scorer::config::ServerConfig;
use seafood_scorer::label::parse_eu_label;
use seafood_scorer::{Locale, SeafoodScorer};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Score a seafood product label
#[derive(Debug, Parser)]
#[command(name = "score_label")]
struct Args {
    /// Label text; several words are joined with spaces
    #[arg(required = true)]
    text: Vec<String>,

    /// Output language (es or en)
    #[arg(long, default_value = "es")]
    lang: Locale,
}

impl Args {
    fn label_text(&self) -> String {
        self.text.join(" ")
    }
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seafood_scorer=warn,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let text = args.label_text();

    let config = ServerConfig::from_env()?;
    let scorer = SeafoodScorer::new(config.load_reference_data()?);

    let label = parse_eu_label(&text);
    tracing::debug!(?label, "Parsed label");

    match scorer.assess(&label, None, args.lang) {
        Some(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!(
                "Species not found: {}",
                label.species_raw.as_deref().unwrap_or("(no species text)")
            );
            Ok(ExitCode::from(1))
        }
    }
}
