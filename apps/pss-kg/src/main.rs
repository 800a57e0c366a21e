//! # PSS-KG - Knowledge Graph Builder
//!
//! The command-line binary for the PSS reaction transformation engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/pss-kg (THE BINARY)                 │
//! │                                                          │
//! │  ┌─────────────┐   ┌─────────────┐   ┌──────────────┐   │
//! │  │    CLI      │   │   Config    │   │ JSONL / TSV  │   │
//! │  │   (clap)    │   │   (toml)    │   │  (serde_json │   │
//! │  │             │   │             │   │   + flate2)  │   │
//! │  └──────┬──────┘   └──────┬──────┘   └──────┬───────┘   │
//! │         └─────────────────┼─────────────────┘           │
//! │                           ▼                             │
//! │                   ┌───────────────┐                     │
//! │                   │   pss-core    │                     │
//! │                   │  (THE LOGIC)  │                     │
//! │                   └───────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! pss-kg run -n nodes.jsonl -r reactions.jsonl -a ckn_annotations.tsv.gz -o kg
//! pss-kg --config pss-kg.toml --json-mode run
//! pss-kg rules
//! ```

use clap::Parser;
use pss_kg::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing. PSS_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("PSS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pss_kg=info,pss_core=warn".into());

    // Logs go to stderr so stdout stays clean for --json-mode.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
