//! # Facetwork - Metamodel Inspector
//!
//! The main binary for the Facetwork metamodel engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          apps/facetwork (THE BINARY)         │
//! │                                              │
//! │   ┌─────────────┐        ┌──────────────┐    │
//! │   │    CLI      │        │ Demo domain  │    │
//! │   │   (clap)    │        │ (descriptors)│    │
//! │   └──────┬──────┘        └──────┬───────┘    │
//! │          └───────────┬──────────┘            │
//! │                      ▼                       │
//! │             ┌─────────────────┐              │
//! │             │ facetwork-core  │              │
//! │             │   (THE LOGIC)   │              │
//! │             └─────────────────┘              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! facetwork inspect -t demo.Customer
//! facetwork validate --strict
//! facetwork export -o metamodel.bin -f binary
//! facetwork decode -i metamodel.bin
//! ```

use clap::Parser;
use facetwork::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // FACETWORK_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("FACETWORK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "facetwork=debug,facetwork_core=debug"
    } else {
        "facetwork=info,facetwork_core=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  Facetwork v{}
  facets • specifications • validation
"#,
        env!("CARGO_PKG_VERSION")
    );
}
