//! Company extraction walkthrough.
//!
//! Runs the full pipeline (strategies, validation, consolidation,
//! scoring, contact accumulation, fallback chain) over a bundled
//! fixture page via a scripted mock backend, so it works offline.
//!
//! To run against real backends instead, build the chain from
//! `ScrapeApiBackend::from_env()` / `BrowserBackend::from_env()` /
//! `PlainHttpBackend::new()` in that order.
//!
//! ```bash
//! cargo run --example company_extraction
//! ```

use std::sync::Arc;

use entity_extraction::testing::{company_page_fixture, MockBackend, MockOutcome};
use entity_extraction::{ChainBackend, EntityExtractor};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "entity_extraction=debug".into()),
        )
        .init();

    let chain = vec![
        // A backend that fails, to show the chain advancing
        ChainBackend::Fetch(Arc::new(MockBackend::once(
            "flaky-api",
            MockOutcome::Error("503 service unavailable".into()),
        ))),
        // A backend that returns the fixture page
        ChainBackend::Fetch(Arc::new(MockBackend::once(
            "fixture",
            MockOutcome::Html(company_page_fixture()),
        ))),
    ];

    let extractor = EntityExtractor::company(chain);
    let result = extractor.extract("https://acme.example.com").await?;

    println!(
        "success={} confidence={:.1} via {:?}",
        result.success, result.confidence, result.method
    );
    println!("attempts:");
    for attempt in &result.attempts {
        println!("  {} ({}) -> {:?}", attempt.backend, attempt.method, attempt.outcome);
    }
    println!("fields:");
    for (name, value) in result.record.iter() {
        println!("  {name} = {:?} (from {})", value.value, value.source);
    }
    println!("emails: {:?}", result.contacts.emails().collect::<Vec<_>>());
    println!("whatsapp: {:?}", result.contacts.whatsapp().collect::<Vec<_>>());

    Ok(())
}
