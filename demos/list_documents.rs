//! List documents and their notes
//!
//! Uses `GRANOLA_TOKEN` when set, otherwise the desktop app's token file.
//!
//! ```text
//! RUST_LOG=granola_client=debug cargo run --example list_documents
//! ```

use futures::TryStreamExt;
use granola_client::models::GetDocumentsFilters;
use granola_client::GranolaClient;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> granola_client::Result<()> {
    let token = std::env::var("GRANOLA_TOKEN").ok();
    let client = GranolaClient::new(token.as_deref())?;

    let first_page = client
        .get_documents(Some(GetDocumentsFilters::new().limit(10)))
        .await?;
    println!("First page: {} documents", first_page.docs.len());

    let docs: Vec<_> = client
        .list_all_documents(Some(GetDocumentsFilters::new().limit(50)))?
        .try_collect()
        .await?;

    println!("Found {} documents:", docs.len());
    for doc in &docs {
        println!("  - {}: {}", doc.id, doc.title.as_deref().unwrap_or("(untitled)"));
        let notes = doc.notes();
        if !notes.is_empty() {
            println!("{notes}");
        }
    }

    Ok(())
}
