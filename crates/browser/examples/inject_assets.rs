use sie_browser::{ChromiumDocument, FrameWaiter, LoaderConfig, ResourceLoader, create_resolver};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sie_browser=debug")))
        .init();

    let (_browser, document) = ChromiumDocument::launch("https://example.com", true).await?;
    let document = Arc::new(document);
    let loader = ResourceLoader::new(Arc::clone(&document), LoaderConfig::default());

    // Lenient: never fails, gives up waiting after the fallback window
    let css = loader
        .inject_stylesheet("https://cdn.jsdelivr.net/npm/water.css@2/out/water.css")
        .await;
    tracing::info!("stylesheet: {:?}", css);

    // Second request is deduplicated by prefix
    let again = loader.inject_stylesheet("https://cdn.jsdelivr.net/npm/water.css@2").await;
    tracing::info!("stylesheet again: {:?}", again);

    // Strict: fails on a genuine load error
    match loader.load_script("https://example.invalid/missing.js").await {
        Ok(status) => tracing::info!("script: {}", status.to_json()),
        Err(e) => tracing::warn!("script: {}", e.to_json()),
    }

    // Wait one real animation frame in the page
    let frames = FrameWaiter::new((*document).clone());
    frames.next_frame().await;

    let resolver = create_resolver::<&str>(Duration::from_millis(500));
    let owner = resolver.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        owner.resolve("settled by owner");
    });
    tracing::info!("resolver {}: {:?}", resolver.id(), resolver.completion().await);

    Ok(())
}
