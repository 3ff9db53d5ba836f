use async_trait::async_trait;
use sie_browser::{LoaderConfig, ResourceLoader, ScriptOptions};
use sie_core::{
    ElementHandle, Injection, LoadError, LoadState, LoadStatus, Placement, RegistryError,
    ResourceDescriptor, ResourceKind, ResourceRegistry, UrlMatch,
};
use sie_document::MemoryDocument;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};

fn setup() -> (Arc<MemoryDocument>, ResourceLoader<MemoryDocument>) {
    let doc = Arc::new(MemoryDocument::new());
    let loader = ResourceLoader::new(Arc::clone(&doc), LoaderConfig::default());
    (doc, loader)
}

/// Fire `load` (or `error`) on `url` after `after`
fn dispatch_later(doc: &Arc<MemoryDocument>, url: &'static str, after: Duration, ok: bool) {
    let doc = Arc::clone(doc);
    tokio::spawn(async move {
        sleep(after).await;
        if ok {
            doc.dispatch_load(url).await;
        } else {
            doc.dispatch_error(url).await;
        }
    });
}

#[tokio::test(start_paused = true)]
async fn test_inject_without_load_event_resolves_at_fallback() {
    let (doc, loader) = setup();
    let start = Instant::now();

    let outcome = loader.inject_stylesheet("/sie/menu.css").await;

    assert_eq!(outcome, Injection::FallbackElapsed);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1000) && elapsed <= Duration::from_millis(1001));

    let elements = doc.elements().await;
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].descriptor.kind, ResourceKind::Stylesheet);
    assert_eq!(elements[0].descriptor.mime_type, "text/css");
    assert_eq!(elements[0].descriptor.placement, Placement::Head);
    assert_eq!(elements[0].state, LoadState::Pending);
}

#[tokio::test(start_paused = true)]
async fn test_inject_resolves_on_load_event() {
    let (doc, loader) = setup();
    dispatch_later(&doc, "/sie/popup.js", Duration::from_millis(10), true);
    let start = Instant::now();

    let outcome = loader.inject_script("/sie/popup.js").await;

    assert_eq!(outcome, Injection::Loaded);
    assert!(start.elapsed() < Duration::from_millis(1000));
    assert_eq!(doc.elements().await[0].state, LoadState::Loaded);
}

#[tokio::test(start_paused = true)]
async fn test_second_injection_matches_by_prefix() {
    let (doc, loader) = setup();
    doc.preload(ResourceDescriptor::new("/sie/popup.js?v=2", ResourceKind::Script))
        .await;
    let start = Instant::now();

    assert_eq!(loader.inject_script("/sie/popup.js").await, Injection::AlreadyPresent);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(doc.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_presence_counts_even_while_pending() {
    let (doc, loader) = setup();

    assert_eq!(loader.inject_script("/slow.js").await, Injection::FallbackElapsed);
    assert_eq!(doc.elements().await[0].state, LoadState::Pending);

    let start = Instant::now();
    assert_eq!(loader.inject_script("/slow.js").await, Injection::AlreadyPresent);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(doc.len().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_lenient_injection_ignores_error_event() {
    let (doc, loader) = setup();
    dispatch_later(&doc, "/broken.css", Duration::from_millis(5), false);
    let start = Instant::now();

    assert_eq!(loader.inject_stylesheet("/broken.css").await, Injection::FallbackElapsed);
    assert!(start.elapsed() >= Duration::from_millis(1000));
    assert_eq!(doc.elements().await[0].state, LoadState::Errored);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_window_is_configurable() {
    let doc = Arc::new(MemoryDocument::new());
    let loader = ResourceLoader::new(Arc::clone(&doc), LoaderConfig::default().with_fallback(200));
    let start = Instant::now();

    assert_eq!(loader.inject_script("/a.js").await, Injection::FallbackElapsed);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(200) && elapsed <= Duration::from_millis(201));
}

#[tokio::test(start_paused = true)]
async fn test_strict_load_rejects_on_error_event() {
    let (doc, loader) = setup();
    dispatch_later(&doc, "/missing.js", Duration::from_millis(20), false);

    let err = loader.load_script("/missing.js").await.unwrap_err();

    assert_eq!(err, LoadError::Failed { url: "/missing.js".to_string() });
    assert!(err.to_string().contains("/missing.js"));
    assert_eq!(err.to_json()["status"], false);
}

#[tokio::test(start_paused = true)]
async fn test_strict_load_has_no_fallback() {
    let (doc, loader) = setup();
    dispatch_later(&doc, "/big.js", Duration::from_millis(1500), true);
    let start = Instant::now();

    let status = loader.load_script("/big.js").await.unwrap();

    assert_eq!(status, LoadStatus::Loaded);
    assert!(start.elapsed() >= Duration::from_millis(1500));

    let elements = doc.elements().await;
    assert_eq!(elements[0].descriptor.placement, Placement::Body);
    assert!(elements[0].descriptor.is_async);
    assert_eq!(elements[0].descriptor.mime_type, "text/javascript");
}

#[tokio::test(start_paused = true)]
async fn test_strict_load_dedupes_by_exact_url() {
    let (doc, loader) = setup();
    doc.preload(ResourceDescriptor::new("/lib.js?v=1", ResourceKind::Script))
        .await;

    assert_eq!(loader.load_script("/lib.js?v=1").await.unwrap(), LoadStatus::AlreadyLoaded);
    assert_eq!(doc.len().await, 1);

    // A prefix is not enough for the strict path
    dispatch_later(&doc, "/lib.js", Duration::from_millis(1), true);
    assert_eq!(loader.load_script("/lib.js").await.unwrap(), LoadStatus::Loaded);
    assert_eq!(doc.len().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_strict_load_passes_script_options() {
    let (doc, loader) = setup();
    dispatch_later(&doc, "/mod.js", Duration::from_millis(1), true);
    let options = ScriptOptions {
        is_async: false,
        mime_type: "module".to_string(),
    };

    loader.load_script_with("/mod.js", options).await.unwrap();

    let elements = doc.elements().await;
    assert!(!elements[0].descriptor.is_async);
    assert_eq!(elements[0].descriptor.mime_type, "module");
}

struct BrokenRegistry;

#[async_trait]
impl ResourceRegistry for BrokenRegistry {
    async fn has_matching(&self, _: &str, _: ResourceKind, _: UrlMatch) -> Result<bool, RegistryError> {
        Err(RegistryError::new("HasMatching", "page closed"))
    }

    async fn insert(&self, _: ResourceDescriptor) -> Result<ElementHandle, RegistryError> {
        Err(RegistryError::new("Insert", "page closed"))
    }
}

#[tokio::test]
async fn test_registry_failure_degrades_lenient_and_fails_strict() {
    let loader = ResourceLoader::new(Arc::new(BrokenRegistry), LoaderConfig::default());

    assert_eq!(
        loader.inject_script("/a.js").await,
        Injection::Unavailable("HasMatching failed: page closed".to_string())
    );
    assert!(matches!(
        loader.load_script("/a.js").await,
        Err(LoadError::Registry(_))
    ));
}

/// Inserts elements whose notifier is dropped straight away
struct DetachingRegistry;

#[async_trait]
impl ResourceRegistry for DetachingRegistry {
    async fn has_matching(&self, _: &str, _: ResourceKind, _: UrlMatch) -> Result<bool, RegistryError> {
        Ok(false)
    }

    async fn insert(&self, descriptor: ResourceDescriptor) -> Result<ElementHandle, RegistryError> {
        let (_tx, rx) = tokio::sync::oneshot::channel();
        Ok(ElementHandle { url: descriptor.url, events: rx })
    }
}

#[tokio::test(start_paused = true)]
async fn test_detached_elements() {
    let loader = ResourceLoader::new(Arc::new(DetachingRegistry), LoaderConfig::default());

    assert_eq!(loader.inject_script("/a.js").await, Injection::FallbackElapsed);
    assert_eq!(
        loader.load_script("/a.js").await,
        Err(LoadError::Detached { url: "/a.js".to_string() })
    );
}

/// Answers presence checks from a snapshot taken before yielding, the way a
/// round trip to a real page would.
struct SlowCheckDocument {
    inner: MemoryDocument,
}

#[async_trait]
impl ResourceRegistry for SlowCheckDocument {
    async fn has_matching(&self, url: &str, kind: ResourceKind, mode: UrlMatch) -> Result<bool, RegistryError> {
        let found = self.inner.has_matching(url, kind, mode).await?;
        tokio::task::yield_now().await;
        Ok(found)
    }

    async fn insert(&self, descriptor: ResourceDescriptor) -> Result<ElementHandle, RegistryError> {
        self.inner.insert(descriptor).await
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_injections_of_a_new_url_both_insert() {
    let doc = Arc::new(SlowCheckDocument { inner: MemoryDocument::new() });
    let loader = ResourceLoader::new(Arc::clone(&doc), LoaderConfig::default());

    let (first, second) = tokio::join!(loader.inject_script("/x.js"), loader.inject_script("/x.js"));

    // Check-then-insert is not serialized per URL
    assert_eq!(first, Injection::FallbackElapsed);
    assert_eq!(second, Injection::FallbackElapsed);
    let elements = doc.inner.elements().await;
    assert_eq!(elements.len(), 2);
    assert!(elements.iter().all(|e| e.descriptor.url == "/x.js"));
}

#[tokio::test(start_paused = true)]
async fn test_lenient_script_injection_stays_async() {
    let (doc, loader) = setup();

    loader.inject_script("/async.js").await;
    loader.inject_stylesheet("/plain.css").await;

    let elements = doc.elements().await;
    assert!(elements[0].descriptor.is_async);
    assert_eq!(elements[0].descriptor.placement, Placement::Head);
    assert_eq!(elements[1].descriptor.kind, ResourceKind::Stylesheet);
}
