//! Idempotent script and stylesheet injection.
//!
//! Two flavours exist. Lenient injection (`inject_*`) dedupes by URL prefix
//! and never fails: if the new element has not loaded within the fallback
//! window it is assumed loaded. Strict loading (`load_script`) dedupes by
//! exact URL, has no fallback, and fails on a native error event.
//!
//! An existing matching element counts as success whatever its own load
//! state is. The presence check and the insert are not atomic, so two
//! concurrent requests for the same new URL can both insert.

use sie_core::{
    ElementEvent, Injection, LoadError, LoadStatus, Placement, ResourceDescriptor, ResourceKind,
    ResourceRegistry, UrlMatch,
};
use std::sync::Arc;
use tokio::time::sleep;

use crate::shared::LoaderConfig;

#[derive(Debug, Clone)]
pub struct ScriptOptions {
    pub is_async: bool,
    pub mime_type: String,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            is_async: true,
            mime_type: ResourceKind::Script.default_mime_type().to_string(),
        }
    }
}

pub struct ResourceLoader<R: ResourceRegistry> {
    registry: Arc<R>,
    config: LoaderConfig,
}

impl<R: ResourceRegistry> Clone for ResourceLoader<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            config: self.config.clone(),
        }
    }
}

impl<R: ResourceRegistry> ResourceLoader<R> {
    pub fn new(registry: Arc<R>, config: LoaderConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub async fn inject_script(&self, url: &str) -> Injection {
        self.inject(url, ResourceKind::Script).await
    }

    pub async fn inject_stylesheet(&self, url: &str) -> Injection {
        self.inject(url, ResourceKind::Stylesheet).await
    }

    pub async fn inject(&self, url: &str, kind: ResourceKind) -> Injection {
        match self.registry.has_matching(url, kind, UrlMatch::Prefix).await {
            Ok(true) => {
                tracing::trace!("{} already present, skipping injection", url);
                return Injection::AlreadyPresent;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("Could not check for {}: {}", url, e);
                return Injection::Unavailable(e.to_string());
            }
        }

        // Script elements created from code are async unless told otherwise.
        let descriptor = ResourceDescriptor::new(url, kind)
            .with_async(kind == ResourceKind::Script)
            .with_placement(Placement::Head);
        let mut events = match self.registry.insert(descriptor).await {
            Ok(handle) => handle.events,
            Err(e) => {
                tracing::warn!("Could not inject {}: {}", url, e);
                return Injection::Unavailable(e.to_string());
            }
        };

        let fallback = sleep(self.config.fallback);
        tokio::pin!(fallback);
        let mut listening = true;

        loop {
            tokio::select! {
                event = &mut events, if listening => match event {
                    Ok(ElementEvent::Load) => {
                        tracing::debug!("Injected {}", url);
                        return Injection::Loaded;
                    }
                    // Errors and detached elements are left to the fallback window.
                    Ok(ElementEvent::Error) | Err(_) => listening = false,
                },
                _ = &mut fallback => {
                    tracing::warn!(
                        "{} did not load within {}ms, continuing anyway",
                        url,
                        self.config.fallback.as_millis()
                    );
                    return Injection::FallbackElapsed;
                }
            }
        }
    }

    pub async fn load_script(&self, url: &str) -> Result<LoadStatus, LoadError> {
        self.load_script_with(url, ScriptOptions::default()).await
    }

    pub async fn load_script_with(
        &self,
        url: &str,
        options: ScriptOptions,
    ) -> Result<LoadStatus, LoadError> {
        if self
            .registry
            .has_matching(url, ResourceKind::Script, UrlMatch::Exact)
            .await?
        {
            return Ok(LoadStatus::AlreadyLoaded);
        }

        let descriptor = ResourceDescriptor::new(url, ResourceKind::Script)
            .with_mime_type(options.mime_type)
            .with_async(options.is_async)
            .with_placement(Placement::Body);
        let handle = self.registry.insert(descriptor).await?;

        match handle.events.await {
            Ok(ElementEvent::Load) => {
                tracing::debug!("Loaded script {}", url);
                Ok(LoadStatus::Loaded)
            }
            Ok(ElementEvent::Error) => {
                tracing::warn!("Failed to load the script {}", url);
                Err(LoadError::Failed { url: url.to_string() })
            }
            Err(_) => Err(LoadError::Detached { url: url.to_string() }),
        }
    }
}
