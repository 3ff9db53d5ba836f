use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::{Value, json};
use sie_core::{
    ElementEvent, ElementHandle, RegistryError, ResourceDescriptor, ResourceKind,
    ResourceRegistry, UrlMatch,
};
use tokio::sync::oneshot;

use crate::frame::{DEFAULT_WAIT_MS, FrameClock};
use crate::id::{DEFAULT_ID_LEN, generate_id};
use crate::shared::{js, to_registry_error};

/// An unexpected answer must not read as "absent", or the caller would insert a duplicate.
fn expect_bool(value: Option<&Value>, action: &str) -> Result<bool, RegistryError> {
    match value.and_then(Value::as_bool) {
        Some(found) => Ok(found),
        None => Err(RegistryError::new(
            action,
            format!("expected a boolean, got {}", value.map_or("nothing".to_string(), Value::to_string)),
        )),
    }
}

/// A live chromium page acting as the document
#[derive(Clone)]
pub struct ChromiumDocument {
    page: Page,
}

impl ChromiumDocument {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Launch a browser with a throwaway profile and open `url`.
    /// The browser must be kept alive for as long as the document is used.
    pub async fn launch(url: &str, headless: bool) -> Result<(Browser, Self), RegistryError> {
        let headless_mode = if headless { HeadlessMode::True } else { HeadlessMode::False };

        // Separate profile per launch avoids SingletonLock conflicts.
        let profile = std::env::temp_dir().join(format!("sie-chromium-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&profile).map_err(|e| to_registry_error(e, "Launch"))?;

        let config = BrowserConfig::builder()
            .headless_mode(headless_mode)
            .user_data_dir(profile)
            .build()
            .map_err(|e| to_registry_error(e, "Launch"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| to_registry_error(e, "Launch"))?;

        tokio::spawn(async move {
            while handler.next().await.is_some() {}
        });

        let page = browser
            .new_page(url)
            .await
            .map_err(|e| to_registry_error(e, "NewPage"))?;
        tracing::info!("Chromium document ready at {}", url);

        Ok((browser, Self::new(page)))
    }
}

#[async_trait]
impl ResourceRegistry for ChromiumDocument {
    async fn has_matching(
        &self,
        url: &str,
        kind: ResourceKind,
        mode: UrlMatch,
    ) -> Result<bool, RegistryError> {
        let js = js::build_js_call(
            js::element::HAS_MATCHING,
            &[
                json!(kind.tag()),
                json!(kind.url_attr()),
                json!(url),
                json!(mode == UrlMatch::Exact),
            ],
        );
        let result = self
            .page
            .evaluate(js)
            .await
            .map_err(|e| to_registry_error(e, "HasMatching"))?;

        expect_bool(result.value(), "HasMatching")
    }

    async fn insert(&self, descriptor: ResourceDescriptor) -> Result<ElementHandle, RegistryError> {
        let key = generate_id(DEFAULT_ID_LEN);
        let js = js::build_js_call(
            js::element::INSERT_ELEMENT,
            &[json!(key), js::descriptor_arg(&descriptor)],
        );
        self.page
            .evaluate(js)
            .await
            .map_err(|e| to_registry_error(e, "Insert"))?;
        tracing::debug!("Appended {:?} element for {}", descriptor.kind, descriptor.url);

        let (tx, rx) = oneshot::channel();
        let url = descriptor.url;
        let page = self.page.clone();
        let watched = url.clone();

        // Settling can take arbitrarily long, so the wait runs detached. A
        // failed evaluation drops `tx`, which reads as a detached element.
        tokio::spawn(async move {
            let js = js::build_js_call(js::element::AWAIT_ELEMENT, &[json!(key)]);
            match page.evaluate(js).await {
                Ok(result) => {
                    let event = match result.value().and_then(|v| v.as_str()) {
                        Some("load") => ElementEvent::Load,
                        _ => ElementEvent::Error,
                    };
                    tracing::trace!("{:?} for {}", event, watched);
                    let _ = tx.send(event);
                }
                Err(e) => tracing::warn!("{} ({})", to_registry_error(e, "AwaitElement"), watched),
            }
        });

        Ok(ElementHandle { url, events: rx })
    }
}

#[async_trait]
impl FrameClock for ChromiumDocument {
    async fn next_frame(&self) {
        let js = js::build_js_call(js::wait::NEXT_FRAME, &[]);
        if let Err(e) = self.page.evaluate(js).await {
            // Fall back to a nominal frame so callers still make progress.
            tracing::warn!("{}", to_registry_error(e, "NextFrame"));
            tokio::time::sleep(std::time::Duration::from_millis(DEFAULT_WAIT_MS)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_check_requires_a_boolean() {
        assert_eq!(expect_bool(Some(&json!(true)), "HasMatching"), Ok(true));
        assert_eq!(expect_bool(Some(&json!(false)), "HasMatching"), Ok(false));

        let err = expect_bool(Some(&json!("yes")), "HasMatching").unwrap_err();
        assert_eq!(err.to_string(), r#"HasMatching failed: expected a boolean, got "yes""#);
        let err = expect_bool(None, "HasMatching").unwrap_err();
        assert_eq!(err.message, "expected a boolean, got nothing");
    }
}
