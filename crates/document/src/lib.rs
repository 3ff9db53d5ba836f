use async_trait::async_trait;
use sie_core::{
    ElementEvent, ElementHandle, LoadState, RegistryError, ResourceDescriptor, ResourceKind,
    ResourceRegistry, UrlMatch,
};
use tokio::sync::{Mutex, oneshot};

/// Snapshot of one element in a [`MemoryDocument`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub descriptor: ResourceDescriptor,
    pub state: LoadState,
}

struct Slot {
    element: Element,
    notify: Option<oneshot::Sender<ElementEvent>>,
}

/// In-memory stand-in for a live document. Elements are appended by the
/// loader and settled by whoever plays the network: tests, or a host that
/// fetches resources itself.
#[derive(Default)]
pub struct MemoryDocument {
    slots: Mutex<Vec<Slot>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an element that is already present and loaded
    pub async fn preload(&self, descriptor: ResourceDescriptor) {
        self.slots.lock().await.push(Slot {
            element: Element {
                descriptor,
                state: LoadState::Loaded,
            },
            notify: None,
        });
    }

    pub async fn elements(&self) -> Vec<Element> {
        self.slots
            .lock()
            .await
            .iter()
            .map(|s| s.element.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Fire `load` on the first pending element with exactly this URL
    pub async fn dispatch_load(&self, url: &str) -> bool {
        self.dispatch(url, ElementEvent::Load).await
    }

    /// Fire `error` on the first pending element with exactly this URL
    pub async fn dispatch_error(&self, url: &str) -> bool {
        self.dispatch(url, ElementEvent::Error).await
    }

    async fn dispatch(&self, url: &str, event: ElementEvent) -> bool {
        let mut slots = self.slots.lock().await;
        let Some(slot) = slots
            .iter_mut()
            .find(|s| s.element.descriptor.url == url && s.element.state == LoadState::Pending)
        else {
            return false;
        };

        slot.element.state = event.into();
        if let Some(notify) = slot.notify.take() {
            // Nobody listening any more is fine; the state change still sticks.
            let _ = notify.send(event);
        }
        tracing::trace!("Dispatched {:?} on {}", event, url);
        true
    }
}

#[async_trait]
impl ResourceRegistry for MemoryDocument {
    async fn has_matching(
        &self,
        url: &str,
        kind: ResourceKind,
        mode: UrlMatch,
    ) -> Result<bool, RegistryError> {
        let slots = self.slots.lock().await;
        Ok(slots.iter().any(|s| {
            s.element.descriptor.kind == kind && mode.matches(&s.element.descriptor.url, url)
        }))
    }

    async fn insert(&self, descriptor: ResourceDescriptor) -> Result<ElementHandle, RegistryError> {
        let (tx, rx) = oneshot::channel();
        let url = descriptor.url.clone();
        tracing::debug!("Appending {:?} element for {}", descriptor.kind, url);
        self.slots.lock().await.push(Slot {
            element: Element {
                descriptor,
                state: LoadState::Pending,
            },
            notify: Some(tx),
        });
        Ok(ElementHandle { url, events: rx })
    }
}
