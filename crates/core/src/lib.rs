use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::oneshot;

/// Kind of resource a document element references
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `<script src=...>`
    Script,
    /// `<link rel="stylesheet" href=...>`
    Stylesheet,
}

impl ResourceKind {
    /// Tag name of the element carrying this resource
    pub fn tag(&self) -> &'static str {
        match self {
            ResourceKind::Script => "script",
            ResourceKind::Stylesheet => "link",
        }
    }

    /// Attribute holding the resource URL
    pub fn url_attr(&self) -> &'static str {
        match self {
            ResourceKind::Script => "src",
            ResourceKind::Stylesheet => "href",
        }
    }

    pub fn default_mime_type(&self) -> &'static str {
        match self {
            ResourceKind::Script => "text/javascript",
            ResourceKind::Stylesheet => "text/css",
        }
    }
}

/// How an existing element's URL is compared against a requested one
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UrlMatch {
    /// Existing URL starts with the requested one (lenient injection)
    Prefix,
    /// Existing URL equals the requested one (strict script loading)
    Exact,
}

impl UrlMatch {
    pub fn matches(&self, existing: &str, requested: &str) -> bool {
        match self {
            UrlMatch::Prefix => existing.starts_with(requested),
            UrlMatch::Exact => existing == requested,
        }
    }
}

/// Where a new element gets appended
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Placement {
    Head,
    Body,
}

/// Everything needed to create a resource element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub url: String,
    pub kind: ResourceKind,
    pub mime_type: String,
    /// Only meaningful for scripts
    pub is_async: bool,
    pub placement: Placement,
}

impl ResourceDescriptor {
    pub fn new(url: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            url: url.into(),
            kind,
            mime_type: kind.default_mime_type().to_string(),
            is_async: false,
            placement: Placement::Head,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

/// Native completion event of an inserted element
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ElementEvent {
    Load,
    Error,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    Errored,
}

impl From<ElementEvent> for LoadState {
    fn from(event: ElementEvent) -> Self {
        match event {
            ElementEvent::Load => LoadState::Loaded,
            ElementEvent::Error => LoadState::Errored,
        }
    }
}

/// Handle to an element that was just inserted.
///
/// `events` fires at most once. If the sender side is dropped before firing,
/// the element is considered detached and no event will ever arrive.
#[derive(Debug)]
pub struct ElementHandle {
    pub url: String,
    pub events: oneshot::Receiver<ElementEvent>,
}

/// Outcome of a lenient injection. Lenient injection never fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Injection {
    /// A matching element was already in the document
    AlreadyPresent,
    /// The new element fired its load event inside the fallback window
    Loaded,
    /// The fallback window elapsed first; the resource is assumed loaded
    FallbackElapsed,
    /// The registry backend failed; treated as resolved
    Unavailable(String),
}

/// Successful outcome of a strict script load
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoadStatus {
    AlreadyLoaded,
    Loaded,
}

impl LoadStatus {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            LoadStatus::AlreadyLoaded => {
                serde_json::json!({ "status": true, "message": "Script already loaded" })
            }
            LoadStatus::Loaded => serde_json::json!({ "status": true }),
        }
    }
}

/// A registry backend call failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{action} failed: {message}")]
pub struct RegistryError {
    pub action: String,
    pub message: String,
}

impl RegistryError {
    pub fn new(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            message: message.into(),
        }
    }
}

/// Failure of a strict script load
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The element dispatched a native error event
    #[error("Failed to load the script {url}")]
    Failed { url: String },
    /// The element went away without dispatching load or error
    #[error("Script element for {url} was detached before it settled")]
    Detached { url: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl LoadError {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "status": false, "message": self.to_string() })
    }
}

/// Why a resolver ended up rejected
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RejectReason {
    /// The owner called `reject`
    Explicit,
    /// The deadline elapsed with no settlement
    Timeout,
    /// Every handle capable of settling was dropped
    Dropped,
}

/// Rejection of a resolver's completion future
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("resolver {id} rejected ({reason:?})")]
pub struct Rejected {
    pub id: String,
    pub reason: RejectReason,
}

/// Failure registering or updating a host setting
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("setting {id} is already registered")]
    Duplicate { id: String },
    #[error("setting {id} is not registered")]
    Unknown { id: String },
    #[error("setting {id} expects a {expected} value")]
    TypeMismatch { id: String, expected: &'static str },
}

/// The document as seen by the loader: a list of resource elements that can
/// be searched and appended to. Nothing is ever removed.
#[async_trait]
pub trait ResourceRegistry: Send + Sync {
    /// Whether an element of `kind` whose URL matches `url` under `mode` exists
    async fn has_matching(
        &self,
        url: &str,
        kind: ResourceKind,
        mode: UrlMatch,
    ) -> Result<bool, RegistryError>;

    /// Create and attach a new element
    async fn insert(&self, descriptor: ResourceDescriptor) -> Result<ElementHandle, RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_match_accepts_query_suffix() {
        assert!(UrlMatch::Prefix.matches("/assets/app.css?v=2", "/assets/app.css"));
        assert!(!UrlMatch::Exact.matches("/assets/app.css?v=2", "/assets/app.css"));
        assert!(UrlMatch::Exact.matches("/assets/app.css", "/assets/app.css"));
    }

    #[test]
    fn load_results_render_original_shape() {
        let err = LoadError::Failed { url: "/x.js".into() };
        assert_eq!(
            err.to_json(),
            serde_json::json!({ "status": false, "message": "Failed to load the script /x.js" })
        );
        assert_eq!(
            LoadStatus::AlreadyLoaded.to_json()["message"],
            "Script already loaded"
        );
        assert!(LoadStatus::Loaded.to_json().get("message").is_none());
    }

    #[test]
    fn descriptor_defaults_follow_kind() {
        let d = ResourceDescriptor::new("/a.css", ResourceKind::Stylesheet);
        assert_eq!(d.mime_type, "text/css");
        assert_eq!(d.placement, Placement::Head);
        assert_eq!(ResourceKind::Stylesheet.url_attr(), "href");
        assert_eq!(ResourceKind::Script.tag(), "script");
    }
}
