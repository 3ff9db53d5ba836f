use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sie_core::SettingsError;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Boolean,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingOption {
    pub value: Value,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: String,
    pub name: String,
    pub default_value: Value,
    #[serde(rename = "type")]
    pub kind: SettingKind,
}

impl Setting {
    pub fn boolean(id: impl Into<String>, name: impl Into<String>, default_value: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            default_value: json!(default_value),
            kind: SettingKind::Boolean,
        }
    }

    /// Choices shown by the settings panel, with `current` marked selected
    pub fn options(&self, current: &Value) -> Vec<SettingOption> {
        match self.kind {
            SettingKind::Boolean => [(true, "On"), (false, "Off")]
                .into_iter()
                .map(|(value, text)| SettingOption {
                    value: json!(value),
                    text: text.to_string(),
                    selected: current == &json!(value),
                })
                .collect(),
        }
    }

    fn accepts(&self, value: &Value) -> Result<(), SettingsError> {
        match self.kind {
            SettingKind::Boolean if value.is_boolean() => Ok(()),
            SettingKind::Boolean => Err(SettingsError::TypeMismatch {
                id: self.id.clone(),
                expected: "boolean",
            }),
        }
    }
}

/// The host's settings dialog
#[async_trait]
pub trait SettingsPanel: Send + Sync {
    async fn add_setting(&self, setting: Setting) -> Result<(), SettingsError>;
}

#[derive(Default)]
struct Store {
    settings: Vec<Setting>,
    /// Current values keyed by full id; dots in ids carry no structure
    values: Map<String, Value>,
}

/// Settings panel kept in memory. Values start at their defaults.
#[derive(Default)]
pub struct InMemorySettings {
    store: Mutex<Store>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn settings(&self) -> Vec<Setting> {
        self.store.lock().await.settings.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Value> {
        let store = self.store.lock().await;
        let setting = store.settings.iter().find(|s| s.id == id)?;
        Some(
            store
                .values
                .get(id)
                .cloned()
                .unwrap_or_else(|| setting.default_value.clone()),
        )
    }

    pub async fn get_bool(&self, id: &str) -> Option<bool> {
        self.get(id).await.and_then(|v| v.as_bool())
    }

    pub async fn set(&self, id: &str, value: Value) -> Result<(), SettingsError> {
        let mut store = self.store.lock().await;
        let setting = store
            .settings
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SettingsError::Unknown { id: id.to_string() })?;
        setting.accepts(&value)?;

        store.values.insert(id.to_string(), value);
        Ok(())
    }
}

#[async_trait]
impl SettingsPanel for InMemorySettings {
    async fn add_setting(&self, setting: Setting) -> Result<(), SettingsError> {
        let mut store = self.store.lock().await;
        if store.settings.iter().any(|s| s.id == setting.id) {
            return Err(SettingsError::Duplicate { id: setting.id });
        }
        tracing::debug!("Registered setting {}", setting.id);
        store.settings.push(setting);
        Ok(())
    }
}
