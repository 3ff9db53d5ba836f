pub mod menu;
pub mod placement;
pub mod settings;

use async_trait::async_trait;
use sie_core::SettingsError;

pub use menu::{MenuHandlers, MenuItem};
pub use placement::{Bounds, NodePlacement, PlacementOptions, Side, place_next_to};
pub use settings::{InMemorySettings, Setting, SettingKind, SettingOption, SettingsPanel};

pub const HELP_POPUP_SETTING: &str = "SIE.helpPopup";

/// Something the host editor calls once during its own setup
#[async_trait]
pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    async fn setup(&self, settings: &dyn SettingsPanel) -> Result<(), SettingsError>;
}

/// Context-menu extension; its only setup work is the help popup toggle
#[derive(Debug, Default, Clone)]
pub struct ContextMenuExtension;

impl ContextMenuExtension {
    pub fn new() -> Self {
        Self
    }

    pub fn help_popup_setting() -> Setting {
        Setting::boolean(HELP_POPUP_SETTING, "🦛 SIE: Help popups", true)
    }
}

#[async_trait]
impl Extension for ContextMenuExtension {
    fn name(&self) -> &str {
        "SIEContextmenu"
    }

    async fn setup(&self, settings: &dyn SettingsPanel) -> Result<(), SettingsError> {
        settings.add_setting(Self::help_popup_setting()).await?;
        tracing::info!("{} set up", self.name());
        Ok(())
    }
}
