//! Page contract and tunables for every enhancement.
//!
//! Defaults match the portfolio markup. A page can override any field by
//! defining a `window.FOLIO_CONFIG` object before the module loads; fields
//! it leaves out keep their defaults. Values are public page data.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::EnhanceError;

/// Name of the global object read for runtime overrides.
pub const RUNTIME_CONFIG_GLOBAL: &str = "FOLIO_CONFIG";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub log_level: String,
    pub theme: ThemeConfig,
    pub nav: NavConfig,
    pub back_to_top: BackToTopConfig,
    pub progress: ProgressConfig,
    pub email: EmailConfig,
    pub collapsibles: CollapsibleConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub toggle_id: String,
    pub dark_class: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub bar_selector: String,
    pub link_selector: String,
    pub scroll_link_selector: String,
    pub active_class: String,
    pub section_ids: Vec<String>,
    pub root_margin: String,
    pub threshold: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackToTopConfig {
    pub button_id: String,
    pub show_class: String,
    /// Scroll offset in CSS pixels above which the button is shown.
    pub show_at: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub bar_id: String,
    /// CSS custom property set on the back-to-top button for its ring.
    pub ring_property: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub button_id: String,
    pub address_attribute: String,
    pub copied_label: String,
    pub idle_label: String,
    pub revert_after_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollapsibleConfig {
    pub card_selector: String,
    pub heading_tag: String,
    pub content_class: String,
    pub collapsible_class: String,
    pub open_class: String,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            theme: ThemeConfig::default(),
            nav: NavConfig::default(),
            back_to_top: BackToTopConfig::default(),
            progress: ProgressConfig::default(),
            email: EmailConfig::default(),
            collapsibles: CollapsibleConfig::default(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
            toggle_id: "themeToggle".to_string(),
            dark_class: "dark".to_string(),
        }
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            bar_selector: ".site-nav".to_string(),
            link_selector: ".site-nav a".to_string(),
            scroll_link_selector: ".nav-link".to_string(),
            active_class: "active".to_string(),
            section_ids: ["Introduction", "Projects", "Experience", "Skills"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            // Ignore the top 30% and bottom 60% of the viewport.
            root_margin: "-30% 0px -60% 0px".to_string(),
            threshold: 0.01,
        }
    }
}

impl Default for BackToTopConfig {
    fn default() -> Self {
        Self {
            button_id: "backToTop".to_string(),
            show_class: "show".to_string(),
            show_at: 400.0,
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            bar_id: "scrollProgress".to_string(),
            ring_property: "--p".to_string(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            button_id: "copyEmail".to_string(),
            address_attribute: "data-email".to_string(),
            copied_label: "Copied!".to_string(),
            idle_label: "Copy Email".to_string(),
            revert_after_ms: 1200,
        }
    }
}

impl Default for CollapsibleConfig {
    fn default() -> Self {
        Self {
            card_selector: "#Projects .card, #Experience .card".to_string(),
            heading_tag: "h3".to_string(),
            content_class: "collapse-content".to_string(),
            collapsible_class: "collapsible".to_string(),
            open_class: "open".to_string(),
        }
    }
}

impl EnhanceConfig {
    /// Loads the defaults and applies the page's runtime override, if any.
    pub fn load() -> Self {
        match runtime_config() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring {}: {}", RUNTIME_CONFIG_GLOBAL, e);
                Self::default()
            }
        }
    }

    /// Level for the console logger; unknown names fall back to `Info`.
    pub fn log_level(&self) -> log::Level {
        log::Level::from_str(self.log_level.trim()).unwrap_or(log::Level::Info)
    }

    pub fn label_revert_delay(&self) -> Duration {
        Duration::from_millis(self.email.revert_after_ms)
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Result<Option<EnhanceConfig>, EnhanceError> {
    use js_sys::Reflect;
    use wasm_bindgen::JsValue;

    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = Reflect::get(&window, &JsValue::from_str(RUNTIME_CONFIG_GLOBAL))
        .map_err(|e| EnhanceError::Config(EnhanceError::describe(&e)))?;
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }

    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| EnhanceError::Config(e.to_string()))
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Result<Option<EnhanceConfig>, EnhanceError> {
    Ok(None)
}
