use serde::{Deserialize, Serialize};

use crate::config::ThemeConfig;
use crate::dom::{Document, DomNode, Init};
use crate::error::EnhanceError;

/// Durable key-value storage for the theme preference (`localStorage` in the browser).
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str) -> Result<(), EnhanceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parses a stored preference. Anything other than "dark"/"light" counts as unset.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label for the toggle button: the theme a click switches to.
    pub fn toggle_label(self) -> &'static str {
        match self.toggled() {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }
}

/// The dark/light switch. Body carries the dark marker class; the button shows the next action.
pub struct ThemeToggle<N, S> {
    body: N,
    button: N,
    store: S,
    storage_key: String,
    dark_class: String,
}

impl<N: DomNode, S: PreferenceStore> ThemeToggle<N, S> {
    /// Applies the saved preference and labels the button.
    pub fn init<D>(doc: &D, store: S, config: &ThemeConfig) -> Init<Self>
    where
        D: Document<Node = N>,
    {
        let Some(button) = doc.by_id(&config.toggle_id) else {
            return Init::missing(format!("#{}", config.toggle_id));
        };
        let Some(body) = doc.body() else {
            return Init::missing("<body>");
        };

        match store.load(&config.storage_key).as_deref().and_then(Theme::parse) {
            Some(Theme::Dark) => body.add_class(&config.dark_class),
            Some(Theme::Light) => body.remove_class(&config.dark_class),
            None => {}
        }

        let toggle = Self {
            body,
            button,
            store,
            storage_key: config.storage_key.clone(),
            dark_class: config.dark_class.clone(),
        };
        toggle.refresh_label();
        log::debug!("Theme toggle ready ({})", toggle.current().as_str());
        Init::Active(toggle)
    }

    pub fn button(&self) -> &N {
        &self.button
    }

    pub fn current(&self) -> Theme {
        if self.body.has_class(&self.dark_class) {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Flips the theme and persists it. A failed write keeps the new look for this page view.
    pub fn click(&self) -> Theme {
        self.body.toggle_class(&self.dark_class);
        let theme = self.current();
        if let Err(e) = self.store.save(&self.storage_key, theme.as_str()) {
            log::warn!("Failed to save theme preference: {}", e);
        }
        self.refresh_label();
        theme
    }

    fn refresh_label(&self) {
        self.button.set_text(self.current().toggle_label());
    }
}
