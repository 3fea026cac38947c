//! "Copy Email" button.
//!
//! The async Clipboard API is tried first. When it is missing (insecure
//! context, old browser) or rejects (permissions), the address is copied
//! through a selected temporary textarea and the legacy `copy` command.
//! That second path only exists for older browsers; `execCommand` is
//! deprecated and kept purely for compatibility.

use std::time::Duration;

use crate::config::EmailConfig;
use crate::dom::{Document, DomNode, Init};
use crate::error::EnhanceError;

/// Asynchronous clipboard write (`navigator.clipboard.writeText`).
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), EnhanceError>;
}

/// Synchronous copy through a selection and `document.execCommand("copy")`.
pub trait LegacyCopy {
    fn copy_via_selection(&self, text: &str) -> Result<(), EnhanceError>;
}

/// One-shot delayed callbacks. Scheduled tasks are never cancelled.
pub trait Timer {
    fn after(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Which mechanism put the address on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    Clipboard,
    Legacy,
}

pub struct EmailCopier<N, C, L, T> {
    button: N,
    clipboard: C,
    fallback: L,
    timer: T,
    address_attribute: String,
    copied_label: String,
    idle_label: String,
    revert_after: Duration,
}

impl<N, C, L, T> EmailCopier<N, C, L, T>
where
    N: DomNode + 'static,
    C: Clipboard,
    L: LegacyCopy,
    T: Timer,
{
    pub fn init<D>(doc: &D, clipboard: C, fallback: L, timer: T, config: &EmailConfig) -> Init<Self>
    where
        D: Document<Node = N>,
    {
        let Some(button) = doc.by_id(&config.button_id) else {
            return Init::missing(format!("#{}", config.button_id));
        };
        Init::Active(Self {
            button,
            clipboard,
            fallback,
            timer,
            address_attribute: config.address_attribute.clone(),
            copied_label: config.copied_label.clone(),
            idle_label: config.idle_label.clone(),
            revert_after: Duration::from_millis(config.revert_after_ms),
        })
    }

    pub fn button(&self) -> &N {
        &self.button
    }

    /// The address as currently written on the button.
    pub fn address(&self) -> String {
        self.button
            .attribute(&self.address_attribute)
            .unwrap_or_else(|| {
                log::warn!("Copy button has no {} attribute", self.address_attribute);
                String::new()
            })
    }

    /// Copies the address and flashes the confirmation label, whichever path worked.
    pub async fn copy(&self) -> CopyPath {
        let address = self.address();
        let path = match self.clipboard.write_text(&address).await {
            Ok(()) => CopyPath::Clipboard,
            Err(e) => {
                log::debug!("Clipboard API failed, using selection copy: {}", e);
                if let Err(e) = self.fallback.copy_via_selection(&address) {
                    log::warn!("Selection copy failed: {}", e);
                }
                CopyPath::Legacy
            }
        };
        self.flash_copied();
        path
    }

    fn flash_copied(&self) {
        self.button.set_text(&self.copied_label);
        let button = self.button.clone();
        let idle = self.idle_label.clone();
        self.timer
            .after(self.revert_after, Box::new(move || button.set_text(&idle)));
    }
}
