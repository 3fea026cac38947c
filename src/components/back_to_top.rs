use crate::config::BackToTopConfig;
use crate::dom::{Document, DomNode, Init, Viewport};

pub struct BackToTop<N, V> {
    button: N,
    viewport: V,
    show_at: f64,
    show_class: String,
}

impl<N: DomNode, V: Viewport> BackToTop<N, V> {
    pub fn init<D>(doc: &D, viewport: V, config: &BackToTopConfig) -> Init<Self>
    where
        D: Document<Node = N>,
    {
        let Some(button) = doc.by_id(&config.button_id) else {
            return Init::missing(format!("#{}", config.button_id));
        };
        Init::Active(Self {
            button,
            viewport,
            show_at: config.show_at,
            show_class: config.show_class.clone(),
        })
    }

    pub fn button(&self) -> &N {
        &self.button
    }

    /// Shows the button strictly past the threshold. Returns whether it is visible.
    pub fn on_scroll(&self, offset: f64) -> bool {
        let visible = offset > self.show_at;
        if visible {
            self.button.add_class(&self.show_class);
        } else {
            self.button.remove_class(&self.show_class);
        }
        visible
    }

    /// Reads the offset from the viewport; what the scroll listener calls.
    pub fn refresh(&self) -> bool {
        self.on_scroll(self.viewport.scroll_top())
    }

    pub fn click(&self) {
        self.viewport.scroll_to_top();
    }
}
