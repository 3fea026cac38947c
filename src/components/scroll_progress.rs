use crate::config::{BackToTopConfig, NavConfig, ProgressConfig};
use crate::dom::{Document, DomNode, Init, Viewport};
use crate::error::EnhanceError;

/// Percentage of the scrollable distance covered, in `[0, 100]`.
///
/// A page that fits the viewport has nothing to scroll and reports `0`.
pub fn scroll_percent(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let max = scroll_height - client_height;
    if max > 0.0 {
        (scroll_top / max * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Nav-bar progress strip plus the ring around the back-to-top button.
pub struct ScrollProgress<N, V> {
    bar: N,
    ring: Option<N>,
    ring_property: String,
    viewport: V,
}

impl<N: DomNode, V: Viewport> ScrollProgress<N, V> {
    /// Finds or creates the progress bar inside the nav and paints the current position.
    pub fn init<D>(
        doc: &D,
        viewport: V,
        nav: &NavConfig,
        progress: &ProgressConfig,
        back_to_top: &BackToTopConfig,
    ) -> Result<Init<Self>, EnhanceError>
    where
        D: Document<Node = N>,
    {
        let Some(nav_bar) = doc.query(&nav.bar_selector) else {
            return Ok(Init::missing(nav.bar_selector.as_str()));
        };

        let bar = match doc.by_id(&progress.bar_id) {
            Some(existing) => existing,
            None => {
                let bar = doc.create_element("div")?;
                bar.set_attribute("id", &progress.bar_id)?;
                nav_bar.append_child(&bar)?;
                bar
            }
        };

        let component = Self {
            bar,
            ring: doc.by_id(&back_to_top.button_id),
            ring_property: progress.ring_property.clone(),
            viewport,
        };
        component.update();
        Ok(Init::Active(component))
    }

    /// Recomputes from the viewport and repaints; returns the percentage.
    pub fn update(&self) -> f64 {
        let pct = scroll_percent(
            self.viewport.scroll_top(),
            self.viewport.scroll_height(),
            self.viewport.client_height(),
        );
        let value = format!("{pct}%");
        self.bar.set_style("width", &value);
        if let Some(ring) = &self.ring {
            ring.set_style(&self.ring_property, &value);
        }
        pct
    }
}
