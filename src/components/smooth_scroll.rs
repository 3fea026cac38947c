use crate::config::NavConfig;
use crate::dom::{Document, DomNode, Init};

/// What the click handler should do with the browser's default navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Leave the click alone.
    Default,
    /// We scrolled to the target; suppress the jump.
    Smooth,
}

/// Smooth scrolling for in-page nav links.
pub struct SmoothScrollLinks<N> {
    links: Vec<N>,
}

impl<N: DomNode> SmoothScrollLinks<N> {
    pub fn init<D>(doc: &D, config: &NavConfig) -> Init<Self>
    where
        D: Document<Node = N>,
    {
        let links = doc.query_all(&config.scroll_link_selector);
        if links.is_empty() {
            return Init::missing(config.scroll_link_selector.as_str());
        }
        log::debug!("Smooth scrolling {} nav links", links.len());
        Init::Active(Self { links })
    }

    pub fn links(&self) -> &[N] {
        &self.links
    }

    /// Handles a click on a link whose `href` attribute is `href`.
    pub fn click<D>(&self, href: &str, doc: &D) -> ScrollOutcome
    where
        D: Document<Node = N>,
    {
        let Some(id) = anchor_id(href) else {
            return ScrollOutcome::Default;
        };
        match doc.by_id(id) {
            Some(target) => {
                target.scroll_into_view();
                ScrollOutcome::Smooth
            }
            None => ScrollOutcome::Default,
        }
    }
}

/// `"#Projects"` → `Some("Projects")`. External links and a bare `"#"` have no anchor.
pub fn anchor_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}
