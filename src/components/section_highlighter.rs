//! Marks the nav link of the section currently in the reading band.
//!
//! The band is defined by the observer options: a root margin of
//! `-30% 0px -60% 0px` leaves only the 10% strip starting 30% down the
//! viewport, and a threshold of `0.01` fires as soon as a section touches it.

use crate::config::NavConfig;
use crate::dom::{Document, DomNode, Init};

/// Options handed to the platform observer.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityOptions {
    pub root_margin: String,
    pub threshold: f64,
}

impl From<&NavConfig> for VisibilityOptions {
    fn from(config: &NavConfig) -> Self {
        Self {
            root_margin: config.root_margin.clone(),
            threshold: config.threshold,
        }
    }
}

/// One visibility change reported by the observer.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry {
    pub id: String,
    pub is_intersecting: bool,
}

/// Reports visibility changes for observed elements (an `IntersectionObserver` in the browser).
pub trait VisibilityObserver<N> {
    fn observe(&self, target: &N);
}

pub struct SectionHighlighter<N> {
    sections: Vec<N>,
    links: Vec<N>,
    active_class: String,
}

impl<N: DomNode> SectionHighlighter<N> {
    pub fn init<D>(doc: &D, config: &NavConfig) -> Init<Self>
    where
        D: Document<Node = N>,
    {
        let sections: Vec<N> = config
            .section_ids
            .iter()
            .filter_map(|id| doc.by_id(id))
            .collect();
        if sections.is_empty() {
            return Init::missing("highlighted sections");
        }

        Init::Active(Self {
            sections,
            links: doc.query_all(&config.link_selector),
            active_class: config.active_class.clone(),
        })
    }

    /// Registers every present section with `observer`.
    pub fn observe_with<O: VisibilityObserver<N>>(&self, observer: &O) {
        for section in &self.sections {
            observer.observe(section);
        }
    }

    /// Applies a batch of entries in delivery order. Returns the id left active, if any changed.
    pub fn on_visibility(&self, entries: &[VisibilityEntry]) -> Option<String> {
        let mut activated = None;
        for entry in entries {
            let Some(link) = self.link_for(&entry.id) else {
                continue;
            };
            if entry.is_intersecting {
                for other in &self.links {
                    other.remove_class(&self.active_class);
                }
                link.add_class(&self.active_class);
                activated = Some(entry.id.clone());
            }
        }
        activated
    }

    fn link_for(&self, id: &str) -> Option<&N> {
        let href = format!("#{id}");
        self.links
            .iter()
            .find(|link| link.attribute("href").as_deref() == Some(href.as_str()))
    }
}
