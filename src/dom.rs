//! Capabilities the enhancements need from the page.
//!
//! Components are written against these traits instead of `web_sys` so the
//! same code runs against the live DOM (see `browser`) and against the
//! in-memory fakes used in tests.

use crate::error::EnhanceError;

/// An element in the page.
///
/// Clones are handles to the same element, like `web_sys::Element`.
pub trait DomNode: Clone {
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);

    /// Flips `class` and returns whether it is now present.
    fn toggle_class(&self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str) -> Result<(), EnhanceError>;

    /// Sets an inline style property. Custom properties (`--name`) are allowed.
    fn set_style(&self, property: &str, value: &str);

    /// First descendant matching `selector`.
    fn query(&self, selector: &str) -> Option<Self>;

    fn append_child(&self, child: &Self) -> Result<(), EnhanceError>;

    /// Moves every sibling node after this one, text included, into `target`.
    fn move_following_siblings(&self, target: &Self) -> Result<(), EnhanceError>;

    /// Smoothly scrolls so this element aligns with the top of the viewport.
    fn scroll_into_view(&self);
}

/// Lookup and creation of elements.
pub trait Document {
    type Node: DomNode;

    fn body(&self) -> Option<Self::Node>;
    fn by_id(&self, id: &str) -> Option<Self::Node>;
    fn query(&self, selector: &str) -> Option<Self::Node>;
    /// Every match, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn create_element(&self, tag: &str) -> Result<Self::Node, EnhanceError>;
}

/// Scroll geometry of the document.
pub trait Viewport {
    fn scroll_top(&self) -> f64;
    fn scroll_height(&self) -> f64;
    fn client_height(&self) -> f64;
    /// Smoothly scrolls the document back to the top.
    fn scroll_to_top(&self);
}

/// Outcome of initializing a component against the current page.
#[must_use]
#[derive(Debug)]
pub enum Init<T> {
    Active(T),
    /// A required element is missing; names what was looked for.
    NotApplicable(String),
}

impl<T> Init<T> {
    pub fn missing(what: impl Into<String>) -> Self {
        Init::NotApplicable(what.into())
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Init::Active(_))
    }

    pub fn active(self) -> Option<T> {
        match self {
            Init::Active(component) => Some(component),
            Init::NotApplicable(_) => None,
        }
    }
}
