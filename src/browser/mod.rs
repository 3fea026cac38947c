//! `web_sys` implementations of the page capabilities.

mod events;

use std::time::Duration;

use js_sys::{Array, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Element, HtmlDocument, HtmlElement, HtmlTextAreaElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions, Storage, Window,
};

use crate::components::email_copier::{Clipboard, LegacyCopy, Timer};
use crate::components::section_highlighter::{
    VisibilityEntry, VisibilityObserver, VisibilityOptions,
};
use crate::dom::{Document, DomNode, Viewport};
use crate::error::EnhanceError;
use crate::theme::PreferenceStore;

pub use events::{on_click, on_window};

fn dom_error(e: JsValue) -> EnhanceError {
    EnhanceError::Dom(EnhanceError::describe(&e))
}

impl DomNode for Element {
    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        let _ = self.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.class_list().remove_1(class);
    }

    fn text(&self) -> String {
        self.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), EnhanceError> {
        Element::set_attribute(self, name, value).map_err(dom_error)
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Some(html) = self.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property(property, value);
        }
    }

    fn query(&self, selector: &str) -> Option<Self> {
        self.query_selector(selector).ok().flatten()
    }

    fn append_child(&self, child: &Self) -> Result<(), EnhanceError> {
        web_sys::Node::append_child(self, child)
            .map(|_| ())
            .map_err(dom_error)
    }

    fn move_following_siblings(&self, target: &Self) -> Result<(), EnhanceError> {
        // Appending detaches the node, so the next sibling is always the next one to move.
        while let Some(node) = self.next_sibling() {
            web_sys::Node::append_child(target, &node).map_err(dom_error)?;
        }
        Ok(())
    }

    fn scroll_into_view(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        self.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

#[derive(Clone)]
pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl Document for BrowserDocument {
    type Node = Element;

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            log::warn!("Invalid selector: {}", selector);
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn create_element(&self, tag: &str) -> Result<Element, EnhanceError> {
        self.document.create_element(tag).map_err(dom_error)
    }
}

/// `localStorage`, which can be missing (privacy modes, sandboxed iframes).
pub struct LocalStore {
    window: Window,
}

impl LocalStore {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn storage(&self) -> Option<Storage> {
        self.window.local_storage().ok().flatten()
    }
}

impl PreferenceStore for LocalStore {
    fn load(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn save(&self, key: &str, value: &str) -> Result<(), EnhanceError> {
        let storage = self
            .storage()
            .ok_or_else(|| EnhanceError::Storage("localStorage is unavailable".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|e| EnhanceError::Storage(EnhanceError::describe(&e)))
    }
}

#[derive(Clone)]
pub struct WindowViewport {
    window: Window,
}

impl WindowViewport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn root(&self) -> Option<Element> {
        self.window.document()?.document_element()
    }
}

impl Viewport for WindowViewport {
    fn scroll_top(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_height(&self) -> f64 {
        self.root().map_or(0.0, |el| f64::from(el.scroll_height()))
    }

    fn client_height(&self) -> f64 {
        self.root().map_or(0.0, |el| f64::from(el.client_height()))
    }

    fn scroll_to_top(&self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

/// `navigator.clipboard`, absent outside secure contexts.
pub struct NavigatorClipboard {
    window: Window,
}

impl NavigatorClipboard {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Clipboard for NavigatorClipboard {
    async fn write_text(&self, text: &str) -> Result<(), EnhanceError> {
        let navigator = self.window.navigator();
        let value = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .map_err(|e| EnhanceError::Clipboard(EnhanceError::describe(&e)))?;
        if value.is_undefined() || value.is_null() {
            return Err(EnhanceError::Clipboard(
                "navigator.clipboard is unavailable".to_string(),
            ));
        }
        let clipboard: web_sys::Clipboard = value.unchecked_into();
        JsFuture::from(clipboard.write_text(text))
            .await
            .map(|_| ())
            .map_err(|e| EnhanceError::Clipboard(EnhanceError::describe(&e)))
    }
}

/// Copies through a temporary selected `<textarea>` and `execCommand("copy")`.
///
/// Only for browsers without the async Clipboard API.
pub struct SelectionCopy {
    document: web_sys::Document,
}

impl SelectionCopy {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl LegacyCopy for SelectionCopy {
    fn copy_via_selection(&self, text: &str) -> Result<(), EnhanceError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| EnhanceError::Dom("document has no body".to_string()))?;
        let area: HtmlTextAreaElement = self
            .document
            .create_element("textarea")
            .map_err(dom_error)?
            .dyn_into()
            .map_err(|_| EnhanceError::Dom("textarea is not an HtmlTextAreaElement".to_string()))?;
        area.set_value(text);
        let _ = area.set_attribute("readonly", "");
        let _ = area
            .style()
            .set_css_text("position: fixed; top: 0; left: 0; opacity: 0;");

        web_sys::Node::append_child(&body, &area).map_err(dom_error)?;
        area.select();
        let copied = self
            .document
            .dyn_ref::<HtmlDocument>()
            .ok_or_else(|| EnhanceError::Dom("not an HTML document".to_string()))
            .and_then(|html| {
                html.exec_command("copy")
                    .map_err(|e| EnhanceError::Clipboard(EnhanceError::describe(&e)))
            });
        area.remove();

        if copied? {
            Ok(())
        } else {
            Err(EnhanceError::Clipboard("copy command was refused".to_string()))
        }
    }
}

/// Browser timeouts through Leptos' `set_timeout`.
pub struct TimeoutTimer;

impl Timer for TimeoutTimer {
    fn after(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        leptos::prelude::set_timeout(task, delay);
    }
}

/// An `IntersectionObserver` whose callback receives plain `VisibilityEntry` batches.
pub struct IntersectionVisibility {
    observer: IntersectionObserver,
}

impl IntersectionVisibility {
    pub fn new(
        options: &VisibilityOptions,
        on_entries: impl Fn(Vec<VisibilityEntry>) + 'static,
    ) -> Result<Self, EnhanceError> {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let batch = entries
                    .iter()
                    .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| VisibilityEntry {
                        id: entry.target().id(),
                        is_intersecting: entry.is_intersecting(),
                    })
                    .collect();
                on_entries(batch);
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(dom_error)?;
        // The observer calls back for the lifetime of the page.
        callback.forget();

        Ok(Self { observer })
    }
}

impl VisibilityObserver<Element> for IntersectionVisibility {
    fn observe(&self, target: &Element) {
        self.observer.observe(target);
    }
}
