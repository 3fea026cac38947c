//! In-memory stand-ins for the browser, used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::components::email_copier::{Clipboard, LegacyCopy, Timer};
use crate::components::section_highlighter::VisibilityObserver;
use crate::dom::{Document, DomNode, Viewport};
use crate::error::EnhanceError;
use crate::theme::PreferenceStore;

const TEXT_TAG: &str = "#text";

#[derive(Default)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    text: String,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    children: Vec<FakeNode>,
    parent: Weak<RefCell<NodeData>>,
    scroll_requests: usize,
}

/// A tiny DOM element: tag, classes, attributes, inline styles and children.
#[derive(Clone)]
pub struct FakeNode(Rc<RefCell<NodeData>>);

impl FakeNode {
    pub fn element(tag: &str) -> Self {
        FakeNode(Rc::new(RefCell::new(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        })))
    }

    pub fn text_node(text: &str) -> Self {
        let node = Self::element(TEXT_TAG);
        node.0.borrow_mut().text = text.to_string();
        node
    }

    pub fn with_id(self, id: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert("id".to_string(), id.to_string());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(self, child: FakeNode) -> Self {
        self.append_child(&child).unwrap();
        self
    }

    pub fn ptr_eq(&self, other: &FakeNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    pub fn children(&self) -> Vec<FakeNode> {
        self.0.borrow().children.clone()
    }

    pub fn parent(&self) -> Option<FakeNode> {
        self.0.borrow().parent.upgrade().map(FakeNode)
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    pub fn scroll_requests(&self) -> usize {
        self.0.borrow().scroll_requests
    }

    fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent
                .0
                .borrow_mut()
                .children
                .retain(|c| !c.ptr_eq(self));
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    /// Depth-first, self included, in document order.
    fn walk(&self, out: &mut Vec<FakeNode>) {
        out.push(self.clone());
        for child in self.children() {
            child.walk(out);
        }
    }

    fn descendants(&self) -> Vec<FakeNode> {
        let mut out = Vec::new();
        self.walk(&mut out);
        out.remove(0);
        out
    }

    fn matches_compound(&self, compound: &str) -> bool {
        if self.tag() == TEXT_TAG {
            return false;
        }
        let mut rest = compound;
        let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
        let (tag, tail) = rest.split_at(tag_end);
        if !tag.is_empty() && tag != self.tag() {
            return false;
        }
        rest = tail;
        while !rest.is_empty() {
            let marker = rest.as_bytes()[0];
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            let ok = match marker {
                b'#' => self.id().as_deref() == Some(name),
                _ => self.has_class(name),
            };
            if !ok {
                return false;
            }
            rest = &body[end..];
        }
        true
    }

    /// Descendant-combinator selectors with comma-separated alternatives.
    fn matches(&self, selector: &str) -> bool {
        selector.split(',').any(|alternative| {
            let parts: Vec<&str> = alternative.split_whitespace().collect();
            let Some((last, ancestors)) = parts.split_last() else {
                return false;
            };
            if !self.matches_compound(last) {
                return false;
            }
            let mut pending: Vec<&str> = ancestors.to_vec();
            let mut current = self.parent();
            while let Some(node) = current {
                let Some(part) = pending.last().copied() else {
                    break;
                };
                if node.matches_compound(part) {
                    pending.pop();
                }
                current = node.parent();
            }
            pending.is_empty()
        })
    }
}

impl DomNode for FakeNode {
    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn text(&self) -> String {
        let data = self.0.borrow();
        if data.children.is_empty() {
            data.text.clone()
        } else {
            data.children.iter().map(|c| c.text()).collect()
        }
    }

    fn set_text(&self, text: &str) {
        let mut data = self.0.borrow_mut();
        data.children.clear();
        data.text = text.to_string();
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), EnhanceError> {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_style(&self, property: &str, value: &str) {
        self.0
            .borrow_mut()
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn query(&self, selector: &str) -> Option<Self> {
        self.descendants().into_iter().find(|n| n.matches(selector))
    }

    fn append_child(&self, child: &Self) -> Result<(), EnhanceError> {
        if child.ptr_eq(self) {
            return Err(EnhanceError::Dom("cannot append a node to itself".to_string()));
        }
        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
        Ok(())
    }

    fn move_following_siblings(&self, target: &Self) -> Result<(), EnhanceError> {
        let Some(parent) = self.parent() else {
            return Ok(());
        };
        let siblings = parent.children();
        let Some(position) = siblings.iter().position(|c| c.ptr_eq(self)) else {
            return Ok(());
        };
        for node in &siblings[position + 1..] {
            target.append_child(node)?;
        }
        Ok(())
    }

    fn scroll_into_view(&self) {
        self.0.borrow_mut().scroll_requests += 1;
    }
}

/// A document rooted at `<html>` with a `<body>`.
pub struct FakeDocument {
    root: FakeNode,
    body: FakeNode,
}

impl FakeDocument {
    pub fn new() -> Self {
        let body = FakeNode::element("body");
        let root = FakeNode::element("html").with_child(body.clone());
        Self { root, body }
    }

    /// Appends `node` to `<body>` and returns it.
    pub fn add(&self, node: FakeNode) -> FakeNode {
        self.body.append_child(&node).unwrap();
        node
    }

    pub fn body_node(&self) -> FakeNode {
        self.body.clone()
    }

    fn all(&self) -> Vec<FakeNode> {
        self.root.descendants()
    }
}

impl Document for FakeDocument {
    type Node = FakeNode;

    fn body(&self) -> Option<FakeNode> {
        Some(self.body.clone())
    }

    fn by_id(&self, id: &str) -> Option<FakeNode> {
        self.all()
            .into_iter()
            .find(|n| n.id().as_deref() == Some(id))
    }

    fn query(&self, selector: &str) -> Option<FakeNode> {
        self.all().into_iter().find(|n| n.matches(selector))
    }

    fn query_all(&self, selector: &str) -> Vec<FakeNode> {
        self.all().into_iter().filter(|n| n.matches(selector)).collect()
    }

    fn create_element(&self, tag: &str) -> Result<FakeNode, EnhanceError> {
        Ok(FakeNode::element(tag))
    }
}

/// `localStorage` backed by a shared map; clones see the same entries.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn fail_writes(&self) {
        self.fail_writes.set(true);
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), EnhanceError> {
        if self.fail_writes.get() {
            return Err(EnhanceError::Storage("quota exceeded".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeViewport {
    pub scroll_top: Rc<Cell<f64>>,
    pub scroll_height: Rc<Cell<f64>>,
    pub client_height: Rc<Cell<f64>>,
    pub scrolls_to_top: Rc<Cell<usize>>,
}

impl FakeViewport {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        let viewport = Self::default();
        viewport.scroll_top.set(scroll_top);
        viewport.scroll_height.set(scroll_height);
        viewport.client_height.set(client_height);
        viewport
    }
}

impl Viewport for FakeViewport {
    fn scroll_top(&self) -> f64 {
        self.scroll_top.get()
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height.get()
    }

    fn client_height(&self) -> f64 {
        self.client_height.get()
    }

    fn scroll_to_top(&self) {
        self.scrolls_to_top.set(self.scrolls_to_top.get() + 1);
        self.scroll_top.set(0.0);
    }
}

/// Clipboard that either accepts writes or behaves as if the API is missing.
#[derive(Clone, Default)]
pub struct FakeClipboard {
    pub unavailable: bool,
    pub written: Rc<RefCell<Vec<String>>>,
}

impl FakeClipboard {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }
}

impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<(), EnhanceError> {
        if self.unavailable {
            return Err(EnhanceError::Clipboard(
                "navigator.clipboard is unavailable".to_string(),
            ));
        }
        self.written.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeLegacyCopy {
    pub broken: bool,
    pub copied: Rc<RefCell<Vec<String>>>,
}

impl LegacyCopy for FakeLegacyCopy {
    fn copy_via_selection(&self, text: &str) -> Result<(), EnhanceError> {
        if self.broken {
            return Err(EnhanceError::Clipboard("copy command refused".to_string()));
        }
        self.copied.borrow_mut().push(text.to_string());
        Ok(())
    }
}

type PendingTask = (Duration, Box<dyn FnOnce()>);

/// Holds scheduled callbacks until the test fires them.
#[derive(Clone, Default)]
pub struct ManualTimer {
    pending: Rc<RefCell<Vec<PendingTask>>>,
}

impl ManualTimer {
    pub fn delays(&self) -> Vec<Duration> {
        self.pending.borrow().iter().map(|(d, _)| *d).collect()
    }

    pub fn fire_all(&self) {
        let due: Vec<PendingTask> = self.pending.borrow_mut().drain(..).collect();
        for (_, task) in due {
            task();
        }
    }
}

impl Timer for ManualTimer {
    fn after(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        self.pending.borrow_mut().push((delay, task));
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub observed: RefCell<Vec<Option<String>>>,
}

impl VisibilityObserver<FakeNode> for RecordingObserver {
    fn observe(&self, target: &FakeNode) {
        self.observed.borrow_mut().push(target.id());
    }
}

mod tests {
    use super::*;

    #[test]
    fn test_descendant_selector_with_alternatives() {
        let doc = FakeDocument::new();
        let projects = doc.add(FakeNode::element("section").with_id("Projects"));
        let card_a = FakeNode::element("div").with_class("card");
        projects.append_child(&card_a).unwrap();
        let loose = doc.add(FakeNode::element("div").with_class("card"));
        let experience = doc.add(FakeNode::element("section").with_id("Experience"));
        let card_b = FakeNode::element("div").with_class("card");
        experience.append_child(&card_b).unwrap();

        let found = doc.query_all("#Projects .card, #Experience .card");
        assert_eq!(found.len(), 2);
        assert!(found[0].ptr_eq(&card_a));
        assert!(found[1].ptr_eq(&card_b));
        assert!(!found.iter().any(|n| n.ptr_eq(&loose)));
    }

    #[test]
    fn test_move_following_siblings_keeps_order() {
        let card = FakeNode::element("div");
        let heading = FakeNode::element("h3");
        card.append_child(&heading).unwrap();
        card.append_child(&FakeNode::text_node("a")).unwrap();
        card.append_child(&FakeNode::element("p").with_text("b")).unwrap();

        let wrapper = FakeNode::element("div");
        heading.move_following_siblings(&wrapper).unwrap();

        assert_eq!(card.children().len(), 1);
        assert_eq!(wrapper.text(), "ab");
        assert!(wrapper.children()[0].parent().unwrap().ptr_eq(&wrapper));
    }
}
