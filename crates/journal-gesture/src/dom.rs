//! Minimal element tree with bubbling dispatch of double activations.
//!
//! Elements carry a tag, attributes, classes, and text. Removing an element
//! detaches it (and its subtree) from the tree; detached elements keep their
//! data so late reconciliation code can still read them.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::bridge::DoubleActivation;

/// Handle of an element inside one `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a listener lets the event continue to the next ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// Listener for double activations. Receives the event and the element the
/// listener is attached to (the current target).
pub type DoubleActivationListener = Box<dyn FnMut(&DoubleActivation, ElementId) -> Propagation>;

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    text: String,
    attached: bool,
}

/// Summary of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// Number of listeners invoked.
    pub delivered: usize,
    /// Element whose listener stopped propagation, if any.
    pub stopped_at: Option<ElementId>,
}

/// The page: a rooted element tree plus its listeners.
pub struct Document {
    elements: Vec<Element>,
    listeners: HashMap<ElementId, Vec<DoubleActivationListener>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.elements.len())
            .field("listeners", &self.listeners.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

impl Document {
    /// Create a document holding only its root element.
    pub fn new() -> Self {
        Self {
            elements: vec![Element {
                tag: "document".into(),
                parent: None,
                children: Vec::new(),
                attributes: BTreeMap::new(),
                classes: BTreeSet::new(),
                text: String::new(),
                attached: true,
            }],
            listeners: HashMap::new(),
        }
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    /// Append a new element as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        self.insert(parent, tag, false)
    }

    /// Insert a new element as the first child of `parent`.
    pub fn prepend(&mut self, parent: ElementId, tag: &str) -> ElementId {
        self.insert(parent, tag, true)
    }

    fn insert(&mut self, parent: ElementId, tag: &str, at_head: bool) -> ElementId {
        let id = ElementId(self.elements.len());
        let attached = self.is_attached(parent);
        self.elements.push(Element {
            tag: tag.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            attributes: BTreeMap::new(),
            classes: BTreeSet::new(),
            text: String::new(),
            attached,
        });
        if let Some(p) = self.get_mut(parent) {
            if at_head {
                p.children.insert(0, id);
            } else {
                p.children.push(id);
            }
        }
        id
    }

    /// Detach `id` and its subtree from the document.
    pub fn remove(&mut self, id: ElementId) {
        if id == self.root() {
            return;
        }
        let parent = self.get(id).and_then(|el| el.parent);
        if let Some(parent) = parent {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|child| *child != id);
            }
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(el) = self.get_mut(current) {
                el.attached = false;
                stack.extend(el.children.iter().copied());
            }
        }
        if let Some(el) = self.get_mut(id) {
            el.parent = None;
        }
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(|el| el.attached)
    }

    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|el| el.tag.as_str())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|el| el.parent)
    }

    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.get(id).map(|el| el.children.clone()).unwrap_or_default()
    }

    /// The element followed by its ancestors up to the root of its tree.
    pub fn path_to_root(&self, id: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut current = self.get(id).map(|_| id);
        while let Some(el) = current {
            path.push(el);
            current = self.parent(el);
        }
        path
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id)
            .and_then(|el| el.attributes.get(name))
            .map(String::as_str)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.get_mut(id) {
            el.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.get_mut(id) {
            el.classes.remove(class);
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|el| el.classes.contains(class))
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.text = text.into();
        }
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|el| el.text.as_str())
    }

    /// First attached element whose `id` attribute equals `html_id`.
    pub fn element_by_id(&self, html_id: &str) -> Option<ElementId> {
        self.find_attached(|el| el.attributes.get("id").is_some_and(|v| v == html_id))
    }

    /// All attached elements carrying `class`, in creation order.
    pub fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.attached && el.classes.contains(class))
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    /// Nearest element on the path from `id` to the root that carries `class`.
    pub fn closest_with_class(&self, id: ElementId, class: &str) -> Option<ElementId> {
        self.path_to_root(id)
            .into_iter()
            .find(|el| self.has_class(*el, class))
    }

    fn find_attached(&self, pred: impl Fn(&Element) -> bool) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|el| el.attached && pred(el))
            .map(ElementId)
    }

    pub fn on_double_activation(&mut self, id: ElementId, listener: DoubleActivationListener) {
        self.listeners.entry(id).or_default().push(listener);
    }

    pub fn listener_count(&self, id: ElementId) -> usize {
        self.listeners.get(&id).map(Vec::len).unwrap_or(0)
    }

    /// Deliver `event` to listeners on its target, then on each ancestor,
    /// until a listener stops propagation.
    pub fn dispatch_double_activation(&mut self, event: &DoubleActivation) -> DispatchReport {
        let mut report = DispatchReport::default();
        for current in self.path_to_root(event.target) {
            let Some(listeners) = self.listeners.get_mut(&current) else {
                continue;
            };
            let mut stop = false;
            for listener in listeners.iter_mut() {
                report.delivered += 1;
                if listener(event, current) == Propagation::Stop {
                    stop = true;
                }
            }
            if stop {
                report.stopped_at = Some(current);
                break;
            }
        }
        report
    }
}
