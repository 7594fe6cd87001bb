//! Document - High-level document API
//!
//! `Document` is a cheap, clonable handle. Listeners receive it during
//! dispatch and may mutate the tree or the listener registry; no borrow is
//! held while a listener runs.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use fq_css::SelectorList;

use crate::{
    DomResult, DomTree, ElementRef, Event, EventPhase, Generation, Listener, ListenerRegistry,
    NodeId,
};

struct DocumentInner {
    url: String,
    tree: RefCell<DomTree>,
    listeners: RefCell<ListenerRegistry>,
    html_element: Cell<NodeId>,
    head_element: Cell<NodeId>,
    body_element: Cell<NodeId>,
}

/// HTML Document
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

impl Document {
    /// Create a document with an `html` / `head` / `body` skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let root = tree.root();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let linked = tree
            .append_child(root, html)
            .and_then(|_| tree.append_child(html, head))
            .and_then(|_| tree.append_child(html, body));
        debug_assert!(linked.is_ok(), "document skeleton: {linked:?}");

        let document = Self::from_tree(url, tree);
        document.inner.html_element.set(html);
        document.inner.head_element.set(head);
        document.inner.body_element.set(body);
        document
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self::from_tree(url, DomTree::new())
    }

    fn from_tree(url: &str, tree: DomTree) -> Self {
        Self {
            inner: Rc::new(DocumentInner {
                url: url.to_string(),
                tree: RefCell::new(tree),
                listeners: RefCell::new(ListenerRegistry::new()),
                html_element: Cell::new(NodeId::NONE),
                head_element: Cell::new(NodeId::NONE),
                body_element: Cell::new(NodeId::NONE),
            }),
        }
    }

    /// Locate `html`, `head` and `body` after the tree was built externally
    pub fn finalize(&self) {
        let tree = self.tree();
        let find = |parent: NodeId, tag: &str| {
            tree.children(parent)
                .find(|(_, n)| n.as_element().is_some_and(|e| e.name == tag))
                .map_or(NodeId::NONE, |(id, _)| id)
        };

        let html = find(tree.root(), "html");
        self.inner.html_element.set(html);
        if html.is_valid() {
            self.inner.head_element.set(find(html, "head"));
            self.inner.body_element.set(find(html, "body"));
        }
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// `<html>` element (NONE if absent)
    pub fn document_element(&self) -> NodeId {
        self.inner.html_element.get()
    }

    /// `<head>` element (NONE if absent)
    pub fn head(&self) -> NodeId {
        self.inner.head_element.get()
    }

    /// `<body>` element (NONE if absent)
    pub fn body(&self) -> NodeId {
        self.inner.body_element.get()
    }

    /// Borrow the DOM tree. Do not hold across a dispatch.
    pub fn tree(&self) -> Ref<'_, DomTree> {
        self.inner.tree.borrow()
    }

    /// Borrow the DOM tree mutably. Do not hold across a dispatch.
    pub fn tree_mut(&self) -> RefMut<'_, DomTree> {
        self.inner.tree.borrow_mut()
    }

    /// Mutation generation of the tree
    pub fn generation(&self) -> Generation {
        self.tree().generation()
    }

    /// True if both handles refer to the same document
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn create_element(&self, name: &str) -> NodeId {
        self.tree_mut().create_element(name)
    }

    pub fn create_text(&self, content: &str) -> NodeId {
        self.tree_mut().create_text(content)
    }

    pub fn create_comment(&self, content: &str) -> NodeId {
        self.tree_mut().create_comment(content)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree_mut().append_child(parent, child)
    }

    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree_mut().remove_child(parent, child)
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.tree_mut().set_attribute(node, name, value)
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree()
            .get(node)?
            .as_element()?
            .get_attr(name)
            .map(str::to_string)
    }

    /// Parent node, `None` for the document node and detached nodes
    pub fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.tree().parent(node)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree();
        let found = tree.descendants(tree.root()).find(|&n| {
            tree.get(n)
                .and_then(|node| node.as_element())
                .is_some_and(|e| e.id.as_deref() == Some(id))
        });
        found
    }

    /// All elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let tree = self.tree();
        let found: Vec<NodeId> = tree
            .descendants(tree.root())
            .filter(|&n| ElementRef::new(&tree, n).is_some_and(|el| list.matches(&el)))
            .collect();

        tracing::debug!(selector, matches = found.len(), "query_selector_all");
        Ok(found)
    }

    /// First element matching `selector` in document order
    pub fn query_selector(&self, selector: &str) -> DomResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let tree = self.tree();
        let found = tree
            .descendants(tree.root())
            .find(|&n| ElementRef::new(&tree, n).is_some_and(|el| list.matches(&el)));
        Ok(found)
    }

    /// Check if `node` matches `selector`. Nodes that are not elements never
    /// match; an invalid selector is an error even then.
    pub fn matches(&self, node: NodeId, selector: &str) -> DomResult<bool> {
        let list = SelectorList::parse(selector)?;
        let tree = self.tree();
        let matched = ElementRef::new(&tree, node).is_some_and(|el| list.matches(&el));
        Ok(matched)
    }

    /// Register a listener on `node`. Registering the same listener twice
    /// for the same type has no effect.
    pub fn add_event_listener(&self, node: NodeId, event_type: &str, listener: &Listener) {
        let added = self
            .inner
            .listeners
            .borrow_mut()
            .add(node, event_type, listener);
        tracing::trace!(?node, event_type, listener = ?listener.id(), added, "add_event_listener");
    }

    /// Remove a listener. Removing one that is not registered is a no-op;
    /// the return value reports whether anything was removed.
    pub fn remove_event_listener(&self, node: NodeId, event_type: &str, listener: &Listener) -> bool {
        let removed = self
            .inner
            .listeners
            .borrow_mut()
            .remove(node, event_type, listener);
        tracing::trace!(?node, event_type, listener = ?listener.id(), removed, "remove_event_listener");
        removed
    }

    /// Number of listeners for `event_type` on `node`
    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.inner.listeners.borrow().count(node, event_type)
    }

    /// Snapshot of the listeners for `event_type` on `node`, in
    /// registration order
    pub fn event_listeners(&self, node: NodeId, event_type: &str) -> Vec<Listener> {
        self.inner
            .listeners
            .borrow()
            .get(node, event_type)
            .map(<[Listener]>::to_vec)
            .unwrap_or_default()
    }

    /// Number of registrations, on any node and type, accepted by `predicate`
    pub fn count_listeners(&self, predicate: impl Fn(&Listener) -> bool) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|&(_, _, listener)| predicate(listener))
            .count()
    }

    /// Dispatch `event` at `target`.
    ///
    /// The propagation path (target, then ancestors if the event bubbles) is
    /// fixed when dispatch starts. Listener lists are snapshotted per node,
    /// and a listener removed before its turn is skipped. The first listener
    /// error stops dispatch and is returned. Otherwise returns `false` if a
    /// listener called `prevent_default`.
    pub fn dispatch_event(&self, target: NodeId, event: &Event) -> DomResult<bool> {
        let path = {
            let tree = self.tree();
            if tree.get(target).is_none() {
                return Err(crate::DomError::NotFound(target));
            }
            if event.bubbles {
                tree.ancestors_inclusive(target)
            } else {
                vec![target]
            }
        };

        tracing::debug!(event_type = event.event_type(), ?target, path = path.len(), "dispatch_event");

        event.begin(target);
        let outcome = self.run_path(&path, event);
        event.finish();
        outcome?;

        Ok(!event.is_default_prevented())
    }

    fn run_path(&self, path: &[NodeId], event: &Event) -> DomResult<()> {
        let event_type = event.event_type();

        for (i, &node) in path.iter().enumerate() {
            let phase = if i == 0 {
                EventPhase::AtTarget
            } else {
                EventPhase::Bubbling
            };
            event.enter(node, phase);

            let snapshot = self.event_listeners(node, event_type);

            for listener in &snapshot {
                let still_registered = self
                    .inner
                    .listeners
                    .borrow()
                    .contains(node, event_type, listener);
                if !still_registered {
                    continue;
                }

                tracing::trace!(?node, listener = ?listener.id(), "invoke listener");
                listener.call(self, node, event)?;

                if event.is_immediate_propagation_stopped() {
                    break;
                }
            }

            if event.is_propagation_stopped() {
                break;
            }
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.inner.url)
            .field("nodes", &self.inner.tree.borrow().len())
            .finish()
    }
}
