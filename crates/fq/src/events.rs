//! Event binding and delegation for collections
//!
//! `bind`/`unbind` register native listeners directly. `on` installs one
//! synthesized listener per call that climbs from the event target to the
//! element it is bound on, invoking the handler for every node on that path
//! matching the selector, innermost first. Climbing reads the live tree at
//! each step, so handlers that mutate the DOM affect the rest of the walk.

use fq_css::SelectorList;
use fq_dom::{Document, DomResult, ElementRef, Event, Listener, NodeId};

use crate::collection::Collection;
use crate::delegation;
use crate::iteration::each_item;
use crate::Result;

/// Event methods shared by every collection
pub trait EventMethods {
    /// Register `handler` for `event_type` on every element
    fn bind(&self, event_type: &str, handler: &Listener) -> &Self;

    /// Remove a registration made by [`bind`](Self::bind). Absent
    /// registrations are ignored.
    fn unbind(&self, event_type: &str, handler: &Listener) -> &Self;

    /// The elements that themselves match `selector`
    fn has(&self, selector: &str) -> Result<Collection>;

    /// Invoke `handler` for events of `event_type` reaching each element
    /// from a descendant (or the element itself) matching `selector`.
    ///
    /// Selector errors surface when an event is dispatched.
    fn on(&self, event_type: &str, selector: &str, handler: &Listener) -> &Self;

    /// Undo every matching [`on`](Self::on). Absent bindings are ignored.
    fn off(&self, event_type: &str, selector: &str, handler: &Listener) -> &Self;
}

impl EventMethods for Collection {
    fn bind(&self, event_type: &str, handler: &Listener) -> &Self {
        let document = self.document();
        each_item(self, |_, &node| document.add_event_listener(node, event_type, handler));

        tracing::debug!(event_type, elements = self.len(), handler = ?handler.id(), "bind");
        self
    }

    fn unbind(&self, event_type: &str, handler: &Listener) -> &Self {
        let document = self.document();
        let mut removed = 0;
        each_item(self, |_, &node| {
            if document.remove_event_listener(node, event_type, handler) {
                removed += 1;
            }
        });

        tracing::debug!(event_type, removed, handler = ?handler.id(), "unbind");
        self
    }

    fn has(&self, selector: &str) -> Result<Collection> {
        if self.is_empty() {
            return Ok(self.derive(Vec::new()));
        }
        let list = SelectorList::parse(selector)?;
        let matched = filter_matching(self.document(), self.nodes(), &list);

        tracing::debug!(selector, matched = matched.len(), of = self.len(), "has");
        Ok(self.derive(matched))
    }

    fn on(&self, event_type: &str, selector: &str, handler: &Listener) -> &Self {
        let installed = {
            let selector = selector.to_string();
            let handler = handler.clone();
            Listener::tagged(delegation::tag_for(&selector, &handler), move |document, _this, event| {
                climb(document, event, &selector, &handler)
            })
        };

        let document = self.document();
        each_item(self, |_, &node| document.add_event_listener(node, event_type, &installed));

        tracing::debug!(
            event_type,
            selector,
            elements = self.len(),
            handler = ?handler.id(),
            installed = ?installed.id(),
            "on"
        );
        self
    }

    fn off(&self, event_type: &str, selector: &str, handler: &Listener) -> &Self {
        let document = self.document();
        let tag = delegation::tag_for(selector, handler);
        let mut removed = 0;
        each_item(self, |_, &node| {
            removed += delegation::uninstall(document, node, event_type, &tag);
        });

        if removed == 0 {
            tracing::debug!(event_type, selector, handler = ?handler.id(), "off: nothing bound");
        } else {
            tracing::debug!(event_type, selector, removed, "off");
        }
        self
    }
}

/// Nodes of `nodes` that are elements matching `list`, in the given order
fn filter_matching(document: &Document, nodes: &[NodeId], list: &SelectorList) -> Vec<NodeId> {
    let tree = document.tree();
    let mut matched = Vec::new();
    each_item(nodes, |_, &node| {
        if ElementRef::new(&tree, node).is_some_and(|el| list.matches(&el)) {
            matched.push(node);
        }
    });
    matched
}

/// Walk from the event target up to the current target, inclusive.
///
/// Stops early if the walk leaves the tree (a detached ancestor has no
/// parent). No tree borrow is held while `handler` runs.
fn climb(document: &Document, event: &Event, selector: &str, handler: &Listener) -> DomResult<()> {
    let list = SelectorList::parse(selector)?;
    let bound = event.current_target();
    let mut current = Some(event.target());

    while let Some(node) = current {
        let matched = !filter_matching(document, &[node], &list).is_empty();
        tracing::trace!(?node, matched, "climb");
        if matched {
            handler.call(document, node, event)?;
        }
        if node == bound {
            break;
        }
        current = document.parent_node(node);
    }
    Ok(())
}
