//! Native event listeners
//!
//! A `Listener` is a callable with an identity. Registration, removal and
//! duplicate detection compare identities, never closures.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Document, DomResult, Event, NodeId};

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique listener identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Listener callback: document, the node acting as `this`, the event
pub type ListenerFn = dyn Fn(&Document, NodeId, &Event) -> DomResult<()>;

/// Describes the delegated binding a listener was installed for, so the
/// binding can be found again from the node it is registered on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DelegationTag {
    pub selector: String,
    /// The handler the binding invokes on a match
    pub handler: ListenerId,
}

/// Event listener. Clones share the same identity.
#[derive(Clone)]
pub struct Listener {
    id: ListenerId,
    callback: Rc<ListenerFn>,
    tag: Option<Rc<DelegationTag>>,
}

impl Listener {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Document, NodeId, &Event) -> DomResult<()> + 'static,
    {
        Self {
            id: ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed)),
            callback: Rc::new(callback),
            tag: None,
        }
    }

    /// A listener installed for a delegated binding
    pub fn tagged<F>(tag: DelegationTag, callback: F) -> Self
    where
        F: Fn(&Document, NodeId, &Event) -> DomResult<()> + 'static,
    {
        Self {
            tag: Some(Rc::new(tag)),
            ..Self::new(callback)
        }
    }

    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn tag(&self) -> Option<&DelegationTag> {
        self.tag.as_deref()
    }

    /// Invoke with `this` bound to `node`
    #[inline]
    pub fn call(&self, document: &Document, node: NodeId, event: &Event) -> DomResult<()> {
        (self.callback)(document, node, event)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_tuple("Listener");
        out.field(&self.id.0);
        if let Some(tag) = &self.tag {
            out.field(tag);
        }
        out.finish()
    }
}

/// Listeners per node and event type, in registration order
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    by_node: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Returns false if it was already registered for
    /// this node and type.
    pub fn add(&mut self, node: NodeId, event_type: &str, listener: &Listener) -> bool {
        let list = self
            .by_node
            .entry(node)
            .or_default()
            .entry(event_type.to_string())
            .or_default();
        if list.contains(listener) {
            return false;
        }
        list.push(listener.clone());
        true
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove(&mut self, node: NodeId, event_type: &str, listener: &Listener) -> bool {
        let Some(types) = self.by_node.get_mut(&node) else {
            return false;
        };
        let Some(list) = types.get_mut(event_type) else {
            return false;
        };
        let Some(pos) = list.iter().position(|l| l == listener) else {
            return false;
        };
        list.remove(pos);

        if list.is_empty() {
            types.remove(event_type);
            if types.is_empty() {
                self.by_node.remove(&node);
            }
        }
        true
    }

    pub fn contains(&self, node: NodeId, event_type: &str, listener: &Listener) -> bool {
        self.get(node, event_type).is_some_and(|l| l.contains(listener))
    }

    /// Listeners for a node and type
    pub fn get(&self, node: NodeId, event_type: &str) -> Option<&[Listener]> {
        self.by_node
            .get(&node)?
            .get(event_type)
            .map(Vec::as_slice)
    }

    pub fn count(&self, node: NodeId, event_type: &str) -> usize {
        self.get(node, event_type).map_or(0, <[Listener]>::len)
    }

    /// Every registration as `(node, type, listener)`, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &str, &Listener)> {
        self.by_node.iter().flat_map(|(&node, types)| {
            types.iter().flat_map(move |(event_type, list)| {
                list.iter().map(move |l| (node, event_type.as_str(), l))
            })
        })
    }

    /// Total registrations across all nodes and types
    pub fn len(&self) -> usize {
        self.by_node
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Listener {
        Listener::new(|_, _, _| Ok(()))
    }

    #[test]
    fn test_clones_share_identity() {
        let a = noop();
        let b = noop();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_ignores_duplicates() {
        let mut registry = ListenerRegistry::new();
        let l = noop();
        assert!(registry.add(NodeId(1), "click", &l));
        assert!(!registry.add(NodeId(1), "click", &l.clone()));
        assert!(registry.add(NodeId(1), "keyup", &l));
        assert_eq!(registry.count(NodeId(1), "click"), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_tagged_listener_keeps_tag_across_clones() {
        let handler = noop();
        let tag = DelegationTag {
            selector: "span".into(),
            handler: handler.id(),
        };
        let installed = Listener::tagged(tag.clone(), |_, _, _| Ok(()));

        assert_eq!(installed.clone().tag(), Some(&tag));
        assert_ne!(installed.id(), handler.id());
        assert_eq!(handler.tag(), None);
    }

    #[test]
    fn test_iter_visits_every_registration() {
        let mut registry = ListenerRegistry::new();
        let (a, b) = (noop(), noop());
        registry.add(NodeId(1), "click", &a);
        registry.add(NodeId(1), "keyup", &a);
        registry.add(NodeId(2), "click", &b);

        let mut seen: Vec<(NodeId, String)> = registry
            .iter()
            .map(|(node, ty, _)| (node, ty.to_string()))
            .collect();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                (NodeId(1), "click".to_string()),
                (NodeId(1), "keyup".to_string()),
                (NodeId(2), "click".to_string()),
            ]
        );
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut registry = ListenerRegistry::new();
        let l = noop();
        assert!(!registry.remove(NodeId(1), "click", &l));

        registry.add(NodeId(1), "click", &l);
        assert!(!registry.remove(NodeId(1), "click", &noop()));
        assert!(registry.remove(NodeId(1), "click", &l));
        assert!(registry.is_empty());
    }
}
