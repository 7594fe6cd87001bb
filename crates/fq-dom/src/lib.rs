//! fq DOM - Document Object Model
//!
//! Arena-allocated DOM tree, a shared `Document` handle, native event
//! listeners and bubbling dispatch. This is the host the `fq` query library
//! runs against.

mod document;
mod element;
mod events;
mod listener;
mod node;
mod tree;

pub use document::Document;
pub use element::ElementRef;
pub use events::{Event, EventPhase};
pub use listener::{DelegationTag, Listener, ListenerId, ListenerRegistry};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{Descendants, DomTree, Generation};

pub use fq_css::SelectorError;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);
    /// No node
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} not found")]
    NotFound(NodeId),
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(&'static str),
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    /// Raised by an event handler
    #[error("event handler failed: {0}")]
    Handler(String),
}
