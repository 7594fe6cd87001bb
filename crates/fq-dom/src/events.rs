//! DOM Events
//!
//! The event object handed to listeners. Dispatch state lives in `Cell`s
//! so listeners can stop propagation through a shared reference.

use std::cell::Cell;

use crate::NodeId;

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    /// Not being dispatched
    #[default]
    None,
    /// Listeners on the target itself
    AtTarget,
    /// Listeners on ancestors of the target
    Bubbling,
}

/// DOM event
#[derive(Debug)]
pub struct Event {
    event_type: String,
    pub bubbles: bool,
    pub cancelable: bool,
    target: Cell<NodeId>,
    current_target: Cell<NodeId>,
    phase: Cell<EventPhase>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    immediate_propagation_stopped: Cell<bool>,
}

impl Event {
    /// A bubbling, cancelable event such as `click`
    pub fn new(event_type: impl Into<String>) -> Self {
        Self::with_flags(event_type, true, true)
    }

    /// An event that only reaches listeners on its target
    pub fn non_bubbling(event_type: impl Into<String>) -> Self {
        Self::with_flags(event_type, false, false)
    }

    pub fn with_flags(event_type: impl Into<String>, bubbles: bool, cancelable: bool) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles,
            cancelable,
            target: Cell::new(NodeId::NONE),
            current_target: Cell::new(NodeId::NONE),
            phase: Cell::new(EventPhase::None),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
            immediate_propagation_stopped: Cell::new(false),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Node the event was dispatched to (NONE before dispatch)
    pub fn target(&self) -> NodeId {
        self.target.get()
    }

    /// Node whose listeners are currently running (NONE outside dispatch)
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub fn phase(&self) -> EventPhase {
        self.phase.get()
    }

    /// Prevent default action
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop after the listeners of the current node
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Stop before the next listener
    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
        self.immediate_propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped.get()
    }

    pub(crate) fn begin(&self, target: NodeId) {
        self.target.set(target);
        self.default_prevented.set(false);
        self.propagation_stopped.set(false);
        self.immediate_propagation_stopped.set(false);
    }

    pub(crate) fn enter(&self, node: NodeId, phase: EventPhase) {
        self.current_target.set(node);
        self.phase.set(phase);
    }

    pub(crate) fn finish(&self) {
        self.current_target.set(NodeId::NONE);
        self.phase.set(EventPhase::None);
    }
}
