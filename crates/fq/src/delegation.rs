//! Delegated binding lookup
//!
//! `on` installs a synthesized listener that is not equal to the caller's
//! handler, so `off` cannot remove it by the handler alone. Each installed
//! listener carries a [`DelegationTag`] naming its selector and handler;
//! `off` scans the node's listeners for a matching tag. The state lives in
//! the document, so any `Query` over it can undo any other's bindings.

use fq_dom::{DelegationTag, Document, Listener, NodeId};

/// Tag identifying the binding of `handler` under `selector`
pub fn tag_for(selector: &str, handler: &Listener) -> DelegationTag {
    DelegationTag {
        selector: selector.to_string(),
        handler: handler.id(),
    }
}

/// Remove every listener for `event_type` on `node` installed for `tag`.
/// Returns the number removed.
pub fn uninstall(document: &Document, node: NodeId, event_type: &str, tag: &DelegationTag) -> usize {
    let mut removed = 0;
    for listener in document.event_listeners(node, event_type) {
        if listener.tag() == Some(tag) && document.remove_event_listener(node, event_type, &listener) {
            removed += 1;
        }
    }
    removed
}

/// Number of delegated listeners installed anywhere in `document`
pub fn installed_count(document: &Document) -> usize {
    document.count_listeners(|listener| listener.tag().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Listener {
        Listener::new(|_, _, _| Ok(()))
    }

    fn install(document: &Document, node: NodeId, tag: DelegationTag) -> Listener {
        let listener = Listener::tagged(tag, |_, _, _| Ok(()));
        document.add_event_listener(node, "click", &listener);
        listener
    }

    #[test]
    fn test_uninstall_matches_selector_and_handler() {
        let document = Document::default();
        let body = document.body();
        let (a, b) = (noop(), noop());

        install(&document, body, tag_for("span", &a));
        install(&document, body, tag_for("em", &a));
        install(&document, body, tag_for("span", &b));
        document.add_event_listener(body, "click", &a);
        assert_eq!(installed_count(&document), 3);

        assert_eq!(uninstall(&document, body, "click", &tag_for("span", &a)), 1);
        assert_eq!(installed_count(&document), 2);
        // The plain registration of `a` is untouched
        assert_eq!(document.listener_count(body, "click"), 3);
    }

    #[test]
    fn test_uninstall_removes_repeated_installs() {
        let document = Document::default();
        let body = document.body();
        let handler = noop();

        install(&document, body, tag_for("a", &handler));
        install(&document, body, tag_for("a", &handler));
        assert_eq!(uninstall(&document, body, "click", &tag_for("a", &handler)), 2);
        assert_eq!(installed_count(&document), 0);
    }

    #[test]
    fn test_uninstall_absent_is_noop() {
        let document = Document::default();
        let tag = tag_for("a", &noop());
        assert_eq!(uninstall(&document, document.body(), "click", &tag), 0);
        assert_eq!(uninstall(&document, document.body(), "keyup", &tag), 0);
    }
}
