//! Element view used for selector matching

use fq_css::SelectorElement;

use crate::{DomTree, ElementData, NodeData, NodeId};

/// Borrowed view of an element node
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
    data: &'a ElementData,
}

impl<'a> ElementRef<'a> {
    /// `None` if `id` is missing or not an element
    pub fn new(tree: &'a DomTree, id: NodeId) -> Option<Self> {
        let data = tree.get(id)?.as_element()?;
        Some(Self { tree, id, data })
    }

    pub fn node_id(&self) -> NodeId {
        self.id
    }

    pub fn data(&self) -> &'a ElementData {
        self.data
    }
}

impl SelectorElement for ElementRef<'_> {
    fn local_name(&self) -> &str {
        &self.data.name
    }

    fn id(&self) -> Option<&str> {
        self.data.id.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.data.has_class(class)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.data.get_attr(name)
    }

    fn parent_element(&self) -> Option<Self> {
        Self::new(self.tree, self.tree.parent(self.id)?)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        Self::new(self.tree, self.tree.prev_element_sibling(self.id)?)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        Self::new(self.tree, self.tree.next_element_sibling(self.id)?)
    }

    fn is_empty(&self) -> bool {
        !self.tree.children(self.id).any(|(_, child)| match &child.data {
            NodeData::Element(_) => true,
            NodeData::Text(text) => !text.is_empty(),
            _ => false,
        })
    }

    fn is_root(&self) -> bool {
        self.tree
            .parent(self.id)
            .and_then(|p| self.tree.get(p))
            .is_some_and(|p| p.is_document())
    }
}
