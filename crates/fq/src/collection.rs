//! Node collections

use std::fmt;
use std::ops::Index;

use fq_dom::{Document, NodeId};

use crate::iteration::ArrayLike;
use crate::query::Query;

/// An ordered, fixed handle over zero or more nodes of one document.
///
/// Membership never changes after construction; filtering returns a new
/// collection. Cloning is cheap and shares the owning [`Query`].
#[derive(Clone)]
pub struct Collection {
    query: Query,
    nodes: Vec<NodeId>,
}

impl Collection {
    pub(crate) fn new(query: Query, nodes: Vec<NodeId>) -> Self {
        Self { query, nodes }
    }

    /// Number of held nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.get(0)
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.nodes.iter().copied()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The namespace this collection was created from
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn document(&self) -> &Document {
        self.query.document()
    }

    /// A new collection over a subset of this one's nodes
    pub(crate) fn derive(&self, nodes: Vec<NodeId>) -> Self {
        Self::new(self.query.clone(), nodes)
    }
}

impl Index<usize> for Collection {
    type Output = NodeId;

    fn index(&self, index: usize) -> &NodeId {
        &self.nodes[index]
    }
}

impl ArrayLike for Collection {
    type Item = NodeId;

    fn length(&self) -> usize {
        self.nodes.len()
    }

    fn item(&self, index: usize) -> Option<&NodeId> {
        self.nodes.get(index)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for Collection {
    /// Same document, same nodes in the same order
    fn eq(&self, other: &Self) -> bool {
        self.document().ptr_eq(other.document()) && self.nodes == other.nodes
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("length", &self.nodes.len())
            .field("nodes", &self.nodes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iteration::{each_item, to_vec};

    fn fixture() -> (Query, Vec<NodeId>) {
        let document = Document::default();
        let body = document.body();
        let nodes: Vec<NodeId> = ["a", "b", "c"]
            .iter()
            .map(|name| {
                let id = document.create_element(name);
                document.append_child(body, id).unwrap();
                id
            })
            .collect();
        (Query::new(document), nodes)
    }

    #[test]
    fn test_indexed_access() {
        let (query, nodes) = fixture();
        let collection = query.wrap(nodes.clone());

        assert_eq!(collection.len(), 3);
        assert_eq!(collection[1], nodes[1]);
        assert_eq!(collection.get(3), None);
        assert_eq!(collection.first(), Some(nodes[0]));
        assert_eq!(collection.iter().collect::<Vec<_>>(), nodes);
        assert!(collection.query().document().ptr_eq(collection.document()));
    }

    #[test]
    fn test_empty() {
        let (query, _) = fixture();
        let collection = query.wrap(Vec::new());
        assert!(collection.is_empty());
        assert_eq!(collection.first(), None);
    }

    #[test]
    fn test_array_like() {
        let (query, nodes) = fixture();
        let collection = query.wrap(nodes.clone());

        let mut seen = Vec::new();
        each_item(&collection, |i, &node| seen.push((i, node)));
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], (2, nodes[2]));
        assert_eq!(to_vec(&collection), nodes);
    }

    #[test]
    fn test_equality_requires_same_document() {
        let (query, nodes) = fixture();
        let (other, _) = fixture();

        assert_eq!(query.wrap(nodes.clone()), query.wrap(nodes.clone()));
        assert_ne!(query.wrap(nodes.clone()), other.wrap(nodes));
    }
}
