//! Query namespace and collection factory

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use fq_dom::{Document, Event, NodeId};

use crate::cache::{CacheStats, SelectorCache};
use crate::collection::Collection;
use crate::config::QueryConfig;
use crate::delegation;
use crate::Result;

/// What a collection is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source<'a> {
    /// Resolved against the document, yielding elements in document order
    Selector(&'a str),
    /// Used verbatim, in the given order
    Nodes(Vec<NodeId>),
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(selector: &'a str) -> Self {
        Source::Selector(selector)
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(selector: &'a String) -> Self {
        Source::Selector(selector)
    }
}

impl From<Vec<NodeId>> for Source<'_> {
    fn from(nodes: Vec<NodeId>) -> Self {
        Source::Nodes(nodes)
    }
}

impl From<&[NodeId]> for Source<'_> {
    fn from(nodes: &[NodeId]) -> Self {
        Source::Nodes(nodes.to_vec())
    }
}

impl From<NodeId> for Source<'_> {
    fn from(node: NodeId) -> Self {
        Source::Nodes(vec![node])
    }
}

impl From<&Collection> for Source<'_> {
    fn from(collection: &Collection) -> Self {
        Source::Nodes(collection.nodes().to_vec())
    }
}

struct QueryInner {
    document: Document,
    config: QueryConfig,
    cache: RefCell<SelectorCache>,
}

/// Query namespace bound to one document.
///
/// Clones share the selector cache. Delegated bindings are recorded on the
/// document's listeners, so `off` through any `Query` over the same document
/// finds bindings made by `on` through another.
#[derive(Clone)]
pub struct Query {
    inner: Rc<QueryInner>,
}

impl Query {
    pub fn new(document: Document) -> Self {
        Self::with_config(document, QueryConfig::default())
    }

    pub fn with_config(document: Document, config: QueryConfig) -> Self {
        let cache = SelectorCache::new(config.cache_capacity);
        Self {
            inner: Rc::new(QueryInner {
                document,
                config,
                cache: RefCell::new(cache),
            }),
        }
    }

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    pub fn config(&self) -> &QueryConfig {
        &self.inner.config
    }

    /// Build a collection from a selector or a node list.
    ///
    /// ```ignore
    /// let items = query.select("ul > li")?;
    /// let same = query.select(&items)?;
    /// ```
    pub fn select<'s>(&self, source: impl Into<Source<'s>>) -> Result<Collection> {
        match source.into() {
            Source::Selector(selector) => {
                let nodes = self.resolve(selector)?;
                Ok(Collection::new(self.clone(), nodes))
            }
            Source::Nodes(nodes) => Ok(self.wrap(nodes)),
        }
    }

    /// Wrap nodes verbatim
    pub fn wrap(&self, nodes: Vec<NodeId>) -> Collection {
        Collection::new(self.clone(), nodes)
    }

    /// Parse `html` into detached nodes of this document
    pub fn build_fragment(&self, html: &str) -> Result<Collection> {
        let nodes = fq_html::build_fragment(self.document(), html)?;
        Ok(self.wrap(nodes))
    }

    /// Dispatch a bubbling, cancelable event of `event_type` at `target`.
    /// Returns `false` if a handler prevented the default action.
    pub fn trigger(&self, target: NodeId, event_type: &str) -> Result<bool> {
        self.dispatch(target, &Event::new(event_type))
    }

    /// Dispatch a caller-built event at `target`
    pub fn dispatch(&self, target: NodeId, event: &Event) -> Result<bool> {
        Ok(self.document().dispatch_event(target, event)?)
    }

    /// Number of listeners currently installed by `on` in this document
    pub fn delegated_count(&self) -> usize {
        delegation::installed_count(self.document())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.borrow().stats()
    }

    fn resolve(&self, selector: &str) -> Result<Vec<NodeId>> {
        let document = self.document();
        if !self.config().caching() {
            return Ok(document.query_selector_all(selector)?);
        }

        let generation = document.generation();
        if let Some(nodes) = self.inner.cache.borrow_mut().get(selector, generation) {
            tracing::trace!(selector, "selector cache hit");
            return Ok(nodes);
        }

        let nodes = document.query_selector_all(selector)?;
        self.inner
            .cache
            .borrow_mut()
            .insert(selector, generation, nodes.clone());
        Ok(nodes)
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("document", &self.inner.document)
            .field("config", &self.inner.config)
            .finish()
    }
}
