//! fq - DOM querying and event delegation
//!
//! A small query layer over `fq_dom`:
//!
//! - [`Query`] is the namespace and factory. `query.select("li.item")`
//!   resolves a selector in document order, `query.select(nodes)` wraps
//!   nodes verbatim.
//! - [`Collection`] is a fixed, ordered handle over the selected nodes.
//! - [`EventMethods`] adds `bind` / `unbind` / `has` / `on` / `off` to
//!   collections. `on` delegates by climbing from the event target to the
//!   bound element, invoking the handler for every matching node on the way.
//! - [`extend`], [`each`], [`make_array`], [`proxy`] are the general
//!   utilities the rest is built from.

mod cache;
mod collection;
mod config;
mod delegation;
mod error;
mod events;
mod iteration;
mod merge;
mod query;

pub use cache::{CacheStats, SelectorCache};
pub use collection::Collection;
pub use config::QueryConfig;
pub use error::{Error, Result};
pub use events::EventMethods;
pub use iteration::{
    ArrayLike, Key, Sequence, as_array_like, each, each_item, is_array, is_array_like, make_array,
    proxy, to_vec,
};
pub use merge::extend;
pub use query::{Query, Source};

pub use fq_dom::{DelegationTag, Document, Event, EventPhase, Listener, NodeId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create a query namespace over `document` with default configuration
pub fn query(document: &Document) -> Query {
    Query::new(document.clone())
}
