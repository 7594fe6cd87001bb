//! HTML5 Parser implementation
//!
//! Parses with html5ever into its `RcDom`, then copies the result into the
//! fq arena tree.

use fq_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = self.parse_rcdom(html)?;
        let document = Document::empty(url);
        {
            let mut tree = document.tree_mut();
            let root = tree.root();
            for child in dom.document.children.borrow().iter() {
                if let Some(id) = self.convert_node(child, &mut tree)? {
                    tree.append_child(root, id)?;
                }
            }
        }
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse `html` as body content and import its top-level nodes into
    /// `document` as detached nodes, in source order.
    ///
    /// Content that is only valid outside `<body>` (table rows without a
    /// table, `<head>` elements) is dropped by the HTML5 tree builder.
    pub fn build_fragment(&self, document: &Document, html: &str) -> Result<Vec<NodeId>, HtmlError> {
        let dom = self.parse_rcdom(html)?;
        let Some(body) = find_child(&dom.document, "html").and_then(|h| find_child(&h, "body"))
        else {
            return Ok(Vec::new());
        };

        let mut tree = document.tree_mut();
        let mut nodes = Vec::new();
        for child in body.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, &mut tree)? {
                nodes.push(id);
            }
        }

        tracing::debug!(nodes = nodes.len(), "built fragment");
        Ok(nodes)
    }

    fn parse_rcdom(&self, html: &str) -> Result<RcDom, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(dom)
    }

    /// Copy an RcDom node and its subtree into `tree`. Returns the new
    /// (detached) node, or `None` for node kinds that are not kept.
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree) -> Result<Option<NodeId>, HtmlError> {
        let id = match &handle.data {
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() {
                    return Ok(None);
                }
                return Ok(Some(tree.create_text(&text)));
            }
            RcNodeData::Comment { contents } => return Ok(Some(tree.create_comment(contents))),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    tree.set_attribute(id, &attr.name.local, &attr.value)?;
                }
                id
            }
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => return Ok(None),
        };

        for child in handle.children.borrow().iter() {
            if let Some(child_id) = self.convert_node(child, tree)? {
                tree.append_child(id, child_id)?;
            }
        }
        Ok(Some(id))
    }
}

fn find_child(handle: &Handle, tag: &str) -> Option<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, RcNodeData::Element { name, .. } if &*name.local == tag))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert!(doc.body().is_valid());
        assert!(doc.head().is_valid());
        assert_eq!(doc.query_selector_all("p").unwrap().len(), 1);
    }

    #[test]
    fn test_parse_fragment_gets_skeleton() {
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>").unwrap();

        // html5ever wraps fragments in html/head/body
        assert!(doc.document_element().is_valid());
        assert_eq!(doc.query_selector_all("body > div > span").unwrap().len(), 1);
    }

    #[test]
    fn test_build_fragment_detached() {
        let doc = Document::default();
        let nodes = HtmlParser::new()
            .build_fragment(&doc, "<li>a</li><li>b</li><!-- c -->")
            .unwrap();

        assert_eq!(nodes.len(), 3);
        assert!(nodes.iter().all(|&n| doc.parent_node(n).is_none()));
        assert!(doc.query_selector_all("li").unwrap().is_empty());
    }
}
