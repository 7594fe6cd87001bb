//! fq HTML - HTML5 parsing
//!
//! Builds `fq_dom::Document`s and detached fragments from markup using
//! html5ever.

mod parser;

pub use fq_dom::Document;
pub use parser::HtmlParser;

/// Parse an HTML document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse `html` into detached nodes owned by `document`
pub fn build_fragment(document: &Document, html: &str) -> Result<Vec<fq_dom::NodeId>, HtmlError> {
    HtmlParser::new().build_fragment(document, html)
}

/// HTML parsing error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Dom(#[from] fq_dom::DomError),
}
