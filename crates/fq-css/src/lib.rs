//! fq CSS - Selector engine
//!
//! Parses CSS selector strings and matches them against any element type
//! implementing [`SelectorElement`].

mod matching;
mod parser;
mod selectors;

pub use matching::SelectorElement;
pub use parser::SelectorParser;
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, Compound, NthExpression,
    PseudoClass, SelectorComponent, SelectorList,
};

/// Parse a selector list such as `"ul > li.item, a[href]"`
pub fn parse_selector(selector: &str) -> Result<SelectorList, SelectorError> {
    SelectorParser::new(selector).parse()
}

/// Selector parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected {found:?} at offset {offset} in selector {selector:?}")]
    Unexpected {
        selector: String,
        offset: usize,
        found: char,
    },
    #[error("unexpected end of selector {0:?}")]
    UnexpectedEnd(String),
    #[error("unsupported pseudo-class :{0}")]
    UnknownPseudoClass(String),
    #[error("pseudo-element ::{0} cannot be matched against elements")]
    PseudoElement(String),
    #[error("invalid An+B expression {0:?}")]
    InvalidNth(String),
}
