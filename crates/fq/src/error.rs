//! Error types

use fq_css::SelectorError;
use fq_dom::DomError;
use fq_html::HtmlError;

/// Library error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed selector, raised before or during matching
    #[error(transparent)]
    Selector(SelectorError),
    /// Tree operation failed or an event handler returned an error
    #[error(transparent)]
    Dom(DomError),
    #[error(transparent)]
    Html(#[from] HtmlError),
}

impl From<SelectorError> for Error {
    fn from(err: SelectorError) -> Self {
        Self::Selector(err)
    }
}

// Selector failures surface as `Error::Selector` whichever layer raised them
impl From<DomError> for Error {
    fn from(err: DomError) -> Self {
        match err {
            DomError::Selector(err) => Self::Selector(err),
            other => Self::Dom(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_selector_error_is_unwrapped() {
        let err: Error = DomError::Selector(SelectorError::Empty).into();
        assert!(matches!(err, Error::Selector(SelectorError::Empty)));

        let err: Error = DomError::Handler("x".into()).into();
        assert!(matches!(err, Error::Dom(DomError::Handler(_))));
    }
}
