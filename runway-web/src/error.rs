use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors raised while setting up a listing source.
///
/// Fetching itself never fails outward: a page that cannot be loaded is
/// logged and contributes no cards.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("search section needs a non-empty query")]
    MissingQuery,

    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("invalid base URL `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("items per page must be at least 1")]
    ZeroPageSize,

    #[error("items per row must be at least 1")]
    ZeroRowWidth,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SourceError {
    pub(crate) fn selector(selector: &str, message: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            message: message.to_string(),
        }
    }
}
