//! Error types for the Berty link codec

use thiserror::Error;

use crate::basex::DecodeError;
use crate::types::GroupType;

/// Externally observed error category.
///
/// Callers that only care whether the input was absent or malformed match on
/// this instead of the detailed [`LinkError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Null or empty input, or a mandatory field left empty
    MissingInput,
    /// Malformed, unsupported or business-rule-violating input
    InvalidInput,
}

/// Main error type for link marshaling and unmarshaling
#[derive(Error, Debug)]
pub enum LinkError {
    /// Empty URI
    #[error("Missing input")]
    MissingInput,

    /// A mandatory record field is empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Only multi-member groups can be shared
    #[error("Can't share a {0} group type")]
    UnsupportedGroupType(GroupType),

    /// Fewer than two `/`-separated segments after the prefix
    #[error("URI should have at least 2 parts")]
    TooFewParts,

    /// Web link without anything after `#`
    #[error("Web link has an empty fragment")]
    MissingFragment,

    /// Web link kind tag is not `contact` or `group`
    #[error("Unknown link kind: {0:?}")]
    UnknownKind(String),

    /// Internal link format tag is not `PB`
    #[error("Unsupported link type: {0:?}")]
    UnsupportedLinkType(String),

    /// Neither the internal nor the web prefix matched
    #[error("Unsupported link format")]
    UnsupportedFormat,

    /// The web link query is not valid `application/x-www-form-urlencoded`
    #[error("Invalid link query: {0}")]
    InvalidQuery(String),

    /// Base58/base43 decoding failed
    #[error("Invalid link encoding: {0}")]
    Encoding(#[from] DecodeError),

    /// The binary payload is not a valid record
    #[error("Invalid link payload: {0}")]
    Serialization(#[from] postcard::Error),

    /// The binary payload has bytes left over after a complete record
    #[error("Invalid link payload: {0} trailing bytes")]
    TrailingBytes(usize),
}

impl LinkError {
    /// Category of this error, stable across variants that wrap a cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinkError::MissingInput | LinkError::MissingField(_) => ErrorKind::MissingInput,
            LinkError::UnsupportedGroupType(_)
            | LinkError::TooFewParts
            | LinkError::MissingFragment
            | LinkError::UnknownKind(_)
            | LinkError::UnsupportedLinkType(_)
            | LinkError::UnsupportedFormat
            | LinkError::InvalidQuery(_)
            | LinkError::Encoding(_)
            | LinkError::Serialization(_)
            | LinkError::TrailingBytes(_) => ErrorKind::InvalidInput,
        }
    }

    /// True for [`ErrorKind::MissingInput`] errors
    pub fn is_missing_input(&self) -> bool {
        self.kind() == ErrorKind::MissingInput
    }

    /// True for [`ErrorKind::InvalidInput`] errors
    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

/// Result type alias using LinkError
pub type LinkResult<T> = Result<T, LinkError>;
