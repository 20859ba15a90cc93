//! Error types for the TMX reader.

use thiserror::Error;

/// Main error type for map decoding.
///
/// Every variant aborts the decode that produced it; there is no partial
/// result.
#[derive(Error, Debug)]
pub enum Error {
    /// A required attribute is absent from the current element
    #[error("Missing attribute '{name}' (expected {expected})")]
    MissingAttribute { name: String, expected: &'static str },

    /// An attribute is present but could not be coerced to the requested type
    #[error("Malformed value '{value}' for '{name}' (expected {expected})")]
    MalformedValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// A token is not part of the enumeration the attribute maps onto
    #[error("Unknown token '{value}' for '{name}'")]
    UnknownEnumToken { name: String, value: String },

    /// An "at most once" section occurred twice under one parent
    #[error("Duplicate element: {0}")]
    DuplicateElement(String),

    /// An object carries a child element that is not a known shape marker
    #[error("Unknown object marker: {0}")]
    UnknownMarker(String),

    /// Tile data could not be decoded or has the wrong length
    #[error("Corrupt tile data: {0}")]
    CorruptTileData(String),

    /// External tileset or template could not be resolved
    #[error("Unresolved reference '{path}': {source}")]
    UnresolvedReference {
        path: String,
        #[source]
        source: Box<Error>,
    },

    /// A custom type name resolved to the wrong kind of definition
    #[error("Schema mismatch for '{name}': expected {expected}, got {actual}")]
    SchemaMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A structurally required element is absent or misplaced
    #[error("Grammar violation: {0}")]
    GrammarViolation(String),

    /// The XML frontend rejected the document
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A project file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (raised by resolver implementations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a grammar violation error.
    pub fn grammar(msg: impl Into<String>) -> Self {
        Self::GrammarViolation(msg.into())
    }

    /// Create a corrupt tile data error.
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptTileData(msg.into())
    }

    /// Create a malformed value error.
    pub fn malformed(name: impl Into<String>, value: impl Into<String>, expected: &'static str) -> Self {
        Self::MalformedValue {
            name: name.into(),
            value: value.into(),
            expected,
        }
    }

    /// Wrap a resolver failure with the path that was being resolved.
    pub fn unresolved(path: impl Into<String>, source: Error) -> Self {
        Self::UnresolvedReference {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for map decoding.
pub type Result<T> = std::result::Result<T, Error>;
