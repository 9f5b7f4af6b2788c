//! Error types for S-expression parsing, rendering and reconstruction.
//!
//! This module provides one error enum for the whole engine so that callers
//! can branch on the *kind* of failure:
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: malformed text, with line/column information
//! - **Unsupported Version**: the document declares a format version newer than
//!   the running code understands
//! - **Structural Errors**: a well-formed document whose subtree has the wrong
//!   shape, a missing field, or an invalid primitive value
//! - **Resource Limits**: nesting deeper than the configured maximum
//!
//! ## Examples
//!
//! ```rust
//! use serde_sexpr::{parse, Error};
//!
//! let result = parse("(component (name \"R1\"");
//! assert!(result.is_err());
//!
//! if let Err(err) = result {
//!     assert!(err.is_syntax());
//!     assert_eq!(err.position(), Some((1, 22)));
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while parsing or
/// (de)serializing S-expression documents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error reported by a caller-supplied reader or writer
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed text
    #[error("Syntax error at line {line}, column {column}: {msg}")]
    Syntax {
        line: usize,
        column: usize,
        msg: String,
    },

    /// The document's format version is newer than what can be read
    #[error("Unsupported file format version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: String, supported: String },

    /// A subtree does not have the expected shape
    #[error("Invalid element `{element}`{}: {msg}", key_suffix(.key))]
    Structural {
        element: String,
        key: Option<String>,
        msg: String,
    },

    /// Nesting exceeded the configured maximum depth
    #[error("Nesting deeper than {limit} levels at line {line}, column {column}")]
    ResourceLimit {
        line: usize,
        column: usize,
        limit: usize,
    },

    /// A Rust shape that has no S-expression representation
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error not yet attributed to an element
    #[error("Error: {0}")]
    Custom(String),
}

fn key_suffix(key: &Option<String>) -> String {
    key.as_ref()
        .map(|k| format!(" ({})", k))
        .unwrap_or_default()
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Error;
    ///
    /// let err = Error::syntax(10, 5, "unterminated string");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, column: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            column,
            msg: msg.to_string(),
        }
    }

    /// Creates an error for a document whose version cannot be read.
    pub fn unsupported_version<A: fmt::Display, B: fmt::Display>(found: A, supported: B) -> Self {
        Error::UnsupportedVersion {
            found: found.to_string(),
            supported: supported.to_string(),
        }
    }

    /// Creates a structural error for the given element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Error;
    ///
    /// let err = Error::structural("pin", "missing child `name`");
    /// assert!(err.is_structural());
    /// assert!(err.to_string().contains("`pin`"));
    /// ```
    pub fn structural<T: fmt::Display>(element: &str, msg: T) -> Self {
        Error::Structural {
            element: element.to_string(),
            key: None,
            msg: msg.to_string(),
        }
    }

    /// Creates a resource limit error.
    pub fn resource_limit(line: usize, column: usize, limit: usize) -> Self {
        Error::ResourceLimit {
            line,
            column,
            limit,
        }
    }

    /// Creates an unsupported type error for shapes the serde bridge cannot express.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Attributes this error to `element`.
    ///
    /// Unattributed messages become structural errors of `element`; structural
    /// errors of a child get `element` prepended to their path, so an error that
    /// bubbles out of nested adapters reads `symbol/pin/name`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::Error;
    ///
    /// let err = Error::structural("name", "expected a quoted string").within("pin");
    /// assert_eq!(err.element(), Some("pin/name"));
    /// ```
    #[must_use]
    pub fn within(self, element: &str) -> Self {
        match self {
            Error::Custom(msg) => Error::structural(element, msg),
            Error::Structural {
                element: inner,
                key,
                msg,
            } => Error::Structural {
                element: format!("{}/{}", element, inner),
                key,
                msg,
            },
            other => other,
        }
    }

    /// Attaches an identifying key (typically a UUID) to a structural error,
    /// unless a more specific key is already present.
    #[must_use]
    pub fn with_key<T: fmt::Display>(self, key: T) -> Self {
        match self {
            Error::Structural {
                element,
                key: None,
                msg,
            } => Error::Structural {
                element,
                key: Some(key.to_string()),
                msg,
            },
            other => other,
        }
    }

    /// Returns `true` for parser errors.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }

    /// Returns `true` if the document was rejected because of its format version.
    pub fn is_unsupported_version(&self) -> bool {
        matches!(self, Error::UnsupportedVersion { .. })
    }

    /// Returns `true` for shape/validity errors found while reconstructing objects.
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Structural { .. })
    }

    /// Line and column of a parser-side error.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Syntax { line, column, .. } | Error::ResourceLimit { line, column, .. } => {
                Some((*line, *column))
            }
            _ => None,
        }
    }

    /// Element path of a structural error.
    pub fn element(&self) -> Option<&str> {
        match self {
            Error::Structural { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Identifying key of a structural error.
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::Structural { key, .. } => key.as_deref(),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
