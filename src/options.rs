//! Configuration options for rendering and parsing.
//!
//! This module provides two small builder-style structs:
//!
//! - [`WriterOptions`]: indentation step and the nesting height up to which a
//!   list stays on one line
//! - [`ParseOptions`]: the maximum nesting depth accepted by the parser
//!
//! ## Examples
//!
//! ```rust
//! use serde_sexpr::{render_with_options, sexpr, WriterOptions};
//!
//! let tree = sexpr!((position 1.5 2));
//!
//! let text = render_with_options(&tree, &WriterOptions::new().with_indent(2));
//! assert_eq!(text, "(position 1.5 2)\n");
//! ```

/// Default nesting limit of the parser.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Configuration options for the writer.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::WriterOptions;
///
/// // Canonical layout: 1-space indent, leaf lists inline
/// let options = WriterOptions::new();
/// assert_eq!(options.indent, 1);
/// assert_eq!(options.inline_depth, 1);
///
/// // Everything on a single line
/// let options = WriterOptions::compact();
/// assert!(options.compact);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterOptions {
    /// Spaces per nesting level for lists written one child per line.
    pub indent: usize,
    /// Lists whose nesting height is at most this value are written on one
    /// line. Height 0 is a list of atoms, height 1 a list of such lists.
    pub inline_depth: usize,
    /// Writes everything on one line, ignoring blank-line hints. Comments
    /// still end their line.
    pub compact: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            indent: 1,
            inline_depth: 1,
            compact: false,
        }
    }
}

impl WriterOptions {
    /// Creates the canonical options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for single-line output.
    #[must_use]
    pub fn compact() -> Self {
        WriterOptions {
            compact: true,
            ..Default::default()
        }
    }

    /// Sets the indentation step.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_sexpr::WriterOptions;
    ///
    /// let options = WriterOptions::new().with_indent(2);
    /// assert_eq!(options.indent, 2);
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the nesting height up to which lists are written on one line.
    #[must_use]
    pub fn with_inline_depth(mut self, inline_depth: usize) -> Self {
        self.inline_depth = inline_depth;
        self
    }
}

/// Configuration options for the parser.
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::{parse_with_options, ParseOptions};
///
/// let options = ParseOptions::new().with_max_depth(2);
/// assert!(parse_with_options("(a (b))", &options).is_ok());
/// assert!(parse_with_options("(a (b (c)))", &options).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of simultaneously open lists.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
