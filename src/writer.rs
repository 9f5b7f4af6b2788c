//! Canonical S-expression rendering.
//!
//! This module provides the [`Writer`] that turns a [`Node`] tree into text.
//!
//! ## Layout
//!
//! - Lists whose nesting height is at most [`WriterOptions::inline_depth`] are
//!   written on one line: `(position 1.5 2)`
//! - Larger lists keep their leading atoms on the header line and put every
//!   other child on its own line, indented by [`WriterOptions::indent`] per level
//! - Children flagged with a blank-line hint are preceded by an empty line
//! - Comments always end their line
//!
//! ```rust
//! use serde_sexpr::{render, sexpr};
//!
//! let tree = sexpr!((symbol (name "R") (pin p1 (position 0 2.54))));
//! assert_eq!(
//!     render(&tree),
//!     "(symbol\n (name \"R\")\n (pin p1 (position 0 2.54))\n)\n"
//! );
//! ```
//!
//! Rendering is a pure function of the tree and the options, so structurally
//! equal trees always produce byte-identical text.

use crate::{List, Node, WriterOptions};

/// The S-expression writer.
///
/// Created via [`Writer::new`]; most callers use [`crate::render`].
pub struct Writer<'o> {
    output: String,
    options: &'o WriterOptions,
}

impl<'o> Writer<'o> {
    pub fn new(options: &'o WriterOptions) -> Self {
        Writer {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes a whole document: the node followed by a line break.
    pub fn write_document(&mut self, node: &Node) {
        self.write_node(node, 0);
        self.output.push('\n');
    }

    pub fn write_node(&mut self, node: &Node, level: usize) {
        match node {
            Node::List(list) => {
                if self.options.compact || fits_inline(list, self.options.inline_depth) {
                    self.write_inline(list);
                } else {
                    self.write_multiline(list, level);
                }
            }
            Node::Token(token) => self.output.push_str(token.as_str()),
            Node::String(s) => self.write_string(s),
            Node::Comment(text) => self.write_comment(text, level),
        }
    }

    #[inline]
    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
    }

    /// Writes a comment. A payload spanning several lines becomes one comment
    /// per line, so its text can never be read back as data.
    fn write_comment(&mut self, text: &str, level: usize) {
        for (index, line) in text.split(['\n', '\r']).enumerate() {
            if index > 0 {
                self.output.push('\n');
                self.write_indent(level);
            }
            self.output.push(';');
            self.output.push_str(line);
        }
    }

    fn write_indent(&mut self, level: usize) {
        for _ in 0..level * self.options.indent {
            self.output.push(' ');
        }
    }

    fn write_inline(&mut self, list: &List) {
        self.output.push('(');
        self.output.push_str(list.name());
        let mut after_comment = false;
        for child in list.children() {
            self.output.push(if after_comment { '\n' } else { ' ' });
            match child {
                Node::List(inner) => self.write_inline(inner),
                other => self.write_node(other, 0),
            }
            after_comment = child.is_comment();
        }
        if after_comment {
            self.output.push('\n');
        }
        self.output.push(')');
    }

    fn write_multiline(&mut self, list: &List, level: usize) {
        self.output.push('(');
        self.output.push_str(list.name());

        let children = list.children();
        let mut index = 0;
        while index < children.len()
            && matches!(children[index], Node::Token(_) | Node::String(_))
            && !list.has_blank_line_before(index)
        {
            self.output.push(' ');
            self.write_node(&children[index], level + 1);
            index += 1;
        }

        for (offset, child) in children[index..].iter().enumerate() {
            self.output.push('\n');
            if list.has_blank_line_before(index + offset) {
                self.output.push('\n');
            }
            self.write_indent(level + 1);
            self.write_node(child, level + 1);
        }

        self.output.push('\n');
        self.write_indent(level);
        self.output.push(')');
    }
}

/// Returns `true` if `list` has no comments, no blank-line hints and a
/// nesting height of at most `height`.
fn fits_inline(list: &List, height: usize) -> bool {
    list.children().iter().enumerate().all(|(index, child)| {
        !list.has_blank_line_before(index)
            && match child {
                Node::Comment(_) => false,
                Node::List(inner) => height > 0 && fits_inline(inner, height - 1),
                Node::Token(_) | Node::String(_) => true,
            }
    })
}
