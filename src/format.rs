//! The S-expression text format
//!
//! This module documents the text format read by [`crate::parse`] and written
//! by [`crate::render`].
//!
//! # Overview
//!
//! A document is a single parenthesized list. Every list starts with a name
//! and holds an ordered sequence of children: nested lists, tokens, quoted
//! strings and comments.
//!
//! ```text
//! (symbol
//!  (version "0.1")
//!  (uuid 2b0b3f3e-3a4c-4b4f-9c5d-0a1b2c3d4e5f)
//!  (name "Resistor")
//!  (grid_interval 2.54)
//!
//!  (pin 9f1c0c52-41a2-4a51-a3c4-37b7bb0e8a1d (name "1")
//!   (position -5.08 0) (rotation 0) (length 2.54)
//!  )
//! )
//! ```
//!
//! # Grammar
//!
//! ```text
//! document      := ws "(" version-field element* ")" ws
//! version-field := "(" "version" quoted-string ")"
//! element       := list | token | quoted-string | comment
//! list          := "(" name (ws element)* ws ")"
//! name          := token
//! token         := identifier-char+
//! quoted-string := '"' (escape | string-char)* '"'
//! escape        := "\\\\" | "\\\""
//! comment       := ";" any-char-except-line-break*
//! ```
//!
//! The version field is a convention checked by [`crate::DocumentFormat`];
//! plain [`crate::parse`] accepts any root list.
//!
//! ## Tokens
//!
//! A token is any run of characters other than whitespace, control
//! characters, `(`, `)`, `"` and `;`. Tokens carry identifiers, numbers,
//! booleans, UUIDs, timestamps and keywords:
//!
//! | Value | Token |
//! |-------|-------|
//! | Boolean | `true`, `false` |
//! | Integer | `-42` |
//! | Float | `2.54`, `1e-3` |
//! | UUID | `2b0b3f3e-3a4c-4b4f-9c5d-0a1b2c3d4e5f` |
//! | Timestamp | `2019-01-26T09:41:27Z` |
//!
//! ## Quoted Strings
//!
//! Free text is always quoted. Inside quotes only `\"` and `\\` are escapes;
//! any other backslash sequence is a syntax error. Line breaks and tabs are
//! kept literally, other control characters are rejected.
//!
//! Quoted strings and tokens are different kinds: `(name "1")` never reads as
//! a number and `(length 2.54)` never reads as a string.
//!
//! ## Comments
//!
//! `;` starts a comment that runs to the end of the line. Comments inside the
//! root list are kept in the tree and written back; comments before or after
//! the root list are discarded.
//!
//! # Canonical Layout
//!
//! The writer produces one canonical text per tree:
//!
//! - A list whose nesting height is at most the inline depth (default 1) and
//!   that holds no comments or blank-line hints is written on one line
//! - Otherwise leading tokens and strings stay on the header line, every other
//!   child goes on its own line indented one step deeper, and the closing
//!   parenthesis gets a line of its own at the list's own indentation
//! - Children with a blank-line hint are preceded by an empty line; container
//!   helpers set this hint for every item they write
//! - The document ends with a single line break
//!
//! Parsing remembers blank lines between children, so reading and writing a
//! canonical file reproduces it byte for byte.
//!
//! # Limits
//!
//! Nesting deeper than [`crate::ParseOptions::max_depth`] (default
//! [`crate::DEFAULT_MAX_DEPTH`]) fails with [`crate::Error::ResourceLimit`]
//! instead of exhausting memory.
