//! S-expression parsing.
//!
//! This module provides the [`Parser`] that turns text into a [`Node`] tree.
//!
//! ## Overview
//!
//! - **Single pass**: one left-to-right scan with line/column tracking
//! - **Explicit stack**: open lists live on a heap-allocated stack, so deep
//!   input hits [`ParseOptions::max_depth`] instead of the call stack
//! - **Hard failure**: the first syntax error aborts the parse; no partial
//!   tree is ever returned
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_sexpr::{parse, Node};
//!
//! let root = parse("(symbol (name \"R\") (pin 1))").unwrap();
//! let root = root.as_list().unwrap();
//! assert_eq!(root.name(), "symbol");
//! assert_eq!(root.require_value::<String>("name").unwrap(), "R");
//! ```
//!
//! Errors carry the exact position:
//!
//! ```rust
//! use serde_sexpr::parse;
//!
//! let err = parse("(a\n  \"unterminated)").unwrap_err();
//! assert!(err.is_syntax());
//! ```

use crate::node::{is_identifier_char, is_string_char, Token};
use crate::{Error, List, Node, ParseOptions, Result};

/// The S-expression parser.
///
/// Created via [`Parser::new`]; consumed by [`Parser::parse`].
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: &ParseOptions) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            max_depth: options.max_depth,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        if let Some(ch) = self.peek_char() {
            self.position += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(ch)
        } else {
            None
        }
    }

    /// Skips whitespace and returns the number of line breaks crossed.
    fn skip_whitespace(&mut self) -> usize {
        let mut newlines = 0;
        while let Some(ch) = self.peek_char() {
            if !ch.is_whitespace() {
                break;
            }
            if ch == '\n' {
                newlines += 1;
            }
            self.next_char();
        }
        newlines
    }

    fn error(&self, line: usize, column: usize, msg: &str) -> Error {
        Error::syntax(line, column, msg)
    }

    fn error_here(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.column, msg)
    }

    fn read_bareword(&mut self) -> &'a str {
        let input = self.input;
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if !is_identifier_char(ch) {
                break;
            }
            self.next_char();
        }
        &input[start..self.position]
    }

    /// Reads a comment, without its leading `;` and without the line break.
    fn read_comment(&mut self) -> String {
        self.next_char(); // consume ';'
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.next_char();
        }
        self.input[start..self.position].to_string()
    }

    fn read_string(&mut self) -> Result<String> {
        self.next_char(); // consume opening quote
        let mut result = String::new();

        loop {
            let (line, column) = (self.line, self.column);
            match self.next_char() {
                None => return Err(self.error_here("unterminated string")),
                Some('"') => return Ok(result),
                Some('\\') => match self.next_char() {
                    Some('\\') => result.push('\\'),
                    Some('"') => result.push('"'),
                    Some(other) => {
                        return Err(self.error(
                            line,
                            column,
                            &format!("unsupported escape sequence '\\{}'", other),
                        ))
                    }
                    None => return Err(self.error_here("unterminated string")),
                },
                Some(ch) if !is_string_char(ch) => {
                    return Err(self.error(
                        line,
                        column,
                        &format!("unescaped control character {:?} in string", ch),
                    ))
                }
                Some(ch) => result.push(ch),
            }
        }
    }

    /// Parses the whole input into a root list.
    pub fn parse(mut self) -> Result<Node> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<List> = None;

        loop {
            let blank_line = self.skip_whitespace() >= 2;
            let (line, column) = (self.line, self.column);

            // Outside the root list only whitespace and comments may appear.
            if stack.is_empty() {
                match self.peek_char() {
                    None | Some(';') => {}
                    Some('(') if root.is_none() => {}
                    Some(_) if root.is_some() => {
                        return Err(self.error(
                            line,
                            column,
                            "unexpected content after the root list",
                        ))
                    }
                    Some(_) => return Err(self.error(line, column, "expected '('")),
                }
            }

            let node = match self.peek_char() {
                None => {
                    if !stack.is_empty() {
                        return Err(self.error(
                            line,
                            column,
                            "unexpected end of input, expected ')'",
                        ));
                    }
                    return root
                        .map(Node::List)
                        .ok_or_else(|| self.error(line, column, "empty document, expected '('"));
                }
                Some(';') => {
                    let text = self.read_comment();
                    if stack.is_empty() {
                        continue;
                    }
                    Node::Comment(text)
                }
                Some('(') => {
                    if stack.len() >= self.max_depth {
                        return Err(Error::resource_limit(line, column, self.max_depth));
                    }
                    self.next_char();
                    self.skip_whitespace();
                    let name = match self.peek_char() {
                        Some(ch) if is_identifier_char(ch) => self.read_bareword(),
                        Some(')') => return Err(self.error(line, column, "empty list")),
                        None => {
                            return Err(
                                self.error_here("unexpected end of input, expected a list name")
                            )
                        }
                        Some(_) => return Err(self.error_here("expected a list name")),
                    };
                    let list =
                        List::try_new(name).map_err(|e| self.error(line, column, &e.to_string()))?;
                    stack.push(Frame { list, blank_line });
                    continue;
                }
                Some(')') => {
                    self.next_char();
                    let frame = match stack.pop() {
                        Some(frame) => frame,
                        None => return Err(self.error(line, column, "unbalanced ')'")),
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.push(Node::List(frame.list), frame.blank_line),
                        None => root = Some(frame.list),
                    }
                    continue;
                }
                Some('"') => Node::String(self.read_string()?),
                Some(ch) if is_identifier_char(ch) => {
                    let token = Token::new(self.read_bareword())
                        .map_err(|e| self.error(line, column, &e.to_string()))?;
                    Node::Token(token)
                }
                Some(ch) => {
                    return Err(self.error(
                        line,
                        column,
                        &format!("unexpected character {:?}", ch),
                    ))
                }
            };

            if let Some(parent) = stack.last_mut() {
                parent.push(node, blank_line);
            }
        }
    }
}

/// An open list together with the blank-line hint of its position in the parent.
struct Frame {
    list: List,
    blank_line: bool,
}

impl Frame {
    fn push(&mut self, node: Node, blank_line: bool) {
        if blank_line {
            self.list.append_with_blank_line(node);
        } else {
            self.list.append(node);
        }
    }
}
