//! Parser for `sampleN` result lists.
//!
//! The simulator prints one outer list with one element per time step:
//!
//! ```text
//! [0,1,1]                                      one output
//! [(0,Idle),(1,WaitData)]                      one tuple element per output
//! [(0,(0.0,0.0),Idle),(1,(0.5,0.0),Run)]       nested values stay whole
//! ```
//!
//! The text is first parsed into a [`Node`] tree by a recursive-descent
//! scanner that tracks bracket depth, skips string and character literals,
//! and records
//! the source span of every node. [`parse_sample_n`] then flattens the tree
//! into per-output value lists, rendering nested values with their source
//! text unchanged.

use crate::error::ReplError;

/// A parsed value of simulator output.
#[derive(Clone, Debug, PartialEq)]
pub enum Node<'a> {
    /// A scalar, constructor application or string literal.
    Atom(&'a str),
    /// A parenthesized, comma-separated group.
    Tuple {
        /// The elements.
        items: Vec<Node<'a>>,
        /// The source text including the parentheses.
        text: &'a str,
    },
    /// A bracketed, comma-separated list.
    List {
        /// The elements.
        items: Vec<Node<'a>>,
        /// The source text including the brackets.
        text: &'a str,
    },
}

impl<'a> Node<'a> {
    /// The source text of this node, trimmed.
    pub fn text(&self) -> &'a str {
        match self {
            Node::Atom(text) | Node::Tuple { text, .. } | Node::List { text, .. } => *text,
        }
    }
}

/// Parses one complete value.
///
/// # Errors
///
/// Fails on unbalanced brackets, an unterminated string literal, or
/// trailing text after the value.
pub fn parse_node(src: &str) -> Result<Node<'_>, ReplError> {
    let mut parser = Parser { src, pos: 0 };
    let node = parser.value()?;
    parser.skip_ws();
    if parser.pos < src.len() {
        return Err(parser.error("trailing text after value"));
    }
    Ok(node)
}

/// Splits `sampleN` output into one value list per output signal.
///
/// With `single_value` set, each time step is one value even when it is a
/// tuple. Otherwise tuple elements are distributed over the outputs in
/// comma order, and a list of bare scalars is a single output. Elements
/// nested deeper than the time-step tuple are kept as their source text.
///
/// # Errors
///
/// Fails if the text is not a list, mixes tuples with scalars, or has time
/// steps of differing tuple arity.
pub fn parse_sample_n(text: &str, single_value: bool) -> Result<Vec<Vec<String>>, ReplError> {
    let steps = match parse_node(text.trim())? {
        Node::List { items, .. } => items,
        other => {
            return Err(ReplError::MalformedOutput {
                reason: format!("expected a list of time steps, found '{}'", other.text()),
                offset: 0,
            })
        }
    };

    if steps.is_empty() {
        return Ok(Vec::new());
    }
    if single_value || !steps.iter().any(|s| matches!(s, Node::Tuple { .. })) {
        return Ok(vec![steps.iter().map(|s| s.text().to_string()).collect()]);
    }

    let arity = match &steps[0] {
        Node::Tuple { items, .. } => items.len(),
        _ => 1,
    };
    let mut outputs: Vec<Vec<String>> = vec![Vec::with_capacity(steps.len()); arity];
    for (index, step) in steps.iter().enumerate() {
        let items = match step {
            Node::Tuple { items, .. } if items.len() == arity => items,
            _ => {
                return Err(ReplError::MalformedOutput {
                    reason: format!(
                        "time step {index} is '{}', expected a tuple of {arity} values",
                        step.text()
                    ),
                    offset: 0,
                })
            }
        };
        for (output, item) in outputs.iter_mut().zip(items) {
            output.push(item.text().to_string());
        }
    }
    Ok(outputs)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, reason: &str) -> ReplError {
        ReplError::MalformedOutput {
            reason: reason.to_string(),
            offset: self.pos,
        }
    }

    /// Parses one element up to the next `,`, `)` or `]` at this depth.
    ///
    /// An element that is exactly one bracketed group becomes that group;
    /// anything else (`Just (1,2)`, `-3`, `"a,b"`) is an atom.
    fn value(&mut self) -> Result<Node<'a>, ReplError> {
        self.skip_ws();
        let start = self.pos;
        let mut pieces = 0usize;
        let mut group = None;

        while let Some(c) = self.peek() {
            match c {
                ',' | ')' | ']' => break,
                '(' | '[' => {
                    group = Some(self.group()?);
                    pieces += 1;
                }
                '"' | '\'' => {
                    self.quoted(c)?;
                    pieces += 1;
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                _ => {
                    while self
                        .peek()
                        .is_some_and(|c| !matches!(c, ',' | ')' | ']' | '(' | '[' | '"') && !c.is_whitespace())
                    {
                        self.bump();
                    }
                    pieces += 1;
                }
            }
        }

        let src = self.src;
        let text = src[start..self.pos].trim_end();
        match (pieces, group) {
            (0, _) => Err(self.error("expected a value")),
            (1, Some(node)) => Ok(node),
            _ => Ok(Node::Atom(text)),
        }
    }

    fn group(&mut self) -> Result<Node<'a>, ReplError> {
        let start = self.pos;
        let close = match self.bump() {
            Some('(') => ')',
            Some('[') => ']',
            _ => return Err(self.error("expected '(' or '['")),
        };

        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(close) {
            self.bump();
        } else {
            loop {
                items.push(self.value()?);
                match self.bump() {
                    Some(',') => continue,
                    Some(c) if c == close => break,
                    Some(c) => {
                        self.pos -= c.len_utf8();
                        return Err(self.error(&format!("expected ',' or '{close}'")));
                    }
                    None => return Err(self.error(&format!("unterminated group, expected '{close}'"))),
                }
            }
        }

        let src = self.src;
        let text = &src[start..self.pos];
        Ok(if close == ')' {
            Node::Tuple { items, text }
        } else {
            Node::List { items, text }
        })
    }

    /// Skips a string or character literal opened by `quote`.
    ///
    /// A `'` only opens a literal at the start of a piece; primes inside
    /// identifiers such as `x'` are part of the word.
    fn quoted(&mut self, quote: char) -> Result<(), ReplError> {
        self.bump();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                c if c == quote => return Ok(()),
                _ => {}
            }
        }
        Err(self.error(if quote == '"' {
            "unterminated string literal"
        } else {
            "unterminated character literal"
        }))
    }
}
