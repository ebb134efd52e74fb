//! Term normalizer: rewrites a free-text boolean search expression into the
//! bracket query markup (`[[...]]` conditions, `<q>...</q>` groups) consumed
//! by the downstream query engine.

use std::fmt;

/// Parses a raw search expression into its segment sequence.
///
/// ```
/// use query_markup::{parse_term, Segment};
///
/// let expr = parse_term("in:foo || bar").unwrap();
/// assert!(matches!(&expr.segments[0], Segment::Term(t) if t == "in:foo"));
/// assert!(matches!(&expr.segments[1], Segment::Literal(op) if op == "||"));
/// assert!(matches!(&expr.segments[2], Segment::Literal(word) if word == "bar"));
/// ```
pub fn parse_term(raw: &str) -> Result<Expression, MalformedExpression> {
    Scanner::new(raw).parse()
}

/// Parses and re-renders a raw search expression as bracket markup.
///
/// Prefixed terms are wrapped in `[[...]]`, parenthesized groups become
/// `<q>...</q>`, and already-bracketed regions pass through untouched, so
/// the function is idempotent over its own output.
///
/// ```
/// use query_markup::normalize_term;
///
/// assert_eq!(normalize_term("in:foo").unwrap(), "[[in:foo]]");
/// assert_eq!(
///     normalize_term("(in:foo && in:bar)||in:foobar").unwrap(),
///     "<q>[[in:foo]] && [[in:bar]]</q> || [[in:foobar]]",
/// );
/// ```
pub fn normalize_term(raw: &str) -> Result<String, MalformedExpression> {
    Ok(parse_term(raw)?.to_string())
}

/// An ordered run of segments; rendering joins them with single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub segments: Vec<Segment>,
}

impl Expression {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// One piece of a normalized expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A connective (`&&`, `||`, `AND`, `OR`) or a bare word, kept verbatim.
    ///
    /// ```
    /// use query_markup::normalize_term;
    /// assert_eq!(normalize_term("in:foo && bar").unwrap(), "[[in:foo]] && bar");
    /// ```
    Literal(String),
    /// An atomic condition, rendered wrapped in `[[...]]`. A term starts at
    /// a colon-qualified token and absorbs following bare words, so
    /// `phrase:foo bar` stays one term.
    ///
    /// ```
    /// use query_markup::normalize_term;
    /// assert_eq!(normalize_term("phrase:foo bar").unwrap(), "[[phrase:foo bar]]");
    /// ```
    Term(String),
    /// A region that arrived already bracketed (`[[...]]` or `<q>...</q>`)
    /// and passes through byte-for-byte.
    ///
    /// ```
    /// use query_markup::normalize_term;
    /// assert_eq!(normalize_term("[[in:foo]]").unwrap(), "[[in:foo]]");
    /// ```
    Verbatim(String),
    /// A parenthesized group, rendered as `<q>...</q>`.
    ///
    /// ```
    /// use query_markup::normalize_term;
    /// assert_eq!(normalize_term("(in:foo)").unwrap(), "<q>[[in:foo]]</q>");
    /// ```
    Group(Expression),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) | Segment::Verbatim(text) => f.write_str(text),
            Segment::Term(term) => write!(f, "[[{term}]]"),
            Segment::Group(inner) => write!(f, "<q>{inner}</q>"),
        }
    }
}

/// Raised when an expression cannot be bracketed: unbalanced parentheses or
/// an unterminated `[[...]]` / `<q>...</q>` region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedExpression {
    pub message: String,
    pub position: usize,
}

impl MalformedExpression {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for MalformedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.position)
    }
}

impl std::error::Error for MalformedExpression {}

/// Single-pass scanner over the raw expression. Group nesting is tracked
/// with an explicit stack of the segments accumulated outside each open
/// parenthesis, so deeply nested input never re-scans earlier bytes.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(mut self) -> Result<Expression, MalformedExpression> {
        // (byte offset of the '(', segments accumulated outside it)
        let mut open_groups: Vec<(usize, Vec<Segment>)> = Vec::new();
        let mut segments: Vec<Segment> = Vec::new();
        // Colon-qualified token still absorbing trailing bare words.
        let mut pending: Option<String> = None;

        loop {
            self.skip_ws();
            if self.eof() {
                break;
            }

            if self.at("[[") {
                flush(&mut pending, &mut segments);
                segments.push(Segment::Verbatim(self.scan_condition()?));
            } else if self.at("<q>") {
                flush(&mut pending, &mut segments);
                segments.push(Segment::Verbatim(self.scan_subquery()?));
            } else if self.at("&&") || self.at("||") {
                flush(&mut pending, &mut segments);
                segments.push(Segment::Literal(self.remaining()[..2].to_string()));
                self.pos += 2;
            } else if self.at("(") {
                flush(&mut pending, &mut segments);
                open_groups.push((self.pos, std::mem::take(&mut segments)));
                self.pos += 1;
            } else if self.at(")") {
                flush(&mut pending, &mut segments);
                let Some((_, outer)) = open_groups.pop() else {
                    return Err(self.error("unmatched ')'"));
                };
                let inner = std::mem::replace(&mut segments, outer);
                segments.push(Segment::Group(Expression { segments: inner }));
                self.pos += 1;
            } else {
                let word = self.scan_word();
                if word == "AND" || word == "OR" {
                    flush(&mut pending, &mut segments);
                    segments.push(Segment::Literal(word));
                } else if word.contains(':') {
                    // A new prefixed token always starts its own term.
                    flush(&mut pending, &mut segments);
                    pending = Some(word);
                } else if let Some(term) = pending.as_mut() {
                    term.push(' ');
                    term.push_str(&word);
                } else {
                    segments.push(Segment::Literal(word));
                }
            }
        }

        flush(&mut pending, &mut segments);
        if let Some((open, _)) = open_groups.pop() {
            return Err(MalformedExpression::new("unclosed '('", open));
        }
        Ok(Expression { segments })
    }

    /// Consumes an already-wrapped `[[...]]` region verbatim.
    fn scan_condition(&mut self) -> Result<String, MalformedExpression> {
        let start = self.pos;
        match self.remaining().find("]]") {
            Some(idx) => {
                self.pos += idx + 2;
                Ok(self.input[start..self.pos].to_string())
            }
            None => Err(MalformedExpression::new("unclosed '[['", start)),
        }
    }

    /// Consumes a pre-existing `<q>...</q>` region verbatim, counting nested
    /// `<q>` markers to find the matching closer. The interior is already
    /// normalized markup and is not re-scanned.
    fn scan_subquery(&mut self) -> Result<String, MalformedExpression> {
        let start = self.pos;
        let mut depth = 0usize;
        while !self.eof() {
            if self.at("<q>") {
                depth += 1;
                self.pos += 3;
            } else if self.at("</q>") {
                depth -= 1;
                self.pos += 4;
                if depth == 0 {
                    return Ok(self.input[start..self.pos].to_string());
                }
            } else {
                self.advance_char();
            }
        }
        Err(MalformedExpression::new("unclosed '<q>'", start))
    }

    /// Consumes a run of characters up to whitespace, a parenthesis, or the
    /// start of a bracketed region or glued `&&` / `||` connective.
    fn scan_word(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() || ch == '(' || ch == ')' {
                break;
            }
            if self.at("[[") || self.at("<q>") || self.at("&&") || self.at("||") {
                break;
            }
            self.advance_char();
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_ws(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> MalformedExpression {
        MalformedExpression::new(message, self.pos)
    }

    fn at(&self, token: &str) -> bool {
        self.remaining().starts_with(token)
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}

fn flush(pending: &mut Option<String>, segments: &mut Vec<Segment>) {
    if let Some(term) = pending.take() {
        segments.push(Segment::Term(term));
    }
}
