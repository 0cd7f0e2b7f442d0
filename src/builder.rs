//! Marker-based tree construction.
//!
//! The parser never touches tree nodes directly. It pulls tokens through a
//! [`TreeBuilder`] and brackets them with markers:
//!
//! - [`TreeBuilder::mark`] opens a marker at the current token,
//! - [`TreeBuilder::done`] commits it as a node of some kind,
//! - [`TreeBuilder::drop`] discards it, leaving its children to the parent,
//! - [`TreeBuilder::precede`] opens a new marker around a committed node.
//!
//! All of this is recorded as a flat event list which is turned into a
//! [`Tree`] once, by [`TreeBuilder::finish`]. Trivia tokens are skipped by
//! the lookahead and attached to whatever node is open when they are
//! flushed, which happens before every new marker and every consumed token.

use std::mem;
use std::ops::Range;

use crate::diagnostic::Diagnostic;
use crate::token::Token;
use crate::tree::{Language, Tree, TreeSink};

#[derive(Debug)]
enum Event<K> {
    /// A node start. `kind` is `None` for markers not committed (yet).
    /// `forward_parent` is the distance to the event of a node started
    /// later by `precede` which encloses this one.
    Start {
        kind: Option<K>,
        forward_parent: Option<usize>,
    },
    Finish,
    /// The next token in input order.
    Token,
}

impl<K> Event<K> {
    fn tombstone() -> Self {
        Event::Start {
            kind: None,
            forward_parent: None,
        }
    }
}

/// An open marker. Must be passed to [`TreeBuilder::done`] or
/// [`TreeBuilder::drop`].
#[derive(Debug)]
#[must_use]
pub struct Marker {
    pos: usize,
}

/// A marker committed as a node.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    pos: usize,
}

pub struct TreeBuilder<'t, L: Language, I> {
    text: &'t str,
    source: I,
    tokens: Vec<Token<L::TokenKind>>,
    /// Tokens before this index already have an event.
    flushed: usize,
    /// Index of the current significant token, or `tokens.len()` at the end.
    cursor: usize,
    events: Vec<Event<L::NodeKind>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'t, L, I> TreeBuilder<'t, L, I>
where
    L: Language,
    I: Iterator<Item = Token<L::TokenKind>>,
{
    pub fn new(text: &'t str, source: I) -> Self {
        let mut builder = Self {
            text,
            source,
            tokens: Vec::new(),
            flushed: 0,
            cursor: 0,
            // start of the root node, kind decided in `finish`
            events: vec![Event::tombstone()],
            diagnostics: Vec::new(),
        };
        builder.fill();
        builder
    }

    /// Move the cursor to the next significant token, pulling tokens from
    /// the source as needed.
    fn fill(&mut self) {
        self.cursor = self.flushed;
        self.skip_trivia();
    }

    fn skip_trivia(&mut self) {
        loop {
            if self.cursor == self.tokens.len() {
                match self.source.next() {
                    Some(token) => self.tokens.push(token),
                    None => return,
                }
            }
            if !L::is_trivia(self.tokens[self.cursor].kind) {
                return;
            }
            self.cursor += 1;
        }
    }

    /// The token source, e.g. to query lexer state after parsing.
    pub fn source(&self) -> &I {
        &self.source
    }

    /// Kind of the current significant token.
    pub fn current(&self) -> Option<L::TokenKind> {
        self.tokens.get(self.cursor).map(|t| t.kind)
    }

    pub fn at(&self, kind: L::TokenKind) -> bool {
        self.current() == Some(kind)
    }

    pub fn at_end(&self) -> bool {
        self.current().is_none()
    }

    /// Kind of the significant token `n` positions after the current one.
    pub fn nth(&mut self, n: usize) -> Option<L::TokenKind> {
        let saved = self.cursor;
        for _ in 0..n {
            if self.cursor == self.tokens.len() {
                break;
            }
            self.cursor += 1;
            self.skip_trivia();
        }
        let kind = self.current();
        self.cursor = saved;
        kind
    }

    /// Span of the current significant token; an empty span at the end of
    /// the input when there is none.
    pub fn current_span(&self) -> Range<usize> {
        match self.tokens.get(self.cursor) {
            Some(token) => token.span.clone(),
            None => self.text.len()..self.text.len(),
        }
    }

    pub fn current_text(&self) -> &'t str {
        &self.text[self.current_span()]
    }

    fn flush_trivia(&mut self) {
        while self.flushed < self.cursor {
            self.events.push(Event::Token);
            self.flushed += 1;
        }
    }

    /// Consume the current significant token. Does nothing at the end.
    pub fn advance(&mut self) {
        if self.at_end() {
            return;
        }
        self.flush_trivia();
        self.events.push(Event::Token);
        self.flushed += 1;
        self.fill();
    }

    /// Consume the current token if it has the given kind.
    pub fn eat(&mut self, kind: L::TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it has the given kind, otherwise
    /// report `message` at it.
    pub fn expect(&mut self, kind: L::TokenKind, message: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(message);
            false
        }
    }

    /// Report `message` at the current token.
    pub fn error(&mut self, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(span, message);
    }

    pub fn error_at(&mut self, span: Range<usize>, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(span, message));
    }

    pub fn mark(&mut self) -> Marker {
        self.flush_trivia();
        let pos = self.events.len();
        self.events.push(Event::tombstone());
        Marker { pos }
    }

    pub fn done(&mut self, marker: Marker, kind: L::NodeKind) -> CompletedMarker {
        if let Event::Start { kind: slot, .. } = &mut self.events[marker.pos] {
            *slot = Some(kind);
        }
        self.events.push(Event::Finish);
        CompletedMarker { pos: marker.pos }
    }

    /// Forget a marker. Anything consumed since it was opened stays in the
    /// enclosing node.
    pub fn drop(&mut self, marker: Marker) {
        if marker.pos == self.events.len() - 1 {
            self.events.pop();
        }
        // otherwise the start event stays behind as a tombstone
    }

    /// Open a marker that will enclose the already committed node.
    pub fn precede(&mut self, completed: CompletedMarker) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::tombstone());
        if let Event::Start { forward_parent, .. } = &mut self.events[completed.pos] {
            *forward_parent = Some(pos - completed.pos);
        }
        Marker { pos }
    }

    /// Consume everything left in the source, close the root node with the
    /// given kind and build the tree. Diagnostics come back sorted by
    /// position.
    pub fn finish(mut self, root: L::NodeKind) -> (Tree<L>, Vec<Diagnostic>) {
        self.tokens.extend(self.source.by_ref());
        while self.flushed < self.tokens.len() {
            self.events.push(Event::Token);
            self.flushed += 1;
        }
        self.events[0] = Event::Start {
            kind: Some(root),
            forward_parent: None,
        };
        self.events.push(Event::Finish);

        let mut sink = TreeSink::<L>::new(self.text, self.tokens);
        let mut events = self.events;
        let mut parents = Vec::new();
        for i in 0..events.len() {
            match mem::replace(&mut events[i], Event::tombstone()) {
                Event::Start {
                    kind,
                    forward_parent,
                } => {
                    parents.clear();
                    parents.push(kind);
                    let mut index = i;
                    let mut next = forward_parent;
                    while let Some(delta) = next {
                        index += delta;
                        next = match mem::replace(&mut events[index], Event::tombstone()) {
                            Event::Start {
                                kind,
                                forward_parent,
                            } => {
                                parents.push(kind);
                                forward_parent
                            }
                            _ => None,
                        };
                    }
                    for kind in parents.drain(..).rev().flatten() {
                        sink.start_node(kind);
                    }
                }
                Event::Finish => sink.finish_node(),
                Event::Token => sink.token(),
            }
        }

        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by_key(|d| d.span.start);
        (sink.finish(), diagnostics)
    }
}
