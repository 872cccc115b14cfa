//! # Parser - Event-Based Tree Construction
//!
//! Turns a lexeme stream into a syntax tree in two steps: grammar rules emit
//! a flat list of [`Event`]s, then the [`Sink`] replays them into a Rowan
//! tree.
//!
//! ## The Marker System
//!
//! `parser.start()` hands out a [`Marker`] that must be completed with
//! `marker.complete(parser, KIND)` or dropped with `marker.abandon(parser)`.
//! Dropping it any other way panics.
//!
//! ```ignore
//! let m = p.start();
//! p.bump();
//! m.complete(p, SyntaxKind::LITERAL);
//! ```
//!
//! Binary operators are parsed by precedence climbing: once an operator is
//! seen after an operand, [`CompletedMarker::precede`] wraps that operand in
//! a new `BIN_EXPR` node. Binding powers come from [`Precedence`], so the
//! same grammar can rank `+` above `*`.
//!
//! ## Error Tolerance
//!
//! Parsing never fails. Unexpected lexemes are wrapped in `ERROR` nodes and
//! missing operands leave an empty `ERROR` node, so every input yields a
//! tree that holds all of it. Whether the region is a valid expression is
//! decided afterwards by [`lower`](crate::ast::lower).

pub mod event;
pub mod sink;

mod grammar;

use crate::lexer::{Lexeme, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// Precedence levels of the binary operators. Higher binds tighter; both
/// operators are left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precedence {
    pub plus: u8,
    pub mul: u8,
}

impl Default for Precedence {
    fn default() -> Self {
        Self { plus: 1, mul: 2 }
    }
}

impl Precedence {
    /// Left and right binding power of a binary operator.
    pub fn binding_power(self, op: SyntaxKind) -> Option<(u16, u16)> {
        let level = match op {
            SyntaxKind::PLUS => self.plus,
            SyntaxKind::STAR => self.mul,
            _ => return None,
        };
        let left = u16::from(level) * 2 + 1;
        Some((left, left + 1))
    }
}

/// The parser state machine.
///
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect lexemes: `current()`, `nth()`, `at()`, `at_end()`
/// - Consume lexemes: `bump()`, `eat()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
pub struct Parser<'l, 'input> {
    lexemes: &'l [Lexeme<'input>],
    pos: usize,
    events: Vec<Event>,
    precedence: Precedence,
}

impl<'l, 'input> Parser<'l, 'input> {
    pub fn new(lexemes: &'l [Lexeme<'input>], precedence: Precedence) -> Self {
        Self {
            lexemes,
            pos: 0,
            events: Vec::new(),
            precedence,
        }
    }

    pub fn parse(mut self) -> SyntaxNode {
        grammar::root(&mut self);
        let sink = Sink::new(self.lexemes, self.events);
        sink.finish()
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current lexeme kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.lexemes
            .get(self.pos + n)
            .map(|lexeme| lexeme.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.lexemes.len()
    }

    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current lexeme if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }
}

/// A node under construction. Must be completed or abandoned.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    pos: usize,
    completed: bool,
}

impl Marker {
    /// Turn the placeholder into a `Start` of `kind` and close the node.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start {
            kind,
            forward_parent: None,
        };
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Drop the node. The placeholder is removed when nothing followed it,
    /// otherwise the sink skips it.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A completed node that can still be wrapped in a new parent.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    pos: usize,
}

impl CompletedMarker {
    /// Start a node that will become the parent of this one.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// Parse lexemes into a syntax tree.
pub fn parse(lexemes: &[Lexeme<'_>], precedence: Precedence) -> SyntaxNode {
    Parser::new(lexemes, precedence).parse()
}

/// Parse raw text with the default precedence. Whitespace between lexemes
/// carries no meaning and is left out of the tree.
pub fn parse_text(source: &str) -> SyntaxNode {
    let lexemes: Vec<Lexeme<'_>> = lex(source)
        .into_iter()
        .filter(|lexeme| !lexeme.kind.is_trivia())
        .collect();
    parse(&lexemes, Precedence::default())
}
