//! # Parser Events
//!
//! The parser does not build the tree directly. It emits a flat sequence of
//! events that the [`Sink`](super::sink::Sink) replays into a Rowan tree:
//!
//! ```text
//! Start(BIN_EXPR)
//!   Start(NAME_REF)
//!     Token(IDENT)
//!   Finish
//!   Token(PLUS)
//!   Start(LITERAL)
//!     Token(INT)
//!   Finish
//! Finish
//! ```
//!
//! ## Forward Parent Links
//!
//! Binary and postfix expressions are only recognised after their left
//! operand has been parsed. `forward_parent` on a `Start` says "open that
//! other node first", which lets the operand be wrapped without moving any
//! events.

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    ///
    /// When `forward_parent` is set it points to another `Start` event that
    /// becomes this node's parent.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Add the next lexeme to the current node.
    Token { kind: SyntaxKind },

    /// Finish the current node.
    Finish,

    /// A marker that was never completed, or a `Start` already consumed by
    /// the sink.
    Placeholder,
}

impl Event {
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_start_creation() {
        assert_eq!(
            Event::start(SyntaxKind::CALL_EXPR),
            Event::Start {
                kind: SyntaxKind::CALL_EXPR,
                forward_parent: None
            }
        );
    }

    #[test]
    fn event_token_creation() {
        assert_eq!(
            Event::token(SyntaxKind::IDENT),
            Event::Token {
                kind: SyntaxKind::IDENT
            }
        );
    }
}
