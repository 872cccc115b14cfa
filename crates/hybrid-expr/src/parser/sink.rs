//! Sink for converting parser events into a Rowan green tree.

use rowan::GreenNodeBuilder;

use crate::lexer::Lexeme;
use crate::parser::event::Event;
use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// Replays parser events over the lexemes they consumed.
pub struct Sink<'l, 'input> {
    builder: GreenNodeBuilder<'static>,
    lexemes: &'l [Lexeme<'input>],
    cursor: usize,
    events: Vec<Event>,
}

impl<'l, 'input> Sink<'l, 'input> {
    pub fn new(lexemes: &'l [Lexeme<'input>], events: Vec<Event>) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            lexemes,
            cursor: 0,
            events,
        }
    }

    /// Consume the sink and build the syntax tree.
    pub fn finish(mut self) -> SyntaxNode {
        for i in 0..self.events.len() {
            match std::mem::replace(&mut self.events[i], Event::Placeholder) {
                Event::Start {
                    kind,
                    forward_parent,
                } => self.open(kind, forward_parent),
                Event::Token { kind } => self.token(kind),
                Event::Finish => self.builder.finish_node(),
                Event::Placeholder => {}
            }
        }

        SyntaxNode::new_root(self.builder.finish())
    }

    /// Open `kind` together with every node it was preceded into, outermost
    /// first. Each forwarded `Start` is consumed so it is not opened twice.
    fn open(&mut self, kind: SyntaxKind, mut forward_parent: Option<usize>) {
        let mut chain = vec![kind];
        while let Some(index) = forward_parent {
            forward_parent = match std::mem::replace(&mut self.events[index], Event::Placeholder) {
                Event::Start {
                    kind,
                    forward_parent,
                } => {
                    chain.push(kind);
                    forward_parent
                }
                _ => None,
            };
        }
        for kind in chain.into_iter().rev() {
            self.builder.start_node(kind.into());
        }
    }

    fn token(&mut self, kind: SyntaxKind) {
        let text = self
            .lexemes
            .get(self.cursor)
            .map_or("", |lexeme| lexeme.text.as_ref());
        self.builder.token(kind.into(), text);
        self.cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sink_builds_simple_tree() {
        let lexemes = vec![Lexeme::new(SyntaxKind::IDENT, "x")];
        let events = vec![
            Event::start(SyntaxKind::ROOT),
            Event::start(SyntaxKind::NAME_REF),
            Event::token(SyntaxKind::IDENT),
            Event::Finish,
            Event::Finish,
        ];

        let tree = Sink::new(&lexemes, events).finish();

        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        assert_eq!(tree.children().count(), 1);
        assert_eq!(tree.text().to_string(), "x");
    }

    #[test]
    fn forward_parent_wraps_completed_node() {
        let lexemes = vec![
            Lexeme::new(SyntaxKind::IDENT, "x"),
            Lexeme::new(SyntaxKind::BANG, "!"),
        ];
        // NAME_REF completed first, then preceded by POSTFIX_EXPR at index 4
        let events = vec![
            Event::start(SyntaxKind::ROOT),
            Event::Start {
                kind: SyntaxKind::NAME_REF,
                forward_parent: Some(4),
            },
            Event::token(SyntaxKind::IDENT),
            Event::Finish,
            Event::start(SyntaxKind::POSTFIX_EXPR),
            Event::token(SyntaxKind::BANG),
            Event::Finish,
            Event::Finish,
        ];

        let tree = Sink::new(&lexemes, events).finish();
        let postfix = tree.children().next().unwrap();

        assert_eq!(postfix.kind(), SyntaxKind::POSTFIX_EXPR);
        assert_eq!(postfix.children().next().unwrap().kind(), SyntaxKind::NAME_REF);
        assert_eq!(tree.text().to_string(), "x!");
    }
}
