//! Expressions: operands, postfix operators and binary operators.

use crate::parser::{CompletedMarker, Marker, Parser};
use crate::syntax_kind::SyntaxKind;

pub(super) fn expr(p: &mut Parser<'_, '_>) {
    if expr_bp(p, 0).is_none() {
        missing(p);
    }
}

/// Precedence climbing: keep absorbing operators that bind at least as
/// tightly as `min_bp`.
fn expr_bp(p: &mut Parser<'_, '_>, min_bp: u16) -> Option<CompletedMarker> {
    let operand = atom(p)?;
    let mut lhs = postfix(p, operand);

    while let Some((left, right)) = p.precedence().binding_power(p.current()) {
        if left < min_bp {
            break;
        }
        let m = lhs.precede(p);
        p.bump();
        if expr_bp(p, right).is_none() {
            missing(p);
        }
        lhs = m.complete(p, SyntaxKind::BIN_EXPR);
    }

    Some(lhs)
}

/// Returns `None` without consuming anything when no operand starts here.
fn atom(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    let m = p.start();
    let kind = match p.current() {
        SyntaxKind::IDENT if p.nth(1) == SyntaxKind::LPAREN => return Some(call(p, m)),
        SyntaxKind::IDENT => {
            p.bump();
            SyntaxKind::NAME_REF
        }
        SyntaxKind::INT => {
            p.bump();
            SyntaxKind::LITERAL
        }
        SyntaxKind::VALUE => {
            p.bump();
            SyntaxKind::VALUE_EXPR
        }
        SyntaxKind::LPAREN => {
            p.bump();
            expr(p);
            expect(p, SyntaxKind::RPAREN);
            SyntaxKind::PAREN_EXPR
        }
        SyntaxKind::EOF | SyntaxKind::RPAREN => {
            m.abandon(p);
            return None;
        }
        _ => {
            p.bump();
            SyntaxKind::ERROR
        }
    };
    Some(m.complete(p, kind))
}

fn call(p: &mut Parser<'_, '_>, m: Marker) -> CompletedMarker {
    p.bump();
    p.bump();
    if !p.at(SyntaxKind::RPAREN) {
        expr(p);
    }
    expect(p, SyntaxKind::RPAREN);
    m.complete(p, SyntaxKind::CALL_EXPR)
}

fn postfix(p: &mut Parser<'_, '_>, mut lhs: CompletedMarker) -> CompletedMarker {
    loop {
        lhs = match p.current() {
            SyntaxKind::PLUS_PLUS | SyntaxKind::BANG => {
                let m = lhs.precede(p);
                p.bump();
                m.complete(p, SyntaxKind::POSTFIX_EXPR)
            }
            SyntaxKind::DOT => {
                let m = lhs.precede(p);
                p.bump();
                expect(p, SyntaxKind::IDENT);
                m.complete(p, SyntaxKind::FIELD_EXPR)
            }
            _ => return lhs,
        };
    }
}

fn expect(p: &mut Parser<'_, '_>, kind: SyntaxKind) {
    if !p.eat(kind) {
        missing(p);
    }
}

/// An empty ERROR node where something was required.
fn missing(p: &mut Parser<'_, '_>) {
    let m = p.start();
    m.complete(p, SyntaxKind::ERROR);
}
