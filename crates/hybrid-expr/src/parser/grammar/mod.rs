//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and uses its methods to inspect
//! lexemes, consume them and build nodes with markers.
//!
//! ```text
//! root    := expr? ERROR?
//! expr    := postfix (('+' | '*') expr)*      precedence climbing
//! postfix := atom ('++' | '!' | '.' IDENT)*
//! atom    := IDENT '(' expr? ')' | IDENT | INT | VALUE | '(' expr ')'
//! ```
//!
//! ## Error Recovery
//!
//! Rules never bail out. A lexeme that cannot start an operand is wrapped in
//! an ERROR node on its own, a missing operand or closing paren leaves an
//! empty ERROR node, and whatever follows a complete expression is swept
//! into one trailing ERROR node.

mod expr;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse a whole region into a ROOT node.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    if !p.at_end() {
        expr::expr(p);
    }

    if !p.at_end() {
        let rest = p.start();
        while !p.at_end() {
            p.bump();
        }
        rest.complete(p, SyntaxKind::ERROR);
    }

    m.complete(p, SyntaxKind::ROOT);
}
