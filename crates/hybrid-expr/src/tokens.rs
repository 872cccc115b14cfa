//! The hybrid tokens of the expression language.
//!
//! Spacing flags decide how a token renders next to its neighbours and where
//! the caret may rest: postfix operators hug their operand, `.` and a call's
//! `(` hug both sides.

use hybrid_engine::{SimpleToken, Token};

use crate::ast::{Expr, TextValue};

pub fn plus() -> Token<Expr> {
    Token::simple("+")
}

pub fn mul() -> Token<Expr> {
    Token::simple("*")
}

pub fn increment() -> Token<Expr> {
    Token::Simple(SimpleToken::new("++").with_no_space_to_left())
}

pub fn factorial() -> Token<Expr> {
    Token::Simple(SimpleToken::new("!").with_no_space_to_left())
}

pub fn dot() -> Token<Expr> {
    Token::Simple(SimpleToken::new(".").unspaced())
}

/// `(` opening a group.
pub fn lp() -> Token<Expr> {
    Token::Simple(SimpleToken::new("(").with_no_space_to_right())
}

/// `(` opening a call's argument list.
pub fn lp_call() -> Token<Expr> {
    Token::Simple(SimpleToken::new("(").unspaced())
}

pub fn rp() -> Token<Expr> {
    Token::Simple(SimpleToken::new(")").with_no_space_to_left())
}

pub fn int(n: i64) -> Token<Expr> {
    Token::simple(n.to_string())
}

pub fn id(name: &str) -> Token<Expr> {
    Token::identifier(name)
}

pub fn value(value: TextValue) -> Token<Expr> {
    Token::Value(Expr::Text(value))
}
