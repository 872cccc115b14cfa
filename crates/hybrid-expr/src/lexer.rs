//! # Lexer - Raw Text and Hybrid Tokens
//!
//! The expression language meets text in two places:
//!
//! 1. **Pasted or loaded text** is split into lexemes by a [Logos] lexer and
//!    then turned into hybrid tokens by
//!    [`ExprSpec::tokenize`](crate::ExprSpec).
//! 2. **Hybrid tokens** already in the editor are mapped back to lexemes
//!    with [`lex_tokens`] so the parser sees one kind per token.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ```
//! use hybrid_expr::lexer::lex;
//! use hybrid_expr::SyntaxKind;
//!
//! let kinds: Vec<SyntaxKind> = lex("f(x)++").iter().map(|l| l.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [SyntaxKind::IDENT, SyntaxKind::LPAREN, SyntaxKind::IDENT, SyntaxKind::RPAREN, SyntaxKind::PLUS_PLUS]
//! );
//! ```
//!
//! Like the tree, lexing is lossless: concatenating lexeme texts gives the
//! input back, whitespace included.

use std::borrow::Cow;

use hybrid_engine::Token;
use logos::Logos;

use crate::ast::Expr;
use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// `#[logos(skip r"")]` skips nothing; whitespace is a token of its own.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
pub enum TokenKind {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Int,

    #[token("++")]
    PlusPlus,

    #[token("+")]
    Plus,

    #[token("*")]
    Star,

    #[token("!")]
    Bang,

    #[token(".")]
    Dot,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

impl TokenKind {
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::Int => SyntaxKind::INT,
            TokenKind::PlusPlus => SyntaxKind::PLUS_PLUS,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
        }
    }
}

/// A lexeme: its kind and the text it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub kind: SyntaxKind,
    pub text: Cow<'a, str>,
}

impl<'a> Lexeme<'a> {
    pub fn new(kind: SyntaxKind, text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Lex raw text. Unrecognised characters become `ERROR_TOKEN` lexemes.
pub fn lex(input: &str) -> Vec<Lexeme<'_>> {
    let mut lexemes = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let kind = match result {
            Ok(kind) => kind.to_syntax_kind(),
            Err(()) => SyntaxKind::ERROR_TOKEN,
        };
        lexemes.push(Lexeme::new(kind, lexer.slice()));
    }

    lexemes
}

/// The kind of text forming exactly one lexeme, if it does.
pub fn single_kind(text: &str) -> Option<SyntaxKind> {
    let mut lexer = TokenKind::lexer(text);
    match (lexer.next(), lexer.next()) {
        (Some(Ok(TokenKind::Whitespace)), _) => None,
        (Some(Ok(TokenKind::Int)), None) => text.parse::<i64>().is_ok().then_some(SyntaxKind::INT),
        (Some(Ok(kind)), None) => Some(kind.to_syntax_kind()),
        _ => None,
    }
}

/// One lexeme per hybrid token, for the parser.
///
/// Identifier tokens are names whatever their text; value tokens lex as
/// `VALUE`; simple tokens are lexed by their text. Anything else cannot
/// appear in a valid expression.
pub fn lex_tokens(tokens: &[Token<Expr>]) -> Vec<Lexeme<'_>> {
    tokens
        .iter()
        .map(|token| {
            let kind = match token {
                Token::Identifier(_) => SyntaxKind::IDENT,
                Token::Value(_) => SyntaxKind::VALUE,
                Token::Simple(simple) => {
                    single_kind(simple.text()).unwrap_or(SyntaxKind::ERROR_TOKEN)
                }
                Token::Comment { .. } | Token::Error(_) | Token::Terminator { .. } => {
                    SyntaxKind::ERROR_TOKEN
                }
            };
            Lexeme::new(kind, token.text())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TextValue;
    use crate::tokens;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input).into_iter().map(|lexeme| lexeme.kind).collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_is_lossless() {
        let input = "a + b*(c) ++ $ 12";
        let text: String = lex(input).iter().map(|lexeme| lexeme.text.as_ref()).collect();
        assert_eq!(text, input);
    }

    #[rstest]
    #[case("x", vec![SyntaxKind::IDENT])]
    #[case("_tmp1", vec![SyntaxKind::IDENT])]
    #[case("239", vec![SyntaxKind::INT])]
    #[case("+++", vec![SyntaxKind::PLUS_PLUS, SyntaxKind::PLUS])]
    #[case("a.b", vec![SyntaxKind::IDENT, SyntaxKind::DOT, SyntaxKind::IDENT])]
    #[case("2 * 3", vec![SyntaxKind::INT, SyntaxKind::WHITESPACE, SyntaxKind::STAR, SyntaxKind::WHITESPACE, SyntaxKind::INT])]
    #[case("x!", vec![SyntaxKind::IDENT, SyntaxKind::BANG])]
    #[case("a$", vec![SyntaxKind::IDENT, SyntaxKind::ERROR_TOKEN])]
    fn lex_kinds(#[case] input: &str, #[case] expected: Vec<SyntaxKind>) {
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn hybrid_tokens_lex_one_to_one() {
        let tokens = vec![
            tokens::id("f"),
            tokens::lp_call(),
            tokens::int(1),
            tokens::rp(),
            tokens::increment(),
            tokens::plus(),
            tokens::value(TextValue::new("v")),
            Token::error("$"),
            Token::simple("a b"),
            Token::simple("99999999999999999999"),
        ];

        let lexed: Vec<SyntaxKind> = lex_tokens(&tokens).into_iter().map(|lexeme| lexeme.kind).collect();

        assert_eq!(
            lexed,
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::LPAREN,
                SyntaxKind::INT,
                SyntaxKind::RPAREN,
                SyntaxKind::PLUS_PLUS,
                SyntaxKind::PLUS,
                SyntaxKind::VALUE,
                SyntaxKind::ERROR_TOKEN,
                SyntaxKind::ERROR_TOKEN,
                SyntaxKind::ERROR_TOKEN,
            ]
        );
    }

    #[test]
    fn identifier_tokens_are_names_whatever_their_text() {
        let tokens = vec![Token::identifier("id*")];
        assert_eq!(lex_tokens(&tokens), vec![Lexeme::new(SyntaxKind::IDENT, "id*")]);
    }
}
