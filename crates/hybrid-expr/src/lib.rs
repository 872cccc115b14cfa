//! # hybrid-expr
//!
//! A small expression language for the hybrid editor: names, integers, `+`
//! and `*` with configurable precedence, postfix `++` and `!`, grouping,
//! calls and field access, plus embedded text values.
//!
//! ## Architecture Overview
//!
//! The editor works on hybrid tokens, so parsing starts from a token list
//! rather than from text:
//!
//! ```text
//! Hybrid Tokens → Lexemes → Parser → Events → Sink → Rowan Tree → lower() → Expr
//!                 (lex_tokens)  (Grammar)       (GreenNodeBuilder)
//! ```
//!
//! Raw text (pasted or typed past a token boundary) goes through the [Logos]
//! lexer in [`lexer`] first. The parser and sink follow the rust-analyzer
//! event model: grammar rules emit events, the sink builds a lossless Rowan
//! tree, and [`ast::lower`] turns an error-free tree into an [`Expr`].
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Module Structure
//!
//! ```text
//! hybrid-expr/
//! ├── lib.rs           # This file - public API and CST snapshot tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos lexer and hybrid token lexing
//! ├── ast.rs           # Expr values and CST lowering
//! ├── tokens.rs        # Hybrid token constructors
//! ├── spec.rs          # ExprSpec: parse, print, completion, tokenize
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, precedence
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/     # Expression rules
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use hybrid_expr::{Expr, ExprSpec};
//! use hybrid_engine::{EditorSettings, HybridEditor};
//!
//! let mut editor: HybridEditor<Expr> =
//!     HybridEditor::new(Rc::new(ExprSpec::new()), &EditorSettings::default());
//! editor.type_text("a+b*2").unwrap();
//!
//! assert_eq!(editor.value().map(Expr::to_string).as_deref(), Some("a + b * 2"));
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod spec;
pub mod syntax_kind;
pub mod tokens;

pub use ast::{Expr, TextValue, lower};
pub use parser::{Precedence, parse, parse_text};
pub use spec::ExprSpec;
pub use syntax_kind::{ExprLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
