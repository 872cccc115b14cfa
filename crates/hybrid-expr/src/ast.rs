//! # Expression values
//!
//! [`Expr`] is the value a valid region parses to. It is produced from the
//! CST by [`lower`], and printed back to hybrid tokens by
//! [`ExprSpec`](crate::ExprSpec).
//!
//! Lowering succeeds only for a tree with no `ERROR` node anywhere in it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hybrid_engine::{ChangeSource, TokenValue};
use rowan::NodeOrToken;

use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// Text edited in place inside an expression. Clones share the text;
/// [`TextValue::set_text`] notifies every editor showing it.
#[derive(Clone, Default)]
pub struct TextValue {
    text: Rc<RefCell<String>>,
    changes: ChangeSource,
}

impl TextValue {
    pub fn new(text: &str) -> Self {
        Self {
            text: Rc::new(RefCell::new(text.to_owned())),
            changes: ChangeSource::new(),
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_owned();
        self.changes.fire();
    }

    pub fn changes(&self) -> &ChangeSource {
        &self.changes
    }

    /// A copy that no longer shares text with `self`.
    pub fn detach(&self) -> Self {
        Self::new(&self.text())
    }
}

impl PartialEq for TextValue {
    fn eq(&self, other: &Self) -> bool {
        *self.text.borrow() == *other.text.borrow()
    }
}

impl fmt::Debug for TextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextValue").field(&self.text.borrow()).finish()
    }
}

impl fmt::Display for TextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.text.borrow())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(String),
    Int(i64),
    Plus(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Inc(Box<Expr>),
    Factorial(Box<Expr>),
    Parens(Box<Expr>),
    Call { name: String, arg: Option<Box<Expr>> },
    Field { target: Box<Expr>, name: String },
    Text(TextValue),
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::Var(name.to_owned())
    }

    pub fn plus(left: Expr, right: Expr) -> Self {
        Expr::Plus(Box::new(left), Box::new(right))
    }

    pub fn mul(left: Expr, right: Expr) -> Self {
        Expr::Mul(Box::new(left), Box::new(right))
    }

    pub fn text(text: &str) -> Self {
        Expr::Text(TextValue::new(text))
    }

    /// Rebuild the expression with `f` applied to every direct child.
    fn map_children(&self, mut f: impl FnMut(&Expr) -> Expr) -> Self {
        let mut boxed = |expr: &Expr| Box::new(f(expr));
        match self {
            Expr::Plus(left, right) => Expr::Plus(boxed(left), boxed(right)),
            Expr::Mul(left, right) => Expr::Mul(boxed(left), boxed(right)),
            Expr::Inc(inner) => Expr::Inc(boxed(inner)),
            Expr::Factorial(inner) => Expr::Factorial(boxed(inner)),
            Expr::Parens(inner) => Expr::Parens(boxed(inner)),
            Expr::Call { name, arg } => Expr::Call {
                name: name.clone(),
                arg: arg.as_deref().map(boxed),
            },
            Expr::Field { target, name } => Expr::Field {
                target: boxed(target),
                name: name.clone(),
            },
            Expr::Var(_) | Expr::Int(_) | Expr::Text(_) => self.clone(),
        }
    }
}

impl TokenValue for Expr {
    fn clone_value(&self) -> Self {
        match self {
            Expr::Text(value) => Expr::Text(value.detach()),
            other => other.map_children(Expr::clone_value),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name) => f.write_str(name),
            Expr::Int(n) => write!(f, "{n}"),
            Expr::Plus(left, right) => write!(f, "{left} + {right}"),
            Expr::Mul(left, right) => write!(f, "{left} * {right}"),
            Expr::Inc(inner) => write!(f, "{inner}++"),
            Expr::Factorial(inner) => write!(f, "{inner}!"),
            Expr::Parens(inner) => write!(f, "({inner})"),
            Expr::Call { name, arg: Some(arg) } => write!(f, "{name}({arg})"),
            Expr::Call { name, arg: None } => write!(f, "{name}()"),
            Expr::Field { target, name } => write!(f, "{target}.{name}"),
            Expr::Text(value) => write!(f, "{value}"),
        }
    }
}

/// Lower a CST to an expression.
///
/// `values` are the payloads of the region's value tokens, in token order.
/// Returns `None` when the tree holds an `ERROR` node or is empty.
pub fn lower(root: &SyntaxNode, values: Vec<Expr>) -> Option<Expr> {
    let has_error = root
        .descendants()
        .any(|node| node.kind() == SyntaxKind::ERROR);
    if has_error {
        return None;
    }
    let mut lowering = Lowering {
        values: values.into_iter(),
    };
    lowering.expr(&root.first_child()?)
}

struct Lowering {
    values: std::vec::IntoIter<Expr>,
}

impl Lowering {
    fn expr(&mut self, node: &SyntaxNode) -> Option<Expr> {
        match node.kind() {
            SyntaxKind::NAME_REF => Some(Expr::Var(ident(node)?)),
            SyntaxKind::LITERAL => node.text().to_string().parse().ok().map(Expr::Int),
            SyntaxKind::VALUE_EXPR => self.values.next(),
            SyntaxKind::PAREN_EXPR => {
                let inner = self.expr(&node.first_child()?)?;
                Some(Expr::Parens(Box::new(inner)))
            }
            SyntaxKind::CALL_EXPR => {
                let name = ident(node)?;
                let arg = match node.first_child() {
                    Some(arg) => Some(Box::new(self.expr(&arg)?)),
                    None => None,
                };
                Some(Expr::Call { name, arg })
            }
            SyntaxKind::FIELD_EXPR => {
                let target = self.expr(&node.first_child()?)?;
                Some(Expr::Field {
                    target: Box::new(target),
                    name: ident(node)?,
                })
            }
            SyntaxKind::POSTFIX_EXPR => {
                let inner = Box::new(self.expr(&node.first_child()?)?);
                match operator(node)? {
                    SyntaxKind::PLUS_PLUS => Some(Expr::Inc(inner)),
                    SyntaxKind::BANG => Some(Expr::Factorial(inner)),
                    _ => None,
                }
            }
            SyntaxKind::BIN_EXPR => {
                let mut operands = node.children();
                let left = Box::new(self.expr(&operands.next()?)?);
                let right = Box::new(self.expr(&operands.next()?)?);
                match operator(node)? {
                    SyntaxKind::PLUS => Some(Expr::Plus(left, right)),
                    SyntaxKind::STAR => Some(Expr::Mul(left, right)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Text of the node's own IDENT token, skipping those of child nodes.
fn ident(node: &SyntaxNode) -> Option<String> {
    node.children_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .find(|token| token.kind() == SyntaxKind::IDENT)
        .map(|token| token.text().to_owned())
}

/// Kind of the node's first own token that is an operator.
fn operator(node: &SyntaxNode) -> Option<SyntaxKind> {
    node.children_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .map(|token| token.kind())
        .find(|kind| {
            matches!(
                kind,
                SyntaxKind::PLUS | SyntaxKind::STAR | SyntaxKind::PLUS_PLUS | SyntaxKind::BANG
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn lower_text(source: &str) -> Option<Expr> {
        lower(&parse_text(source), Vec::new())
    }

    fn boxed(expr: Expr) -> Box<Expr> {
        Box::new(expr)
    }

    #[rstest]
    #[case("x", Expr::var("x"))]
    #[case("42", Expr::Int(42))]
    #[case("a + b * c", Expr::plus(Expr::var("a"), Expr::mul(Expr::var("b"), Expr::var("c"))))]
    #[case("a * b + c", Expr::plus(Expr::mul(Expr::var("a"), Expr::var("b")), Expr::var("c")))]
    #[case("a + b + c", Expr::plus(Expr::plus(Expr::var("a"), Expr::var("b")), Expr::var("c")))]
    #[case("(a + b) * c", Expr::mul(Expr::Parens(boxed(Expr::plus(Expr::var("a"), Expr::var("b")))), Expr::var("c")))]
    #[case("x++!", Expr::Factorial(boxed(Expr::Inc(boxed(Expr::var("x"))))))]
    #[case("f(x)", Expr::Call { name: "f".into(), arg: Some(boxed(Expr::var("x"))) })]
    #[case("f()", Expr::Call { name: "f".into(), arg: None })]
    #[case("a.b.c", Expr::Field { target: boxed(Expr::Field { target: boxed(Expr::var("a")), name: "b".into() }), name: "c".into() })]
    fn lowers_valid_expressions(#[case] source: &str, #[case] expected: Expr) {
        assert_eq!(lower_text(source), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("+")]
    #[case("a +")]
    #[case("a b")]
    #[case("(a")]
    #[case("a)")]
    #[case("f(")]
    #[case("a.")]
    #[case("a $")]
    fn rejects_invalid_expressions(#[case] source: &str) {
        assert_eq!(lower_text(source), None);
    }

    #[test]
    fn value_payloads_fill_value_nodes_in_order() {
        use crate::lexer::Lexeme;
        use crate::parser::{Precedence, parse};

        let lexemes = vec![
            Lexeme::new(SyntaxKind::VALUE, "\"a\""),
            Lexeme::new(SyntaxKind::PLUS, "+"),
            Lexeme::new(SyntaxKind::VALUE, "\"b\""),
        ];
        let tree = parse(&lexemes, Precedence::default());

        let lowered = lower(&tree, vec![Expr::text("a"), Expr::text("b")]);

        assert_eq!(lowered, Some(Expr::plus(Expr::text("a"), Expr::text("b"))));
    }

    #[test]
    fn clone_value_detaches_text() {
        let text = TextValue::new("x");
        let expr = Expr::Inc(boxed(Expr::Text(text.clone())));

        let copy = expr.clone_value();
        text.set_text("y");

        assert_eq!(copy, Expr::Inc(boxed(Expr::text("x"))));
        assert_eq!(expr, Expr::Inc(boxed(Expr::text("y"))));
    }

    #[rstest]
    #[case(Expr::plus(Expr::var("a"), Expr::Int(1)), "a + 1")]
    #[case(Expr::Call { name: "f".into(), arg: None }, "f()")]
    #[case(Expr::Field { target: boxed(Expr::var("a")), name: "b".into() }, "a.b")]
    #[case(Expr::text("hi"), "\"hi\"")]
    fn display(#[case] expr: Expr, #[case] expected: &str) {
        assert_eq!(expr.to_string(), expected);
    }
}
