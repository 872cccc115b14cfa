use std::cell::RefCell;

use hybrid_engine::{
    AsyncCompletion, CompletionContext, CompletionItem, CompletionParameters, HybridEditorSpec,
    PrintContext, Token,
};
use log::trace;
use tokio::sync::oneshot;

use crate::ast::{Expr, TextValue, lower};
use crate::lexer::{lex, lex_tokens, single_kind};
use crate::parser::{Precedence, parse};
use crate::syntax_kind::SyntaxKind;
use crate::tokens::{dot, factorial, id, increment, int, lp, lp_call, mul, plus, rp, value};

type AsyncSender = oneshot::Sender<Vec<CompletionItem<Expr>>>;

/// The expression language as a hybrid editor spec.
///
/// Menu completion also asks for proposals that arrive later. Those
/// requests queue up until [`ExprSpec::resolve_async`] answers them, which
/// lets a host (or a test) decide when "later" is.
#[derive(Default)]
pub struct ExprSpec {
    precedence: Precedence,
    pending: RefCell<Vec<AsyncSender>>,
}

impl ExprSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precedence(precedence: Precedence) -> Self {
        Self {
            precedence,
            pending: RefCell::default(),
        }
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// Number of async requests waiting for an answer.
    pub fn pending_async(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Answer every waiting async request with the `async` item. Returns
    /// how many requests were still listening.
    pub fn resolve_async(&self) -> usize {
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        pending
            .into_iter()
            .filter_map(|sender| sender.send(vec![async_item()]).ok())
            .count()
    }

    fn child(&self, value: &Expr, ctx: &mut PrintContext<Expr>) {
        ctx.node(value.clone(), |ctx| self.print(value, ctx));
    }
}

fn is_identifier(text: &str) -> bool {
    single_kind(text) == Some(SyntaxKind::IDENT)
}

fn is_number(text: &str) -> bool {
    single_kind(text) == Some(SyntaxKind::INT)
}

fn text_item(text: &'static str) -> CompletionItem<Expr> {
    CompletionItem::exact(text, |scope, _| {
        scope.complete(0, vec![value(TextValue::default())])
    })
}

fn async_item() -> CompletionItem<Expr> {
    CompletionItem::exact("async", |scope, _| {
        scope.complete(0, vec![value(TextValue::new("async"))])
    })
}

impl HybridEditorSpec<Expr> for ExprSpec {
    fn parse(&self, tokens: Vec<Token<Expr>>) -> Option<Expr> {
        let lexemes = lex_tokens(&tokens);
        let tree = parse(&lexemes, self.precedence);
        let values = tokens.iter().filter_map(|token| token.value().cloned()).collect();
        let expr = lower(&tree, values);
        trace!("parsed {} tokens to {expr:?}", tokens.len());
        expr
    }

    fn print(&self, value: &Expr, ctx: &mut PrintContext<Expr>) {
        match value {
            Expr::Var(name) => ctx.token(id(name)),
            Expr::Int(n) => ctx.token(int(*n)),
            Expr::Plus(left, right) | Expr::Mul(left, right) => {
                self.child(left, ctx);
                ctx.token(if matches!(value, Expr::Plus(..)) { plus() } else { mul() });
                self.child(right, ctx);
            }
            Expr::Inc(inner) => {
                self.child(inner, ctx);
                ctx.token(increment());
            }
            Expr::Factorial(inner) => {
                self.child(inner, ctx);
                ctx.token(factorial());
            }
            Expr::Parens(inner) => {
                ctx.token(lp());
                self.child(inner, ctx);
                ctx.token(rp());
            }
            Expr::Call { name, arg } => {
                ctx.token(id(name));
                ctx.token(lp_call());
                if let Some(arg) = arg {
                    self.child(arg, ctx);
                }
                ctx.token(rp());
            }
            Expr::Field { target, name } => {
                self.child(target, ctx);
                ctx.token(dot());
                ctx.token(id(name));
            }
            Expr::Text(text) => {
                ctx.watch(text.changes());
                ctx.token(Token::Value(value.clone()));
            }
        }
    }

    fn token_completion(
        &self,
        _ctx: &CompletionContext<'_, Expr>,
        _params: CompletionParameters,
    ) -> Vec<CompletionItem<Expr>> {
        vec![
            CompletionItem::token(plus()),
            CompletionItem::token(mul()),
            CompletionItem::token(increment()),
            CompletionItem::token(factorial()),
            CompletionItem::token(dot()),
            // a `(` right after a name opens a call
            CompletionItem::exact("(", |scope, _| {
                let after_name = scope
                    .target_index()
                    .checked_sub(1)
                    .and_then(|index| scope.tokens().get(index))
                    .is_some_and(|token| matches!(token, Token::Identifier(_)));
                scope.complete(0, vec![if after_name { lp_call() } else { lp() }])
            }),
            CompletionItem::token(rp()),
            CompletionItem::pattern(
                "<number>",
                is_number,
                |text| text.chars().all(|c| c.is_ascii_digit()),
                |scope, text| scope.complete(0, vec![Token::simple(text)]),
            ),
            CompletionItem::pattern(
                "<identifier>",
                is_identifier,
                |text| text.is_empty() || is_identifier(text),
                |scope, text| scope.complete(0, vec![id(text)]),
            )
            .low_priority(),
            text_item("value"),
        ]
    }

    fn additional_completion(
        &self,
        _ctx: &CompletionContext<'_, Expr>,
        _params: CompletionParameters,
    ) -> Vec<CompletionItem<Expr>> {
        vec![text_item("text")]
    }

    fn additional_completion_async(
        &self,
        _ctx: &CompletionContext<'_, Expr>,
        _params: CompletionParameters,
    ) -> AsyncCompletion<Expr> {
        let (sender, completion) = AsyncCompletion::channel();
        self.pending.borrow_mut().push(sender);
        completion
    }

    /// Tokenize with the Logos lexer. Runs of unrecognised characters
    /// become one error token.
    fn tokenize(&self, text: &str) -> Vec<Token<Expr>> {
        let mut tokens = Vec::new();
        let mut after_error = false;
        for lexeme in lex(text) {
            let text = lexeme.text.as_ref();
            let token = match lexeme.kind {
                SyntaxKind::WHITESPACE => {
                    after_error = false;
                    continue;
                }
                SyntaxKind::IDENT if text == "value" => value(TextValue::default()),
                SyntaxKind::IDENT => id(text),
                SyntaxKind::INT if is_number(text) => Token::simple(text),
                SyntaxKind::PLUS => plus(),
                SyntaxKind::STAR => mul(),
                SyntaxKind::PLUS_PLUS => increment(),
                SyntaxKind::BANG => factorial(),
                SyntaxKind::DOT => dot(),
                SyntaxKind::LPAREN => lp(),
                SyntaxKind::RPAREN => rp(),
                _ => {
                    if let (true, Some(Token::Error(previous))) = (after_error, tokens.last_mut()) {
                        previous.push_str(text);
                    } else {
                        tokens.push(Token::error(text));
                    }
                    after_error = true;
                    continue;
                }
            };
            after_error = false;
            tokens.push(token);
        }
        tokens
    }

    fn is_pair_left(&self, token: &Token<Expr>) -> bool {
        token.text() == "("
    }

    fn is_pair_right(&self, token: &Token<Expr>) -> bool {
        token.text() == ")"
    }

    fn is_pair(&self, left: &Token<Expr>, right: &Token<Expr>) -> bool {
        self.is_pair_left(left) && self.is_pair_right(right)
    }
}
