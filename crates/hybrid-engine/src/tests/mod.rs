//! A small sum language shared by the unit tests.
//!
//! ```text
//! sum  := term ('+' term)*
//! term := atom '++'*
//! atom := <digits> | <identifier> | <value token>
//! ```
//!
//! `*`, `(` and `)` are completable but never parse, which keeps invalid
//! regions easy to build.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use hybrid_config::EditorSettings;
use tokio::sync::oneshot;

use crate::change::ChangeSource;
use crate::completion::{
    AsyncCompletion, CompletionContext, CompletionItem, CompletionItems, CompletionParameters,
};
use crate::editing::HybridEditor;
use crate::print::PrintContext;
use crate::spec::HybridEditorSpec;
use crate::token::{SimpleToken, Token, TokenValue};

/// A separately edited sub-value that reports its own changes.
#[derive(Clone, Default)]
pub struct Note {
    text: Rc<RefCell<String>>,
    changes: ChangeSource,
}

impl Note {
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
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        *self.text.borrow() == *other.text.borrow()
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Note").field(&self.text.borrow()).finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sum {
    Num(i64),
    Var(String),
    Add(Vec<Sum>),
    Inc(Box<Sum>),
    Note(Note),
}

impl fmt::Display for Sum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sum::Num(n) => write!(f, "{n}"),
            Sum::Var(name) => f.write_str(name),
            Sum::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{term}")?;
                }
                Ok(())
            }
            Sum::Inc(inner) => write!(f, "{inner}++"),
            Sum::Note(note) => write!(f, "<{}>", note.text()),
        }
    }
}

impl TokenValue for Sum {
    fn clone_value(&self) -> Self {
        match self {
            Sum::Note(note) => Sum::Note(Note::new(&note.text())),
            Sum::Add(terms) => Sum::Add(terms.iter().map(Sum::clone_value).collect()),
            Sum::Inc(inner) => Sum::Inc(Box::new(inner.clone_value())),
            other => other.clone(),
        }
    }
}

pub fn plus() -> Token<Sum> {
    Token::simple("+")
}

pub fn inc() -> Token<Sum> {
    Token::simple("++")
}

pub fn mul() -> Token<Sum> {
    Token::simple("*")
}

pub fn num(n: i64) -> Token<Sum> {
    Token::simple(n.to_string())
}

pub fn id(name: &str) -> Token<Sum> {
    Token::identifier(name)
}

pub fn dot() -> Token<Sum> {
    Token::Simple(SimpleToken::new(".").unspaced())
}

pub fn lp() -> Token<Sum> {
    Token::Simple(SimpleToken::new("(").with_no_space_to_right())
}

pub fn rp() -> Token<Sum> {
    Token::Simple(SimpleToken::new(")").with_no_space_to_left())
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn is_identifier(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_alphabetic) && is_identifier_prefix(text)
}

fn is_identifier_prefix(text: &str) -> bool {
    text.chars().next().is_none_or(char::is_alphabetic) && text.chars().all(char::is_alphanumeric)
}

#[derive(Default)]
pub struct SumSpec {
    pub parse_count: Cell<usize>,
    /// Print one token too few for sums, to provoke a printer/parser mismatch
    pub drop_last_printed_token: Cell<bool>,
    pub pad_numbers: Cell<bool>,
    async_sender: RefCell<Option<oneshot::Sender<Vec<CompletionItem<Sum>>>>>,
}

impl SumSpec {
    pub fn completion_items(&self) -> CompletionItems<Sum> {
        CompletionItems::new(
            self.token_completion(&CompletionContext::unsupported(), CompletionParameters::EMPTY),
        )
    }

    /// Sender for the last async completion request.
    pub fn take_async_sender(&self) -> Option<oneshot::Sender<Vec<CompletionItem<Sum>>>> {
        self.async_sender.borrow_mut().take()
    }

    fn atom(token: Token<Sum>) -> Option<Sum> {
        match token {
            Token::Simple(simple) if is_number(simple.text()) => simple.text().parse().ok().map(Sum::Num),
            Token::Identifier(name) => Some(Sum::Var(name)),
            Token::Value(value) => Some(value),
            _ => None,
        }
    }

    fn print_term(&self, value: &Sum, ctx: &mut PrintContext<Sum>) {
        match value {
            Sum::Num(n) if self.pad_numbers.get() => ctx.token(Token::simple(format!("{n:03}"))),
            Sum::Num(n) => ctx.token(num(*n)),
            Sum::Var(name) => ctx.token(id(name)),
            Sum::Inc(inner) => {
                ctx.node((**inner).clone(), |ctx| self.print(inner, ctx));
                ctx.token(inc());
            }
            Sum::Note(note) => {
                ctx.watch(note.changes());
                ctx.token(Token::Value(Sum::Note(note.clone())));
            }
            Sum::Add(_) => self.print(value, ctx),
        }
    }
}

impl HybridEditorSpec<Sum> for SumSpec {
    fn parse(&self, tokens: Vec<Token<Sum>>) -> Option<Sum> {
        self.parse_count.set(self.parse_count.get() + 1);
        let mut tokens = tokens.into_iter().peekable();
        let mut terms = Vec::new();
        loop {
            let mut term = Self::atom(tokens.next()?)?;
            while tokens.next_if(|token| *token == inc()).is_some() {
                term = Sum::Inc(Box::new(term));
            }
            terms.push(term);
            match tokens.next() {
                None => break,
                Some(token) if token == plus() => {}
                Some(_) => return None,
            }
        }
        if terms.len() == 1 {
            terms.pop()
        } else {
            Some(Sum::Add(terms))
        }
    }

    fn print(&self, value: &Sum, ctx: &mut PrintContext<Sum>) {
        let Sum::Add(terms) = value else {
            return self.print_term(value, ctx);
        };
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                ctx.token(plus());
            }
            if i + 1 == terms.len() && self.drop_last_printed_token.get() {
                continue;
            }
            ctx.node(term.clone(), |ctx| self.print_term(term, ctx));
        }
    }

    fn token_completion(
        &self,
        _ctx: &CompletionContext<'_, Sum>,
        _params: CompletionParameters,
    ) -> Vec<CompletionItem<Sum>> {
        vec![
            CompletionItem::token(plus()),
            CompletionItem::token(inc()),
            CompletionItem::token(mul()),
            CompletionItem::token(lp()),
            CompletionItem::token(rp()),
            CompletionItem::pattern("<number>", is_number, |text| text.chars().all(|c| c.is_ascii_digit()), |scope, text| {
                scope.complete(0, vec![Token::simple(text)])
            }),
            CompletionItem::pattern("<identifier>", is_identifier, is_identifier_prefix, |scope, text| {
                scope.complete(0, vec![id(text)])
            })
            .low_priority(),
            // drops the first token and turns the target into a plus
            CompletionItem::exact("<<", |scope, _| {
                scope.remove_token(0)?;
                scope.complete(0, vec![plus()])
            }),
        ]
    }

    fn additional_completion(
        &self,
        _ctx: &CompletionContext<'_, Sum>,
        _params: CompletionParameters,
    ) -> Vec<CompletionItem<Sum>> {
        vec![CompletionItem::exact("note", |scope, _| {
            scope.complete(0, vec![Token::Value(Sum::Note(Note::new("")))])
        })]
    }

    fn additional_completion_async(
        &self,
        _ctx: &CompletionContext<'_, Sum>,
        _params: CompletionParameters,
    ) -> AsyncCompletion<Sum> {
        let (sender, completion) = AsyncCompletion::channel();
        *self.async_sender.borrow_mut() = Some(sender);
        completion
    }

    fn is_pair_left(&self, token: &Token<Sum>) -> bool {
        token.text() == "("
    }

    fn is_pair_right(&self, token: &Token<Sum>) -> bool {
        token.text() == ")"
    }

    fn is_pair(&self, left: &Token<Sum>, right: &Token<Sum>) -> bool {
        self.is_pair_left(left) && self.is_pair_right(right)
    }
}

pub fn editor_with_spec(tokens: Vec<Token<Sum>>) -> (Rc<SumSpec>, HybridEditor<Sum>) {
    let spec = Rc::new(SumSpec::default());
    let mut editor = HybridEditor::new(spec.clone(), &EditorSettings::default());
    editor.set_tokens(tokens).unwrap();
    (spec, editor)
}

pub fn editor(tokens: Vec<Token<Sum>>) -> HybridEditor<Sum> {
    editor_with_spec(tokens).1
}
