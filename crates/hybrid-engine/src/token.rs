//! # Tokens
//!
//! A hybrid region is edited as a flat list of [`Token`]s. Tokens are
//! immutable values: every edit replaces a token, nothing mutates one in
//! place. Equality is structural, which is what lets
//! [`update_to_printed_tokens`](crate::editing::TokenListEditor::update_to_printed_tokens)
//! skip tokens the printer reproduced unchanged.
//!
//! The set of kinds is closed:
//!
//! ```text
//! Simple      fixed text with adjacency flags     "+", "(", "42"
//! Identifier  a name                               "foo"
//! Value       an embedded structured sub-value     <rendered via Display>
//! Comment     prefix + free text                   "# note"
//! Error       text that could not be resolved      "+*"
//! Terminator  prefix + name                        ";end"
//! ```

use std::borrow::Cow;
use std::fmt;

/// Payload type of value tokens and of the region value itself.
///
/// `Display` renders a value token's text. [`TokenValue::clone_value`] is the
/// cloning strategy used when editor state is persisted: the default is a
/// plain `clone`, values that share mutable state through `Rc` override it to
/// detach that state.
pub trait TokenValue: Clone + PartialEq + fmt::Debug + fmt::Display + 'static {
    fn clone_value(&self) -> Self {
        self.clone()
    }
}

/// A plain text token with fixed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleToken {
    text: String,
    no_space_to_left: bool,
    no_space_to_right: bool,
}

impl SimpleToken {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            no_space_to_left: false,
            no_space_to_right: false,
        }
    }

    /// Renders glued to the previous token, like `(` in a call.
    pub fn with_no_space_to_left(mut self) -> Self {
        self.no_space_to_left = true;
        self
    }

    pub fn with_no_space_to_right(mut self) -> Self {
        self.no_space_to_right = true;
        self
    }

    /// Glued on both sides, like `.` in member access.
    pub fn unspaced(self) -> Self {
        self.with_no_space_to_left().with_no_space_to_right()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn no_space_to_left(&self) -> bool {
        self.no_space_to_left
    }

    pub fn no_space_to_right(&self) -> bool {
        self.no_space_to_right
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token<N> {
    Simple(SimpleToken),
    Identifier(String),
    Value(N),
    Comment { prefix: String, body: String },
    Error(String),
    Terminator { prefix: String, name: String },
}

impl<N: TokenValue> Token<N> {
    pub fn simple(text: impl Into<String>) -> Self {
        Token::Simple(SimpleToken::new(text))
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Token::Identifier(name.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Token::Error(text.into())
    }

    pub fn comment(prefix: impl Into<String>, body: impl Into<String>) -> Self {
        Token::Comment {
            prefix: prefix.into(),
            body: body.into(),
        }
    }

    pub fn terminator(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Token::Terminator {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Token::Simple(simple) => Cow::Borrowed(simple.text()),
            Token::Identifier(name) => Cow::Borrowed(name),
            Token::Value(value) => Cow::Owned(value.to_string()),
            Token::Comment { prefix, body } => Cow::Owned(format!("{prefix}{body}")),
            Token::Error(text) => Cow::Borrowed(text),
            Token::Terminator { prefix, name } => Cow::Owned(format!("{prefix}{name}")),
        }
    }

    pub fn no_space_to_left(&self) -> bool {
        match self {
            Token::Simple(simple) => simple.no_space_to_left(),
            Token::Terminator { .. } => true,
            _ => false,
        }
    }

    pub fn no_space_to_right(&self) -> bool {
        match self {
            Token::Simple(simple) => simple.no_space_to_right(),
            _ => false,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Token::Value(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Token::Error(_))
    }

    pub fn value(&self) -> Option<&N> {
        match self {
            Token::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Copy for persisted state, detaching value payloads via [`TokenValue::clone_value`].
    pub fn clone_value(&self) -> Self {
        match self {
            Token::Value(value) => Token::Value(value.clone_value()),
            other => other.clone(),
        }
    }
}

impl<N: TokenValue> fmt::Display for Token<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
