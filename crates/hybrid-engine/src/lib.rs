//! Headless engine for hybrid token/AST editing.
//!
//! A language plugs in through [`HybridEditorSpec`]; the engine keeps a token
//! list and a parsed value in step while a [`HybridEditor`] turns keystrokes
//! into structural token edits and completions.

pub mod change;
pub mod completion;
pub mod editing;
pub mod error;
pub mod print;
pub mod spec;
pub mod token;

mod text;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use change::{ChangeSource, Registration};
pub use completion::{
    AsyncCompletion, AsyncPoll, CompletionContext, CompletionItem, CompletionItems,
    CompletionParameters, CompletionScope, CompletionSet, CompletionSupplier, ContextKind,
};
pub use editing::{
    Completer, CursorAction, CursorTarget, Focus, HybridEditor, SelectionPosition,
    TokenCompleter, TokenListEditor, TokenOperations, TokenView, ViewId,
};
pub use error::{HybridError, Result};
pub use hybrid_config::{Config, ConfigError, EditorSettings};
pub use print::{ParseChild, ParseNode, PrintContext, Printed, print_value};
pub use spec::{HybridEditorSpec, tokenize_with_completion};
pub use token::{SimpleToken, Token, TokenValue};
