use crate::editing::{Completer, CursorAction, HybridEditor, TokenListEditor, TokenView};
use crate::error::{HybridError, Result};
use crate::token::{Token, TokenValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Completing at a live token position
    Token,
    /// Completing into an empty region
    Placeholder,
    /// Resolving text with no position at all (merge, split, tokenize)
    Unsupported,
}

impl ContextKind {
    pub fn name(self) -> &'static str {
        match self {
            ContextKind::Token => "token",
            ContextKind::Placeholder => "placeholder",
            ContextKind::Unsupported => "unsupported",
        }
    }
}

/// Read-only view of the editor handed to completion providers.
///
/// The borrow lasts for one provider call, so everything it exposes is a
/// consistent snapshot of the region at request time.
pub struct CompletionContext<'a, N: TokenValue> {
    kind: ContextKind,
    target_index: usize,
    list: Option<&'a TokenListEditor<N>>,
}

impl<'a, N: TokenValue> CompletionContext<'a, N> {
    pub(crate) fn new(kind: ContextKind, target_index: usize, list: &'a TokenListEditor<N>) -> Self {
        Self {
            kind,
            target_index,
            list: Some(list),
        }
    }

    /// Context for resolving text outside any editor position.
    pub fn unsupported() -> Self {
        Self {
            kind: ContextKind::Unsupported,
            target_index: 0,
            list: None,
        }
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn tokens(&self) -> &'a [Token<N>] {
        self.list.map(TokenListEditor::tokens).unwrap_or_default()
    }

    /// Tokens before the target position.
    pub fn prefix(&self) -> &'a [Token<N>] {
        let tokens = self.tokens();
        &tokens[..self.target_index.min(tokens.len())]
    }

    pub fn views(&self) -> &'a [TokenView] {
        self.list.map(TokenListEditor::views).unwrap_or_default()
    }

    pub fn objects(&self) -> Vec<&'a N> {
        self.list.map(TokenListEditor::objects).unwrap_or_default()
    }

    /// The current region value, for token contexts.
    pub fn target(&self) -> Option<&'a N> {
        match self.kind {
            ContextKind::Token => self.list.and_then(TokenListEditor::value),
            _ => None,
        }
    }
}

enum ScopeTarget<'a, N: TokenValue> {
    Live {
        editor: &'a mut HybridEditor<N>,
        kind: ContextKind,
        target_index: usize,
        completer: &'a dyn Completer<N>,
    },
    Capture(&'a mut Option<Vec<Token<N>>>),
}

/// What a completion item sees while it is applied.
pub struct CompletionScope<'a, N: TokenValue> {
    target: ScopeTarget<'a, N>,
}

impl<'a, N: TokenValue> CompletionScope<'a, N> {
    pub(crate) fn live(
        editor: &'a mut HybridEditor<N>,
        kind: ContextKind,
        target_index: usize,
        completer: &'a dyn Completer<N>,
    ) -> Self {
        Self {
            target: ScopeTarget::Live {
                editor,
                kind,
                target_index,
                completer,
            },
        }
    }

    /// A scope that records the completed tokens instead of inserting them.
    pub(crate) fn capture(slot: &'a mut Option<Vec<Token<N>>>) -> Self {
        Self {
            target: ScopeTarget::Capture(slot),
        }
    }

    pub fn kind(&self) -> ContextKind {
        match &self.target {
            ScopeTarget::Live { kind, .. } => *kind,
            ScopeTarget::Capture(_) => ContextKind::Unsupported,
        }
    }

    pub fn target_index(&self) -> usize {
        match &self.target {
            ScopeTarget::Live { target_index, .. } => *target_index,
            ScopeTarget::Capture(_) => 0,
        }
    }

    pub fn tokens(&self) -> &[Token<N>] {
        match &self.target {
            ScopeTarget::Live { editor, .. } => editor.tokens(),
            ScopeTarget::Capture(_) => &[],
        }
    }

    /// Insert `tokens` for this completion and focus the one at `selection_index`.
    pub fn complete(&mut self, selection_index: usize, tokens: Vec<Token<N>>) -> Result<CursorAction> {
        match &mut self.target {
            ScopeTarget::Live {
                editor,
                target_index,
                completer,
                ..
            } => completer.complete(editor, *target_index, selection_index, tokens),
            ScopeTarget::Capture(slot) => {
                **slot = Some(tokens);
                Ok(CursorAction::unchanged())
            }
        }
    }

    /// Remove a token before the target, shifting the target left.
    pub fn remove_token(&mut self, index: usize) -> Result<Token<N>> {
        let kind = self.kind();
        match &mut self.target {
            ScopeTarget::Live {
                editor,
                kind: ContextKind::Token,
                target_index,
                ..
            } => {
                if index >= *target_index {
                    return Err(HybridError::TokenIndexOutOfBounds {
                        index,
                        len: *target_index,
                    });
                }
                let removed = editor.list_mut().remove(index)?;
                *target_index -= 1;
                Ok(removed)
            }
            _ => Err(HybridError::UnsupportedContext {
                operation: "remove_token",
                context: kind.name(),
            }),
        }
    }
}
