use crate::completion::{
    CompletionContext, CompletionItems, CompletionParameters, CompletionSupplier,
};
use crate::editing::selection::{self, CursorAction, SelectionPosition};
use crate::editing::HybridEditor;
use crate::error::{HybridError, Result};
use crate::token::{Token, TokenValue};

/// Places completed tokens into the token list and decides where the caret
/// goes afterwards.
pub trait Completer<N: TokenValue> {
    fn complete(
        &self,
        editor: &mut HybridEditor<N>,
        target_index: usize,
        selection_index: usize,
        tokens: Vec<Token<N>>,
    ) -> Result<CursorAction>;
}

/// Replaces the token at the target with the completed tokens.
///
/// The caret keeps its place when the completed token reads the same as what
/// was typed; otherwise it moves to the end of the selected token.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceTokenCompleter;

impl<N: TokenValue> Completer<N> for ReplaceTokenCompleter {
    fn complete(
        &self,
        editor: &mut HybridEditor<N>,
        target_index: usize,
        selection_index: usize,
        tokens: Vec<Token<N>>,
    ) -> Result<CursorAction> {
        let len = editor.tokens().len();
        let view = editor
            .list()
            .view(target_index)
            .ok_or(HybridError::TokenIndexOutOfBounds {
                index: target_index,
                len,
            })?;
        let caret = view.caret();
        let old_text = view.text().to_owned();
        let mut position = if !view.is_editable() {
            Some(SelectionPosition::Last)
        } else if caret == 0 {
            Some(SelectionPosition::First)
        } else if view.is_caret_at_end() {
            Some(SelectionPosition::Last)
        } else {
            None
        };

        let was_active = editor.is_completion_active();
        let list = editor.list_mut();
        list.splice(target_index..target_index + 1, tokens)?;
        list.update_to_printed_tokens()?;

        let index = target_index + selection_index;
        let unchanged = list
            .view(index)
            .is_some_and(|view| view.is_editable() && view.text() == old_text);
        if !unchanged {
            position = Some(SelectionPosition::Last);
        }

        let action = match position {
            Some(position) => selection::select(list, index, position),
            None => CursorAction::token(index, SelectionPosition::Offset(caret)),
        };
        Ok(if was_active {
            action.with_completion()
        } else {
            action
        })
    }
}

/// Inserts the completed tokens next to an existing token.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideTransformCompleter {
    pub params: CompletionParameters,
}

impl<N: TokenValue> Completer<N> for SideTransformCompleter {
    fn complete(
        &self,
        editor: &mut HybridEditor<N>,
        target_index: usize,
        selection_index: usize,
        tokens: Vec<Token<N>>,
    ) -> Result<CursorAction> {
        let list = editor.list_mut();
        let replaces_value = tokens.first().is_some_and(Token::is_value)
            && list.tokens().get(target_index).is_some_and(Token::is_value);
        let end = if replaces_value {
            target_index + 1
        } else {
            target_index
        };
        list.splice(target_index..end, tokens)?;
        list.update_to_printed_tokens()?;

        let action = selection::select(list, target_index + selection_index, SelectionPosition::Last);
        Ok(if self.params.end_right_transform && !self.params.menu {
            action.with_completion()
        } else {
            action
        })
    }
}

/// Fills the empty region.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderCompleter;

impl<N: TokenValue> Completer<N> for PlaceholderCompleter {
    fn complete(
        &self,
        editor: &mut HybridEditor<N>,
        _target_index: usize,
        selection_index: usize,
        tokens: Vec<Token<N>>,
    ) -> Result<CursorAction> {
        let was_active = editor.is_completion_active();
        let list = editor.list_mut();
        let len = list.tokens().len();
        list.splice(len..len, tokens)?;
        list.update_to_printed_tokens()?;

        let action = selection::select(list, selection_index, SelectionPosition::Last);
        Ok(if was_active {
            action.with_completion()
        } else {
            action
        })
    }
}

/// Builds completion suppliers and resolves text outside any position.
pub struct TokenCompleter<'a, N: TokenValue> {
    sync: &'a HybridEditor<N>,
}

impl<'a, N: TokenValue> TokenCompleter<'a, N> {
    pub fn new(sync: &'a HybridEditor<N>) -> Self {
        Self { sync }
    }

    pub fn token_completion(&self, index: usize) -> CompletionSupplier {
        CompletionSupplier::Token { index }
    }

    /// `delta` 0 inserts before the token at `index`, 1 after it.
    pub fn side_transform(&self, index: usize, delta: usize) -> CompletionSupplier {
        CompletionSupplier::SideTransform { index, delta }
    }

    pub fn placeholder_completion(&self) -> CompletionSupplier {
        CompletionSupplier::Placeholder
    }

    /// Token proposals for resolving text with no editor position.
    pub fn completion_items(&self) -> CompletionItems<N> {
        let ctx = CompletionContext::unsupported();
        CompletionItems::new(
            self.sync
                .spec()
                .token_completion(&ctx, CompletionParameters::EMPTY),
        )
    }

    /// The single token `text` completes to, if unambiguous.
    pub fn complete_token(&self, text: &str) -> Option<Token<N>> {
        self.completion_items().complete_token(text)
    }
}
