use std::rc::Rc;

use log::debug;

use super::{
    AsyncCompletion, AsyncPoll, CompletionContext, CompletionItem, CompletionItems,
    CompletionParameters, CompletionScope, ContextKind,
};
use crate::editing::{
    Completer, CursorAction, HybridEditor, PlaceholderCompleter, ReplaceTokenCompleter,
    SideTransformCompleter,
};
use crate::error::Result;
use crate::token::TokenValue;

/// Where completion happens. Context and completer are derived on request,
/// since a side transform picks its target from the request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSupplier {
    /// Replace the token at `index`
    Token { index: usize },
    /// Insert next to the token at `index`: `delta` 0 is left, 1 is right
    SideTransform { index: usize, delta: usize },
    /// Fill the empty region
    Placeholder,
}

impl CompletionSupplier {
    fn target(self, params: CompletionParameters) -> (ContextKind, usize) {
        match self {
            CompletionSupplier::Token { index } => (ContextKind::Token, index),
            CompletionSupplier::SideTransform { index, delta } => {
                let target = if params.end_right_transform {
                    index + 1
                } else {
                    index + delta
                };
                (ContextKind::Token, target)
            }
            CompletionSupplier::Placeholder => (ContextKind::Placeholder, 0),
        }
    }

    fn completer<N: TokenValue>(self, params: CompletionParameters) -> Rc<dyn Completer<N>> {
        match self {
            CompletionSupplier::Token { .. } => Rc::new(ReplaceTokenCompleter),
            CompletionSupplier::SideTransform { .. } => Rc::new(SideTransformCompleter { params }),
            CompletionSupplier::Placeholder => Rc::new(PlaceholderCompleter),
        }
    }

    /// Synchronous proposals. Token items are skipped for menu requests when
    /// the editor hides them; additional items are only offered to the menu.
    pub fn get<N: TokenValue>(
        self,
        editor: &HybridEditor<N>,
        params: CompletionParameters,
    ) -> CompletionSet<N> {
        let (kind, target_index) = self.target(params);
        let ctx = CompletionContext::new(kind, target_index, editor.list());
        let spec = editor.spec();
        let mut items = Vec::new();
        if !(params.menu && editor.settings().hide_tokens_in_menu) {
            items.extend(spec.token_completion(&ctx, params));
        }
        if params.menu {
            items.extend(spec.additional_completion(&ctx, params));
        }
        CompletionSet {
            supplier: self,
            items: CompletionItems::new(items),
            kind,
            target_index,
            completer: self.completer(params),
        }
    }

    /// Asynchronous proposals, tagged with the token list generation they were requested at.
    pub fn get_async<N: TokenValue>(
        self,
        editor: &HybridEditor<N>,
        params: CompletionParameters,
    ) -> PendingCompletion<N> {
        let (kind, target_index) = self.target(params);
        let completion = if params.menu {
            let ctx = CompletionContext::new(kind, target_index, editor.list());
            editor.spec().additional_completion_async(&ctx, params)
        } else {
            AsyncCompletion::ready(Vec::new())
        };
        PendingCompletion {
            supplier: self,
            completion,
            kind,
            target_index,
            completer: self.completer(params),
            generation: editor.list().modification_count(),
        }
    }
}

/// Proposals bound to the context and completer they apply through.
pub struct CompletionSet<N: TokenValue> {
    supplier: CompletionSupplier,
    items: CompletionItems<N>,
    kind: ContextKind,
    target_index: usize,
    completer: Rc<dyn Completer<N>>,
}

impl<N: TokenValue> Clone for CompletionSet<N> {
    fn clone(&self) -> Self {
        Self {
            supplier: self.supplier,
            items: self.items.clone(),
            kind: self.kind,
            target_index: self.target_index,
            completer: Rc::clone(&self.completer),
        }
    }
}

impl<N: TokenValue> CompletionSet<N> {
    pub fn supplier(&self) -> CompletionSupplier {
        self.supplier
    }

    pub fn items(&self) -> &CompletionItems<N> {
        &self.items
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = CompletionItem<N>>) {
        self.items.extend(items);
    }

    pub fn apply(
        &self,
        editor: &mut HybridEditor<N>,
        item: &CompletionItem<N>,
        text: &str,
    ) -> Result<CursorAction> {
        let mut scope =
            CompletionScope::live(editor, self.kind, self.target_index, self.completer.as_ref());
        item.complete(&mut scope, text)
    }

    /// Apply the first item matching `text`, if any.
    pub fn apply_match(&self, editor: &mut HybridEditor<N>, text: &str) -> Result<Option<CursorAction>> {
        let Some(item) = self.items.matches(text).first().map(|item| (*item).clone()) else {
            return Ok(None);
        };
        self.apply(editor, &item, text).map(Some)
    }
}

pub enum PendingPoll<N: TokenValue> {
    Ready(CompletionSet<N>),
    Pending,
    /// Cancelled, or resolved after the token list changed
    Discarded,
}

/// An in-flight async completion request.
pub struct PendingCompletion<N: TokenValue> {
    supplier: CompletionSupplier,
    completion: AsyncCompletion<N>,
    kind: ContextKind,
    target_index: usize,
    completer: Rc<dyn Completer<N>>,
    generation: u64,
}

impl<N: TokenValue> PendingCompletion<N> {
    pub fn supplier(&self) -> CompletionSupplier {
        self.supplier
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Poll the request; results for an older token list generation are dropped.
    pub fn poll(&mut self, generation: u64) -> PendingPoll<N> {
        match self.completion.poll() {
            AsyncPoll::Pending => PendingPoll::Pending,
            AsyncPoll::Cancelled => PendingPoll::Discarded,
            AsyncPoll::Ready(items) if generation != self.generation => {
                debug!(
                    "discarding {} async completion items requested at generation {}, now {}",
                    items.len(),
                    self.generation,
                    generation
                );
                PendingPoll::Discarded
            }
            AsyncPoll::Ready(items) => PendingPoll::Ready(CompletionSet {
                supplier: self.supplier,
                items: CompletionItems::new(items),
                kind: self.kind,
                target_index: self.target_index,
                completer: Rc::clone(&self.completer),
            }),
        }
    }

    pub fn cancel(&mut self) {
        self.completion.cancel();
    }
}
