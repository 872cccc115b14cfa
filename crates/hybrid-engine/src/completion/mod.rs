//! # Completion
//!
//! Completion is how typed text becomes tokens. A spec proposes
//! [`CompletionItem`]s for a [`CompletionContext`]; the engine matches the
//! typed text against them and applies the winner through a
//! [`CompletionScope`], which hands the resulting tokens to a
//! [`Completer`](crate::editing::Completer) that knows where they go.
//!
//! ```text
//! CompletionSupplier ──get()──► CompletionSet { items, context, completer }
//!                                    │
//!               item.complete(scope, text)
//!                                    ▼
//!                   Completer::complete(editor, target, selection, tokens)
//! ```
//!
//! Menu completion can also receive proposals later through an
//! [`AsyncCompletion`], backed by a `tokio::sync::oneshot` channel.

mod context;
mod menu;
mod supplier;

use std::fmt;
use std::rc::Rc;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::editing::CursorAction;
use crate::error::Result;
use crate::text::byte_offset;
use crate::token::{Token, TokenValue};

pub use context::{CompletionContext, CompletionScope, ContextKind};
pub(crate) use menu::CompletionMenu;
pub use supplier::{CompletionSet, CompletionSupplier, PendingCompletion, PendingPoll};

/// Flags describing why completion was requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionParameters {
    /// Requested by an explicit menu rather than by typing
    pub menu: bool,
    /// A right transform requested at the end of a complete token
    pub end_right_transform: bool,
}

impl CompletionParameters {
    pub const EMPTY: Self = Self {
        menu: false,
        end_right_transform: false,
    };

    pub const MENU: Self = Self {
        menu: true,
        end_right_transform: false,
    };

    pub fn end_right_transform(self) -> Self {
        Self {
            end_right_transform: true,
            ..self
        }
    }
}

type Apply<N> = Rc<dyn Fn(&mut CompletionScope<'_, N>, &str) -> Result<CursorAction>>;
type TextPredicate = Rc<dyn Fn(&str) -> bool>;

#[derive(Clone)]
enum Matcher {
    Exact(String),
    Pattern {
        matches: TextPredicate,
        matches_prefix: TextPredicate,
    },
}

/// One proposal: how it matches typed text and what applying it does.
pub struct CompletionItem<N: TokenValue> {
    visible_text: String,
    matcher: Matcher,
    low_priority: bool,
    apply: Apply<N>,
}

impl<N: TokenValue> Clone for CompletionItem<N> {
    fn clone(&self) -> Self {
        Self {
            visible_text: self.visible_text.clone(),
            matcher: self.matcher.clone(),
            low_priority: self.low_priority,
            apply: Rc::clone(&self.apply),
        }
    }
}

impl<N: TokenValue> fmt::Debug for CompletionItem<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionItem")
            .field("visible_text", &self.visible_text)
            .field("low_priority", &self.low_priority)
            .finish()
    }
}

impl<N: TokenValue> CompletionItem<N> {
    /// Completes to `token` when the typed text equals its text.
    pub fn token(token: Token<N>) -> Self {
        let text = token.text().into_owned();
        Self::exact(text, move |scope, _| scope.complete(0, vec![token.clone()]))
    }

    /// Matches text equal to `text`, then runs `apply`.
    pub fn exact(
        text: impl Into<String>,
        apply: impl Fn(&mut CompletionScope<'_, N>, &str) -> Result<CursorAction> + 'static,
    ) -> Self {
        let text = text.into();
        Self {
            visible_text: text.clone(),
            matcher: Matcher::Exact(text),
            low_priority: false,
            apply: Rc::new(apply),
        }
    }

    /// Matches text accepted by `matches`; `matches_prefix` accepts text that
    /// could still grow into a match.
    pub fn pattern(
        visible_text: impl Into<String>,
        matches: impl Fn(&str) -> bool + 'static,
        matches_prefix: impl Fn(&str) -> bool + 'static,
        apply: impl Fn(&mut CompletionScope<'_, N>, &str) -> Result<CursorAction> + 'static,
    ) -> Self {
        Self {
            visible_text: visible_text.into(),
            matcher: Matcher::Pattern {
                matches: Rc::new(matches),
                matches_prefix: Rc::new(matches_prefix),
            },
            low_priority: false,
            apply: Rc::new(apply),
        }
    }

    /// Yield to any other item matching the same text.
    pub fn low_priority(mut self) -> Self {
        self.low_priority = true;
        self
    }

    pub fn visible_text(&self) -> &str {
        &self.visible_text
    }

    pub fn is_low_priority(&self) -> bool {
        self.low_priority
    }

    pub fn is_match(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(expected) => expected == text,
            Matcher::Pattern { matches, .. } => matches(text),
        }
    }

    pub fn is_match_prefix(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(expected) => expected.starts_with(text),
            Matcher::Pattern { matches_prefix, .. } => matches_prefix(text),
        }
    }

    pub fn is_strict_match_prefix(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Exact(expected) => expected.len() > text.len() && expected.starts_with(text),
            Matcher::Pattern {
                matches,
                matches_prefix,
            } => matches_prefix(text) && !matches(text),
        }
    }

    pub fn complete(&self, scope: &mut CompletionScope<'_, N>, text: &str) -> Result<CursorAction> {
        (self.apply)(scope, text)
    }
}

/// A list of proposals with the matching rules the editor relies on.
#[derive(Debug)]
pub struct CompletionItems<N: TokenValue> {
    items: Vec<CompletionItem<N>>,
}

impl<N: TokenValue> Clone for CompletionItems<N> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<N: TokenValue> CompletionItems<N> {
    pub fn new(items: Vec<CompletionItem<N>>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CompletionItem<N>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = CompletionItem<N>>) {
        self.items.extend(items);
    }

    /// Items matching `text`. Low priority items only count when nothing else matches.
    pub fn matches(&self, text: &str) -> Vec<&CompletionItem<N>> {
        let matching: Vec<&CompletionItem<N>> =
            self.items.iter().filter(|item| item.is_match(text)).collect();
        if matching.iter().any(|item| !item.is_low_priority()) {
            matching
                .into_iter()
                .filter(|item| !item.is_low_priority())
                .collect()
        } else {
            matching
        }
    }

    pub fn has_matches(&self, text: &str) -> bool {
        !self.matches(text).is_empty()
    }

    pub fn has_single_match(&self, text: &str) -> bool {
        self.matches(text).len() == 1
    }

    pub fn prefixed_by(&self, text: &str) -> Vec<&CompletionItem<N>> {
        self.items
            .iter()
            .filter(|item| item.is_match_prefix(text))
            .collect()
    }

    pub fn strictly_prefixed_by(&self, text: &str) -> Vec<&CompletionItem<N>> {
        self.items
            .iter()
            .filter(|item| item.is_strict_match_prefix(text))
            .collect()
    }

    /// More than one item could still complete `text`.
    pub fn has_ambiguous_matches(&self, text: &str) -> bool {
        self.prefixed_by(text).len() > 1
    }

    /// True when the first `index` chars of `text` form a token and appending
    /// the next char would no longer prefix any item.
    pub fn is_boundary(&self, text: &str, index: usize) -> bool {
        let Some(split) = byte_offset(text, index) else {
            return false;
        };
        if !self.has_matches(&text[..split]) {
            return false;
        }
        let Some(next) = text[split..].chars().next() else {
            return false;
        };
        self.prefixed_by(&text[..split + next.len_utf8()]).is_empty()
    }

    /// Tokens produced by the single item matching `text`, if exactly one does.
    pub fn resolve(&self, text: &str) -> Option<Vec<Token<N>>> {
        let matches = self.matches(text);
        let [item] = matches.as_slice() else {
            return None;
        };
        let mut captured = None;
        let mut scope = CompletionScope::capture(&mut captured);
        // a capture scope has no caret to move
        let _action = item.complete(&mut scope, text).ok()?;
        captured.filter(|tokens| !tokens.is_empty())
    }

    /// Like [`resolve`](Self::resolve), but only when the match yields one token.
    pub fn complete_token(&self, text: &str) -> Option<Token<N>> {
        let mut tokens = self.resolve(text)?;
        match tokens.len() {
            1 => tokens.pop(),
            _ => None,
        }
    }
}

/// Proposals for menu completion, possibly still in flight.
pub enum AsyncCompletion<N: TokenValue> {
    Ready(Vec<CompletionItem<N>>),
    Pending(oneshot::Receiver<Vec<CompletionItem<N>>>),
}

#[derive(Debug)]
pub enum AsyncPoll<N: TokenValue> {
    Ready(Vec<CompletionItem<N>>),
    Pending,
    /// The sender went away, or the request was cancelled
    Cancelled,
}

impl<N: TokenValue> AsyncCompletion<N> {
    pub fn ready(items: Vec<CompletionItem<N>>) -> Self {
        AsyncCompletion::Ready(items)
    }

    /// A pending completion and the sender that resolves it.
    pub fn channel() -> (oneshot::Sender<Vec<CompletionItem<N>>>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, AsyncCompletion::Pending(receiver))
    }

    pub fn poll(&mut self) -> AsyncPoll<N> {
        match self {
            AsyncCompletion::Ready(items) => AsyncPoll::Ready(std::mem::take(items)),
            AsyncCompletion::Pending(receiver) => match receiver.try_recv() {
                Ok(items) => AsyncPoll::Ready(items),
                Err(TryRecvError::Empty) => AsyncPoll::Pending,
                Err(TryRecvError::Closed) => AsyncPoll::Cancelled,
            },
        }
    }

    /// Close the channel; a later send fails and the result is never seen.
    pub fn cancel(&mut self) {
        if let AsyncCompletion::Pending(receiver) = self {
            receiver.close();
        }
    }
}

impl<N: TokenValue> fmt::Debug for AsyncCompletion<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsyncCompletion::Ready(items) => f.debug_tuple("Ready").field(items).finish(),
            AsyncCompletion::Pending(_) => f.write_str("Pending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{Sum, SumSpec, id, inc, num, plus};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn items() -> CompletionItems<Sum> {
        SumSpec::default().completion_items()
    }

    #[rstest]
    #[case("+", vec!["+"])]
    #[case("++", vec!["++"])]
    #[case("42", vec!["<number>"])]
    #[case("x", vec!["<identifier>"])]
    #[case("+*", vec![])]
    fn matches_by_text(#[case] text: &str, #[case] expected: Vec<&str>) {
        let items = items();
        let texts: Vec<&str> = items.matches(text).iter().map(|item| item.visible_text()).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn low_priority_yields_to_exact_items() {
        let items = CompletionItems::new(vec![
            CompletionItem::token(id("x")).low_priority(),
            CompletionItem::token(Token::<Sum>::simple("x")),
        ]);
        let matches = items.matches("x");
        assert_eq!(matches.len(), 1);
        assert!(!matches[0].is_low_priority());
    }

    #[test]
    fn ambiguity_counts_prefixes() {
        let items = items();
        assert!(items.has_ambiguous_matches("+"));
        assert!(!items.has_ambiguous_matches("++"));
        assert_eq!(items.strictly_prefixed_by("+").len(), 1);
    }

    #[rstest]
    #[case("23+9", 2, true)]
    #[case("+9", 1, true)]
    #[case("239", 2, false)]
    #[case("++", 1, false)]
    #[case("a+", 0, false)]
    #[case("ab", 2, false)]
    fn boundaries(#[case] text: &str, #[case] index: usize, #[case] expected: bool) {
        assert_eq!(items().is_boundary(text, index), expected);
    }

    #[test]
    fn resolve_requires_single_match() {
        let items = items();
        assert_eq!(items.resolve("++"), Some(vec![inc()]));
        assert_eq!(items.complete_token("+"), Some(plus()));
        assert_eq!(items.complete_token("17"), Some(num(17)));
        assert_eq!(items.complete_token("+*"), None);
    }

    #[test]
    fn async_completion_ready_and_pending() {
        let mut ready: AsyncCompletion<Sum> = AsyncCompletion::ready(vec![CompletionItem::token(plus())]);
        assert!(matches!(ready.poll(), AsyncPoll::Ready(items) if items.len() == 1));

        let (sender, mut pending) = AsyncCompletion::<Sum>::channel();
        assert!(matches!(pending.poll(), AsyncPoll::Pending));
        assert!(sender.send(vec![CompletionItem::token(plus())]).is_ok());
        assert!(matches!(pending.poll(), AsyncPoll::Ready(items) if items.len() == 1));
    }

    #[test]
    fn cancelled_async_completion_rejects_late_results() {
        let (sender, mut pending) = AsyncCompletion::<Sum>::channel();
        pending.cancel();

        assert!(sender.send(Vec::new()).is_err());
        assert!(matches!(pending.poll(), AsyncPoll::Cancelled));
    }
}
