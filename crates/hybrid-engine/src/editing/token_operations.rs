use std::ops::Range;

use log::trace;

use crate::editing::HybridEditor;
use crate::editing::selection::{self, CursorAction, SelectionPosition};
use crate::error::{HybridError, Result};
use crate::text::{char_len, split_at_char};
use crate::token::{Token, TokenValue};

/// Structural edits over the token list.
///
/// Each edit returns the [`CursorAction`] that should follow it; the
/// post-keystroke hooks ([`after_type`](Self::after_type),
/// [`after_paste`](Self::after_paste)) run it themselves.
pub struct TokenOperations<'a, N: TokenValue> {
    sync: &'a mut HybridEditor<N>,
}

impl<'a, N: TokenValue> TokenOperations<'a, N> {
    pub fn new(sync: &'a mut HybridEditor<N>) -> Self {
        Self { sync }
    }

    fn tokens(&self) -> &[Token<N>] {
        self.sync.tokens()
    }

    fn token(&self, index: usize) -> Result<&Token<N>> {
        let len = self.tokens().len();
        self.tokens()
            .get(index)
            .ok_or(HybridError::TokenIndexOutOfBounds { index, len })
    }

    fn offset(&self, index: usize, delta: isize) -> Result<usize> {
        index
            .checked_add_signed(delta)
            .ok_or(HybridError::TokenIndexOutOfBounds {
                index,
                len: self.tokens().len(),
            })
    }

    pub fn select(&self, index: usize, position: SelectionPosition) -> CursorAction {
        selection::select(self.sync.list(), index, position)
    }

    pub fn can_delete(&self, index: usize, delta: isize) -> bool {
        index
            .checked_add_signed(delta)
            .is_some_and(|target| target < self.tokens().len())
    }

    /// Remove the token at `index + delta`.
    pub fn delete_token(&mut self, index: usize, delta: isize) -> Result<CursorAction> {
        let target = self.offset(index, delta)?;
        self.sync.list_mut().remove(target)?;

        if self.tokens().is_empty() {
            return Ok(self.sync.notify_last_item_deleted());
        }
        Ok(if delta < 0 {
            self.select(index - 1, SelectionPosition::First)
        } else if delta > 0 {
            self.select(index, SelectionPosition::Last)
        } else if index > 0 {
            self.select(index - 1, SelectionPosition::Last)
        } else {
            self.select(0, SelectionPosition::First)
        })
    }

    pub fn replace_token(&mut self, index: usize, token: Token<N>) -> Result<CursorAction> {
        self.sync.list_mut().replace(index, token)?;
        Ok(self.select(index, SelectionPosition::First))
    }

    /// Value tokens never merge with their neighbours.
    pub fn can_merge(&self, index: usize, delta: isize) -> bool {
        let Some(other) = index.checked_add_signed(delta) else {
            return false;
        };
        match (self.tokens().get(index), self.tokens().get(other)) {
            (Some(current), Some(other)) => !current.is_value() && !other.is_value(),
            _ => false,
        }
    }

    /// Merge the token at `index` with its left (`backward`) or right
    /// neighbour and re-resolve the joined text.
    pub fn merge_tokens(&mut self, index: usize, backward: bool) -> Result<CursorAction> {
        let (left, right) = if backward {
            (self.offset(index, -1)?, index)
        } else {
            (index, index + 1)
        };
        let left_token = self.token(left)?;
        let right_token = self.token(right)?;

        let mut left_text = left_token.text().into_owned();
        let mut right_text = right_token.text().into_owned();
        if left_token.no_space_to_right() || right_token.no_space_to_left() {
            if backward {
                left_text.pop();
            } else {
                right_text = right_text.chars().skip(1).collect();
            }
        }
        let offset = char_len(&left_text);
        let merged = format!("{left_text}{right_text}");

        let replacement = self
            .sync
            .completion_items()
            .resolve(&merged)
            .unwrap_or_else(|| vec![Token::Error(merged)]);
        trace!("merging tokens {left} and {right} into {replacement:?}");
        self.sync.list_mut().splice(left..right + 1, replacement)?;

        Ok(self.select(left, SelectionPosition::Offset(offset)))
    }

    /// Insert an error token holding `text` before (`delta` 0) or after
    /// (`delta` 1) the token at `index`.
    pub fn expand_to_error(&mut self, index: usize, text: &str, delta: usize) -> Result<CursorAction> {
        let target = index + delta;
        self.sync.list_mut().insert(target, Token::error(text))?;
        Ok(self.select(target, SelectionPosition::Last))
    }

    /// Resync a comment token with its edited view text. Text that lost the
    /// comment prefix is no longer a comment and is tokenized in place.
    pub fn replace_comment_token(&mut self, index: usize) -> Result<CursorAction> {
        let Token::Comment { prefix, .. } = self.token(index)? else {
            return Ok(CursorAction::unchanged());
        };
        let prefix = prefix.clone();
        let Some(view) = self.sync.list().view(index) else {
            return Ok(CursorAction::unchanged());
        };
        let text = view.text().to_owned();
        let caret = view.caret();

        if let Some(body) = text.strip_prefix(prefix.as_str()) {
            self.sync
                .list_mut()
                .replace(index, Token::comment(prefix.as_str(), body))?;
            return Ok(CursorAction::token(index, SelectionPosition::Offset(caret)));
        }

        let tokens = self.sync.spec().tokenize(&text);
        let count = tokens.len();
        let list = self.sync.list_mut();
        list.splice(index..index + 1, tokens)?;
        list.update_to_printed_tokens()?;
        if self.tokens().is_empty() {
            return Ok(self.sync.notify_last_item_deleted());
        }
        let last = (index + count).saturating_sub(1).min(self.tokens().len() - 1);
        Ok(self.select(last, SelectionPosition::Last))
    }

    /// Split the token at `index` after a keystroke, if the typed char sits
    /// on a token boundary. Returns true when the token was split.
    pub fn after_type(&mut self, index: usize) -> Result<bool> {
        let Some(view) = self.sync.list().view(index) else {
            return Ok(false);
        };
        let text = view.text().to_owned();
        let caret = view.caret();
        if caret == 0 {
            return Ok(false);
        }
        let (before, rest) = split_at_char(&text, caret - 1);
        let (typed, after) = split_at_char(rest, 1);
        let items = self.sync.completion_items();
        let resolve = |text: &str| items.complete_token(text).unwrap_or_else(|| Token::error(text));

        if typed == " " && !before.is_empty() && !after.is_empty() {
            let tokens = vec![resolve(before), resolve(after)];
            self.splice_and_select(index..index + 1, tokens, index + 1, SelectionPosition::First)?;
            return Ok(true);
        }

        if items.is_boundary(&text, caret - 1) && items.is_boundary(rest, 1) {
            let tokens = vec![resolve(before), resolve(typed), resolve(after)];
            self.splice_and_select(index..index + 1, tokens, index + 1, SelectionPosition::Last)?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Replace `range` with the tokenized `text` and select the last new token.
    pub fn after_paste(&mut self, range: Range<usize>, text: &str) -> Result<bool> {
        let tokens = self.sync.spec().tokenize(text);
        let start = range.start;
        let count = tokens.len();
        let list = self.sync.list_mut();
        list.splice(range, tokens)?;
        list.update_to_printed_tokens()?;

        let action = if self.tokens().is_empty() {
            self.sync.notify_last_item_deleted()
        } else {
            let last = (start + count).saturating_sub(1).min(self.tokens().len() - 1);
            self.select(last, SelectionPosition::Last)
        };
        self.sync.run(action);
        Ok(true)
    }

    fn splice_and_select(
        &mut self,
        range: Range<usize>,
        tokens: Vec<Token<N>>,
        index: usize,
        position: SelectionPosition,
    ) -> Result<()> {
        let list = self.sync.list_mut();
        list.splice(range, tokens)?;
        list.update_to_printed_tokens()?;
        let action = self.select(index, position);
        self.sync.run(action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::CursorTarget;
    use crate::tests::{Note, Sum, dot, editor, id, inc, lp, mul, num, plus};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn merge_to_compound_token() {
        let mut editor = editor(vec![plus(), plus()]);

        let action = editor.operations().merge_tokens(0, false).unwrap();

        assert_eq!(editor.tokens(), &[inc()]);
        assert_eq!(action, CursorAction::token(0, SelectionPosition::Offset(1)));
    }

    #[test]
    fn unmatched_merge_becomes_error() {
        let mut editor = editor(vec![plus(), mul()]);

        editor.operations().merge_tokens(0, false).unwrap();

        assert_eq!(editor.tokens(), &[Token::error("+*")]);
    }

    #[test]
    fn merge_trims_glued_boundary() {
        let mut editor = editor(vec![id("a"), dot(), id("b")]);

        editor.operations().merge_tokens(2, true).unwrap();

        assert_eq!(editor.tokens(), &[id("a"), id("b")]);
    }

    #[rstest]
    #[case(0, 1, true)]
    #[case(1, -1, true)]
    #[case(1, 1, false)]
    #[case(2, -1, false)]
    #[case(2, 1, false)]
    fn values_never_merge(#[case] index: usize, #[case] delta: isize, #[case] expected: bool) {
        let value = Token::Value(Sum::Note(Note::new("n")));
        let mut editor = editor(vec![id("a"), plus(), value]);
        assert_eq!(editor.operations().can_merge(index, delta), expected);
    }

    #[rstest]
    #[case(0, -1, false)]
    #[case(0, 1, true)]
    #[case(1, 1, false)]
    #[case(1, 0, true)]
    fn can_delete_checks_bounds(#[case] index: usize, #[case] delta: isize, #[case] expected: bool) {
        let mut editor = editor(vec![id("a"), plus()]);
        assert_eq!(editor.operations().can_delete(index, delta), expected);
    }

    #[rstest]
    #[case(1, 0, CursorAction::token(0, SelectionPosition::Last))]
    #[case(0, 0, CursorAction::token(0, SelectionPosition::First))]
    #[case(0, 1, CursorAction::token(0, SelectionPosition::Last))]
    #[case(2, -1, CursorAction::token(1, SelectionPosition::First))]
    fn delete_selection_rules(
        #[case] index: usize,
        #[case] delta: isize,
        #[case] expected: CursorAction,
    ) {
        let mut editor = editor(vec![id("a"), plus(), id("b")]);
        let action = editor.operations().delete_token(index, delta).unwrap();
        assert_eq!(action, expected);
        assert_eq!(editor.tokens().len(), 2);
    }

    #[test]
    fn deleting_last_token_signals_once() {
        let mut editor = editor(vec![id("a")]);
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        editor.on_last_item_deleted(move || counter.set(counter.get() + 1));

        let action = editor.operations().delete_token(0, 0).unwrap();

        assert_eq!(action.target, CursorTarget::Placeholder);
        assert_eq!(fired.get(), 1);
        assert!(editor.tokens().is_empty());
    }

    #[test]
    fn expand_to_error_inserts_beside() {
        let mut editor = editor(vec![plus()]);

        let action = editor.operations().expand_to_error(0, "", 1).unwrap();

        assert_eq!(editor.tokens(), &[plus(), Token::error("")]);
        assert_eq!(action, CursorAction::token(1, SelectionPosition::Last));
    }

    #[test]
    fn replace_token_selects_start() {
        let mut editor = editor(vec![id("a"), plus(), id("b")]);

        let action = editor.operations().replace_token(0, Token::error("")).unwrap();

        assert_eq!(editor.tokens()[0], Token::error(""));
        assert_eq!(action, CursorAction::token(0, SelectionPosition::First));
    }

    #[test]
    fn split_on_boundary() {
        let mut editor = editor(vec![Token::simple("239")]);
        editor.select_token(0, SelectionPosition::Offset(2));
        editor.list_mut().view_mut(0).unwrap().insert_str("+");

        assert!(editor.operations().after_type(0).unwrap());

        assert_eq!(editor.tokens(), &[num(23), plus(), num(9)]);
        assert_eq!(editor.focused_index(), Some(1));
        assert!(editor.is_valid());
    }

    #[test]
    fn split_on_space() {
        let mut editor = editor(vec![inc()]);
        editor.select_token(0, SelectionPosition::Offset(1));
        editor.list_mut().view_mut(0).unwrap().insert_str(" ");

        assert!(editor.operations().after_type(0).unwrap());

        assert_eq!(editor.tokens(), &[plus(), plus()]);
        assert_eq!(editor.focused_index(), Some(1));
        assert_eq!(editor.caret(), 0);
    }

    #[test]
    fn no_split_inside_a_growing_token() {
        let mut editor = editor(vec![Token::simple("23")]);
        editor.select_token(0, SelectionPosition::Last);
        editor.list_mut().view_mut(0).unwrap().insert_str("9");

        assert!(!editor.operations().after_type(0).unwrap());
    }

    #[test]
    fn paste_replaces_token_with_tokenized_text() {
        let mut editor = editor(vec![id("a"), plus(), lp()]);

        editor.operations().after_paste(2..3, "b++ + c").unwrap();

        assert_eq!(editor.tokens(), &[id("a"), plus(), id("b"), inc(), plus(), id("c")]);
        assert_eq!(editor.focused_index(), Some(5));
    }

    #[test]
    fn comment_keeps_prefix() {
        let mut editor = editor(vec![Token::comment("#", " note")]);
        editor.select_token(0, SelectionPosition::Last);
        editor.list_mut().view_mut(0).unwrap().insert_str("s");

        let action = editor.operations().replace_comment_token(0).unwrap();

        assert_eq!(editor.tokens(), &[Token::comment("#", " notes")]);
        assert_eq!(action, CursorAction::token(0, SelectionPosition::Offset(7)));
    }

    #[test]
    fn comment_without_prefix_is_retokenized() {
        let mut editor = editor(vec![Token::comment("#", "a+b")]);
        editor.select_token(0, SelectionPosition::First);
        assert!(editor.list_mut().view_mut(0).unwrap().delete_after_caret());

        editor.operations().replace_comment_token(0).unwrap();

        assert_eq!(editor.tokens(), &[id("a"), plus(), id("b")]);
    }
}
