use std::ops::Range;

use crate::text::{byte_offset, char_len};
use crate::token::{Token, TokenValue};

/// Stable identity of a token view. A view keeps its id for as long as its
/// token is not replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

/// The headless projection of one token: an editable text buffer and a caret.
///
/// The buffer can drift from the token while the user types; the editor
/// resolves it back into a token after every keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenView {
    id: ViewId,
    text: String,
    caret: usize,
    editable: bool,
    focusable: bool,
    no_space_to_left: bool,
    no_space_to_right: bool,
}

impl TokenView {
    fn for_token<N: TokenValue>(id: ViewId, token: &Token<N>) -> Self {
        let no_space_to_left = token.no_space_to_left();
        let no_space_to_right = token.no_space_to_right();
        Self {
            id,
            text: token.text().into_owned(),
            caret: 0,
            editable: !token.is_value(),
            focusable: !(matches!(token, Token::Simple(_)) && no_space_to_left && no_space_to_right),
            no_space_to_left,
            no_space_to_right,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret position in chars.
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }

    /// Value tokens render their own editor and take no text input.
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn no_space_to_left(&self) -> bool {
        self.no_space_to_left
    }

    pub fn no_space_to_right(&self) -> bool {
        self.no_space_to_right
    }

    pub fn is_caret_at_end(&self) -> bool {
        self.caret == self.char_len()
    }

    pub(crate) fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.char_len());
    }

    pub(crate) fn set_text(&mut self, text: &str, caret: usize) {
        self.text = text.to_owned();
        self.set_caret(caret);
    }

    pub(crate) fn insert_str(&mut self, text: &str) {
        let at = byte_offset(&self.text, self.caret).unwrap_or(self.text.len());
        self.text.insert_str(at, text);
        self.caret += char_len(text);
    }

    /// Remove the char before the caret; false at the start.
    pub(crate) fn delete_before_caret(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.caret -= 1;
        self.remove_char_at_caret()
    }

    /// Remove the char after the caret; false at the end.
    pub(crate) fn delete_after_caret(&mut self) -> bool {
        self.remove_char_at_caret()
    }

    fn remove_char_at_caret(&mut self) -> bool {
        match byte_offset(&self.text, self.caret) {
            Some(at) if at < self.text.len() => {
                self.text.remove(at);
                true
            }
            _ => false,
        }
    }
}

/// Views kept in lockstep with the token list.
#[derive(Debug, Default)]
pub(crate) struct TokenViews {
    views: Vec<TokenView>,
    next_id: u64,
}

impl TokenViews {
    pub(crate) fn as_slice(&self) -> &[TokenView] {
        &self.views
    }

    pub(crate) fn get(&self, index: usize) -> Option<&TokenView> {
        self.views.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut TokenView> {
        self.views.get_mut(index)
    }

    pub(crate) fn position(&self, id: ViewId) -> Option<usize> {
        self.views.iter().position(|view| view.id == id)
    }

    /// Replace the views in `range` with fresh views for `tokens`.
    pub(crate) fn splice<N: TokenValue>(&mut self, range: Range<usize>, tokens: &[Token<N>]) {
        let fresh: Vec<TokenView> = tokens
            .iter()
            .map(|token| {
                let id = ViewId(self.next_id);
                self.next_id += 1;
                TokenView::for_token(id, token)
            })
            .collect();
        self.views.splice(range, fresh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{Sum, dot, id, plus};
    use pretty_assertions::assert_eq;

    #[test]
    fn splice_assigns_fresh_ids() {
        let mut views = TokenViews::default();
        views.splice(0..0, &[id("a"), plus(), id("b")]);
        let kept = views.as_slice()[0].id();

        views.splice(1..2, &[id("c")]);

        assert_eq!(views.as_slice()[0].id(), kept);
        assert_ne!(views.as_slice()[1].id(), kept);
        assert_eq!(views.position(kept), Some(0));
        assert_eq!(views.as_slice()[1].text(), "c");
    }

    #[test]
    fn glued_simple_tokens_are_not_focusable() {
        let mut views = TokenViews::default();
        views.splice(0..0, &[dot(), plus(), Token::Value(Sum::Num(1))]);

        assert!(!views.as_slice()[0].is_focusable());
        assert!(views.as_slice()[1].is_focusable());
        assert!(!views.as_slice()[2].is_editable());
    }

    #[test]
    fn caret_editing() {
        let mut views = TokenViews::default();
        views.splice(0..0, &[id("ac")]);
        let view = views.get_mut(0).unwrap();

        view.set_caret(1);
        view.insert_str("b");
        assert_eq!((view.text(), view.caret()), ("abc", 2));

        assert!(view.delete_before_caret());
        assert_eq!((view.text(), view.caret()), ("ac", 1));

        assert!(view.delete_after_caret());
        assert_eq!((view.text(), view.caret()), ("a", 1));
        assert!(!view.delete_after_caret());
        assert!(view.is_caret_at_end());
    }
}
