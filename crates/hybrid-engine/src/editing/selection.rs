use std::ops::Range;

use crate::editing::TokenListEditor;
use crate::token::TokenValue;

/// Where the caret lands inside a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPosition {
    First,
    Last,
    /// Char offset; `Offset(0)` behaves like `First`
    Offset(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorTarget {
    Token {
        index: usize,
        position: SelectionPosition,
    },
    Placeholder,
    Unchanged,
}

/// A deferred cursor move produced by an edit, run with
/// [`HybridEditor::run`](crate::editing::HybridEditor::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a CursorAction does nothing until it is run"]
pub struct CursorAction {
    pub target: CursorTarget,
    /// Reopen the completion menu on the target if its text is ambiguous
    pub activate_completion: bool,
}

impl CursorAction {
    pub fn token(index: usize, position: SelectionPosition) -> Self {
        Self {
            target: CursorTarget::Token { index, position },
            activate_completion: false,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            target: CursorTarget::Placeholder,
            activate_completion: false,
        }
    }

    pub fn unchanged() -> Self {
        Self {
            target: CursorTarget::Unchanged,
            activate_completion: false,
        }
    }

    pub fn with_completion(self) -> Self {
        Self {
            activate_completion: true,
            ..self
        }
    }
}

/// Select `position` in the token at `index`.
///
/// A caret at the start of a token glued to its left neighbour is the same
/// visual spot as the end of that neighbour, so the neighbour is selected
/// instead; likewise for the end of a token glued to its right. Unfocusable
/// tokens always hand the caret to a neighbour.
pub(crate) fn select<N: TokenValue>(
    list: &TokenListEditor<N>,
    index: usize,
    position: SelectionPosition,
) -> CursorAction {
    let tokens = list.tokens();
    let focusable = list.view(index).is_none_or(|view| view.is_focusable());
    match position {
        SelectionPosition::First | SelectionPosition::Offset(0) => {
            if index > 0 && index < tokens.len() {
                let glued = tokens[index - 1].no_space_to_right() || tokens[index].no_space_to_left();
                if glued || !focusable {
                    return CursorAction::token(index - 1, SelectionPosition::Last);
                }
            }
            CursorAction::token(index, SelectionPosition::First)
        }
        SelectionPosition::Last => {
            if index + 1 < tokens.len() {
                let glued = tokens[index].no_space_to_right() || tokens[index + 1].no_space_to_left();
                if glued || !focusable {
                    return CursorAction::token(index + 1, SelectionPosition::First);
                }
            }
            CursorAction::token(index, SelectionPosition::Last)
        }
        offset @ SelectionPosition::Offset(_) => CursorAction::token(index, offset),
    }
}

/// Grow a token selection: the current token first, then the smallest parse
/// node strictly containing the selection, then the whole region.
pub(crate) fn expand_range(
    selection: Option<Range<usize>>,
    focus: Option<usize>,
    node_ranges: Option<&[Range<usize>]>,
    len: usize,
) -> Option<Range<usize>> {
    let Some(current) = selection else {
        return focus.map(|index| index..index + 1);
    };
    let whole = 0..len;
    let Some(ranges) = node_ranges else {
        return Some(whole);
    };
    ranges
        .iter()
        .filter(|range| {
            range.start <= current.start && current.end <= range.end && range.len() > current.len()
        })
        .min_by_key(|range| range.len())
        .cloned()
        .or(Some(whole))
}

/// Shrink a token selection to the largest parse node strictly inside it that
/// holds `focus`, or drop the selection.
pub(crate) fn shrink_range(
    selection: Option<Range<usize>>,
    focus: usize,
    node_ranges: Option<&[Range<usize>]>,
) -> Option<Range<usize>> {
    let current = selection?;
    node_ranges?
        .iter()
        .filter(|range| {
            current.start <= range.start
                && range.end <= current.end
                && range.len() < current.len()
                && range.contains(&focus)
        })
        .max_by_key(|range| range.len())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn expand_starts_with_focused_token() {
        assert_eq!(expand_range(None, Some(2), None, 3), Some(2..3));
        assert_eq!(expand_range(None, None, None, 3), None);
    }

    #[test]
    fn expand_without_parse_selects_everything() {
        assert_eq!(expand_range(Some(0..1), Some(0), None, 3), Some(0..3));
    }

    #[test]
    fn expand_walks_up_the_tree() {
        // ((a++)++): root 0..3, inner increment 0..2, variable 0..1
        let ranges = [0..3, 0..2, 0..1];
        assert_eq!(expand_range(Some(0..1), Some(0), Some(&ranges), 3), Some(0..2));
        assert_eq!(expand_range(Some(0..2), Some(0), Some(&ranges), 3), Some(0..3));
        assert_eq!(expand_range(Some(0..3), Some(0), Some(&ranges), 3), Some(0..3));
    }

    #[test]
    fn shrink_walks_down_the_tree() {
        let ranges = [0..3, 0..2, 0..1];
        assert_eq!(shrink_range(Some(0..3), 0, Some(&ranges)), Some(0..2));
        assert_eq!(shrink_range(Some(0..2), 0, Some(&ranges)), Some(0..1));
        assert_eq!(shrink_range(Some(0..1), 0, Some(&ranges)), None);
        assert_eq!(shrink_range(Some(0..2), 0, None), None);
    }
}
