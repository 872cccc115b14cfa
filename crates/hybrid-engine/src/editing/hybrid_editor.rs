use std::ops::Range;
use std::path::Path;
use std::rc::Rc;

use hybrid_config::{Config, ConfigError, EditorSettings};
use log::debug;

use crate::completion::{
    CompletionItem, CompletionItems, CompletionMenu, CompletionParameters, CompletionSet,
    CompletionSupplier,
};
use crate::editing::pairing;
use crate::editing::selection::{
    CursorAction, CursorTarget, SelectionPosition, expand_range, shrink_range,
};
use crate::editing::{TokenCompleter, TokenListEditor, TokenOperations, TokenView, ViewId};
use crate::error::{HybridError, Result};
use crate::print::ParseNode;
use crate::spec::HybridEditorSpec;
use crate::text::{char_len, split_at_char};
use crate::token::{Token, TokenValue};

/// Where keyboard input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The empty-region placeholder, with its own text buffer
    Placeholder,
    Token(ViewId),
}

/// A headless hybrid editor: a [`TokenListEditor`] plus focus, caret,
/// selection and completion menu state, driven by key-level intents.
///
/// Typing resolves text into tokens as it goes. A keystroke either completes
/// the focused token (exactly one proposal matches), grows the list through a
/// side transform (the typed char no longer fits the token), splits the token
/// at a boundary, or leaves an error token holding the unresolved text.
pub struct HybridEditor<N: TokenValue> {
    list: TokenListEditor<N>,
    settings: EditorSettings,
    focus: Focus,
    placeholder_text: String,
    selection: Option<Range<usize>>,
    menu: CompletionMenu<N>,
    last_item_deleted: Option<Box<dyn FnMut()>>,
}

impl<N: TokenValue> HybridEditor<N> {
    pub fn new(spec: Rc<dyn HybridEditorSpec<N>>, settings: &EditorSettings) -> Self {
        Self {
            list: TokenListEditor::new(spec, settings),
            settings: settings.clone(),
            focus: Focus::Placeholder,
            placeholder_text: String::new(),
            selection: None,
            menu: CompletionMenu::default(),
            last_item_deleted: None,
        }
    }

    /// An editor with the settings of the config file at `path`, or the
    /// defaults when there is no such file.
    pub fn from_config(
        spec: Rc<dyn HybridEditorSpec<N>>,
        path: impl AsRef<Path>,
    ) -> std::result::Result<Self, ConfigError> {
        let config = Config::read_or_default(path)?;
        debug!("editor settings {:?}", config.editor);
        Ok(Self::new(spec, &config.editor))
    }

    /// An editor with the user's settings.
    pub fn from_user_config(
        spec: Rc<dyn HybridEditorSpec<N>>,
    ) -> std::result::Result<Self, ConfigError> {
        Self::from_config(spec, Config::path())
    }

    // Model

    pub fn spec(&self) -> Rc<dyn HybridEditorSpec<N>> {
        self.list.spec()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn set_hide_tokens_in_menu(&mut self, hide: bool) {
        self.settings.hide_tokens_in_menu = hide;
    }

    pub fn list(&self) -> &TokenListEditor<N> {
        &self.list
    }

    pub(crate) fn list_mut(&mut self) -> &mut TokenListEditor<N> {
        &mut self.list
    }

    pub fn tokens(&self) -> &[Token<N>] {
        self.list.tokens()
    }

    pub fn views(&self) -> &[TokenView] {
        self.list.views()
    }

    pub fn value(&self) -> Option<&N> {
        self.list.value()
    }

    pub fn is_valid(&self) -> bool {
        self.list.is_valid()
    }

    pub fn set_tokens(&mut self, tokens: Vec<Token<N>>) -> Result<()> {
        self.menu.close();
        self.selection = None;
        self.list.set_tokens(tokens)?;
        self.repair_focus();
        Ok(())
    }

    pub fn set_value(&mut self, value: Option<N>) -> Result<()> {
        self.menu.close();
        self.list.set_value(value)?;
        self.repair_focus();
        Ok(())
    }

    pub fn set_spec(&mut self, spec: Rc<dyn HybridEditorSpec<N>>) -> Result<()> {
        self.menu.close();
        self.list.set_spec(spec)?;
        self.repair_focus();
        Ok(())
    }

    /// Deliver pending sub-value change notifications.
    pub fn process_changes(&mut self) -> Result<bool> {
        let changed = self.list.process_changes()?;
        if changed {
            self.repair_focus();
        }
        Ok(changed)
    }

    /// A detached copy of the tokens, safe to keep across edits.
    pub fn save_state(&self) -> Vec<Token<N>> {
        self.tokens().iter().map(Token::clone_value).collect()
    }

    pub fn restore_state(&mut self, state: Option<Vec<Token<N>>>) -> Result<()> {
        self.menu.close();
        self.selection = None;
        self.list.restore_state(state)?;
        self.repair_focus();
        Ok(())
    }

    pub fn dispose(&mut self) {
        self.menu.close();
        self.list.dispose();
    }

    /// Called whenever deleting tokens empties the region.
    pub fn on_last_item_deleted(&mut self, callback: impl FnMut() + 'static) {
        self.last_item_deleted = Some(Box::new(callback));
    }

    pub(crate) fn notify_last_item_deleted(&mut self) -> CursorAction {
        debug!("last token deleted");
        if let Some(callback) = self.last_item_deleted.as_mut() {
            callback();
        }
        CursorAction::placeholder()
    }

    pub fn operations(&mut self) -> TokenOperations<'_, N> {
        TokenOperations::new(self)
    }

    pub fn completer(&self) -> TokenCompleter<'_, N> {
        TokenCompleter::new(self)
    }

    pub fn completion_items(&self) -> CompletionItems<N> {
        self.completer().completion_items()
    }

    // Focus

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn focused_index(&self) -> Option<usize> {
        match self.focus {
            Focus::Token(id) => self.list.view_position(id),
            Focus::Placeholder => None,
        }
    }

    /// Caret of the focused token, or of the placeholder text.
    pub fn caret(&self) -> usize {
        match self.focused_index().and_then(|index| self.list.view(index)) {
            Some(view) => view.caret(),
            None => char_len(&self.placeholder_text),
        }
    }

    pub fn placeholder_text(&self) -> &str {
        &self.placeholder_text
    }

    pub fn focus_placeholder(&mut self) {
        self.focus = Focus::Placeholder;
        self.placeholder_text.clear();
    }

    /// Focus the token at `index` with the caret at `position`, as is.
    pub fn select_token(&mut self, index: usize, position: SelectionPosition) {
        let Some(view) = self.list.view_mut(index) else {
            return;
        };
        let caret = match position {
            SelectionPosition::First => 0,
            SelectionPosition::Last => view.char_len(),
            SelectionPosition::Offset(offset) => offset,
        };
        view.set_caret(caret);
        let focus = Focus::Token(view.id());
        if self.focus != focus {
            self.menu.close();
        }
        self.focus = focus;
    }

    pub fn run(&mut self, action: CursorAction) {
        match action.target {
            CursorTarget::Token { index, position } => self.select_token(index, position),
            CursorTarget::Placeholder => self.focus_placeholder(),
            CursorTarget::Unchanged => {}
        }
        self.repair_focus();
        if action.activate_completion && self.has_ambiguous_prefix() {
            self.activate_completion();
        }
    }

    fn repair_focus(&mut self) {
        let len = self.tokens().len();
        let stale = match self.focus {
            Focus::Token(id) => self.list.view_position(id).is_none(),
            Focus::Placeholder => len > 0,
        };
        if stale {
            if len == 0 {
                self.focus_placeholder();
            } else {
                self.select_token(len - 1, SelectionPosition::Last);
            }
        }
        if self.selection.as_ref().is_some_and(|range| range.end > len) {
            self.selection = None;
        }
    }

    /// Text before the caret of the focused token or placeholder.
    fn prefix_text(&self) -> String {
        match self.focused_index().and_then(|index| self.list.view(index)) {
            Some(view) => split_at_char(view.text(), view.caret()).0.to_owned(),
            None => self.placeholder_text.clone(),
        }
    }

    fn has_ambiguous_prefix(&self) -> bool {
        let supplier = match self.focused_index() {
            Some(index) => CompletionSupplier::Token { index },
            None => CompletionSupplier::Placeholder,
        };
        supplier
            .get(self, CompletionParameters::EMPTY)
            .items()
            .has_ambiguous_matches(&self.prefix_text())
    }

    // Typing

    pub fn type_text(&mut self, text: &str) -> Result<()> {
        text.chars().try_for_each(|c| self.type_char(c))
    }

    pub fn type_char(&mut self, c: char) -> Result<()> {
        if self.selection.is_some() {
            self.clear_selection()?;
        }
        let Some(index) = self.focused_index() else {
            return self.type_in_placeholder(c);
        };
        let index = self.typing_target(index);
        let editable = self.list.view(index).is_some_and(TokenView::is_editable);
        if !editable {
            return self.type_beside_value(index, c);
        }

        if let Some(view) = self.list.view_mut(index) {
            view.insert_str(c.encode_utf8(&mut [0; 4]));
        }
        if matches!(self.tokens().get(index), Some(Token::Comment { .. })) {
            let action = self.operations().replace_comment_token(index)?;
            self.run(action);
            return Ok(());
        }
        if self.operations().after_type(index)? {
            return Ok(());
        }
        if c == ' ' {
            return self.type_space(index);
        }
        self.resolve_typed(index)
    }

    /// The start of a token glued to its left neighbour is the end of that
    /// neighbour, so typing there extends the neighbour.
    fn typing_target(&mut self, index: usize) -> usize {
        let glued = index > 0
            && self
                .list
                .view(index)
                .is_some_and(|view| view.caret() == 0 && view.no_space_to_left())
            && self.list.view(index - 1).is_some_and(TokenView::is_editable);
        if !glued {
            return index;
        }
        self.select_token(index - 1, SelectionPosition::Last);
        index - 1
    }

    fn type_in_placeholder(&mut self, c: char) -> Result<()> {
        if c.is_whitespace() && self.placeholder_text.is_empty() {
            return Ok(());
        }
        self.placeholder_text.push(c);
        let text = self.placeholder_text.clone();
        let set = self.typing_set(CompletionSupplier::Placeholder);

        if self.should_complete(set.items(), &text) {
            self.placeholder_text.clear();
            return self.apply_match(&set, &text);
        }
        if !self.menu.is_active() && set.items().prefixed_by(&text).is_empty() {
            self.placeholder_text.clear();
            let len = self.tokens().len();
            self.list.splice(len..len, vec![Token::error(text)])?;
            self.select_token(len, SelectionPosition::Last);
        }
        Ok(())
    }

    /// A space at either edge of a token opens an empty token beside it.
    fn type_space(&mut self, index: usize) -> Result<()> {
        let Some(view) = self.list.view_mut(index) else {
            return Ok(());
        };
        let caret = view.caret();
        let at_end = view.is_caret_at_end();
        if !at_end && caret != 1 {
            return self.resolve_typed(index);
        }
        view.delete_before_caret();
        let delta = usize::from(at_end);
        let action = self.operations().expand_to_error(index, "", delta)?;
        self.run(action);
        Ok(())
    }

    fn resolve_typed(&mut self, index: usize) -> Result<()> {
        let Some(view) = self.list.view(index) else {
            return Ok(());
        };
        let text = view.text().to_owned();
        let caret = view.caret();
        let at_end = view.is_caret_at_end();
        let current = self.tokens()[index].text().into_owned();

        let set = self.typing_set(CompletionSupplier::Token { index });
        if self.should_complete(set.items(), &text) {
            return self.apply_match(&set, &text);
        }

        if at_end && !set.items().has_matches(&text) {
            let (prefix, suffix) = split_at_char(&text, char_len(&text) - 1);
            if prefix == current {
                return self.side_transform_typed(index, 1, Some(prefix), suffix);
            }
            if set.items().has_single_match(prefix) {
                return self.complete_then_retype(index, prefix, suffix);
            }
        }

        if caret == 1 && !self.menu.is_active() {
            let (prefix, suffix) = split_at_char(&text, 1);
            if suffix == current {
                return self.side_transform_typed(index, 0, Some(suffix), prefix);
            }
        }

        self.mark_unresolved(index, &text, caret)
    }

    /// Typing next to a value token always transforms beside it.
    fn type_beside_value(&mut self, index: usize, c: char) -> Result<()> {
        let delta = match self.list.view(index) {
            Some(view) if view.caret() == 0 => 0,
            _ => 1,
        };
        if c == ' ' {
            let action = self.operations().expand_to_error(index, "", delta)?;
            self.run(action);
            return Ok(());
        }
        self.side_transform_typed(index, delta, None, c.encode_utf8(&mut [0; 4]))
    }

    /// Complete `side_text` beside the token at `index`, restoring the
    /// token's own text to `token_text` first. Text with no single match
    /// becomes an error token.
    fn side_transform_typed(
        &mut self,
        index: usize,
        delta: usize,
        token_text: Option<&str>,
        side_text: &str,
    ) -> Result<()> {
        let params = if self.menu.is_active() {
            CompletionParameters::EMPTY.end_right_transform()
        } else {
            CompletionParameters::EMPTY
        };
        if let (Some(text), Some(view)) = (token_text, self.list.view_mut(index)) {
            let caret = if delta == 0 { 0 } else { char_len(text) };
            view.set_text(text, caret);
        }

        let set = CompletionSupplier::SideTransform { index, delta }.get(self, params);
        if set.items().has_single_match(side_text) {
            return self.apply_match(&set, side_text);
        }
        let action = self.operations().expand_to_error(index, side_text, delta)?;
        self.run(action);
        Ok(())
    }

    /// The token's text no longer resolves but its prefix does: complete the
    /// prefix, then type the last char again beside it.
    fn complete_then_retype(&mut self, index: usize, prefix: &str, suffix: &str) -> Result<()> {
        if let Some(view) = self.list.view_mut(index) {
            view.set_text(prefix, char_len(prefix));
        }
        let set = CompletionSupplier::Token { index }.get(self, CompletionParameters::EMPTY);
        self.apply_match(&set, prefix)?;
        match suffix.chars().next() {
            Some(c) => self.type_char(c),
            None => Ok(()),
        }
    }

    fn mark_unresolved(&mut self, index: usize, text: &str, caret: usize) -> Result<()> {
        let already = matches!(self.tokens().get(index), Some(Token::Error(current)) if current == text);
        if !already {
            self.list.replace(index, Token::error(text))?;
        }
        self.select_token(index, SelectionPosition::Offset(caret));
        Ok(())
    }

    fn should_complete(&self, items: &CompletionItems<N>, text: &str) -> bool {
        items.has_single_match(text)
            && (!self.menu.is_active() || items.prefixed_by(text).len() <= 1)
    }

    /// Proposals used while typing: with the menu open they include menu
    /// items and whatever async items arrived for the same position.
    fn typing_set(&self, supplier: CompletionSupplier) -> CompletionSet<N> {
        if !self.menu.is_active() {
            return supplier.get(self, CompletionParameters::EMPTY);
        }
        let mut set = supplier.get(self, CompletionParameters::MENU);
        set.extend(self.received_items(supplier));
        set
    }

    fn received_items(&self, supplier: CompletionSupplier) -> Vec<CompletionItem<N>> {
        self.menu
            .received(supplier, self.list.modification_count())
            .map(|set| set.items().items().to_vec())
            .unwrap_or_default()
    }

    fn apply_match(&mut self, set: &CompletionSet<N>, text: &str) -> Result<()> {
        if let Some(action) = set.apply_match(self, text)? {
            self.menu.close();
            self.run(action);
        }
        Ok(())
    }

    fn apply_item(&mut self, set: &CompletionSet<N>, item: &CompletionItem<N>, text: &str) -> Result<()> {
        let action = set.apply(self, item, text)?;
        if matches!(set.supplier(), CompletionSupplier::Placeholder) {
            self.placeholder_text.clear();
        }
        self.menu.close();
        self.run(action);
        Ok(())
    }

    // Deleting

    pub fn backspace(&mut self) -> Result<()> {
        self.delete_char(true)
    }

    pub fn delete(&mut self) -> Result<()> {
        self.delete_char(false)
    }

    /// Delete the focused token, or the selection.
    pub fn delete_current(&mut self) -> Result<()> {
        if self.selection.is_some() {
            return self.clear_selection();
        }
        let Some(index) = self.focused_index() else {
            return Ok(());
        };
        self.menu.close();
        let action = self.operations().delete_token(index, 0)?;
        self.run(action);
        Ok(())
    }

    fn delete_char(&mut self, backward: bool) -> Result<()> {
        if self.selection.is_some() {
            return self.clear_selection();
        }
        let Some(index) = self.focused_index() else {
            if backward {
                self.placeholder_text.pop();
            }
            return Ok(());
        };
        let Some(view) = self.list.view(index) else {
            return Ok(());
        };

        if !view.is_editable() || view.text().is_empty() {
            self.menu.close();
            let action = self.operations().delete_token(index, 0)?;
            self.run(action);
            return Ok(());
        }

        let at_edge = if backward {
            view.caret() == 0
        } else {
            view.is_caret_at_end()
        };
        if at_edge {
            let delta = if backward { -1 } else { 1 };
            let mut ops = self.operations();
            if !ops.can_delete(index, delta) {
                return Ok(());
            }
            let action = if ops.can_merge(index, delta) {
                ops.merge_tokens(index, backward)?
            } else {
                ops.delete_token(index, delta)?
            };
            self.menu.close();
            self.run(action);
            return Ok(());
        }

        if let Some(view) = self.list.view_mut(index) {
            if backward {
                view.delete_before_caret();
            } else {
                view.delete_after_caret();
            }
        }
        self.after_delete(index)
    }

    fn after_delete(&mut self, index: usize) -> Result<()> {
        let Some(view) = self.list.view(index) else {
            return Ok(());
        };
        let text = view.text().to_owned();
        let caret = view.caret();
        if text.is_empty() {
            return self.became_empty(index);
        }
        if text == self.tokens()[index].text() {
            return Ok(());
        }

        let set = self.typing_set(CompletionSupplier::Token { index });
        if set.items().has_single_match(&text) {
            self.apply_match(&set, &text)?;
            if let Some(view) = self.focused_index().and_then(|index| self.list.view_mut(index)) {
                if caret <= view.char_len() {
                    view.set_caret(caret);
                }
            }
            return Ok(());
        }
        self.mark_unresolved(index, &text, caret)
    }

    /// A token whose text was deleted away disappears when it was glued to a
    /// neighbour or alone; otherwise it stays as an empty error token.
    fn became_empty(&mut self, index: usize) -> Result<()> {
        let tokens = self.tokens();
        let current = &tokens[index];
        let prev = index.checked_sub(1).and_then(|i| tokens.get(i));
        let next = tokens.get(index + 1);
        let remove = prev.is_some_and(|prev| prev.no_space_to_right() || current.no_space_to_left())
            || next.is_some_and(Token::no_space_to_left)
            || current.no_space_to_right()
            || (prev.is_none() && next.is_none());

        let action = if remove {
            self.operations().delete_token(index, 0)?
        } else {
            self.operations().replace_token(index, Token::error(""))?
        };
        self.run(action);
        Ok(())
    }

    // Paste and enter

    pub fn paste(&mut self, text: &str) -> Result<()> {
        if self.selection.is_some() {
            self.clear_selection()?;
        }
        self.menu.close();
        let (range, combined) = match self.focused_index().and_then(|index| Some((index, self.list.view(index)?))) {
            None => {
                let mut combined = std::mem::take(&mut self.placeholder_text);
                combined.push_str(text);
                let len = self.tokens().len();
                (len..len, combined)
            }
            Some((index, view)) if view.is_editable() => {
                let (before, after) = split_at_char(view.text(), view.caret());
                (index..index + 1, format!("{before}{text}{after}"))
            }
            Some((index, view)) => {
                let at = if view.caret() == 0 { index } else { index + 1 };
                (at..at, text.to_owned())
            }
        };
        self.operations().after_paste(range, &combined)?;
        Ok(())
    }

    /// Accept the menu's first proposal, or complete an unresolved token.
    pub fn enter(&mut self) -> Result<()> {
        if self.menu.is_active() {
            let set = self.menu_set();
            let text = self.prefix_text();
            let choice = match set.items().matches(&text).first() {
                Some(item) => Some(((*item).clone(), text)),
                None => set
                    .items()
                    .prefixed_by(&text)
                    .into_iter()
                    .find(|item| item.is_match(item.visible_text()))
                    .map(|item| (item.clone(), item.visible_text().to_owned())),
            };
            return match choice {
                Some((item, text)) => self.apply_item(&set, &item, &text),
                None => {
                    self.menu.close();
                    Ok(())
                }
            };
        }

        let Some(index) = self.focused_index() else {
            return Ok(());
        };
        let Some(view) = self.list.view(index) else {
            return Ok(());
        };
        let token = &self.tokens()[index];
        let resolved = !token.is_error() && view.text() == token.text();
        if resolved || !view.is_editable() {
            return Ok(());
        }
        let text = self.prefix_text();
        let set = CompletionSupplier::Token { index }.get(self, CompletionParameters::EMPTY);
        if set.items().has_single_match(&text) {
            return self.apply_match(&set, &text);
        }
        Ok(())
    }

    // Completion menu

    pub fn is_completion_active(&self) -> bool {
        self.menu.is_active()
    }

    /// Open the menu for the focused position and request async proposals.
    pub fn activate_completion(&mut self) {
        let (supplier, params) = self.menu_supplier();
        debug!("activating completion for {supplier:?}");
        let pending = supplier.get_async(self, params);
        self.menu.open(pending);
        self.poll_completion();
    }

    pub fn dismiss_completion(&mut self) {
        self.menu.close();
    }

    /// Collect async proposals. Returns true when new ones arrived.
    pub fn poll_completion(&mut self) -> bool {
        let generation = self.list.modification_count();
        self.menu.poll(generation)
    }

    /// Visible texts of the menu proposals matching the text before the caret.
    pub fn menu_texts(&self) -> Vec<String> {
        if !self.menu.is_active() {
            return Vec::new();
        }
        let set = self.menu_set();
        let text = self.prefix_text();
        set.items()
            .prefixed_by(&text)
            .into_iter()
            .map(|item| item.visible_text().to_owned())
            .collect()
    }

    fn menu_supplier(&self) -> (CompletionSupplier, CompletionParameters) {
        let focused = self
            .focused_index()
            .and_then(|index| Some((index, self.list.view(index)?)));
        match focused {
            None => (CompletionSupplier::Placeholder, CompletionParameters::MENU),
            Some((index, view)) if !view.is_editable() => {
                let delta = usize::from(view.caret() != 0);
                (
                    CompletionSupplier::SideTransform { index, delta },
                    CompletionParameters::MENU,
                )
            }
            Some((index, view))
                if view.is_caret_at_end()
                    && !view.text().is_empty()
                    && !self.tokens()[index].is_error() =>
            {
                (
                    CompletionSupplier::SideTransform { index, delta: 1 },
                    CompletionParameters::MENU.end_right_transform(),
                )
            }
            Some((index, _)) => (CompletionSupplier::Token { index }, CompletionParameters::MENU),
        }
    }

    fn menu_set(&self) -> CompletionSet<N> {
        let (supplier, params) = self.menu_supplier();
        let mut set = supplier.get(self, params);
        set.extend(self.received_items(supplier));
        set
    }

    // Selection

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    pub fn select_range(&mut self, range: Range<usize>) -> Result<()> {
        let len = self.tokens().len();
        if range.start > range.end || range.end > len {
            return Err(HybridError::TokenIndexOutOfBounds {
                index: range.end,
                len,
            });
        }
        self.selection = (!range.is_empty()).then_some(range);
        Ok(())
    }

    /// Delete the selected tokens.
    pub fn clear_selection(&mut self) -> Result<()> {
        let Some(range) = self.selection.take() else {
            return Ok(());
        };
        let start = range.start;
        self.menu.close();
        self.list.splice(range, Vec::new())?;

        let len = self.tokens().len();
        let action = if len == 0 {
            self.notify_last_item_deleted()
        } else if start < len {
            CursorAction::token(start, SelectionPosition::First)
        } else {
            CursorAction::token(start - 1, SelectionPosition::Last)
        };
        self.run(action);
        Ok(())
    }

    fn node_ranges(&self) -> Option<Vec<Range<usize>>> {
        if !self.list.is_valid() {
            return None;
        }
        self.list.parse_node().map(ParseNode::node_ranges)
    }

    /// Grow the selection to the next enclosing node. Returns false when
    /// there was nothing to select.
    pub fn expand_selection(&mut self) -> bool {
        let ranges = self.node_ranges();
        let next = expand_range(
            self.selection.clone(),
            self.focused_index(),
            ranges.as_deref(),
            self.tokens().len(),
        );
        let changed = next.is_some();
        if changed {
            self.selection = next;
        }
        changed
    }

    /// Shrink the selection towards the focused token, dropping it at the bottom.
    pub fn shrink_selection(&mut self) -> bool {
        let Some(current) = self.selection.clone() else {
            return false;
        };
        let focus = self.focused_index().unwrap_or(current.start);
        let ranges = self.node_ranges();
        self.selection = shrink_range(Some(current), focus, ranges.as_deref());
        true
    }

    pub fn pair_of(&self, index: usize) -> Option<usize> {
        pairing::pair_of(self.spec().as_ref(), self.tokens(), index)
    }
}
