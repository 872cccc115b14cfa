use std::cell::Cell;
use std::ops::Range;
use std::rc::Rc;

use hybrid_config::EditorSettings;
use log::{debug, trace, warn};

use crate::change::{ChangeSource, Registration};
use crate::editing::view::{TokenView, TokenViews, ViewId};
use crate::error::{HybridError, Result};
use crate::print::{ParseNode, print_value};
use crate::spec::HybridEditorSpec;
use crate::token::{Token, TokenValue};

/// Keeps a token list and the value parsed from it in agreement.
///
/// Every token mutation reparses the list (when auto-reparse is on). A
/// successful parse is immediately reprinted; the printed tokens must match
/// the token count one for one, otherwise the spec's parser and printer
/// disagree and [`HybridError::PrinterParserMismatch`] is returned.
///
/// Synchronization is guarded against re-entrance: a sync requested while
/// one is running is dropped, not queued. This is what lets
/// [`update_to_printed_tokens`](Self::update_to_printed_tokens) rewrite
/// tokens without triggering a reparse of its own writes.
pub struct TokenListEditor<N: TokenValue> {
    spec: Rc<dyn HybridEditorSpec<N>>,
    tokens: Vec<Token<N>>,
    views: TokenViews,
    value: Option<N>,
    valid: bool,
    parse_node: Option<ParseNode<N>>,
    printed_tokens: Option<Vec<Token<N>>>,
    syncing: bool,
    restoring_state: bool,
    registrations: Vec<Registration>,
    stale: Rc<Cell<bool>>,
    modification_count: u64,
    auto_reparse: bool,
    auto_reprint: bool,
}

impl<N: TokenValue> TokenListEditor<N> {
    pub fn new(spec: Rc<dyn HybridEditorSpec<N>>, settings: &EditorSettings) -> Self {
        Self {
            spec,
            tokens: Vec::new(),
            views: TokenViews::default(),
            value: None,
            valid: true,
            parse_node: None,
            printed_tokens: Some(Vec::new()),
            syncing: false,
            restoring_state: false,
            registrations: Vec::new(),
            stale: Rc::new(Cell::new(false)),
            modification_count: 0,
            auto_reparse: settings.auto_reparse,
            auto_reprint: settings.auto_reprint,
        }
    }

    pub fn spec(&self) -> Rc<dyn HybridEditorSpec<N>> {
        Rc::clone(&self.spec)
    }

    pub fn tokens(&self) -> &[Token<N>] {
        &self.tokens
    }

    pub fn views(&self) -> &[TokenView] {
        self.views.as_slice()
    }

    pub fn view(&self, index: usize) -> Option<&TokenView> {
        self.views.get(index)
    }

    pub(crate) fn view_mut(&mut self, index: usize) -> Option<&mut TokenView> {
        self.views.get_mut(index)
    }

    pub fn view_position(&self, id: ViewId) -> Option<usize> {
        self.views.position(id)
    }

    pub fn value(&self) -> Option<&N> {
        self.value.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn parse_node(&self) -> Option<&ParseNode<N>> {
        self.parse_node.as_ref()
    }

    pub fn printed_tokens(&self) -> Option<&[Token<N>]> {
        self.printed_tokens.as_deref()
    }

    /// Bumped on every token mutation.
    pub fn modification_count(&self) -> u64 {
        self.modification_count
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    pub fn is_restoring_state(&self) -> bool {
        self.restoring_state
    }

    pub fn set_auto_reparse(&mut self, auto_reparse: bool) {
        self.auto_reparse = auto_reparse;
    }

    pub fn set_auto_reprint(&mut self, auto_reprint: bool) {
        self.auto_reprint = auto_reprint;
    }

    /// Per token, the value of the parse node owning it. Empty when invalid.
    pub fn objects(&self) -> Vec<&N> {
        self.parse_node
            .as_ref()
            .map(ParseNode::objects)
            .unwrap_or_default()
    }

    /// Run `f` unless a sync is already running, in which case it is dropped.
    pub fn sync(&mut self, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        if self.syncing {
            trace!("dropping nested sync request");
            return Ok(());
        }
        self.syncing = true;
        let result = f(self);
        self.syncing = false;
        result
    }

    fn tokens_changed(&mut self) -> Result<()> {
        self.modification_count += 1;
        if self.auto_reparse {
            self.sync(Self::reparse)
        } else {
            Ok(())
        }
    }

    fn reparse(&mut self) -> Result<()> {
        if self.restoring_state {
            return Ok(());
        }
        if self.tokens.is_empty() {
            self.value = None;
            self.valid = true;
            self.parse_node = None;
            self.printed_tokens = Some(Vec::new());
            self.registrations.clear();
            return Ok(());
        }

        let working = self.tokens.iter().map(Token::clone_value).collect();
        match self.spec.parse(working) {
            Some(value) => {
                self.value = Some(value);
                self.valid = true;
                self.reprint();
                let printed = self.printed_tokens.as_ref().map_or(0, Vec::len);
                if printed != self.tokens.len() {
                    warn!(
                        "printer produced {printed} tokens for {} parsed tokens",
                        self.tokens.len()
                    );
                    return Err(HybridError::PrinterParserMismatch {
                        printed,
                        tokens: self.tokens.len(),
                    });
                }
                debug!("reparsed {} tokens", self.tokens.len());
            }
            None => {
                debug!("{} tokens do not parse", self.tokens.len());
                self.valid = false;
                self.parse_node = None;
                self.printed_tokens = None;
            }
        }
        Ok(())
    }

    /// Print the current value, replacing the parse tree, the printed tokens
    /// and every change subscription.
    fn reprint(&mut self) {
        let spec = Rc::clone(&self.spec);
        match &self.value {
            Some(value) => {
                let printed = print_value(spec.as_ref(), value);
                self.stale.set(false);
                self.registrations = self.watch(&printed.changes);
                self.parse_node = Some(printed.tree);
                self.printed_tokens = Some(printed.tokens);
            }
            None => {
                self.registrations.clear();
                self.parse_node = None;
                self.printed_tokens = Some(Vec::new());
            }
        }
    }

    fn watch(&self, sources: &[ChangeSource]) -> Vec<Registration> {
        sources
            .iter()
            .map(|source| {
                let stale = Rc::clone(&self.stale);
                source.subscribe(move || stale.set(true))
            })
            .collect()
    }

    /// Reprint the value and make the printed tokens the token list.
    pub fn reprint_to_tokens(&mut self) -> Result<()> {
        self.reprint();
        let printed = self.printed_tokens.clone().unwrap_or_default();
        let len = self.tokens.len();
        self.splice(0..len, printed)?;
        self.valid = true;
        Ok(())
    }

    /// Replace the value; tokens follow when auto-reprint is on.
    pub fn set_value(&mut self, value: Option<N>) -> Result<()> {
        self.value = value;
        if self.auto_reprint {
            self.sync(Self::reprint_to_tokens)
        } else {
            Ok(())
        }
    }

    /// Overwrite only the tokens that differ from their printed form, so
    /// untouched views keep their identity.
    pub fn update_to_printed_tokens(&mut self) -> Result<()> {
        let Some(printed) = self.printed_tokens.clone() else {
            return Ok(());
        };
        if printed.len() != self.tokens.len() {
            warn!(
                "printed tokens ({}) out of step with tokens ({})",
                printed.len(),
                self.tokens.len()
            );
            return Err(HybridError::PrinterParserMismatch {
                printed: printed.len(),
                tokens: self.tokens.len(),
            });
        }
        self.sync(|editor| {
            for (index, token) in printed.into_iter().enumerate() {
                if editor.tokens[index] != token {
                    trace!("token {index} reprinted as {token:?}");
                    editor.replace(index, token)?;
                }
            }
            Ok(())
        })
    }

    /// Restore saved tokens, or with `None` reprint an invalid region from
    /// its last good value.
    pub fn restore_state(&mut self, state: Option<Vec<Token<N>>>) -> Result<()> {
        if self.restoring_state {
            return Err(HybridError::ReentrantRestore);
        }
        self.restoring_state = true;
        let restored = state.is_some();
        let result = match state {
            Some(tokens) => self.set_tokens(tokens),
            None if !self.valid => self.reprint_to_tokens(),
            None => Ok(()),
        };
        self.restoring_state = false;
        result?;
        if restored {
            self.sync(Self::reparse)?;
        }
        Ok(())
    }

    /// Swap the language spec. With auto-reparse on, reparse and normalise
    /// tokens to the new printer.
    pub fn set_spec(&mut self, spec: Rc<dyn HybridEditorSpec<N>>) -> Result<()> {
        self.spec = spec;
        if !self.auto_reparse {
            return Ok(());
        }
        self.sync(Self::reparse)?;
        self.update_to_printed_tokens()
    }

    /// Apply pending sub-value change notifications. Returns true if one fired.
    pub fn process_changes(&mut self) -> Result<bool> {
        if !self.stale.replace(false) {
            return Ok(false);
        }
        debug!("watched value changed");
        if self.auto_reprint {
            self.sync(Self::reprint_to_tokens)?;
        }
        Ok(true)
    }

    /// Release change subscriptions.
    pub fn dispose(&mut self) {
        self.registrations.clear();
    }

    pub fn set_tokens(&mut self, tokens: Vec<Token<N>>) -> Result<()> {
        let len = self.tokens.len();
        self.splice(0..len, tokens)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.set_tokens(Vec::new())
    }

    pub fn insert(&mut self, index: usize, token: Token<N>) -> Result<()> {
        self.splice(index..index, vec![token])
    }

    pub fn remove(&mut self, index: usize) -> Result<Token<N>> {
        let removed = self.token_at(index)?.clone();
        self.splice(index..index + 1, Vec::new())?;
        Ok(removed)
    }

    pub fn replace(&mut self, index: usize, token: Token<N>) -> Result<Token<N>> {
        let replaced = self.token_at(index)?.clone();
        self.splice(index..index + 1, vec![token])?;
        Ok(replaced)
    }

    /// Replace `range` with `tokens` as one mutation.
    pub fn splice(&mut self, range: Range<usize>, tokens: Vec<Token<N>>) -> Result<()> {
        if range.start > range.end || range.end > self.tokens.len() {
            return Err(HybridError::TokenIndexOutOfBounds {
                index: range.end,
                len: self.tokens.len(),
            });
        }
        self.views.splice(range.clone(), &tokens);
        self.tokens.splice(range, tokens);
        self.tokens_changed()
    }

    fn token_at(&self, index: usize) -> Result<&Token<N>> {
        self.tokens
            .get(index)
            .ok_or(HybridError::TokenIndexOutOfBounds {
                index,
                len: self.tokens.len(),
            })
    }
}
