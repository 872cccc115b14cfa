//! The language-specific half of a hybrid editor.
//!
//! A [`HybridEditorSpec`] bundles the contracts the engine calls into: parse
//! tokens to a value, print a value to tokens, tokenize pasted text, propose
//! completions and recognise bracket pairs. The spec can be swapped at
//! runtime with [`TokenListEditor::set_spec`](crate::editing::TokenListEditor::set_spec).

use crate::completion::{
    AsyncCompletion, CompletionContext, CompletionItem, CompletionItems, CompletionParameters,
};
use crate::print::PrintContext;
use crate::token::{Token, TokenValue};

pub trait HybridEditorSpec<N: TokenValue> {
    /// Parse a copy of the token list, `None` when it is not a valid value.
    fn parse(&self, tokens: Vec<Token<N>>) -> Option<N>;

    fn print(&self, value: &N, ctx: &mut PrintContext<N>);

    fn token_completion(
        &self,
        ctx: &CompletionContext<'_, N>,
        params: CompletionParameters,
    ) -> Vec<CompletionItem<N>>;

    /// Extra proposals, only requested for menu completion.
    fn additional_completion(
        &self,
        _ctx: &CompletionContext<'_, N>,
        _params: CompletionParameters,
    ) -> Vec<CompletionItem<N>> {
        Vec::new()
    }

    /// Proposals that arrive later, only requested for menu completion.
    fn additional_completion_async(
        &self,
        _ctx: &CompletionContext<'_, N>,
        _params: CompletionParameters,
    ) -> AsyncCompletion<N> {
        AsyncCompletion::ready(Vec::new())
    }

    fn tokenize(&self, text: &str) -> Vec<Token<N>> {
        let ctx = CompletionContext::unsupported();
        let items = CompletionItems::new(self.token_completion(&ctx, CompletionParameters::EMPTY));
        tokenize_with_completion(&items, text)
    }

    fn is_pair_left(&self, _token: &Token<N>) -> bool {
        false
    }

    fn is_pair_right(&self, _token: &Token<N>) -> bool {
        false
    }

    fn is_pair(&self, _left: &Token<N>, _right: &Token<N>) -> bool {
        false
    }
}

/// Split `text` on whitespace, then cut each word greedily into the longest
/// prefixes that resolve to exactly one completion. Leftovers become error
/// tokens.
pub fn tokenize_with_completion<N: TokenValue>(
    items: &CompletionItems<N>,
    text: &str,
) -> Vec<Token<N>> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            let ends: Vec<usize> = rest.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
            let longest = ends
                .iter()
                .rev()
                .find_map(|&end| items.resolve(&rest[..end]).map(|resolved| (end, resolved)));
            match longest {
                Some((end, resolved)) => {
                    tokens.extend(resolved);
                    rest = &rest[end..];
                }
                None => {
                    tokens.push(Token::Error(rest.to_string()));
                    break;
                }
            }
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{Sum, SumSpec, id, inc, mul, num, plus};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", vec![])]
    #[case("a+b", vec![id("a"), plus(), id("b")])]
    #[case("x++ + 12", vec![id("x"), inc(), plus(), num(12)])]
    #[case("2*3", vec![num(2), mul(), num(3)])]
    #[case("a $ b", vec![id("a"), Token::error("$"), id("b")])]
    #[case("a$b", vec![id("a"), Token::error("$b")])]
    fn greedy_tokenize(#[case] text: &str, #[case] expected: Vec<Token<Sum>>) {
        assert_eq!(SumSpec::default().tokenize(text), expected);
    }
}
