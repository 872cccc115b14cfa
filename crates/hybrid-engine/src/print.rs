//! # Printing
//!
//! A pretty printer turns a region value back into tokens. While printing it
//! also records *which node owns which token*, producing a [`ParseNode`]
//! tree whose leaves, read in order, are exactly the printed tokens.
//!
//! [`PrintContext`] is built the way rowan's `GreenNodeBuilder` is:
//!
//! ```text
//! start_node(Plus)         ← open a child node for a sub-value
//!   token(a)
//!   token(+)
//!   token(b)
//! finish_node()            ← close it
//! ```
//!
//! The root node is opened by [`print_value`] for the value being printed,
//! so a printer only opens nodes for nested sub-values.

use std::ops::Range;

use crate::change::ChangeSource;
use crate::spec::HybridEditorSpec;
use crate::token::{Token, TokenValue};

/// A node of the printed tree: the value it was printed from and its children.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode<N> {
    value: N,
    children: Vec<ParseChild<N>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseChild<N> {
    Token(Token<N>),
    Node(ParseNode<N>),
}

impl<N: TokenValue> ParseNode<N> {
    pub fn new(value: N) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    pub fn value(&self) -> &N {
        &self.value
    }

    pub fn children(&self) -> &[ParseChild<N>] {
        &self.children
    }

    pub fn token_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                ParseChild::Token(_) => 1,
                ParseChild::Node(node) => node.token_count(),
            })
            .sum()
    }

    /// Leaf tokens in document order.
    pub fn tokens(&self) -> Vec<&Token<N>> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token<N>>) {
        for child in &self.children {
            match child {
                ParseChild::Token(token) => out.push(token),
                ParseChild::Node(node) => node.collect_tokens(out),
            }
        }
    }

    /// For every leaf token, the value of the node that directly owns it.
    pub fn objects(&self) -> Vec<&N> {
        let mut out = Vec::new();
        self.collect_objects(&mut out);
        out
    }

    fn collect_objects<'a>(&'a self, out: &mut Vec<&'a N>) {
        for child in &self.children {
            match child {
                ParseChild::Token(_) => out.push(&self.value),
                ParseChild::Node(node) => node.collect_objects(out),
            }
        }
    }

    /// Token ranges covered by this node and every descendant, in pre-order.
    pub fn node_ranges(&self) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        self.collect_ranges(0, &mut out);
        out
    }

    fn collect_ranges(&self, start: usize, out: &mut Vec<Range<usize>>) -> usize {
        let slot = out.len();
        out.push(start..start);
        let mut end = start;
        for child in &self.children {
            end = match child {
                ParseChild::Token(_) => end + 1,
                ParseChild::Node(node) => node.collect_ranges(end, out),
            };
        }
        out[slot] = start..end;
        end
    }
}

/// Output of one print pass.
#[derive(Debug)]
pub struct Printed<N> {
    pub tokens: Vec<Token<N>>,
    pub tree: ParseNode<N>,
    pub changes: Vec<ChangeSource>,
}

pub struct PrintContext<N> {
    root: ParseNode<N>,
    open: Vec<ParseNode<N>>,
    tokens: Vec<Token<N>>,
    changes: Vec<ChangeSource>,
}

impl<N: TokenValue> PrintContext<N> {
    fn new(root: N) -> Self {
        Self {
            root: ParseNode::new(root),
            open: Vec::new(),
            tokens: Vec::new(),
            changes: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut ParseNode<N> {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    pub fn start_node(&mut self, value: N) {
        self.open.push(ParseNode::new(value));
    }

    pub fn finish_node(&mut self) {
        match self.open.pop() {
            Some(node) => self.current().children.push(ParseChild::Node(node)),
            None => debug_assert!(false, "finish_node without a matching start_node"),
        }
    }

    /// Print `value` as a child node using `f` for its contents.
    pub fn node(&mut self, value: N, f: impl FnOnce(&mut Self)) {
        self.start_node(value);
        f(self);
        self.finish_node();
    }

    pub fn token(&mut self, token: Token<N>) {
        self.tokens.push(token.clone());
        self.current().children.push(ParseChild::Token(token));
    }

    /// Ask the editor to reprint when `source` fires.
    pub fn watch(&mut self, source: &ChangeSource) {
        self.changes.push(source.clone());
    }

    fn finish(mut self) -> Printed<N> {
        while !self.open.is_empty() {
            self.finish_node();
        }
        Printed {
            tokens: self.tokens,
            tree: self.root,
            changes: self.changes,
        }
    }
}

/// Print `value` with the spec's pretty printer.
pub fn print_value<N: TokenValue>(spec: &dyn HybridEditorSpec<N>, value: &N) -> Printed<N> {
    let mut ctx = PrintContext::new(value.clone());
    spec.print(value, &mut ctx);
    ctx.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{Sum, SumSpec, id, inc, num, plus};
    use pretty_assertions::assert_eq;

    fn sum() -> Sum {
        Sum::Add(vec![
            Sum::Var("a".into()),
            Sum::Inc(Box::new(Sum::Var("b".into()))),
            Sum::Num(3),
        ])
    }

    #[test]
    fn printed_tokens_match_tree_leaves() {
        let printed = print_value(&SumSpec::default(), &sum());

        assert_eq!(
            printed.tokens,
            vec![id("a"), plus(), id("b"), inc(), plus(), num(3)]
        );
        let leaves: Vec<Token<Sum>> = printed.tree.tokens().into_iter().cloned().collect();
        assert_eq!(leaves, printed.tokens);
        assert_eq!(printed.tree.token_count(), 6);
    }

    #[test]
    fn objects_align_with_tokens() {
        let printed = print_value(&SumSpec::default(), &sum());
        let objects = printed.tree.objects();

        assert_eq!(objects.len(), printed.tokens.len());
        assert_eq!(objects[0], &Sum::Var("a".into()));
        assert_eq!(objects[1], &sum());
        assert_eq!(objects[3], &Sum::Inc(Box::new(Sum::Var("b".into()))));
    }

    #[test]
    fn node_ranges_cover_subtrees() {
        let printed = print_value(&SumSpec::default(), &sum());

        assert_eq!(
            printed.tree.node_ranges(),
            vec![0..6, 0..1, 2..4, 2..3, 5..6]
        );
    }

    #[test]
    fn unfinished_nodes_are_closed() {
        let mut ctx = PrintContext::new(Sum::Num(0));
        ctx.start_node(Sum::Num(1));
        ctx.token(num(1));
        let printed = ctx.finish();

        assert_eq!(printed.tree.children().len(), 1);
        assert_eq!(printed.tree.token_count(), 1);
    }
}
