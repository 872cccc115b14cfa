//! SyntaxKind enum for all tokens and nodes in the expression CST.
//!
//! Tokens and nodes share a single enum. Every hybrid token of a region
//! appears as exactly one token in the tree.

/// All syntax kinds for the expression CST.
///
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens ===
    /// Spaces between lexemes of raw text; never reaches the parser
    WHITESPACE,
    /// Variable, call or field name
    IDENT,
    /// Integer literal
    INT,
    /// `+`
    PLUS,
    /// `*`
    STAR,
    /// Postfix `++`
    PLUS_PLUS,
    /// Postfix `!`
    BANG,
    /// `.` for field access
    DOT,
    /// `(` for grouping or calls
    LPAREN,
    /// `)`
    RPAREN,
    /// Embedded value token
    VALUE,
    /// Text that is not a token of the language
    ERROR_TOKEN,
    /// End of file marker
    EOF,

    // === Composite Nodes ===
    /// Root of a region
    ROOT,
    /// `a + b`, `a * b`
    BIN_EXPR,
    /// `a++`, `a!`
    POSTFIX_EXPR,
    /// `(a)`
    PAREN_EXPR,
    /// `f(a)`, `f()`
    CALL_EXPR,
    /// `a.b`
    FIELD_EXPR,
    /// A variable reference
    NAME_REF,
    /// An integer literal
    LITERAL,
    /// An embedded value
    VALUE_EXPR,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token.
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExprLang {}

impl rowan::Language for ExprLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<ExprLang>;
pub type SyntaxToken = rowan::SyntaxToken<ExprLang>;
pub type SyntaxElement = rowan::SyntaxElement<ExprLang>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn token_kinds_are_tokens() {
        assert!(SyntaxKind::IDENT.is_token());
        assert!(SyntaxKind::VALUE.is_token());
        assert!(SyntaxKind::EOF.is_token());
    }

    #[test]
    fn node_kinds_are_nodes() {
        assert!(SyntaxKind::ROOT.is_node());
        assert!(SyntaxKind::BIN_EXPR.is_node());
        assert!(SyntaxKind::ERROR.is_node());
    }

    #[test]
    fn trivia_detection() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(!SyntaxKind::IDENT.is_trivia());
    }

    #[test]
    fn rowan_conversion_roundtrip() {
        let kind = SyntaxKind::CALL_EXPR;
        let raw: rowan::SyntaxKind = kind.into();
        assert_eq!(ExprLang::kind_from_raw(raw), kind);
    }
}
