use thiserror::Error;

/// Failures surfaced by the synchronization engine.
///
/// Parse failures and ambiguous completions are not errors: the former is
/// tracked as `valid == false` on the editor and the latter falls back to an
/// error token. Everything here is a contract violation the caller must see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HybridError {
    #[error("printer produced {printed} tokens for a value parsed from {tokens} tokens")]
    PrinterParserMismatch { printed: usize, tokens: usize },

    #[error("restore_state called while a restore is already in progress")]
    ReentrantRestore,

    #[error("{operation} is not supported in a {context} completion context")]
    UnsupportedContext {
        operation: &'static str,
        context: &'static str,
    },

    #[error("token index {index} is out of bounds for {len} tokens")]
    TokenIndexOutOfBounds { index: usize, len: usize },
}

pub type Result<T, E = HybridError> = std::result::Result<T, E>;
