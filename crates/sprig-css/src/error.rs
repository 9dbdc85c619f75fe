//! Error types for selector parsing and compilation.

use thiserror::Error;

/// A syntax error in selector text.
///
/// Produced by the tokenizer-driven parser and surfaced unchanged by
/// [`compile_selector_list`](crate::compile_selector_list).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at token {position})")]
pub struct ParseError {
    /// Human readable description.
    pub message: String,
    /// Index of the offending token in the token stream.
    pub position: usize,
}

impl ParseError {
    /// Create a new parse error at `position`.
    #[must_use]
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// A semantic error raised while compiling a parsed selector.
///
/// Every variant is raised before a matcher exists; matching itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A combinator symbol other than `' '`, `'>'`, `'+'` or `'~'`.
    #[error("unknown combinator '{0}'")]
    UnknownCombinator(String),

    /// A pseudo-class (or functional pseudo-class) with no static meaning.
    #[error("unknown pseudo-class ':{0}'")]
    UnknownPseudoClass(String),

    /// An attribute operator other than `=`, `~=`, `|=`, `^=`, `$=` or `*=`.
    #[error("unknown attribute operator '{0}'")]
    UnknownAttributeOperator(String),

    /// Malformed arguments to a functional pseudo-class.
    #[error("invalid arguments for ':{name}()': {reason}")]
    InvalidArguments {
        /// Name of the functional pseudo-class.
        name: String,
        /// What is wrong with the arguments.
        reason: String,
    },

    /// `[*|attr]`: attribute selectors in any namespace are not supported yet.
    #[error("attribute selector '[*|{0}]' in any namespace is not supported yet")]
    AnyNamespaceAttribute(String),
}

/// Any error from turning selector text into compiled selectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector text is not syntactically valid.
    #[error("selector syntax error: {0}")]
    Parse(#[from] ParseError),

    /// The selector parsed but cannot be compiled.
    #[error("selector compile error: {0}")]
    Compile(#[from] CompileError),
}
