//! Evaluator error types.

use thiserror::Error;

/// Errors produced while evaluating a formula.
///
/// Formulas come from skill definitions, so every failure mode carries
/// enough context for an author-facing message.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FormulaError {
    /// The expression is malformed: unknown character, mismatched
    /// parentheses, an operator run, or trailing tokens after a full parse.
    #[error("syntax error at position {pos}: unexpected `{token}`")]
    Syntax {
        /// Byte offset of the offending token in the expression.
        pos: usize,
        /// The token text, or `<end>` when input ran out.
        token: String,
    },

    /// An identifier resolved to nothing in the variable context.
    #[error("unknown variable `{name}`")]
    UnknownVariable {
        /// The unresolved name.
        name: String,
    },

    /// Division or modulo by exactly zero.
    #[error("arithmetic error: {op} by zero")]
    Arithmetic {
        /// Which operation failed ("division" or "modulo").
        op: &'static str,
    },
}

impl FormulaError {
    /// Shorthand for a syntax error at a position.
    pub(crate) fn syntax(pos: usize, token: impl Into<String>) -> Self {
        Self::Syntax {
            pos,
            token: token.into(),
        }
    }
}
