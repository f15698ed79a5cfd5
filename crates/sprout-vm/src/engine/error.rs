//! Errors that abort a parse or a value computation.

/// Fatal engine error. An input that simply does not match is not an
/// error: it is reported as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("unknown rule `{name}` in grammar `{grammar}`")]
    UnknownRule { grammar: String, name: String },

    #[error("unknown foreign grammar `{0}`")]
    UnknownGrammar(String),

    #[error("rule `{rule}` takes {expected} argument(s) but {found} were supplied")]
    ArityMismatch {
        rule: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Too many operator evaluations.
    #[error("runtime execution limit exceeded ({0} steps)")]
    ExecFuelExhausted(u32),

    /// Rules and operators nested too deeply.
    #[error("runtime recursion limit exceeded ({0} nesting levels)")]
    RecursionLimitExceeded(u32),

    /// A left-recursive growth loop ran longer than the remaining input.
    #[error("left recursion in `{rule}` at offset {pos} stopped making progress")]
    GrowthStalled { rule: String, pos: usize },
}

/// Error raised while resolving a value through a binder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("no action bound for `{0}`")]
    Unbound(String),

    #[error("action `{code}` failed: {message}")]
    Failed { code: String, message: String },
}
