//! Centralised error hierarchy for the **heartlisp interpreter**.
//!
//! Every subsystem (scanner, parser, evaluator, native functions, CLI) reports
//! failure through one of the variants defined here.  Errors are plain values:
//! the evaluator propagates the first one it meets unchanged with `?` and never
//! pairs an error with a partial result.
//!
//! Two families live side by side:
//!
//! * **language errors** (`UnboundName`, `Arity`, `NotCallable`, `Definition`,
//!   `Native`, `DepthExceeded`, `Parse`) describe mistakes in the program;
//! * **internal faults** (`UnknownExpression`) mean the parser handed the
//!   evaluator a node it has no semantics for.  See [`LangError::is_internal`].
//!
//! Loading source text adds two transparent wrappers, `Io` and `Utf8`, used
//! by [`crate::source`].  The module **does not** print diagnostics itself.

use std::io;

use thiserror::Error;

use log::info;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LangError {
    /// Identifier absent from every scope between the current one and the global scope.
    #[error("Runtime error: unbound name '{name}'")]
    UnboundName { name: String },

    /// Argument count differs from the declared parameter / field count.
    #[error("Runtime error: {callee} expects {expected} argument(s) but got {got}")]
    Arity {
        /// Human‑readable description of what was called.
        callee: String,
        expected: usize,
        got: usize,
    },

    /// Dispatch attempted on a value that is neither a function nor a native function.
    #[error("Runtime error: value of type {type_name} is not callable")]
    NotCallable { type_name: &'static str },

    /// Malformed declaration, e.g. a class with duplicate field names.
    #[error("Definition error: {message}")]
    Definition { message: String },

    /// A host (native) function rejected its input.
    #[error("Runtime error: {message}")]
    Native { message: String },

    /// User‑level recursion went deeper than the configured limit.
    #[error("Runtime error: maximum call depth of {limit} exceeded")]
    DepthExceeded { limit: usize },

    /// The evaluator met an AST node it has no semantics for.
    #[error("internal error: unknown expression encountered ({form})")]
    UnknownExpression { form: String },

    /// Syntactic (parser) error.  `token` is the index of the offending token.
    #[error("[token {token}] Parse error: {message}")]
    Parse { message: String, token: usize },

    /// Wrapper for I/O errors while loading a program.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Program text is not valid UTF‑8.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

impl LangError {
    /// Helper constructor for lookup failures.
    pub fn unbound<S: Into<String>>(name: S) -> Self {
        let name: String = name.into();

        info!("Creating UnboundName error: name={}", name);

        LangError::UnboundName { name }
    }

    /// Helper constructor for arity mismatches.
    pub fn arity<S: Into<String>>(callee: S, expected: usize, got: usize) -> Self {
        let callee: String = callee.into();

        info!(
            "Creating Arity error: callee={}, expected={}, got={}",
            callee, expected, got
        );

        LangError::Arity {
            callee,
            expected,
            got,
        }
    }

    pub fn definition<S: Into<String>>(msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Definition error: msg={}", message);

        LangError::Definition { message }
    }

    /// Helper constructor for failures raised inside native functions.
    pub fn native<S: Into<String>>(msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Native error: msg={}", message);

        LangError::Native { message }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: token={}, msg={}", token, message);

        LangError::Parse { message, token }
    }

    /// `true` for engine faults (parser/evaluator skew), `false` for
    /// ordinary errors in the user's program.
    pub fn is_internal(&self) -> bool {
        matches!(self, LangError::UnknownExpression { .. })
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LangError>;
