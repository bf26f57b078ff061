//! Error types for boxing, numeric promotion and dispatch.
//!
//! `DispatchError` is the single error surfaced by every layer of the
//! runtime. Factory functions (e.g. `arity_mismatch()`) are the construction
//! API; they keep message wording consistent across crates.
//!
//! Signature mismatches and failed guards are *not* errors during overload
//! resolution: dispatch simply moves on to the next candidate. Only
//! exhaustion of an overload set becomes `NoMatchingOverload`.

use crate::BoxedValue;

/// Result of a boxed operation. Defaults to producing a `BoxedValue`.
pub type DispatchResult<T = BoxedValue> = Result<T, DispatchError>;

/// Errors raised by the value and dispatch layers.
#[derive(Clone, Debug, thiserror::Error)]
pub enum DispatchError {
    /// Wrong number of arguments for a fixed-arity callable or helper.
    #[error("incorrect number of parameters: got {actual}, expected {expected}")]
    Arity { actual: usize, expected: usize },

    /// Boxed assignment to an incompatible/const target, or a failed cast.
    #[error("bad boxed cast: {message}")]
    TypeMismatch { message: String },

    /// Integer-only compound operator applied to a floating operand.
    #[error("{op} only valid for integer types")]
    IntegerOnlyOperator { op: &'static str },

    /// Name not present in the registry.
    #[error("no such function: {name}")]
    NoSuchFunction { name: String },

    /// Name present, but no candidate accepted the arguments.
    #[error("no matching overload for `{name}`; tried: {}", .candidates.join("; "))]
    NoMatchingOverload {
        name: String,
        candidates: Vec<String>,
    },

    /// `get_guard` on a candidate without a guard.
    #[error("function does not have a guard")]
    GuardAbsent,

    /// Direct call of a guarded function whose guard rejected the arguments.
    #[error("guard rejected the arguments")]
    GuardFailed,

    /// Integer overflow, division by zero, out-of-range shift.
    #[error("arithmetic error: {message}")]
    Arithmetic { message: String },

    /// String to native conversion failed.
    #[error("cannot convert {input:?} to {type_name}")]
    Parse {
        input: String,
        type_name: &'static str,
    },

    /// Nested calls exceeded the configured limit.
    #[error("maximum call depth exceeded (limit: {limit})")]
    CallDepthExceeded { limit: usize },

    /// `eval` was requested but no evaluator is attached.
    #[error("no script evaluator is attached")]
    NoEvaluator,

    /// The attached evaluator failed.
    #[error("script evaluation failed: {message}")]
    Eval { message: String },

    /// A script-level `throw`; carries the thrown value.
    #[error("uncaught script exception: {0:?}")]
    Thrown(BoxedValue),
}

impl DispatchError {
    /// Box this error so script code can catch and inspect it.
    ///
    /// A thrown value unboxes to itself rather than to a wrapper.
    pub fn into_script_value(self) -> BoxedValue {
        match self {
            DispatchError::Thrown(value) => value,
            other => BoxedValue::new(other),
        }
    }

    /// Whether dispatch may treat this failure as "try the next candidate".
    pub fn is_signature_failure(&self) -> bool {
        matches!(
            self,
            DispatchError::Arity { .. } | DispatchError::TypeMismatch { .. }
        )
    }
}

pub fn arity_mismatch(actual: usize, expected: usize) -> DispatchError {
    DispatchError::Arity { actual, expected }
}

pub fn type_mismatch(message: impl Into<String>) -> DispatchError {
    DispatchError::TypeMismatch {
        message: message.into(),
    }
}

/// Failed cast of a boxed value to a native type.
pub fn bad_cast(from: &str, to: &str) -> DispatchError {
    type_mismatch(format!("cannot convert {from} to {to}"))
}

pub fn integer_only(op: &'static str) -> DispatchError {
    DispatchError::IntegerOnlyOperator { op }
}

pub fn no_such_function(name: impl Into<String>) -> DispatchError {
    DispatchError::NoSuchFunction { name: name.into() }
}

pub fn no_matching_overload(name: impl Into<String>, candidates: Vec<String>) -> DispatchError {
    DispatchError::NoMatchingOverload {
        name: name.into(),
        candidates,
    }
}

pub fn integer_overflow(op: &str) -> DispatchError {
    DispatchError::Arithmetic {
        message: format!("integer overflow in {op}"),
    }
}

pub fn division_by_zero() -> DispatchError {
    DispatchError::Arithmetic {
        message: "division by zero".to_string(),
    }
}

pub fn shift_out_of_range(amount: i64) -> DispatchError {
    DispatchError::Arithmetic {
        message: format!("shift amount {amount} out of range"),
    }
}

pub fn parse_error(input: impl Into<String>, type_name: &'static str) -> DispatchError {
    DispatchError::Parse {
        input: input.into(),
        type_name,
    }
}

pub fn eval_error(message: impl Into<String>) -> DispatchError {
    DispatchError::Eval {
        message: message.into(),
    }
}
