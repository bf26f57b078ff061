//! Exception values scripts can throw, catch and inspect.
//!
//! `exception` is the root; `runtime_error` and `dispatch_error` (a boxed
//! [`DispatchError`]) are registered as derived from it, so `what` accepts
//! all three.

use mica_dispatch::{constructor, from_fn, from_try_fn, BaseClass, Registry};
use mica_types::TypeInfo;
use mica_value::{BoxedValue, DispatchError, DispatchResult};

/// Root of the script exception hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Exception {
    message: String,
}

impl Exception {
    pub fn new(message: impl Into<String>) -> Self {
        Exception {
            message: message.into(),
        }
    }

    pub fn what(&self) -> &str {
        &self.message
    }
}

/// Error raised by script code through `runtime_error("...")`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuntimeError {
    message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        RuntimeError {
            message: message.into(),
        }
    }

    pub fn what(&self) -> &str {
        &self.message
    }
}

impl From<RuntimeError> for Exception {
    fn from(error: RuntimeError) -> Self {
        Exception::new(error.message)
    }
}

impl From<DispatchError> for Exception {
    fn from(error: DispatchError) -> Self {
        Exception::new(error.to_string())
    }
}

mica_value::impl_native_value!(Exception, RuntimeError);

/// `throw(value)`: unwind with `value` as the error payload.
pub fn throw(value: BoxedValue) -> DispatchResult<()> {
    Err(DispatchError::Thrown(value))
}

pub(crate) fn register(registry: &mut Registry) {
    registry
        .add("exception", TypeInfo::of::<Exception>())
        .add("runtime_error", TypeInfo::of::<RuntimeError>())
        .add("dispatch_error", TypeInfo::of::<DispatchError>())
        .add("", BaseClass::new::<Exception, RuntimeError>())
        .add("", BaseClass::new::<Exception, DispatchError>())
        .add("runtime_error", constructor(|message: String| RuntimeError::new(message)))
        .add("what", from_fn(|error: Exception| error.what().to_string()))
        .add("throw", from_try_fn(throw));
}
