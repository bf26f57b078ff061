//! Callables and overload resolution for the Mica runtime.
//!
//! # Architecture
//!
//! - [`ProxyFunction`]: shareable callable (plain, constructor, bound,
//!   dynamic, or an overload set)
//! - [`Registry`]: name to overload set, plus type names and base classes
//! - [`DispatchContext`]: limits and base-class table threaded through calls
//! - [`from_fn`] / [`from_try_fn`] / [`constructor`]: typed registration of
//!   Rust closures
//! - [`helpers`]: `bind`, `call_exists`, guard inspection, pointer assignment
//!
//! Resolution walks candidates in registration order and invokes the first
//! that accepts the arguments; see [`OverloadSet::dispatch`].

mod context;
mod conversions;
mod function;
pub mod helpers;
mod native_fn;
mod overload;
mod registry;

pub use context::{DispatchContext, DispatchLimits, DEFAULT_MAX_CALL_DEPTH};
pub use conversions::{upcast_via_into, BaseClass, SharedConversions, TypeConversions, UpcastFn};
pub use function::{
    Arity, BoundFunction, DynamicFunction, FunctionKind, NativeBody, NativeFunction, ParamTypes,
    Placeholder, ProxyFunction,
};
pub use native_fn::{constructor, from_fn, from_try_fn, IntoFallibleNative, IntoNative};
pub use overload::OverloadSet;
pub use registry::{Entity, Evaluator, Registry, RegistryBuilder};
