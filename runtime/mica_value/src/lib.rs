//! Boxed values for the Mica runtime.
//!
//! - [`BoxedValue`]: type-erased value handle with ownership tracking
//! - [`BoxedNumeric`]: numeric view with promotion rules
//! - [`DynamicObject`]: script-defined object with named attributes
//! - [`FromBoxed`] / [`IntoBoxed`]: native argument and return conversions
//! - [`pod`]: numeric POD traits and compound-assignment helpers

mod boxed_numeric;
mod boxed_value;
mod dynamic_object;
mod errors;
mod native;
pub mod pod;

pub use boxed_numeric::BoxedNumeric;
pub use boxed_value::{type_match, AnyValue, BoxedValue, Ownership};
pub use dynamic_object::{AttrMap, DynamicObject};
pub use errors::{
    arity_mismatch, bad_cast, division_by_zero, eval_error, integer_only, integer_overflow,
    no_matching_overload, no_such_function, parse_error, shift_out_of_range, type_mismatch,
    DispatchError, DispatchResult,
};
pub use mica_types::{TypeFlags, TypeInfo};
pub use native::{FromBoxed, IntoBoxed};
pub use pod::{IntegerPod, Pod};
