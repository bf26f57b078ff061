//! Reflection helpers built on top of dispatch.
//!
//! These take boxed argument lists so they can be registered as variadic
//! candidates (`bind`, `call_exists`) as well as called natively.

use mica_types::TypeInfo;
use mica_value::{arity_mismatch, type_mismatch, BoxedValue, DispatchError, DispatchResult};

use crate::context::DispatchContext;
use crate::function::ProxyFunction;

/// `bind(f, a1, ..., an)`: partially apply the callable in `params[0]`.
///
/// Requires the callable plus at least one value to bind.
pub fn bind_function(params: &[BoxedValue]) -> DispatchResult<ProxyFunction> {
    match params {
        [callee, bound @ ..] if !bound.is_empty() => {
            let function = callee.cast::<ProxyFunction>()?;
            ProxyFunction::bound(function, bound.to_vec())
        }
        _ => Err(arity_mismatch(params.len(), 2)),
    }
}

/// `call_exists(f, args...)`: whether `f` would accept `args`.
pub fn call_exists(params: &[BoxedValue], ctx: &DispatchContext) -> DispatchResult<bool> {
    match params {
        [callee, args @ ..] => {
            let function = callee.cast::<ProxyFunction>()?;
            Ok(function.call_match(args, ctx))
        }
        [] => Err(arity_mismatch(0, 1)),
    }
}

pub fn has_guard(function: &ProxyFunction) -> bool {
    function.guard().is_some()
}

/// The guard of a Dynamic callable. Fails for anything else.
pub fn get_guard(function: &ProxyFunction) -> DispatchResult<ProxyFunction> {
    function.guard().cloned().ok_or(DispatchError::GuardAbsent)
}

/// Rebind a function-valued variable to `rhs` without copying the callable.
///
/// Allowed when `lhs` is undefined, or holds a non-const `ProxyFunction`.
pub fn ptr_assign(lhs: &BoxedValue, rhs: &ProxyFunction) -> DispatchResult<BoxedValue> {
    let target = lhs.get_type_info();
    let compatible = lhs.is_undef()
        || (!target.is_const() && target.bare_equal(&TypeInfo::of::<ProxyFunction>()));
    if !compatible {
        return Err(type_mismatch("type mismatch in pointer assignment"));
    }
    lhs.assign(&BoxedValue::shared(rhs.clone()))?;
    Ok(lhs.clone())
}
