//! Candidates that operate on argument handles.
//!
//! Typed closures registered with `from_fn` receive their arguments by
//! value. Operators that mutate their left operand (`=`, `+=`, `++`) take
//! the handle instead and write through it, while still declaring a typed
//! parameter so dispatch selects them by type.

use mica_dispatch::{DispatchContext, NativeFunction, ParamTypes, ProxyFunction};
use mica_types::TypeInfo;
use mica_value::{arity_mismatch, BoxedValue, DispatchResult};

/// A plain candidate with explicit parameter types and a handle-level body.
pub(crate) fn native(
    params: &[TypeInfo],
    return_type: TypeInfo,
    body: impl Fn(&DispatchContext, &[BoxedValue]) -> DispatchResult + Send + Sync + 'static,
) -> ProxyFunction {
    ProxyFunction::native(NativeFunction::new(
        ParamTypes::from_slice(params),
        return_type,
        body,
    ))
}

/// Split a two-argument list. Dispatch has already checked the count.
pub(crate) fn pair(args: &[BoxedValue]) -> DispatchResult<(&BoxedValue, &BoxedValue)> {
    match args {
        [lhs, rhs] => Ok((lhs, rhs)),
        _ => Err(arity_mismatch(args.len(), 2)),
    }
}

pub(crate) fn single(args: &[BoxedValue]) -> DispatchResult<&BoxedValue> {
    match args {
        [value] => Ok(value),
        _ => Err(arity_mismatch(args.len(), 1)),
    }
}

/// `lhs = rhs` for two values of `type_info`; returns the updated `lhs`.
pub(crate) fn assign(type_info: TypeInfo) -> ProxyFunction {
    native(
        &[type_info, type_info],
        type_info.with_reference(),
        |_, args| {
            let (target, source) = pair(args)?;
            target.assign(source)?;
            Ok(target.clone())
        },
    )
}
