//! Script-level introspection of functions, values and type descriptors.

use mica_dispatch::helpers::{get_guard, has_guard, ptr_assign};
use mica_dispatch::{from_fn, from_try_fn, ProxyFunction, Registry};
use mica_types::TypeInfo;
use mica_value::{type_match, BoxedValue};

use crate::native::{native, pair};

/// `get_arity`, `get_annotation`, `call`, `==`, `get_param_types`,
/// `get_contained_functions`, `has_guard` and `get_guard`.
pub(crate) fn register_functions(registry: &mut Registry) {
    registry
        .add("Function", TypeInfo::of::<ProxyFunction>())
        .add("get_arity", from_fn(|f: ProxyFunction| f.arity().as_i32()))
        .add(
            "get_annotation",
            from_fn(|f: ProxyFunction| f.annotation().to_string()),
        )
        .add("call", call())
        .add("==", from_fn(|a: ProxyFunction, b: ProxyFunction| a == b))
        .add(
            "get_param_types",
            from_fn(|f: ProxyFunction| {
                f.parameter_types()
                    .into_iter()
                    .map(BoxedValue::new_const)
                    .collect::<Vec<_>>()
            }),
        )
        .add(
            "get_contained_functions",
            from_fn(|f: ProxyFunction| {
                f.contained_functions()
                    .into_iter()
                    .map(BoxedValue::new_const)
                    .collect::<Vec<_>>()
            }),
        )
        .add("has_guard", from_fn(|f: ProxyFunction| has_guard(&f)))
        .add("get_guard", from_try_fn(|f: ProxyFunction| get_guard(&f)));
}

/// `call(f, args)`: invoke `f` with a script vector of arguments.
fn call() -> ProxyFunction {
    native(
        &[
            TypeInfo::of::<ProxyFunction>(),
            TypeInfo::of::<Vec<BoxedValue>>(),
        ],
        TypeInfo::of::<BoxedValue>(),
        |ctx, args| {
            let (function, params) = pair(args)?;
            let function = function.cast::<ProxyFunction>()?;
            let params = params.cast::<Vec<BoxedValue>>()?;
            function.call(&params, ctx)
        },
    )
}

/// `clone` and `=` for function-valued variables. Both share the callable.
pub(crate) fn register_function_variables(registry: &mut Registry) {
    registry
        .add("clone", from_fn(|f: ProxyFunction| f))
        .add(
            "=",
            native(
                &[TypeInfo::of::<BoxedValue>(), TypeInfo::of::<ProxyFunction>()],
                TypeInfo::of::<BoxedValue>(),
                |_, args| {
                    let (lhs, rhs) = pair(args)?;
                    ptr_assign(lhs, &rhs.cast::<ProxyFunction>()?)
                },
            ),
        );
}

/// `is_var_*` queries, `is_type`, `get_type_info`.
pub(crate) fn register_values(registry: &mut Registry) {
    registry
        .add("is_var_undef", from_fn(|v: BoxedValue| v.is_undef()))
        .add("is_var_null", from_fn(|v: BoxedValue| v.is_null()))
        .add("is_var_const", from_fn(|v: BoxedValue| v.is_const()))
        .add("is_var_reference", from_fn(|v: BoxedValue| v.is_ref()))
        .add("is_var_pointer", from_fn(|v: BoxedValue| v.is_pointer()))
        .add(
            "is_type",
            from_fn(|v: BoxedValue, type_info: TypeInfo| v.is_type(&type_info)),
        )
        .add("get_type_info", from_fn(|v: BoxedValue| v.get_type_info()));
}

pub(crate) fn register_type_match(registry: &mut Registry) {
    registry.add(
        "type_match",
        from_fn(|a: BoxedValue, b: BoxedValue| type_match(&a, &b)),
    );
}

/// Queries on `Type_Info` values.
pub(crate) fn register_type_info(registry: &mut Registry) {
    registry
        .add("Type_Info", TypeInfo::of::<TypeInfo>())
        .add("==", from_fn(|a: TypeInfo, b: TypeInfo| a == b))
        .add("bare_equal", from_fn(|a: TypeInfo, b: TypeInfo| a.bare_equal(&b)))
        .add("is_type_const", from_fn(|t: TypeInfo| t.is_const()))
        .add("is_type_reference", from_fn(|t: TypeInfo| t.is_reference()))
        .add("is_type_void", from_fn(|t: TypeInfo| t.is_void()))
        .add("is_type_undef", from_fn(|t: TypeInfo| t.is_undef()))
        .add("is_type_pointer", from_fn(|t: TypeInfo| t.is_pointer()))
        .add("cpp_name", from_fn(|t: TypeInfo| t.name()))
        .add("cpp_bare_name", from_fn(|t: TypeInfo| t.bare_name().to_string()))
        .add("name", from_fn(|t: TypeInfo| t.name()))
        .add("bare_name", from_fn(|t: TypeInfo| t.bare_name().to_string()));
}

#[cfg(test)]
mod tests;
