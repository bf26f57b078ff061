//! Populating a registry with the built-in surface.
//!
//! Registration order matters: dispatch picks the first candidate that
//! accepts the arguments, so typed POD operators come before the
//! `PODObject` catch-alls. The `=` for undefined targets is guarded and
//! never competes with a typed assignment.

use mica_dispatch::helpers::{bind_function, call_exists};
use mica_dispatch::{constructor, from_fn, Arity, DispatchContext, ProxyFunction, Registry};
use mica_types::TypeInfo;
use mica_value::{BoxedNumeric, BoxedValue, DispatchResult};

use crate::native::{assign, pair};
use crate::{dynamic_objects, exceptions, operators, pod_types, reflection, BootstrapConfig};

/// Register the built-in surface with the default configuration.
pub fn bootstrap(registry: &mut Registry) -> DispatchResult<()> {
    bootstrap_with(registry, &BootstrapConfig::default())
}

/// Register built-in types, operators and reflection into `registry`.
///
/// Fails only if the attached evaluator rejects a script definition.
#[tracing::instrument(level = "debug", skip_all)]
pub fn bootstrap_with(registry: &mut Registry, config: &BootstrapConfig) -> DispatchResult<()> {
    registry
        .add("void", TypeInfo::void())
        .add("bool", TypeInfo::of::<bool>())
        .add("Object", TypeInfo::of::<BoxedValue>())
        .add("PODObject", TypeInfo::of::<BoxedNumeric>())
        .add("Vector", TypeInfo::of::<Vec<BoxedValue>>())
        .add("string", TypeInfo::of::<String>());

    reflection::register_functions(registry);
    exceptions::register(registry);
    dynamic_objects::register(registry, config)?;
    reflection::register_values(registry);
    reflection::register_type_info(registry);
    register_bool(registry);
    register_strings(registry);
    registry.add("=", unknown_assign());
    pod_types::register(registry);
    operators::register(registry);
    register_print(registry, config);
    registry.add("bind", ProxyFunction::dynamic(Arity::Variadic, bind));
    reflection::register_function_variables(registry);
    registry.add(
        "call_exists",
        ProxyFunction::dynamic(Arity::Variadic, call_exists_boxed),
    );
    reflection::register_type_match(registry);

    tracing::debug!(
        functions = registry.function_names().count(),
        script_clone = config.script_clone() && registry.has_evaluator(),
        "bootstrap complete"
    );
    Ok(())
}

fn register_bool(registry: &mut Registry) {
    registry
        .add("bool", constructor(|| false))
        .add("bool", constructor(|value: bool| value))
        .add("=", assign(TypeInfo::of::<bool>()))
        .add("!", from_fn(|value: bool| !value))
        .add("internal_to_string", from_fn(|value: bool| value.to_string()));
}

fn register_strings(registry: &mut Registry) {
    registry
        .add("string", constructor(String::new))
        .add("string", constructor(|value: String| value))
        .add("=", assign(TypeInfo::of::<String>()))
        .add("internal_to_string", from_fn(|value: String| value));
}

fn register_print(registry: &mut Registry, config: &BootstrapConfig) {
    let print = config.print_handler().clone();
    let print_line = config.print_handler().clone();
    registry
        .add("print_string", from_fn(move |text: String| print.print(&text)))
        .add(
            "println_string",
            from_fn(move |text: String| print_line.println(&text)),
        );
}

/// `=` for a target with no type yet: it adopts the source's type.
fn unknown_assign() -> ProxyFunction {
    let target_undefined = from_fn(|lhs: BoxedValue, _rhs: BoxedValue| lhs.is_undef());
    ProxyFunction::guarded(Arity::Fixed(2), target_undefined, |_, args| {
        let (lhs, rhs) = pair(args)?;
        lhs.assign(rhs)?;
        Ok(lhs.clone())
    })
    .annotated("assignment to an undefined variable")
}

fn bind(_: &DispatchContext, params: &[BoxedValue]) -> DispatchResult {
    bind_function(params).map(BoxedValue::new)
}

fn call_exists_boxed(ctx: &DispatchContext, params: &[BoxedValue]) -> DispatchResult {
    call_exists(params, ctx).map(BoxedValue::new)
}
