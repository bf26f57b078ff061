//! `Dynamic_Object` construction and attribute access.
//!
//! `clone` is defined in script when an evaluator is attached, in terms of
//! the primitives registered here plus `bind`; otherwise a native clone
//! with the same semantics is registered.

use mica_dispatch::{constructor, Registry};
use mica_types::TypeInfo;
use mica_value::{AttrMap, BoxedValue, DispatchResult, DynamicObject};

use crate::native::{native, pair, single};
use crate::BootstrapConfig;

/// Script definition of `Dynamic_Object::clone`.
pub const CLONE_SOURCE: &str = "def Dynamic_Object::clone() { \
    var new_o := Dynamic_Object(this.get_type_name()); \
    for_each(this.get_attrs(), bind(fun(new_o, x) { new_o.get_attr(x.first) = x.second; }, new_o, _)); \
    return new_o; \
}";

pub(crate) fn register(registry: &mut Registry, config: &BootstrapConfig) -> DispatchResult<()> {
    let object = TypeInfo::of::<DynamicObject>();
    registry
        .add("Dynamic_Object", object)
        .add(
            "Dynamic_Object",
            constructor(|type_name: String| DynamicObject::new(type_name)),
        )
        .add(
            "get_type_name",
            native(&[object], TypeInfo::of::<String>(), |_, args| {
                single(args)?
                    .with_ref(|o: &DynamicObject| o.get_type_name().to_string())
                    .map(BoxedValue::new)
            }),
        )
        .add(
            "get_attrs",
            native(&[object], TypeInfo::of::<AttrMap>(), |_, args| {
                single(args)?
                    .with_ref(|o: &DynamicObject| o.get_attrs().clone())
                    .map(BoxedValue::new)
            }),
        )
        .add(
            "get_attr",
            native(
                &[object, TypeInfo::of::<String>()],
                TypeInfo::of::<BoxedValue>(),
                |_, args| {
                    let (target, name) = pair(args)?;
                    let name = name.cast::<String>()?;
                    target.with_mut(|o: &mut DynamicObject| o.get_attr(&name))
                },
            ),
        );

    if config.script_clone() && registry.has_evaluator() {
        registry.eval(CLONE_SOURCE)?;
    } else {
        registry.add(
            "clone",
            native(&[object], object, |_, args| {
                single(args)?
                    .with_ref(DynamicObject::clone_object)
                    .map(BoxedValue::new)
            }),
        );
    }
    Ok(())
}
