#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use mica_dispatch::Arity;
use mica_value::DispatchError;
use pretty_assertions::assert_eq;

fn registry() -> Registry {
    let mut registry = Registry::new();
    register_functions(&mut registry);
    register_function_variables(&mut registry);
    register_values(&mut registry);
    register_type_info(&mut registry);
    register_type_match(&mut registry);
    registry
}

fn subtract() -> ProxyFunction {
    from_fn(|a: i32, b: i32| a - b).annotated("a minus b")
}

fn boxed(f: &ProxyFunction) -> BoxedValue {
    BoxedValue::new(f.clone())
}

#[test]
fn arity_and_annotation() {
    let registry = registry();
    let arity = registry.call("get_arity", &[boxed(&subtract())]).unwrap();
    assert_eq!(arity.cast::<i32>().unwrap(), 2);

    let variadic = ProxyFunction::dynamic(Arity::Variadic, |_, _| Ok(BoxedValue::void()));
    let arity = registry.call("get_arity", &[boxed(&variadic)]).unwrap();
    assert_eq!(arity.cast::<i32>().unwrap(), -1);

    let annotation = registry.call("get_annotation", &[boxed(&subtract())]).unwrap();
    assert_eq!(annotation.cast::<String>().unwrap(), "a minus b");
}

#[test]
fn call_takes_an_argument_vector() {
    let registry = registry();
    let args = vec![BoxedValue::new(9_i32), BoxedValue::new(4_i32)];
    let result = registry
        .call("call", &[boxed(&subtract()), BoxedValue::new(args)])
        .unwrap();
    assert_eq!(result.cast::<i32>().unwrap(), 5);

    let err = registry
        .call("call", &[boxed(&subtract()), BoxedValue::new(Vec::<BoxedValue>::new())])
        .unwrap_err();
    assert!(matches!(err, DispatchError::Arity { actual: 0, expected: 2 }));
}

#[test]
fn parameter_types_are_const_type_infos() {
    let registry = registry();
    let types = registry
        .call("get_param_types", &[boxed(&subtract())])
        .unwrap()
        .cast::<Vec<BoxedValue>>()
        .unwrap();
    assert_eq!(types.len(), 2);
    assert!(types.iter().all(BoxedValue::is_const));
    assert_eq!(types[0].cast::<TypeInfo>().unwrap(), TypeInfo::of::<i32>());
}

#[test]
fn contained_functions_of_a_bound_callable() {
    let registry = registry();
    let f = subtract();
    let bound = ProxyFunction::bound(f.clone(), vec![BoxedValue::new(1_i32)]).unwrap();
    let contained = registry
        .call("get_contained_functions", &[boxed(&bound)])
        .unwrap()
        .cast::<Vec<BoxedValue>>()
        .unwrap();
    assert_eq!(contained.len(), 1);
    assert_eq!(contained[0].cast::<ProxyFunction>().unwrap(), f);

    let none = registry
        .call("get_contained_functions", &[boxed(&f)])
        .unwrap()
        .cast::<Vec<BoxedValue>>()
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn plain_functions_report_no_guard() {
    let registry = registry();
    let plain = boxed(&subtract());
    let has = registry.call("has_guard", &[plain.clone()]).unwrap();
    assert!(!has.cast::<bool>().unwrap());
    let err = registry.call("get_guard", &[plain]).unwrap_err();
    assert!(matches!(err, DispatchError::GuardAbsent));
}

#[test]
fn guarded_functions_report_their_guard() {
    let registry = registry();
    let guard = from_fn(|x: i32| x > 0);
    let guarded = ProxyFunction::guarded(Arity::Fixed(1), guard.clone(), |_, args| {
        Ok(args[0].clone())
    });
    let has = registry.call("has_guard", &[boxed(&guarded)]).unwrap();
    assert!(has.cast::<bool>().unwrap());
    let got = registry.call("get_guard", &[boxed(&guarded)]).unwrap();
    assert_eq!(got.cast::<ProxyFunction>().unwrap(), guard);
}

#[test]
fn clone_and_equality_share_the_callable() {
    let registry = registry();
    let f = subtract();
    let copy = registry.call("clone", &[boxed(&f)]).unwrap();
    assert_eq!(copy.cast::<ProxyFunction>().unwrap(), f);

    let same = registry.call("==", &[copy, boxed(&f)]).unwrap();
    assert!(same.cast::<bool>().unwrap());
    let different = registry.call("==", &[boxed(&f), boxed(&subtract())]).unwrap();
    assert!(!different.cast::<bool>().unwrap());
}

#[test]
fn function_variables_rebind_by_pointer_assignment() {
    let registry = registry();
    let variable = BoxedValue::undef();
    let f = subtract();
    registry.call("=", &[variable.clone(), boxed(&f)]).unwrap();
    assert_eq!(variable.cast::<ProxyFunction>().unwrap(), f);
    assert!(variable.is_ref());

    let err = registry
        .call("=", &[BoxedValue::new(1_i32), boxed(&f)])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "bad boxed cast: type mismatch in pointer assignment"
    );
}

#[test]
fn value_queries() {
    let registry = registry();
    let query = |name: &str, value: &BoxedValue| {
        registry
            .call(name, &[value.clone()])
            .unwrap()
            .cast::<bool>()
            .unwrap()
    };
    let undefined = BoxedValue::undef();
    let constant = BoxedValue::new_const(1_i32);
    let shared = BoxedValue::shared(1_i32);
    let pointer = BoxedValue::null_pointer::<i32>();

    assert!(query("is_var_undef", &undefined));
    assert!(query("is_var_null", &undefined));
    assert!(!query("is_var_null", &constant));
    assert!(query("is_var_const", &constant));
    assert!(query("is_var_reference", &shared));
    assert!(!query("is_var_reference", &constant));
    assert!(query("is_var_pointer", &pointer));
    assert!(query("is_var_null", &pointer));
}

#[test]
fn type_queries() {
    let registry = registry();
    let value = BoxedValue::new_const(2.5_f64);
    let info = registry.call("get_type_info", &[value.clone()]).unwrap();
    let type_info = info.cast::<TypeInfo>().unwrap();
    assert!(type_info.is_const());

    let is_double = registry
        .call("is_type", &[value.clone(), BoxedValue::new(TypeInfo::of::<f64>())])
        .unwrap();
    assert!(is_double.cast::<bool>().unwrap());

    let bare = registry
        .call("bare_equal", &[info.clone(), BoxedValue::new(TypeInfo::of::<f64>())])
        .unwrap();
    assert!(bare.cast::<bool>().unwrap());
    let exact = registry
        .call("==", &[info.clone(), BoxedValue::new(TypeInfo::of::<f64>())])
        .unwrap();
    assert!(!exact.cast::<bool>().unwrap());

    let name = registry.call("name", &[info.clone()]).unwrap();
    assert_eq!(name.cast::<String>().unwrap(), "const f64");
    let bare_name = registry.call("bare_name", &[info.clone()]).unwrap();
    assert_eq!(bare_name.cast::<String>().unwrap(), "f64");
    let is_const = registry.call("is_type_const", &[info]).unwrap();
    assert!(is_const.cast::<bool>().unwrap());

    let void = registry
        .call("is_type_void", &[BoxedValue::new(TypeInfo::void())])
        .unwrap();
    assert!(void.cast::<bool>().unwrap());
}

#[test]
fn type_match_ignores_qualifiers() {
    let registry = registry();
    let matched = registry
        .call(
            "type_match",
            &[BoxedValue::new_const(1_i32), BoxedValue::shared(2_i32)],
        )
        .unwrap();
    assert!(matched.cast::<bool>().unwrap());

    let mismatched = registry
        .call("type_match", &[BoxedValue::new(1_i32), BoxedValue::new(1_i64)])
        .unwrap();
    assert!(!mismatched.cast::<bool>().unwrap());
}
