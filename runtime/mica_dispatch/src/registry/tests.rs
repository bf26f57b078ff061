#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use crate::function::Arity;
use crate::native_fn::from_fn;
use mica_value::eval_error;
use pretty_assertions::assert_eq;

fn tagged(tag: &'static str) -> ProxyFunction {
    from_fn(move |_: i32| tag.to_string())
}

#[test]
fn unknown_name_is_no_such_function() {
    let registry = Registry::new();
    let err = registry.call("missing", &[]).unwrap_err();
    assert!(matches!(err, DispatchError::NoSuchFunction { ref name } if name == "missing"));
    assert!(registry.get_function("missing").is_err());
}

#[test]
fn first_registered_match_wins() {
    let mut registry = Registry::new();
    registry
        .add("pick", tagged("A"))
        .add("pick", from_fn(|_: String| "B".to_string()))
        .add("pick", tagged("C"));

    for _ in 0..10 {
        let result = registry.call("pick", &[BoxedValue::new(1_i32)]).unwrap();
        assert_eq!(result.cast::<String>().unwrap(), "A");
    }
    assert_eq!(registry.candidates("pick").unwrap().len(), 3);
}

#[test]
fn later_candidates_are_tried_after_mismatch() {
    let mut registry = Registry::new();
    registry
        .add("describe", from_fn(|_: String| "string".to_string()))
        .add("describe", from_fn(|_: i32| "int".to_string()));
    let result = registry.call("describe", &[BoxedValue::new(5_i32)]).unwrap();
    assert_eq!(result.cast::<String>().unwrap(), "int");
}

#[test]
fn exhaustion_lists_candidates() {
    let mut registry = Registry::new();
    registry
        .add("f", from_fn(|a: i32| a))
        .add("f", from_fn(|a: f64| a));
    let err = registry.call("f", &[BoxedValue::new(true)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "no matching overload for `f`; tried: (i32) -> i32; (f64) -> f64"
    );
}

#[test]
fn rejecting_guard_falls_through() {
    let mut registry = Registry::new();
    let only_positive = from_fn(|x: i32| x > 0);
    registry
        .add(
            "sign",
            ProxyFunction::guarded(Arity::Fixed(1), only_positive, |_, _| {
                Ok(BoxedValue::new("positive".to_string()))
            }),
        )
        .add("sign", from_fn(|_: i32| "other".to_string()));

    let positive = registry.call("sign", &[BoxedValue::new(3_i32)]).unwrap();
    let negative = registry.call("sign", &[BoxedValue::new(-3_i32)]).unwrap();
    assert_eq!(positive.cast::<String>().unwrap(), "positive");
    assert_eq!(negative.cast::<String>().unwrap(), "other");
}

#[test]
fn matched_candidate_errors_propagate() {
    let mut registry = Registry::new();
    registry
        .add("fail", crate::native_fn::from_try_fn(|_: i32| -> DispatchResult<i32> {
            Err(eval_error("boom"))
        }))
        .add("fail", from_fn(|a: i32| a));
    let err = registry.call("fail", &[BoxedValue::new(1_i32)]).unwrap_err();
    assert!(matches!(err, DispatchError::Eval { .. }));
}

#[test]
fn call_match_is_a_dry_run() {
    let mut registry = Registry::new();
    let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = std::sync::Arc::clone(&calls);
    registry.add(
        "count",
        from_fn(move |_: i32| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }),
    );
    assert!(registry.call_match("count", &[BoxedValue::new(1_i32)]));
    assert!(!registry.call_match("count", &[BoxedValue::new(1_u8)]));
    assert!(!registry.call_match("absent", &[]));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[test]
fn get_function_wraps_the_overload_set() {
    let mut registry = Registry::new();
    registry
        .add("g", from_fn(|a: i32| a))
        .add("g", from_fn(|a: i32, b: i32| a + b));
    let g = registry.get_function("g").unwrap();
    assert_eq!(g.arity(), Arity::Variadic);
    assert_eq!(g.contained_functions().len(), 2);
    let result = g
        .call(&[BoxedValue::new(2_i32), BoxedValue::new(3_i32)], &registry.context())
        .unwrap();
    assert_eq!(result.cast::<i32>().unwrap(), 5);
}

#[test]
fn types_are_last_write_wins() {
    let mut registry = Registry::new();
    registry
        .add("number", TypeInfo::of::<i32>())
        .add("number", TypeInfo::of::<i64>());
    assert_eq!(registry.get_type("number"), Some(TypeInfo::of::<i64>()));
    assert_eq!(registry.get_type_name(&TypeInfo::of::<i64>()), Some("number"));
    assert_eq!(registry.get_type("absent"), None);
}

#[derive(Clone)]
struct Animal;

#[derive(Clone)]
struct Dog;

impl From<Dog> for Animal {
    fn from(_: Dog) -> Self {
        Animal
    }
}

mica_value::impl_native_value!(Animal, Dog);

#[test]
fn base_classes_feed_dispatch() {
    let mut registry = Registry::new();
    registry.add("speak", from_fn(|_: Animal| "...".to_string()));
    assert!(!registry.call_match("speak", &[BoxedValue::new(Dog)]));

    registry.add("", BaseClass::new::<Animal, Dog>());
    assert!(registry.is_base_of(&TypeInfo::of::<Animal>(), &TypeInfo::of::<Dog>()));
    assert!(registry.call_match("speak", &[BoxedValue::new(Dog)]));
}

struct Recording;

impl Evaluator for Recording {
    fn eval(&self, source: &str, registry: &mut Registry) -> DispatchResult {
        let text = source.to_string();
        registry.add("last_eval", from_fn(move || text.clone()));
        Ok(BoxedValue::void())
    }
}

#[test]
fn eval_without_evaluator_fails() {
    let mut registry = Registry::new();
    assert!(matches!(registry.eval("1"), Err(DispatchError::NoEvaluator)));
}

#[test]
fn eval_can_register_names() {
    let mut registry = Registry::builder().evaluator(Recording).build();
    assert!(registry.has_evaluator());
    registry.eval("def f() {}").unwrap();
    let result = registry.call("last_eval", &[]).unwrap();
    assert_eq!(result.cast::<String>().unwrap(), "def f() {}");
}

#[test]
fn builder_sets_limits() {
    let registry = Registry::builder().max_call_depth(8).build();
    assert_eq!(registry.limits().max_call_depth, 8);
    assert_eq!(registry.context().limits().max_call_depth, 8);
    assert_eq!(Registry::new().limits(), DispatchLimits::default());
}
