#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use crate::conversions::{BaseClass, SharedConversions, TypeConversions};
use crate::context::DispatchLimits;
use crate::native_fn::{constructor, from_fn, from_try_fn};
use mica_value::{BoxedNumeric, DispatchError};
use pretty_assertions::assert_eq;

fn ctx() -> DispatchContext {
    DispatchContext::default()
}

fn add3() -> ProxyFunction {
    from_fn(|a: i32, b: i32, c: i32| a * 100 + b * 10 + c)
}

fn ints(values: &[i32]) -> Vec<BoxedValue> {
    values.iter().map(|v| BoxedValue::new(*v)).collect()
}

#[test]
fn plain_reports_signature() {
    let f = from_fn(|a: i32, b: f64| f64::from(a) + b);
    assert_eq!(f.arity(), Arity::Fixed(2));
    assert_eq!(
        f.parameter_types(),
        vec![TypeInfo::of::<i32>(), TypeInfo::of::<f64>()]
    );
    assert!(f.return_type().is::<f64>());
    assert_eq!(f.signature(), "(i32, f64) -> f64");
    assert!(f.contained_functions().is_empty());
}

#[test]
fn plain_call_converts_arguments() {
    let result = add3().call(&ints(&[1, 2, 3]), &ctx()).unwrap();
    assert_eq!(result.cast::<i32>().unwrap(), 123);
}

#[test]
fn plain_call_checks_arity() {
    let err = add3().call(&ints(&[1, 2]), &ctx()).unwrap_err();
    assert!(matches!(err, DispatchError::Arity { actual: 2, expected: 3 }));
}

#[test]
fn plain_call_checks_types() {
    let args = vec![BoxedValue::new(1_i32), BoxedValue::new(2_i64), BoxedValue::new(3_i32)];
    let err = add3().call(&args, &ctx()).unwrap_err();
    assert_eq!(err.to_string(), "bad boxed cast: expected i32, got i64");
    assert!(!add3().call_match(&args, &ctx()));
}

#[test]
fn numeric_parameter_accepts_any_pod() {
    let f = from_try_fn(|a: BoxedNumeric, b: BoxedNumeric| a.sum(b));
    let args = vec![BoxedValue::new(2_u8), BoxedValue::new(0.5_f32)];
    assert!(f.call_match(&args, &ctx()));
    let result = f.call(&args, &ctx()).unwrap();
    assert_eq!(result.cast::<f64>().unwrap(), 2.5);

    assert!(!f.call_match(&[BoxedValue::new(true), BoxedValue::new(1_i32)], &ctx()));
}

#[test]
fn object_parameter_accepts_undefined() {
    let f = from_fn(|v: BoxedValue| v.is_undef());
    let result = f.call(&[BoxedValue::undef()], &ctx()).unwrap();
    assert!(result.cast::<bool>().unwrap());
}

#[test]
fn fallible_body_errors_propagate() {
    let f = from_try_fn(|a: i64, b: i64| {
        BoxedNumeric::from_int(a).quotient(BoxedNumeric::from_int(b))
    });
    let err = f
        .call(&[BoxedValue::new(1_i64), BoxedValue::new(0_i64)], &ctx())
        .unwrap_err();
    assert!(matches!(err, DispatchError::Arithmetic { .. }));
}

#[test]
fn constructor_builds_fresh_value() {
    #[derive(Clone, Debug, PartialEq)]
    struct Pair(i32, i32);
    mica_value::impl_native_value!(Pair);

    let ctor = constructor(|a: i32, b: i32| Pair(a, b));
    assert!(matches!(ctor.kind(), FunctionKind::Constructor(_)));
    assert_eq!(ctor.signature(), "new Pair(i32, i32)");
    let value = ctor.call(&ints(&[1, 2]), &ctx()).unwrap();
    assert_eq!(value.cast::<Pair>().unwrap(), Pair(1, 2));
}

#[test]
fn bound_reduces_arity_and_prepends_values() {
    let bound = ProxyFunction::bound(add3(), ints(&[4])).unwrap();
    assert_eq!(bound.arity(), Arity::Fixed(2));
    assert_eq!(bound.parameter_types().len(), 2);
    assert_eq!(bound.contained_functions().len(), 1);

    let result = bound.call(&ints(&[5, 6]), &ctx()).unwrap();
    assert_eq!(result.cast::<i32>().unwrap(), 456);
}

#[test]
fn bound_fills_placeholders_in_order() {
    let bound = ProxyFunction::bound(
        add3(),
        vec![BoxedValue::new(Placeholder), BoxedValue::new(7_i32)],
    )
    .unwrap();
    assert_eq!(bound.arity(), Arity::Fixed(2));
    let result = bound.call(&ints(&[1, 9]), &ctx()).unwrap();
    assert_eq!(result.cast::<i32>().unwrap(), 179);
}

#[test]
fn bound_rejects_over_binding() {
    let err = ProxyFunction::bound(add3(), ints(&[1, 2, 3, 4])).unwrap_err();
    assert!(matches!(err, DispatchError::Arity { actual: 4, expected: 3 }));
}

#[test]
fn bound_over_variadic_stays_variadic() {
    let count = ProxyFunction::dynamic(Arity::Variadic, |_, args| {
        Ok(BoxedValue::new(args.len()))
    });
    let bound = ProxyFunction::bound(count, ints(&[1, 2])).unwrap();
    assert_eq!(bound.arity(), Arity::Variadic);
    assert_eq!(bound.arity().as_i32(), -1);
    let result = bound.call(&ints(&[3]), &ctx()).unwrap();
    assert_eq!(result.cast::<usize>().unwrap(), 3);
}

#[test]
fn bound_call_checks_remaining_arity() {
    let bound = ProxyFunction::bound(add3(), ints(&[1])).unwrap();
    let err = bound.call(&ints(&[2]), &ctx()).unwrap_err();
    assert!(matches!(err, DispatchError::Arity { actual: 1, expected: 2 }));
    assert!(!bound.call_match(&ints(&[2]), &ctx()));
}

fn positive_guard() -> ProxyFunction {
    from_fn(|x: i32| x > 0)
}

fn guarded_identity() -> ProxyFunction {
    ProxyFunction::guarded(Arity::Fixed(1), positive_guard(), |_, args| Ok(args[0].clone()))
}

#[test]
fn guard_controls_eligibility() {
    let f = guarded_identity();
    assert!(f.guard().is_some());
    assert!(f.call_match(&ints(&[1]), &ctx()));
    assert!(!f.call_match(&ints(&[-1]), &ctx()));
}

#[test]
fn direct_call_with_rejecting_guard_fails() {
    let err = guarded_identity().call(&ints(&[-5]), &ctx()).unwrap_err();
    assert!(matches!(err, DispatchError::GuardFailed));
}

#[test]
fn guard_signature_mismatch_rejects() {
    let f = guarded_identity();
    assert!(!f.call_match(&[BoxedValue::new("text".to_string())], &ctx()));
}

#[test]
fn dynamic_signature_marks_guard() {
    assert_eq!(guarded_identity().signature(), "(BoxedValue) [guarded]");
    let variadic = ProxyFunction::dynamic(Arity::Variadic, |_, _| Ok(BoxedValue::void()));
    assert_eq!(variadic.signature(), "(...)");
    assert!(variadic.parameter_types().is_empty());
}

#[test]
fn annotation_is_attached() {
    let f = add3().annotated("adds digits");
    assert_eq!(f.annotation(), "adds digits");
    assert_eq!(add3().annotation(), "");
}

#[test]
fn clones_share_the_callable() {
    let f = add3();
    let g = f.clone();
    assert_eq!(f, g);
    assert_ne!(f, add3());
}

#[derive(Clone, Debug)]
struct Shape {
    sides: u32,
}

#[derive(Clone, Debug)]
struct Square;

impl From<Square> for Shape {
    fn from(_: Square) -> Self {
        Shape { sides: 4 }
    }
}

mica_value::impl_native_value!(Shape, Square);

#[test]
fn registered_base_class_upcasts_argument() {
    let mut table = TypeConversions::default();
    table.add(BaseClass::new::<Shape, Square>());
    let ctx = DispatchContext::new(SharedConversions::new(table), DispatchLimits::default());

    let sides = from_fn(|shape: Shape| shape.sides);
    assert!(!sides.call_match(&[BoxedValue::new(Square)], &DispatchContext::default()));
    let result = sides.call(&[BoxedValue::new(Square)], &ctx).unwrap();
    assert_eq!(result.cast::<u32>().unwrap(), 4);
}

#[test]
fn nesting_beyond_limit_fails() {
    let f = from_fn(|a: i32, b: i32, c: i32, d: i32| a + b + c + d);
    let b1 = ProxyFunction::bound(f, ints(&[1])).unwrap();
    let b2 = ProxyFunction::bound(b1, ints(&[2])).unwrap();
    let b3 = ProxyFunction::bound(b2, ints(&[3])).unwrap();

    let result = b3.call(&ints(&[4]), &ctx()).unwrap();
    assert_eq!(result.cast::<i32>().unwrap(), 10);

    let shallow = DispatchContext::new(
        SharedConversions::default(),
        DispatchLimits { max_call_depth: 2 },
    );
    let err = b3.call(&ints(&[4]), &shallow).unwrap_err();
    assert!(matches!(err, DispatchError::CallDepthExceeded { limit: 2 }));
}

#[test]
fn four_parameter_closures_are_supported() {
    let f = from_fn(|a: i32, b: i32, c: i32, d: i32| a * 1000 + b * 100 + c * 10 + d);
    assert_eq!(f.arity(), Arity::Fixed(4));
    let result = f.call(&ints(&[1, 2, 3, 4]), &ctx()).unwrap();
    assert_eq!(result.cast::<i32>().unwrap(), 1234);
}
