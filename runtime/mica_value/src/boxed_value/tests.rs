#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use crate::DispatchError;
use pretty_assertions::assert_eq;

#[derive(Clone, Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn new_captures_type_and_ownership() {
    let value = BoxedValue::new(7_i32);
    assert!(value.get_type_info().is::<i32>());
    assert_eq!(value.ownership(), Some(Ownership::OwnedCopy));
    assert!(!value.is_const());
    assert!(!value.is_ref());
    assert!(!value.is_pointer());
    assert!(!value.is_null());
}

#[test]
fn undef_has_no_payload() {
    let value = BoxedValue::default();
    assert!(value.is_undef());
    assert!(value.is_null());
    assert_eq!(value.ownership(), None);
    assert!(matches!(
        value.cast::<i32>(),
        Err(DispatchError::TypeMismatch { .. })
    ));
}

#[test]
fn void_is_unit() {
    let value = BoxedValue::void();
    assert!(value.get_type_info().is_void());
    assert!(!value.is_undef());
}

#[test]
fn copy_of_owned_value_is_independent() {
    let original = BoxedValue::new(Point { x: 1, y: 2 });
    let copy = original.copy();
    copy.with_mut(|p: &mut Point| p.x = 10).unwrap();

    assert_eq!(original.cast::<Point>().unwrap(), Point { x: 1, y: 2 });
    assert_eq!(copy.cast::<Point>().unwrap(), Point { x: 10, y: 2 });
}

#[test]
fn copy_of_shared_value_aliases() {
    let original = BoxedValue::shared(Point { x: 1, y: 2 });
    let copy = original.copy();
    assert!(!copy.ptr_eq(&original));
    copy.with_mut(|p: &mut Point| p.y = 20).unwrap();

    assert_eq!(original.cast::<Point>().unwrap().y, 20);
    assert_eq!(copy.ownership(), Some(Ownership::SharedReference));
}

#[test]
fn pointer_does_not_keep_referent_alive() {
    let owner = BoxedValue::new(String::from("hello"));
    let pointer = owner.pointer_to().unwrap();
    assert!(pointer.is_pointer());
    assert_eq!(pointer.ownership(), Some(Ownership::RawPointer));
    assert_eq!(pointer.cast::<String>().unwrap(), "hello");

    drop(owner);
    assert!(pointer.is_null());
    assert!(pointer.cast::<String>().is_err());
}

#[test]
fn pointer_writes_through_to_owner() {
    let owner = BoxedValue::new(5_i64);
    let pointer = owner.pointer_to().unwrap();
    pointer.with_mut(|v: &mut i64| *v += 1).unwrap();
    assert_eq!(owner.cast::<i64>().unwrap(), 6);
}

#[test]
fn null_pointer_is_typed() {
    let pointer = BoxedValue::null_pointer::<Point>();
    assert!(pointer.is_null());
    assert!(pointer.get_type_info().is::<Point>());
    assert_eq!(pointer.get_type_info().name(), "Point*");
}

#[test]
fn assign_to_undefined_adopts_source() {
    let target = BoxedValue::undef();
    let source = BoxedValue::new_const(3_i32);
    target.assign(&source).unwrap();

    assert!(target.get_type_info().is::<i32>());
    assert!(!target.is_const());
    assert_eq!(target.cast::<i32>().unwrap(), 3);

    target.with_mut(|v: &mut i32| *v = 4).unwrap();
    assert_eq!(source.cast::<i32>().unwrap(), 3);
}

#[test]
fn assign_replaces_payload_for_every_alias() {
    let target = BoxedValue::new(1_i32);
    let alias = target.clone();
    target.assign(&BoxedValue::new(9_i32)).unwrap();
    assert_eq!(alias.cast::<i32>().unwrap(), 9);
}

#[test]
fn assign_rejects_const_target() {
    let target = BoxedValue::new_const(1_i32);
    let err = target.assign(&BoxedValue::new(2_i32)).unwrap_err();
    assert!(matches!(err, DispatchError::TypeMismatch { .. }));
    assert_eq!(target.cast::<i32>().unwrap(), 1);
}

#[test]
fn assign_rejects_different_type() {
    let target = BoxedValue::new(1_i32);
    let err = target.assign(&BoxedValue::new(2.0_f64)).unwrap_err();
    assert_eq!(err.to_string(), "bad boxed cast: cannot assign f64 to i32");
}

#[test]
fn self_assignment_is_a_no_op() {
    let value = BoxedValue::new(String::from("same"));
    value.assign(&value.clone()).unwrap();
    assert_eq!(value.cast::<String>().unwrap(), "same");
}

#[test]
fn assign_between_aliases_of_one_slot() {
    let shared = BoxedValue::shared(11_u8);
    let other = shared.copy();
    shared.assign(&other).unwrap();
    assert_eq!(other.cast::<u8>().unwrap(), 11);
}

#[test]
fn pointer_assignment_rebinds() {
    let first = BoxedValue::new(1_i32);
    let second = BoxedValue::new(2_i32);
    let pointer = first.pointer_to().unwrap();
    pointer.assign(&second.pointer_to().unwrap()).unwrap();

    assert_eq!(pointer.cast::<i32>().unwrap(), 2);
    assert_eq!(first.cast::<i32>().unwrap(), 1);
}

#[test]
fn const_values_refuse_mutation() {
    let value = BoxedValue::new_const(1_u32);
    assert!(value.with_mut(|v: &mut u32| *v = 2).is_err());
    assert_eq!(value.cast::<u32>().unwrap(), 1);
}

#[test]
fn cast_reports_both_types() {
    let err = BoxedValue::new(1_i32).cast::<String>().unwrap_err();
    assert_eq!(err.to_string(), "bad boxed cast: cannot convert i32 to String");
}

#[test]
fn type_match_ignores_qualifiers() {
    let a = BoxedValue::new(1_i32);
    let b = BoxedValue::shared(2_i32);
    let c = BoxedValue::new(1_i64);
    assert!(type_match(&a, &b));
    assert!(!type_match(&a, &c));
    assert!(a.is_type(&TypeInfo::of::<i32>().with_const()));
}

#[test]
fn debug_shows_type_name() {
    assert_eq!(format!("{:?}", BoxedValue::new(1_i32)), "BoxedValue(i32)");
    assert_eq!(format!("{:?}", BoxedValue::undef()), "BoxedValue(undefined)");
    assert_eq!(
        format!("{:?}", BoxedValue::null_pointer::<Point>()),
        "BoxedValue(null Point*)"
    );
}
