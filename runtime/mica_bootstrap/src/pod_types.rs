//! Registration of the POD numeric types.
//!
//! Every POD type gets constructors (default, copy, from any numeric),
//! assignment, the arithmetic compound assignments and string conversion.
//! Integers add the bitwise, remainder and shift compound assignments plus
//! the full typed operator set; floats get `+ - * /` and unary `+ -`.
//!
//! Typed operators only match operands of exactly that type. Mixed
//! operands fall through to the `PODObject` operators in
//! [`operators`](crate::operators).

use mica_dispatch::{constructor, from_fn, from_try_fn, ProxyFunction, Registry};
use mica_types::TypeInfo;
use mica_value::pod::{self, IntegerPod, Pod};
use mica_value::{integer_overflow, BoxedNumeric, DispatchError, DispatchResult};

use crate::native::{native, pair, single};

/// In-place update of a POD target from a numeric operand.
type CompoundOp<T> = fn(&mut T, BoxedNumeric) -> DispatchResult<T>;

/// `target op= operand`, writing through the target handle.
fn compound<T: Pod>(op: CompoundOp<T>) -> ProxyFunction {
    native(
        &[TypeInfo::of::<T>(), TypeInfo::of::<BoxedNumeric>()],
        TypeInfo::of::<T>().with_reference(),
        move |_, args| {
            let (target, operand) = pair(args)?;
            let rhs = BoxedNumeric::from_boxed(operand)?;
            target.with_mut(|value: &mut T| op(value, rhs))??;
            Ok(target.clone())
        },
    )
}

/// Prefix `++` / `--`.
fn step<T: Pod>(op: &'static str, apply: fn(T, T) -> Option<T>) -> ProxyFunction {
    native(
        &[TypeInfo::of::<T>()],
        TypeInfo::of::<T>().with_reference(),
        move |_, args| {
            let target = single(args)?;
            target.with_mut(|value: &mut T| {
                *value = apply(*value, T::from_i64(1)).ok_or_else(|| integer_overflow(op))?;
                Ok::<(), DispatchError>(())
            })??;
            Ok(target.clone())
        },
    )
}

fn checked<T: Pod>(op: &'static str, apply: fn(T, T) -> Option<T>) -> ProxyFunction {
    from_try_fn(move |a: T, b: T| apply(a, b).ok_or_else(|| integer_overflow(op)))
}

fn negate<T: Pod>() -> ProxyFunction {
    from_try_fn(|a: T| a.checked_neg().ok_or_else(|| integer_overflow("unary -")))
}

/// Registrations shared by every POD type.
pub fn bootstrap_pod_type<T: Pod>(registry: &mut Registry, name: &str) {
    registry
        .add(name, TypeInfo::of::<T>())
        .add(name, constructor(|| T::from_i64(0)))
        .add(name, constructor(|value: T| value))
        .add(name, constructor(|value: BoxedNumeric| value.construct_pod::<T>()))
        .add("=", crate::native::assign(TypeInfo::of::<T>()))
        .add("=", compound::<T>(|target, rhs| Ok(pod::assign_pod(target, rhs))))
        .add("+=", compound::<T>(pod::assign_sum))
        .add("-=", compound::<T>(pod::assign_difference))
        .add("*=", compound::<T>(pod::assign_product))
        .add("/=", compound::<T>(pod::assign_quotient))
        .add("to_string", from_fn(pod::to_string::<T>))
        .add(
            &format!("to_{name}"),
            from_try_fn(|text: String| pod::parse_string::<T>(&text)),
        );
}

/// An integer POD type: shared registrations plus integer-only operators.
pub fn bootstrap_integer_type<T: IntegerPod>(registry: &mut Registry, name: &str) {
    bootstrap_pod_type::<T>(registry, name);
    registry
        .add("&=", compound::<T>(pod::assign_bitwise_and))
        .add("^=", compound::<T>(pod::assign_xor))
        .add("|=", compound::<T>(pod::assign_bitwise_or))
        .add("<<=", compound::<T>(pod::assign_left_shift))
        .add("%=", compound::<T>(pod::assign_remainder))
        .add(">>=", compound::<T>(pod::assign_right_shift))
        .add("++", step::<T>("++", Pod::checked_add))
        .add("--", step::<T>("--", Pod::checked_sub))
        .add("+", checked::<T>("+", Pod::checked_add))
        .add("-", checked::<T>("-", Pod::checked_sub))
        .add("*", checked::<T>("*", Pod::checked_mul))
        .add("/", from_try_fn(|a: T, b: T| a.checked_div(b)))
        .add("%", from_try_fn(|a: T, b: T| a.checked_rem(b)))
        .add("&", from_fn(|a: T, b: T| a & b))
        .add("|", from_fn(|a: T, b: T| a | b))
        .add("^", from_fn(|a: T, b: T| a ^ b))
        .add("<<", from_try_fn(|a: T, b: T| a.checked_shl(b)))
        .add(">>", from_try_fn(|a: T, b: T| a.checked_shr(b)))
        .add("+", from_fn(|a: T| a))
        .add("-", negate::<T>())
        .add("~", from_fn(|a: T| !a));
}

/// A floating POD type: shared registrations plus float arithmetic.
pub fn bootstrap_float_type<T: Pod>(registry: &mut Registry, name: &str) {
    bootstrap_pod_type::<T>(registry, name);
    registry
        .add("+", checked::<T>("+", Pod::checked_add))
        .add("-", checked::<T>("-", Pod::checked_sub))
        .add("*", checked::<T>("*", Pod::checked_mul))
        .add("/", from_try_fn(|a: T, b: T| a.checked_div(b)))
        .add("+", from_fn(|a: T| a))
        .add("-", negate::<T>());
}

/// All built-in POD types, floats first.
pub(crate) fn register(registry: &mut Registry) {
    bootstrap_float_type::<f64>(registry, "double");
    bootstrap_float_type::<f32>(registry, "float");
    bootstrap_integer_type::<i32>(registry, "int");
    bootstrap_integer_type::<usize>(registry, "size_t");
    bootstrap_integer_type::<u8>(registry, "char");
    bootstrap_integer_type::<i64>(registry, "int64_t");
}
