//! Operators over `PODObject`, the catch-all for mixed numeric operands.
//!
//! These are registered after the typed POD operators so an `int + int`
//! stays an `int`, while `int + double` lands here and is promoted. Results
//! are `i64` when both operands are integral and `f64` otherwise.

use std::cmp::Ordering;

use mica_dispatch::{from_fn, from_try_fn, ProxyFunction, Registry};
use mica_value::{BoxedNumeric, DispatchResult};

type BinaryOp = fn(BoxedNumeric, BoxedNumeric) -> DispatchResult<BoxedNumeric>;

fn arithmetic(op: BinaryOp) -> ProxyFunction {
    from_try_fn(move |a: BoxedNumeric, b: BoxedNumeric| op(a, b))
}

/// Unordered operands (NaN) compare false.
fn comparison(accept: fn(Ordering) -> bool) -> ProxyFunction {
    from_fn(move |a: BoxedNumeric, b: BoxedNumeric| a.compare(b).is_some_and(accept))
}

pub(crate) fn register(registry: &mut Registry) {
    registry
        .add("+", arithmetic(BoxedNumeric::sum))
        .add("-", arithmetic(BoxedNumeric::difference))
        .add("*", arithmetic(BoxedNumeric::product))
        .add("/", arithmetic(BoxedNumeric::quotient))
        .add("%", arithmetic(BoxedNumeric::remainder))
        .add("&", arithmetic(BoxedNumeric::bitwise_and))
        .add("|", arithmetic(BoxedNumeric::bitwise_or))
        .add("^", arithmetic(BoxedNumeric::bitwise_xor))
        .add("<<", arithmetic(BoxedNumeric::shift_left))
        .add(">>", arithmetic(BoxedNumeric::shift_right))
        .add("-", from_try_fn(BoxedNumeric::negate))
        .add("~", from_try_fn(BoxedNumeric::bitwise_complement))
        .add("==", comparison(Ordering::is_eq))
        .add("!=", from_fn(|a: BoxedNumeric, b: BoxedNumeric| a != b))
        .add("<", comparison(Ordering::is_lt))
        .add("<=", comparison(Ordering::is_le))
        .add(">", comparison(Ordering::is_gt))
        .add(">=", comparison(Ordering::is_ge));
}
