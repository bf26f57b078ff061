//! Plain-old-data numeric types and their compound-assignment helpers.
//!
//! The `assign_*` helpers take the target by mutable reference and the
//! operand as a [`BoxedNumeric`], converting the operand to the target's
//! type first. On error the target is left untouched.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};
use std::str::FromStr;

use crate::errors::{
    division_by_zero, integer_only, integer_overflow, shift_out_of_range, DispatchResult,
};
use crate::{BoxedNumeric, FromBoxed, IntoBoxed};

/// A native numeric type the runtime can box, promote and operate on.
pub trait Pod:
    Copy + PartialOrd + fmt::Display + FromStr + FromBoxed + IntoBoxed + Send + Sync + 'static
{
    const IS_FLOAT: bool;

    /// Short name used in diagnostics, e.g. `"i32"`.
    const NAME: &'static str;

    /// Numeric conversion from an integer (wraps or rounds like `as`).
    fn from_i64(value: i64) -> Self;

    /// Numeric conversion from a float (saturates like `as`).
    fn from_f64(value: f64) -> Self;

    fn to_numeric(self) -> BoxedNumeric;

    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
    fn checked_mul(self, rhs: Self) -> Option<Self>;
    fn checked_div(self, rhs: Self) -> DispatchResult<Self>;
    fn checked_neg(self) -> Option<Self>;
}

/// Integer PODs additionally support remainder, bitwise and shift operators.
pub trait IntegerPod:
    Pod + BitAnd<Output = Self> + BitOr<Output = Self> + BitXor<Output = Self> + Not<Output = Self>
{
    fn checked_rem(self, rhs: Self) -> DispatchResult<Self>;
    fn checked_shl(self, rhs: Self) -> DispatchResult<Self>;
    fn checked_shr(self, rhs: Self) -> DispatchResult<Self>;
}

macro_rules! integer_pod {
    ($($t:ident),*) => {
        $(
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap, clippy::cast_lossless)]
            impl Pod for $t {
                const IS_FLOAT: bool = false;
                const NAME: &'static str = stringify!($t);

                fn from_i64(value: i64) -> Self {
                    value as $t
                }

                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                fn to_numeric(self) -> BoxedNumeric {
                    BoxedNumeric::from_int(self as i64)
                }

                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }

                fn checked_sub(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_sub(self, rhs)
                }

                fn checked_mul(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_mul(self, rhs)
                }

                fn checked_div(self, rhs: Self) -> DispatchResult<Self> {
                    if rhs == 0 {
                        return Err(division_by_zero());
                    }
                    <$t>::checked_div(self, rhs).ok_or_else(|| integer_overflow("/"))
                }

                fn checked_neg(self) -> Option<Self> {
                    <$t>::checked_neg(self)
                }
            }

            #[allow(clippy::cast_possible_wrap, clippy::cast_lossless)]
            impl IntegerPod for $t {
                fn checked_rem(self, rhs: Self) -> DispatchResult<Self> {
                    if rhs == 0 {
                        return Err(division_by_zero());
                    }
                    <$t>::checked_rem(self, rhs).ok_or_else(|| integer_overflow("%"))
                }

                fn checked_shl(self, rhs: Self) -> DispatchResult<Self> {
                    let amount = rhs as i64;
                    u32::try_from(amount)
                        .ok()
                        .and_then(|bits| <$t>::checked_shl(self, bits))
                        .ok_or_else(|| shift_out_of_range(amount))
                }

                fn checked_shr(self, rhs: Self) -> DispatchResult<Self> {
                    let amount = rhs as i64;
                    u32::try_from(amount)
                        .ok()
                        .and_then(|bits| <$t>::checked_shr(self, bits))
                        .ok_or_else(|| shift_out_of_range(amount))
                }
            }
        )*
    };
}

macro_rules! float_pod {
    ($($t:ident),*) => {
        $(
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_lossless)]
            impl Pod for $t {
                const IS_FLOAT: bool = true;
                const NAME: &'static str = stringify!($t);

                fn from_i64(value: i64) -> Self {
                    value as $t
                }

                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                fn to_numeric(self) -> BoxedNumeric {
                    BoxedNumeric::from_float(self as f64)
                }

                fn checked_add(self, rhs: Self) -> Option<Self> {
                    Some(self + rhs)
                }

                fn checked_sub(self, rhs: Self) -> Option<Self> {
                    Some(self - rhs)
                }

                fn checked_mul(self, rhs: Self) -> Option<Self> {
                    Some(self * rhs)
                }

                fn checked_div(self, rhs: Self) -> DispatchResult<Self> {
                    Ok(self / rhs)
                }

                fn checked_neg(self) -> Option<Self> {
                    Some(-self)
                }
            }
        )*
    };
}

integer_pod!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
float_pod!(f32, f64);

fn integer_operand<T: IntegerPod>(rhs: BoxedNumeric, op: &'static str) -> DispatchResult<T> {
    if rhs.is_float() {
        return Err(integer_only(op));
    }
    Ok(T::from_i64(rhs.as_int()))
}

fn store<T: Pod>(target: &mut T, result: T) -> T {
    *target = result;
    result
}

/// `target = rhs`, converting `rhs` to the target's type.
pub fn assign_pod<T: Pod>(target: &mut T, rhs: BoxedNumeric) -> T {
    store(target, rhs.construct_pod())
}

/// `target += rhs`.
pub fn assign_sum<T: Pod>(target: &mut T, rhs: BoxedNumeric) -> DispatchResult<T> {
    let result = target
        .checked_add(rhs.construct_pod())
        .ok_or_else(|| integer_overflow("+="))?;
    Ok(store(target, result))
}

/// `target -= rhs`.
pub fn assign_difference<T: Pod>(target: &mut T, rhs: BoxedNumeric) -> DispatchResult<T> {
    let result = target
        .checked_sub(rhs.construct_pod())
        .ok_or_else(|| integer_overflow("-="))?;
    Ok(store(target, result))
}

/// `target *= rhs`.
pub fn assign_product<T: Pod>(target: &mut T, rhs: BoxedNumeric) -> DispatchResult<T> {
    let result = target
        .checked_mul(rhs.construct_pod())
        .ok_or_else(|| integer_overflow("*="))?;
    Ok(store(target, result))
}

/// `target /= rhs`.
pub fn assign_quotient<T: Pod>(target: &mut T, rhs: BoxedNumeric) -> DispatchResult<T> {
    let result = target.checked_div(rhs.construct_pod())?;
    Ok(store(target, result))
}

/// `target %= rhs`. Integer operands only.
pub fn assign_remainder<T: IntegerPod>(target: &mut T, rhs: BoxedNumeric) -> DispatchResult<T> {
    let rhs = integer_operand(rhs, "%=")?;
    let result = target.checked_rem(rhs)?;
    Ok(store(target, result))
}

/// `target &= rhs`. Integer operands only.
pub fn assign_bitwise_and<T: IntegerPod>(target: &mut T, rhs: BoxedNumeric) -> DispatchResult<T> {
    let rhs: T = integer_operand(rhs, "&=")?;
    let result = *target & rhs;
    Ok(store(target, result))
}

/// `target |= rhs`. Integer operands only.
pub fn assign_bitwise_or<T: IntegerPod>(target: &mut T, rhs: BoxedNumeric) -> DispatchResult<T> {
    let rhs: T = integer_operand(rhs, "|=")?;
    let result = *target | rhs;
    Ok(store(target, result))
}

/// `target ^= rhs`. Integer operands only.
pub fn assign_xor<T: IntegerPod>(target: &mut T, rhs: BoxedNumeric) -> DispatchResult<T> {
    let rhs: T = integer_operand(rhs, "^=")?;
    let result = *target ^ rhs;
    Ok(store(target, result))
}

/// `target <<= rhs`. Integer operands only.
pub fn assign_left_shift<T: IntegerPod>(target: &mut T, rhs: BoxedNumeric) -> DispatchResult<T> {
    let rhs = integer_operand(rhs, "<<=")?;
    let result = target.checked_shl(rhs)?;
    Ok(store(target, result))
}

/// `target >>= rhs`. Integer operands only.
pub fn assign_right_shift<T: IntegerPod>(target: &mut T, rhs: BoxedNumeric) -> DispatchResult<T> {
    let rhs = integer_operand(rhs, ">>=")?;
    let result = target.checked_shr(rhs)?;
    Ok(store(target, result))
}

/// Render a POD as a string.
pub fn to_string<T: Pod>(value: T) -> String {
    value.to_string()
}

/// Parse a POD from a string.
pub fn parse_string<T: Pod>(input: &str) -> DispatchResult<T> {
    input
        .trim()
        .parse::<T>()
        .map_err(|_| crate::errors::parse_error(input, T::NAME))
}
