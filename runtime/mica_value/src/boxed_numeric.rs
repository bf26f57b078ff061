//! Type-erased numeric with promotion.
//!
//! Any boxed POD widens into a `BoxedNumeric`: integers into `i64`, floats
//! into `f64`. Binary operations promote to float when either side is a
//! float and otherwise use checked `i64` arithmetic.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

use mica_types::TypeInfo;

use crate::errors::{
    bad_cast, division_by_zero, integer_only, integer_overflow, shift_out_of_range,
    DispatchResult,
};
use crate::pod::Pod;
use crate::BoxedValue;

/// A numeric value of any POD type, widened for arithmetic.
#[derive(Clone, Copy)]
pub struct BoxedNumeric {
    is_float: bool,
    int: i64,
    float: f64,
}

fn try_pod<T: Pod>(any: &dyn Any) -> Option<BoxedNumeric> {
    any.downcast_ref::<T>().map(|value| value.to_numeric())
}

fn numeric_from_any(any: &dyn Any) -> Option<BoxedNumeric> {
    try_pod::<i32>(any)
        .or_else(|| try_pod::<f64>(any))
        .or_else(|| try_pod::<i64>(any))
        .or_else(|| try_pod::<usize>(any))
        .or_else(|| try_pod::<u8>(any))
        .or_else(|| try_pod::<f32>(any))
        .or_else(|| try_pod::<u32>(any))
        .or_else(|| try_pod::<u64>(any))
        .or_else(|| try_pod::<i8>(any))
        .or_else(|| try_pod::<i16>(any))
        .or_else(|| try_pod::<u16>(any))
        .or_else(|| try_pod::<isize>(any))
}

impl BoxedNumeric {
    pub const fn from_int(value: i64) -> Self {
        BoxedNumeric {
            is_float: false,
            int: value,
            float: 0.0,
        }
    }

    pub const fn from_float(value: f64) -> Self {
        BoxedNumeric {
            is_float: true,
            int: 0,
            float: value,
        }
    }

    pub fn from_pod<T: Pod>(value: T) -> Self {
        value.to_numeric()
    }

    /// Widen a boxed POD. Fails for non-numeric payloads.
    pub fn from_boxed(value: &BoxedValue) -> DispatchResult<Self> {
        value
            .with_any(numeric_from_any)?
            .ok_or_else(|| bad_cast(&value.get_type_info().name(), "numeric"))
    }

    /// Whether `type_info` names one of the POD numeric types.
    pub fn is_numeric(type_info: &TypeInfo) -> bool {
        type_info.is::<i32>()
            || type_info.is::<f64>()
            || type_info.is::<i64>()
            || type_info.is::<usize>()
            || type_info.is::<u8>()
            || type_info.is::<f32>()
            || type_info.is::<u32>()
            || type_info.is::<u64>()
            || type_info.is::<i8>()
            || type_info.is::<i16>()
            || type_info.is::<u16>()
            || type_info.is::<isize>()
    }

    #[inline]
    pub fn is_float(self) -> bool {
        self.is_float
    }

    /// Integer view; floats truncate toward zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_int(self) -> i64 {
        if self.is_float {
            self.float as i64
        } else {
            self.int
        }
    }

    /// Float view; large integers round.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(self) -> f64 {
        if self.is_float {
            self.float
        } else {
            self.int as f64
        }
    }

    /// Convert to a concrete POD type with `as` semantics.
    pub fn construct_pod<T: Pod>(self) -> T {
        if self.is_float {
            T::from_f64(self.float)
        } else {
            T::from_i64(self.int)
        }
    }

    /// Box as `i64` or `f64`.
    pub fn into_boxed(self) -> BoxedValue {
        if self.is_float {
            BoxedValue::new(self.float)
        } else {
            BoxedValue::new(self.int)
        }
    }

    fn arithmetic(
        self,
        rhs: Self,
        op: &'static str,
        float: impl FnOnce(f64, f64) -> f64,
        int: impl FnOnce(i64, i64) -> Option<i64>,
    ) -> DispatchResult<Self> {
        if self.is_float || rhs.is_float {
            return Ok(Self::from_float(float(self.as_float(), rhs.as_float())));
        }
        int(self.int, rhs.int)
            .map(Self::from_int)
            .ok_or_else(|| integer_overflow(op))
    }

    fn integer_only(self, rhs: Self, op: &'static str) -> DispatchResult<(i64, i64)> {
        if self.is_float || rhs.is_float {
            return Err(integer_only(op));
        }
        Ok((self.int, rhs.int))
    }

    pub fn sum(self, rhs: Self) -> DispatchResult<Self> {
        self.arithmetic(rhs, "+", |a, b| a + b, i64::checked_add)
    }

    pub fn difference(self, rhs: Self) -> DispatchResult<Self> {
        self.arithmetic(rhs, "-", |a, b| a - b, i64::checked_sub)
    }

    pub fn product(self, rhs: Self) -> DispatchResult<Self> {
        self.arithmetic(rhs, "*", |a, b| a * b, i64::checked_mul)
    }

    pub fn quotient(self, rhs: Self) -> DispatchResult<Self> {
        if !self.is_float && !rhs.is_float && rhs.int == 0 {
            return Err(division_by_zero());
        }
        self.arithmetic(rhs, "/", |a, b| a / b, i64::checked_div)
    }

    pub fn remainder(self, rhs: Self) -> DispatchResult<Self> {
        let (a, b) = self.integer_only(rhs, "%")?;
        if b == 0 {
            return Err(division_by_zero());
        }
        a.checked_rem(b)
            .map(Self::from_int)
            .ok_or_else(|| integer_overflow("%"))
    }

    pub fn bitwise_and(self, rhs: Self) -> DispatchResult<Self> {
        let (a, b) = self.integer_only(rhs, "&")?;
        Ok(Self::from_int(a & b))
    }

    pub fn bitwise_or(self, rhs: Self) -> DispatchResult<Self> {
        let (a, b) = self.integer_only(rhs, "|")?;
        Ok(Self::from_int(a | b))
    }

    pub fn bitwise_xor(self, rhs: Self) -> DispatchResult<Self> {
        let (a, b) = self.integer_only(rhs, "^")?;
        Ok(Self::from_int(a ^ b))
    }

    pub fn shift_left(self, rhs: Self) -> DispatchResult<Self> {
        let (a, b) = self.integer_only(rhs, "<<")?;
        u32::try_from(b)
            .ok()
            .and_then(|bits| a.checked_shl(bits))
            .map(Self::from_int)
            .ok_or_else(|| shift_out_of_range(b))
    }

    pub fn shift_right(self, rhs: Self) -> DispatchResult<Self> {
        let (a, b) = self.integer_only(rhs, ">>")?;
        u32::try_from(b)
            .ok()
            .and_then(|bits| a.checked_shr(bits))
            .map(Self::from_int)
            .ok_or_else(|| shift_out_of_range(b))
    }

    pub fn negate(self) -> DispatchResult<Self> {
        if self.is_float {
            return Ok(Self::from_float(-self.float));
        }
        self.int
            .checked_neg()
            .map(Self::from_int)
            .ok_or_else(|| integer_overflow("unary -"))
    }

    pub fn bitwise_complement(self) -> DispatchResult<Self> {
        if self.is_float {
            return Err(integer_only("~"));
        }
        Ok(Self::from_int(!self.int))
    }

    /// Ordering after promotion; `None` when a NaN is involved.
    pub fn compare(self, rhs: Self) -> Option<Ordering> {
        if self.is_float || rhs.is_float {
            self.as_float().partial_cmp(&rhs.as_float())
        } else {
            Some(self.int.cmp(&rhs.int))
        }
    }
}

impl PartialEq for BoxedNumeric {
    fn eq(&self, other: &Self) -> bool {
        self.compare(*other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for BoxedNumeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Debug for BoxedNumeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_float {
            write!(f, "BoxedNumeric({:?})", self.float)
        } else {
            write!(f, "BoxedNumeric({})", self.int)
        }
    }
}

impl fmt::Display for BoxedNumeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_float {
            write!(f, "{}", self.float)
        } else {
            write!(f, "{}", self.int)
        }
    }
}
