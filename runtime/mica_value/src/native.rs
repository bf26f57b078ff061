//! Conversions between native Rust values and `BoxedValue`.
//!
//! `FromBoxed` pulls a native argument out of a boxed one and reports the
//! parameter type dispatch should match against; `IntoBoxed` does the
//! reverse for return values. Plain value types get both through
//! [`impl_native_value!`].

use mica_types::TypeInfo;

use crate::{AttrMap, BoxedNumeric, BoxedValue, DispatchError, DispatchResult, DynamicObject};

/// A native parameter type.
pub trait FromBoxed: Sized {
    /// Type dispatch compares arguments against.
    fn param_type() -> TypeInfo;

    fn from_boxed(value: &BoxedValue) -> DispatchResult<Self>;
}

/// A native return type.
pub trait IntoBoxed {
    fn return_type() -> TypeInfo;

    fn into_boxed(self) -> BoxedValue;
}

/// Implement [`FromBoxed`] and [`IntoBoxed`] for `Clone` value types.
///
/// Arguments are cloned out of the box; returns are boxed by value.
#[macro_export]
macro_rules! impl_native_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::FromBoxed for $ty {
                fn param_type() -> $crate::TypeInfo {
                    $crate::TypeInfo::of::<$ty>()
                }

                fn from_boxed(value: &$crate::BoxedValue) -> $crate::DispatchResult<Self> {
                    value.cast::<$ty>()
                }
            }

            impl $crate::IntoBoxed for $ty {
                fn return_type() -> $crate::TypeInfo {
                    $crate::TypeInfo::of::<$ty>()
                }

                fn into_boxed(self) -> $crate::BoxedValue {
                    $crate::BoxedValue::new(self)
                }
            }
        )*
    };
}

impl_native_value!(
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    bool,
    char,
    String,
    TypeInfo,
    DynamicObject,
    AttrMap,
    DispatchError,
    Vec<BoxedValue>,
);

/// Boxed parameters accept any argument, handle and all.
impl FromBoxed for BoxedValue {
    fn param_type() -> TypeInfo {
        TypeInfo::of::<BoxedValue>()
    }

    fn from_boxed(value: &BoxedValue) -> DispatchResult<Self> {
        Ok(value.clone())
    }
}

impl IntoBoxed for BoxedValue {
    fn return_type() -> TypeInfo {
        TypeInfo::of::<BoxedValue>()
    }

    fn into_boxed(self) -> BoxedValue {
        self
    }
}

impl FromBoxed for BoxedNumeric {
    fn param_type() -> TypeInfo {
        TypeInfo::of::<BoxedNumeric>()
    }

    fn from_boxed(value: &BoxedValue) -> DispatchResult<Self> {
        BoxedNumeric::from_boxed(value)
    }
}

impl IntoBoxed for BoxedNumeric {
    fn return_type() -> TypeInfo {
        TypeInfo::of::<BoxedNumeric>()
    }

    fn into_boxed(self) -> BoxedValue {
        BoxedNumeric::into_boxed(self)
    }
}

impl IntoBoxed for () {
    fn return_type() -> TypeInfo {
        TypeInfo::void()
    }

    fn into_boxed(self) -> BoxedValue {
        BoxedValue::void()
    }
}
