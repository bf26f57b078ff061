//! Turning Rust closures into typed [`ProxyFunction`]s.
//!
//! Parameter and return types come from [`FromBoxed`] and [`IntoBoxed`], so
//! `from_fn(|a: i32, b: i32| a + b)` registers a candidate with parameters
//! `(i32, i32)` returning `i32`. Closures that can fail go through
//! [`from_try_fn`] and return `DispatchResult<R>`.

use mica_value::{BoxedValue, DispatchResult, FromBoxed, IntoBoxed};
use smallvec::smallvec;

use crate::function::{NativeFunction, ProxyFunction};

/// A closure usable as an infallible native body.
pub trait IntoNative<Args>: Send + Sync + 'static {
    fn into_native(self) -> NativeFunction;
}

/// A closure usable as a fallible native body.
pub trait IntoFallibleNative<Args>: Send + Sync + 'static {
    fn into_native(self) -> NativeFunction;
}

fn next_arg<'a>(
    args: &mut std::slice::Iter<'a, BoxedValue>,
    total: usize,
    expected: usize,
) -> DispatchResult<&'a BoxedValue> {
    args.next()
        .ok_or_else(|| mica_value::arity_mismatch(total, expected))
}

macro_rules! impl_into_native {
    ($count:expr; $($arg:ident),*) => {
        #[allow(non_snake_case, unused_variables, unused_mut)]
        impl<F, R, $($arg,)*> IntoNative<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: IntoBoxed,
            $($arg: FromBoxed,)*
        {
            fn into_native(self) -> NativeFunction {
                let f = self;
                let params = smallvec![$($arg::param_type()),*];
                NativeFunction::new(params, R::return_type(), move |_ctx, args| {
                    let total = args.len();
                    let mut args = args.iter();
                    $(let $arg = $arg::from_boxed(next_arg(&mut args, total, $count)?)?;)*
                    Ok(f($($arg),*).into_boxed())
                })
            }
        }

        #[allow(non_snake_case, unused_variables, unused_mut)]
        impl<F, R, $($arg,)*> IntoFallibleNative<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> DispatchResult<R> + Send + Sync + 'static,
            R: IntoBoxed,
            $($arg: FromBoxed,)*
        {
            fn into_native(self) -> NativeFunction {
                let f = self;
                let params = smallvec![$($arg::param_type()),*];
                NativeFunction::new(params, R::return_type(), move |_ctx, args| {
                    let total = args.len();
                    let mut args = args.iter();
                    $(let $arg = $arg::from_boxed(next_arg(&mut args, total, $count)?)?;)*
                    Ok(f($($arg),*)?.into_boxed())
                })
            }
        }
    };
}

impl_into_native!(0;);
impl_into_native!(1; A1);
impl_into_native!(2; A1, A2);
impl_into_native!(3; A1, A2, A3);
impl_into_native!(4; A1, A2, A3, A4);

/// Plain candidate from an infallible closure.
pub fn from_fn<Args, F: IntoNative<Args>>(f: F) -> ProxyFunction {
    ProxyFunction::native(IntoNative::into_native(f))
}

/// Plain candidate from a closure returning `DispatchResult<R>`.
pub fn from_try_fn<Args, F: IntoFallibleNative<Args>>(f: F) -> ProxyFunction {
    ProxyFunction::native(IntoFallibleNative::into_native(f))
}

/// Constructor candidate; the closure builds a fresh value.
pub fn constructor<Args, F: IntoNative<Args>>(f: F) -> ProxyFunction {
    ProxyFunction::native_constructor(IntoNative::into_native(f))
}
