//! Polymorphic callables.
//!
//! A [`ProxyFunction`] is a cheap, shareable handle to one of five callable
//! shapes, modelled as a closed enum rather than a trait hierarchy so that
//! questions like "is this guarded?" are exhaustive matches:
//!
//! | Kind | Arity | Notes |
//! |------|-------|-------|
//! | `Plain` | parameter count | native body with typed parameters |
//! | `Constructor` | parameter count | returns a newly owned value |
//! | `Bound` | underlying minus bound | partial application, placeholders allowed |
//! | `Dynamic` | fixed or variadic | opaque body with an optional guard |
//! | `Overloads` | shared or variadic | ordered candidates under one name |
//!
//! # Matching
//!
//! An argument satisfies a parameter when the parameter is `BoxedValue`
//! (accepts anything), when the two are bare-equal, when the parameter is
//! `BoxedNumeric` and the argument holds a POD numeric, or when the
//! parameter is a registered base class of the argument's type. The last
//! rule converts the argument before the body runs.

use std::fmt;
use std::sync::Arc;

use mica_stack::ensure_sufficient_stack;
use mica_types::TypeInfo;
use mica_value::{
    arity_mismatch, type_mismatch, BoxedNumeric, BoxedValue, DispatchError, DispatchResult,
};
use smallvec::SmallVec;

use crate::context::DispatchContext;
use crate::conversions::TypeConversions;
use crate::overload::OverloadSet;

/// Argument list after bound values and upcasts are applied.
pub(crate) type ArgList = SmallVec<[BoxedValue; 4]>;

/// Parameter type list; most callables take four or fewer.
pub type ParamTypes = SmallVec<[TypeInfo; 4]>;

/// Body of a native or dynamic callable.
pub type NativeBody =
    Arc<dyn Fn(&DispatchContext, &[BoxedValue]) -> DispatchResult + Send + Sync>;

/// Number of arguments a callable accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => n == count,
            Arity::Variadic => true,
        }
    }

    /// Script-facing arity: the fixed count, or `-1` for variadic.
    pub fn as_i32(self) -> i32 {
        match self {
            Arity::Fixed(n) => i32::try_from(n).unwrap_or(i32::MAX),
            Arity::Variadic => -1,
        }
    }

    fn check(self, count: usize) -> DispatchResult<()> {
        match self {
            Arity::Fixed(n) if n != count => Err(arity_mismatch(count, n)),
            _ => Ok(()),
        }
    }
}

/// Marker bound in place of an argument to be supplied at call time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placeholder;

fn is_placeholder(value: &BoxedValue) -> bool {
    value.get_type_info().is::<Placeholder>()
}

/// A native body with a typed signature.
#[derive(Clone)]
pub struct NativeFunction {
    params: ParamTypes,
    return_type: TypeInfo,
    body: NativeBody,
}

impl NativeFunction {
    pub fn new(
        params: ParamTypes,
        return_type: TypeInfo,
        body: impl Fn(&DispatchContext, &[BoxedValue]) -> DispatchResult + Send + Sync + 'static,
    ) -> Self {
        NativeFunction {
            params,
            return_type,
            body: Arc::new(body),
        }
    }

    pub fn params(&self) -> &[TypeInfo] {
        &self.params
    }

    pub fn return_type(&self) -> TypeInfo {
        self.return_type
    }
}

/// Partial application of another callable.
#[derive(Clone)]
pub struct BoundFunction {
    function: ProxyFunction,
    bound: Vec<BoxedValue>,
}

impl BoundFunction {
    pub fn function(&self) -> &ProxyFunction {
        &self.function
    }

    pub fn bound(&self) -> &[BoxedValue] {
        &self.bound
    }

    fn placeholders(&self) -> usize {
        self.bound.iter().filter(|v| is_placeholder(v)).count()
    }

    fn arity(&self) -> Arity {
        match self.function.arity() {
            Arity::Fixed(n) => Arity::Fixed(n + self.placeholders() - self.bound.len()),
            Arity::Variadic => Arity::Variadic,
        }
    }

    /// Bound values with placeholders filled from `args`, then the rest of
    /// `args` appended.
    fn merge(&self, args: &[BoxedValue]) -> DispatchResult<ArgList> {
        let mut rest = args.iter();
        let mut merged = ArgList::with_capacity(self.bound.len() + args.len());
        for value in &self.bound {
            if is_placeholder(value) {
                let arg = rest
                    .next()
                    .ok_or_else(|| arity_mismatch(args.len(), self.placeholders()))?;
                merged.push(arg.clone());
            } else {
                merged.push(value.clone());
            }
        }
        merged.extend(rest.cloned());
        Ok(merged)
    }
}

/// Script-defined callable: opaque body plus optional guard.
#[derive(Clone)]
pub struct DynamicFunction {
    arity: Arity,
    body: NativeBody,
    guard: Option<ProxyFunction>,
}

impl DynamicFunction {
    pub fn guard(&self) -> Option<&ProxyFunction> {
        self.guard.as_ref()
    }

    /// Whether the guard (if any) accepts `args`.
    ///
    /// A guard that cannot be called with `args` rejects them; any other
    /// guard failure propagates.
    fn guard_accepts(&self, args: &[BoxedValue], ctx: &DispatchContext) -> DispatchResult<bool> {
        let Some(guard) = &self.guard else {
            return Ok(true);
        };
        match guard.call(args, ctx) {
            Ok(result) => result.cast::<bool>(),
            Err(err) if err.is_signature_failure() => Ok(false),
            Err(err) => Err(err),
        }
    }
}

/// The closed set of callable shapes.
#[derive(Clone)]
pub enum FunctionKind {
    Plain(NativeFunction),
    Constructor(NativeFunction),
    Bound(BoundFunction),
    Dynamic(DynamicFunction),
    Overloads(OverloadSet),
}

#[derive(Clone)]
struct FunctionInner {
    kind: FunctionKind,
    annotation: String,
}

/// Shareable handle to a callable. Cloning shares the callable.
#[derive(Clone)]
pub struct ProxyFunction(Arc<FunctionInner>);

impl ProxyFunction {
    fn from_kind(kind: FunctionKind) -> Self {
        ProxyFunction(Arc::new(FunctionInner {
            kind,
            annotation: String::new(),
        }))
    }

    /// A plain native callable.
    pub fn native(function: NativeFunction) -> Self {
        Self::from_kind(FunctionKind::Plain(function))
    }

    /// A native constructor.
    pub fn native_constructor(function: NativeFunction) -> Self {
        Self::from_kind(FunctionKind::Constructor(function))
    }

    /// A script-defined callable without a guard.
    pub fn dynamic(
        arity: Arity,
        body: impl Fn(&DispatchContext, &[BoxedValue]) -> DispatchResult + Send + Sync + 'static,
    ) -> Self {
        Self::from_kind(FunctionKind::Dynamic(DynamicFunction {
            arity,
            body: Arc::new(body),
            guard: None,
        }))
    }

    /// A script-defined callable eligible only when `guard` returns true.
    pub fn guarded(
        arity: Arity,
        guard: ProxyFunction,
        body: impl Fn(&DispatchContext, &[BoxedValue]) -> DispatchResult + Send + Sync + 'static,
    ) -> Self {
        Self::from_kind(FunctionKind::Dynamic(DynamicFunction {
            arity,
            body: Arc::new(body),
            guard: Some(guard),
        }))
    }

    /// Partially apply `function` to `bound`.
    ///
    /// `Placeholder` values reserve a position for a call-time argument.
    /// Binding more concrete values than a fixed arity accepts fails.
    pub fn bound(function: ProxyFunction, bound: Vec<BoxedValue>) -> DispatchResult<Self> {
        let bound = BoundFunction { function, bound };
        if let Arity::Fixed(n) = bound.function.arity() {
            let concrete = bound.bound.len() - bound.placeholders();
            if concrete > n {
                return Err(arity_mismatch(concrete, n));
            }
        }
        Ok(Self::from_kind(FunctionKind::Bound(bound)))
    }

    /// An ordered overload set under `name`.
    pub fn overloads(name: impl Into<String>, candidates: Vec<ProxyFunction>) -> Self {
        Self::from_kind(FunctionKind::Overloads(OverloadSet::new(name, candidates)))
    }

    /// Same callable with a documentation string attached.
    #[must_use]
    pub fn annotated(self, annotation: impl Into<String>) -> Self {
        let mut inner = Arc::unwrap_or_clone(self.0);
        inner.annotation = annotation.into();
        ProxyFunction(Arc::new(inner))
    }

    pub fn kind(&self) -> &FunctionKind {
        &self.0.kind
    }

    pub fn annotation(&self) -> &str {
        &self.0.annotation
    }

    pub fn arity(&self) -> Arity {
        match &self.0.kind {
            FunctionKind::Plain(f) | FunctionKind::Constructor(f) => Arity::Fixed(f.params.len()),
            FunctionKind::Bound(b) => b.arity(),
            FunctionKind::Dynamic(d) => d.arity,
            FunctionKind::Overloads(set) => set.arity(),
        }
    }

    /// Declared parameter types, one per position.
    ///
    /// Dynamic callables report `BoxedValue` per position; variadic callables
    /// report none.
    pub fn parameter_types(&self) -> Vec<TypeInfo> {
        match &self.0.kind {
            FunctionKind::Plain(f) | FunctionKind::Constructor(f) => f.params.to_vec(),
            FunctionKind::Bound(b) => bound_parameter_types(b),
            FunctionKind::Dynamic(d) => object_params(d.arity),
            FunctionKind::Overloads(set) => set.parameter_types(),
        }
    }

    pub fn return_type(&self) -> TypeInfo {
        match &self.0.kind {
            FunctionKind::Plain(f) | FunctionKind::Constructor(f) => f.return_type,
            FunctionKind::Bound(b) => b.function.return_type(),
            FunctionKind::Dynamic(_) | FunctionKind::Overloads(_) => TypeInfo::of::<BoxedValue>(),
        }
    }

    /// Functions nested inside this one: the target of a bind, or the
    /// candidates of an overload set.
    pub fn contained_functions(&self) -> Vec<ProxyFunction> {
        match &self.0.kind {
            FunctionKind::Bound(b) => vec![b.function.clone()],
            FunctionKind::Overloads(set) => set.candidates().to_vec(),
            FunctionKind::Plain(_) | FunctionKind::Constructor(_) | FunctionKind::Dynamic(_) => {
                Vec::new()
            }
        }
    }

    pub fn guard(&self) -> Option<&ProxyFunction> {
        match &self.0.kind {
            FunctionKind::Dynamic(d) => d.guard(),
            _ => None,
        }
    }

    /// Human-readable signature for diagnostics, e.g. `(i32, i32) -> i32`.
    pub fn signature(&self) -> String {
        match &self.0.kind {
            FunctionKind::Plain(f) => format!("{} -> {}", param_list(&f.params), f.return_type),
            FunctionKind::Constructor(f) => {
                format!("new {}{}", f.return_type, param_list(&f.params))
            }
            FunctionKind::Bound(b) => format!("bind {}", b.function.signature()),
            FunctionKind::Dynamic(d) => {
                let params = match d.arity {
                    Arity::Fixed(_) => param_list(&object_params(d.arity)),
                    Arity::Variadic => "(...)".to_string(),
                };
                if d.guard.is_some() {
                    format!("{params} [guarded]")
                } else {
                    params
                }
            }
            FunctionKind::Overloads(set) => format!("{}/{}", set.name(), set.candidates().len()),
        }
    }

    /// Whether both handles refer to the same callable.
    pub fn ptr_eq(&self, other: &ProxyFunction) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether `args` would be accepted, running guards but no bodies.
    pub(crate) fn matches(&self, args: &[BoxedValue], ctx: &DispatchContext) -> DispatchResult<bool> {
        match &self.0.kind {
            FunctionKind::Plain(f) | FunctionKind::Constructor(f) => {
                if f.params.len() != args.len() {
                    return Ok(false);
                }
                let conversions = ctx.conversions().read();
                Ok(f
                    .params
                    .iter()
                    .zip(args)
                    .all(|(param, arg)| param_accepts(param, arg, &conversions).is_some()))
            }
            FunctionKind::Bound(b) => {
                if !b.arity().accepts(args.len()) {
                    return Ok(false);
                }
                match b.merge(args) {
                    Ok(merged) => b.function.matches(&merged, ctx),
                    Err(_) => Ok(false),
                }
            }
            FunctionKind::Dynamic(d) => {
                if !d.arity.accepts(args.len()) {
                    return Ok(false);
                }
                d.guard_accepts(args, ctx)
            }
            FunctionKind::Overloads(set) => {
                for candidate in set.candidates() {
                    if candidate.matches(args, ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Dry-run compatibility check. Never invokes a body; guard failures
    /// count as "no".
    pub fn call_match(&self, args: &[BoxedValue], ctx: &DispatchContext) -> bool {
        self.matches(args, ctx).unwrap_or(false)
    }

    /// Invoke with `args`.
    ///
    /// Fails with `Arity` or `TypeMismatch` when the arguments do not fit,
    /// `GuardFailed` when a guard rejects them, and `NoMatchingOverload`
    /// when no candidate of an overload set accepts them.
    pub fn call(&self, args: &[BoxedValue], ctx: &DispatchContext) -> DispatchResult {
        let nested = ctx.nested()?;
        ensure_sufficient_stack(|| self.invoke(args, &nested, GuardCheck::Run))
    }

    pub(crate) fn invoke(
        &self,
        args: &[BoxedValue],
        ctx: &DispatchContext,
        guard_check: GuardCheck,
    ) -> DispatchResult {
        match &self.0.kind {
            FunctionKind::Plain(f) | FunctionKind::Constructor(f) => call_native(f, args, ctx),
            FunctionKind::Bound(b) => {
                b.arity().check(args.len())?;
                let merged = b.merge(args)?;
                b.function.call(&merged, ctx)
            }
            FunctionKind::Dynamic(d) => {
                d.arity.check(args.len())?;
                if guard_check == GuardCheck::Run && !d.guard_accepts(args, ctx)? {
                    return Err(DispatchError::GuardFailed);
                }
                (d.body)(ctx, args)
            }
            FunctionKind::Overloads(set) => set.dispatch(args, ctx),
        }
    }
}

/// Whether a Dynamic callable's guard still needs evaluating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GuardCheck {
    Run,
    /// Dispatch already evaluated it while matching.
    Skip,
}

impl PartialEq for ProxyFunction {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ProxyFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProxyFunction({})", self.signature())
    }
}

mica_value::impl_native_value!(ProxyFunction, Placeholder);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParamMatch {
    Direct,
    Upcast,
}

fn param_accepts(
    param: &TypeInfo,
    arg: &BoxedValue,
    conversions: &TypeConversions,
) -> Option<ParamMatch> {
    if param.is::<BoxedValue>() {
        return Some(ParamMatch::Direct);
    }
    let arg_type = arg.get_type_info();
    if param.bare_equal(&arg_type) {
        return Some(ParamMatch::Direct);
    }
    if param.is::<BoxedNumeric>() && !arg_type.is_pointer() && BoxedNumeric::is_numeric(&arg_type)
    {
        return Some(ParamMatch::Direct);
    }
    if conversions.is_base_of(param, &arg_type) {
        return Some(ParamMatch::Upcast);
    }
    None
}

fn call_native(f: &NativeFunction, args: &[BoxedValue], ctx: &DispatchContext) -> DispatchResult {
    if f.params.len() != args.len() {
        return Err(arity_mismatch(args.len(), f.params.len()));
    }
    let prepared = {
        let conversions = ctx.conversions().read();
        let mut prepared = ArgList::with_capacity(args.len());
        for (param, arg) in f.params.iter().zip(args) {
            match param_accepts(param, arg, &conversions) {
                Some(ParamMatch::Direct) => prepared.push(arg.clone()),
                Some(ParamMatch::Upcast) => match conversions.upcast(arg, param) {
                    Some(upcast) => prepared.push(upcast?),
                    None => prepared.push(arg.clone()),
                },
                None => {
                    return Err(type_mismatch(format!(
                        "expected {param}, got {}",
                        arg.get_type_info()
                    )))
                }
            }
        }
        prepared
    };
    (f.body)(ctx, &prepared)
}

fn param_list(params: &[TypeInfo]) -> String {
    let names: Vec<String> = params.iter().map(TypeInfo::name).collect();
    format!("({})", names.join(", "))
}

fn object_params(arity: Arity) -> Vec<TypeInfo> {
    match arity {
        Arity::Fixed(n) => vec![TypeInfo::of::<BoxedValue>(); n],
        Arity::Variadic => Vec::new(),
    }
}

/// Parameter types of the underlying callable at the positions left open.
fn bound_parameter_types(b: &BoundFunction) -> Vec<TypeInfo> {
    let underlying = b.function.parameter_types();
    let mut open = Vec::new();
    for (index, param) in underlying.iter().enumerate() {
        match b.bound.get(index) {
            Some(value) if !is_placeholder(value) => {}
            _ => open.push(*param),
        }
    }
    open
}

#[cfg(test)]
mod tests;
