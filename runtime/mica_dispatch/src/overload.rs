//! Ordered overload sets and the resolution algorithm.

use mica_types::TypeInfo;
use mica_value::{no_matching_overload, BoxedValue, DispatchResult};

use crate::context::DispatchContext;
use crate::function::{Arity, GuardCheck, ProxyFunction};

/// Candidates sharing one registered name, in registration order.
#[derive(Clone)]
pub struct OverloadSet {
    name: String,
    candidates: Vec<ProxyFunction>,
}

impl OverloadSet {
    pub fn new(name: impl Into<String>, candidates: Vec<ProxyFunction>) -> Self {
        OverloadSet {
            name: name.into(),
            candidates,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn candidates(&self) -> &[ProxyFunction] {
        &self.candidates
    }

    /// The candidates' common arity, or variadic when they disagree.
    pub fn arity(&self) -> Arity {
        let mut arities = self.candidates.iter().map(ProxyFunction::arity);
        let Some(first) = arities.next() else {
            return Arity::Variadic;
        };
        if arities.all(|a| a == first) {
            first
        } else {
            Arity::Variadic
        }
    }

    /// Per-position parameter types: kept where every candidate agrees,
    /// `BoxedValue` where they differ.
    pub fn parameter_types(&self) -> Vec<TypeInfo> {
        let Arity::Fixed(_) = self.arity() else {
            return Vec::new();
        };
        let mut candidates = self.candidates.iter().map(ProxyFunction::parameter_types);
        let Some(mut merged) = candidates.next() else {
            return Vec::new();
        };
        for params in candidates {
            for (slot, param) in merged.iter_mut().zip(&params) {
                if !slot.bare_equal(param) {
                    *slot = TypeInfo::of::<BoxedValue>();
                }
            }
        }
        merged
    }

    /// Invoke the first candidate, in registration order, that accepts
    /// `args`. See [`dispatch`].
    pub fn dispatch(&self, args: &[BoxedValue], ctx: &DispatchContext) -> DispatchResult {
        dispatch(&self.name, &self.candidates, args, ctx)
    }
}

/// Invoke the first of `candidates`, in order, that accepts `args`.
///
/// Signature mismatches and rejecting guards move on to the next
/// candidate. A matched candidate's own failure propagates. Exhaustion
/// yields `NoMatchingOverload` listing every candidate's signature.
#[tracing::instrument(level = "debug", skip_all, fields(function = %name, argc = args.len()))]
pub(crate) fn dispatch(
    name: &str,
    candidates: &[ProxyFunction],
    args: &[BoxedValue],
    ctx: &DispatchContext,
) -> DispatchResult {
    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.matches(args, ctx)? {
            tracing::debug!(index, signature = %candidate.signature(), "selected candidate");
            return candidate.invoke(args, ctx, GuardCheck::Skip);
        }
        tracing::trace!(index, signature = %candidate.signature(), "skipped candidate");
    }
    Err(no_matching_overload(
        name,
        candidates.iter().map(ProxyFunction::signature).collect(),
    ))
}
