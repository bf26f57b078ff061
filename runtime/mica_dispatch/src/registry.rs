//! Name-keyed store of overload sets, type names and base classes.
//!
//! Registration is additive: adding a callable under an existing name
//! appends it to that name's overload set, after every earlier candidate.
//! Type names are last-write-wins.
//!
//! Mutation happens through `&mut Registry`; once registration is done a
//! `&Registry` can be shared across threads and dispatched against
//! concurrently.

use std::fmt;
use std::sync::Arc;

use mica_types::TypeInfo;
use mica_value::{no_such_function, BoxedValue, DispatchError, DispatchResult};
use rustc_hash::FxHashMap;

use crate::context::{DispatchContext, DispatchLimits};
use crate::conversions::{BaseClass, SharedConversions};
use crate::function::ProxyFunction;
use crate::overload::dispatch;

/// Script evaluator the registry can delegate source snippets to.
///
/// The evaluator may register new names as a side effect.
pub trait Evaluator: Send + Sync {
    fn eval(&self, source: &str, registry: &mut Registry) -> DispatchResult;
}

/// Anything that can be registered under a name.
#[derive(Clone, Debug)]
pub enum Entity {
    Function(ProxyFunction),
    Type(TypeInfo),
    /// The name is ignored; relations are keyed by their types.
    BaseClass(BaseClass),
}

impl From<ProxyFunction> for Entity {
    fn from(function: ProxyFunction) -> Self {
        Entity::Function(function)
    }
}

impl From<TypeInfo> for Entity {
    fn from(type_info: TypeInfo) -> Self {
        Entity::Type(type_info)
    }
}

impl From<BaseClass> for Entity {
    fn from(relation: BaseClass) -> Self {
        Entity::BaseClass(relation)
    }
}

/// The registry consulted by every script-level call.
pub struct Registry {
    functions: FxHashMap<String, Vec<ProxyFunction>>,
    types: FxHashMap<String, TypeInfo>,
    conversions: SharedConversions,
    evaluator: Option<Arc<dyn Evaluator>>,
    limits: DispatchLimits,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            functions: FxHashMap::default(),
            types: FxHashMap::default(),
            conversions: SharedConversions::default(),
            evaluator: None,
            limits: DispatchLimits::default(),
        }
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Register `entity` under `name`.
    pub fn add(&mut self, name: &str, entity: impl Into<Entity>) -> &mut Self {
        match entity.into() {
            Entity::Function(function) => self.add_fn(name, function),
            Entity::Type(type_info) => self.add_type(name, type_info),
            Entity::BaseClass(relation) => self.add_base_class(relation),
        }
    }

    /// Append `function` to the overload set for `name`.
    pub fn add_fn(&mut self, name: &str, function: ProxyFunction) -> &mut Self {
        let candidates = self.functions.entry(name.to_string()).or_default();
        candidates.push(function);
        if candidates.len() > 1 {
            tracing::debug!(name, candidates = candidates.len(), "merged into overload set");
        }
        self
    }

    pub fn add_type(&mut self, name: &str, type_info: TypeInfo) -> &mut Self {
        tracing::trace!(name, type_info = %type_info, "registered type");
        self.types.insert(name.to_string(), type_info);
        self
    }

    pub fn add_base_class(&mut self, relation: BaseClass) -> &mut Self {
        tracing::trace!(?relation, "registered base class");
        self.conversions.write().add(relation);
        self
    }

    /// Candidates registered under `name`, in registration order.
    pub fn candidates(&self, name: &str) -> Option<&[ProxyFunction]> {
        self.functions.get(name).map(Vec::as_slice)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// The overload set for `name` as a single callable.
    pub fn get_function(&self, name: &str) -> DispatchResult<ProxyFunction> {
        let candidates = self.candidates(name).ok_or_else(|| no_such_function(name))?;
        Ok(ProxyFunction::overloads(name, candidates.to_vec()))
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn get_type(&self, name: &str) -> Option<TypeInfo> {
        self.types.get(name).copied()
    }

    /// Registered name of `type_info`, compared bare.
    pub fn get_type_name(&self, type_info: &TypeInfo) -> Option<&str> {
        self.types
            .iter()
            .find(|(_, registered)| registered.bare_equal(type_info))
            .map(|(name, _)| name.as_str())
    }

    pub fn is_base_of(&self, base: &TypeInfo, derived: &TypeInfo) -> bool {
        self.conversions.read().is_base_of(base, derived)
    }

    pub fn limits(&self) -> DispatchLimits {
        self.limits
    }

    /// Fresh top-level context for calls against this registry.
    pub fn context(&self) -> DispatchContext {
        DispatchContext::new(self.conversions.clone(), self.limits)
    }

    /// Resolve `name` against `args` and invoke the selected candidate.
    pub fn call(&self, name: &str, args: &[BoxedValue]) -> DispatchResult {
        self.call_in(name, args, &self.context())
    }

    /// As [`Registry::call`], continuing an existing call chain.
    pub fn call_in(&self, name: &str, args: &[BoxedValue], ctx: &DispatchContext) -> DispatchResult {
        let candidates = self.candidates(name).ok_or_else(|| no_such_function(name))?;
        dispatch(name, candidates, args, ctx)
    }

    /// Whether some candidate under `name` accepts `args`. Invokes nothing
    /// but guards.
    pub fn call_match(&self, name: &str, args: &[BoxedValue]) -> bool {
        let ctx = self.context();
        self.candidates(name)
            .is_some_and(|candidates| candidates.iter().any(|c| c.call_match(args, &ctx)))
    }

    pub fn set_evaluator(&mut self, evaluator: Arc<dyn Evaluator>) {
        self.evaluator = Some(evaluator);
    }

    pub fn has_evaluator(&self) -> bool {
        self.evaluator.is_some()
    }

    /// Hand `source` to the attached evaluator.
    pub fn eval(&mut self, source: &str) -> DispatchResult {
        let evaluator = self.evaluator.clone().ok_or(DispatchError::NoEvaluator)?;
        tracing::debug!(len = source.len(), "evaluating snippet");
        evaluator.eval(source, self)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.functions.len())
            .field("types", &self.types.len())
            .field("conversions", &self.conversions)
            .field("has_evaluator", &self.evaluator.is_some())
            .field("limits", &self.limits)
            .finish()
    }
}

/// Builder for a [`Registry`] with non-default configuration.
#[derive(Default)]
pub struct RegistryBuilder {
    limits: DispatchLimits,
    evaluator: Option<Arc<dyn Evaluator>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum nested call depth before `CallDepthExceeded`.
    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.limits.max_call_depth = depth;
        self
    }

    /// Attach the evaluator used by [`Registry::eval`].
    #[must_use]
    pub fn evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Some(Arc::new(evaluator));
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            evaluator: self.evaluator,
            limits: self.limits,
            ..Registry::new()
        }
    }
}

#[cfg(test)]
mod tests;
