//! Registered base/derived relations and the upcasts they enable.

use std::fmt;
use std::sync::Arc;

use mica_types::TypeInfo;
use mica_value::{AnyValue, BoxedValue, DispatchResult};

/// Converts a boxed derived value into a boxed base value.
pub type UpcastFn = fn(&BoxedValue) -> DispatchResult<BoxedValue>;

/// Upcast through `Into`: clones the derived payload and converts it.
pub fn upcast_via_into<B, D>(value: &BoxedValue) -> DispatchResult<BoxedValue>
where
    B: AnyValue,
    D: Clone + Into<B> + 'static,
{
    let derived = value.cast::<D>()?;
    Ok(BoxedValue::new(derived.into()))
}

/// A declared base/derived pair.
#[derive(Clone, Copy)]
pub struct BaseClass {
    base: TypeInfo,
    derived: TypeInfo,
    upcast: UpcastFn,
}

impl BaseClass {
    /// Declare `B` as a base of `D`, upcasting with `D: Into<B>`.
    pub fn new<B, D>() -> Self
    where
        B: AnyValue,
        D: AnyValue + Clone + Into<B>,
    {
        Self::with_upcast(TypeInfo::of::<B>(), TypeInfo::of::<D>(), upcast_via_into::<B, D>)
    }

    pub fn with_upcast(base: TypeInfo, derived: TypeInfo, upcast: UpcastFn) -> Self {
        BaseClass {
            base,
            derived,
            upcast,
        }
    }

    pub fn base(&self) -> TypeInfo {
        self.base
    }

    pub fn derived(&self) -> TypeInfo {
        self.derived
    }
}

impl fmt::Debug for BaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BaseClass({} <- {})", self.base, self.derived)
    }
}

/// Table of base/derived relations consulted during dispatch.
///
/// Relations are direct only; a base of a base is not implied.
#[derive(Clone, Debug, Default)]
pub struct TypeConversions {
    relations: Vec<BaseClass>,
}

impl TypeConversions {
    /// Record a relation. Re-declaring an existing pair replaces its upcast.
    pub fn add(&mut self, relation: BaseClass) {
        if let Some(existing) = self.relations.iter_mut().find(|r| {
            r.base.bare_equal(&relation.base) && r.derived.bare_equal(&relation.derived)
        }) {
            *existing = relation;
        } else {
            self.relations.push(relation);
        }
    }

    fn find(&self, base: &TypeInfo, derived: &TypeInfo) -> Option<&BaseClass> {
        self.relations
            .iter()
            .find(|r| r.base.bare_equal(base) && r.derived.bare_equal(derived))
    }

    pub fn is_base_of(&self, base: &TypeInfo, derived: &TypeInfo) -> bool {
        self.find(base, derived).is_some()
    }

    /// Convert `value` to `base`, if a relation is registered.
    pub fn upcast(&self, value: &BoxedValue, base: &TypeInfo) -> Option<DispatchResult<BoxedValue>> {
        let relation = self.find(base, &value.get_type_info())?;
        Some((relation.upcast)(value))
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// Conversion table shared between a registry and the contexts it hands
/// out.
///
/// Written during registration, read during dispatch.
#[derive(Clone, Default)]
pub struct SharedConversions(Arc<parking_lot::RwLock<TypeConversions>>);

impl SharedConversions {
    pub fn new(conversions: TypeConversions) -> Self {
        SharedConversions(Arc::new(parking_lot::RwLock::new(conversions)))
    }

    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, TypeConversions> {
        self.0.read()
    }

    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, TypeConversions> {
        self.0.write()
    }
}

impl fmt::Debug for SharedConversions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedConversions({:?})", &*self.0.read())
    }
}
