//! Type-erased value container.
//!
//! # Handles and payloads
//!
//! A `BoxedValue` is a *handle*: cloning it yields another handle to the
//! same binding, so assigning through one handle is visible through every
//! other (this is how attribute slots and variables alias). The binding in
//! turn owns or references a *payload* according to its [`Ownership`]:
//!
//! - `OwnedCopy`: the binding owns its payload; [`BoxedValue::copy`] makes
//!   an independent duplicate.
//! - `SharedReference`: the payload lives in shared storage; copies alias it
//!   and it lives as long as its longest holder.
//! - `RawPointer`: the binding points at storage owned elsewhere and never
//!   keeps it alive; once the owner is gone the value reads as null.
//!
//! # Locking
//!
//! Bindings and payload slots each sit behind a `parking_lot::RwLock`.
//! No code path holds a payload lock while taking a binding lock, and
//! payload reads are released before the matching write, so `x = x` and
//! `x += x` on aliased handles cannot deadlock.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use mica_types::TypeInfo;
use parking_lot::RwLock;

use crate::errors::{bad_cast, type_mismatch, DispatchResult};

/// Object-safe view of any payload a `BoxedValue` can hold.
///
/// Implemented for every `Clone + Send + Sync + 'static` type.
pub trait AnyValue: Any + Send + Sync {
    fn clone_box(&self) -> Box<dyn AnyValue>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Clone + Send + Sync> AnyValue for T {
    fn clone_box(&self) -> Box<dyn AnyValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type Payload = Box<dyn AnyValue>;
type Slot = Arc<RwLock<Payload>>;

fn new_slot<T: AnyValue>(value: T) -> Slot {
    Arc::new(RwLock::new(Box::new(value)))
}

fn duplicate(slot: &Slot) -> Payload {
    let guard = slot.read();
    AnyValue::clone_box(&**guard)
}

/// How a defined `BoxedValue` holds its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    OwnedCopy,
    SharedReference,
    RawPointer,
}

#[derive(Clone)]
enum Storage {
    Undef,
    Owned(Slot),
    Shared(Slot),
    Pointer(Weak<RwLock<Payload>>),
}

impl Storage {
    fn slot(&self) -> Option<Slot> {
        match self {
            Storage::Undef => None,
            Storage::Owned(slot) | Storage::Shared(slot) => Some(Arc::clone(slot)),
            Storage::Pointer(weak) => weak.upgrade(),
        }
    }

    /// Value copy: owned payloads are duplicated, everything else aliases.
    fn copied(&self) -> Storage {
        match self {
            Storage::Owned(slot) => Storage::Owned(Arc::new(RwLock::new(duplicate(slot)))),
            other => other.clone(),
        }
    }
}

struct Binding {
    type_info: TypeInfo,
    storage: Storage,
}

/// Type-erased holder of one value plus its `TypeInfo` and ownership mode.
#[derive(Clone)]
pub struct BoxedValue {
    binding: Arc<RwLock<Binding>>,
}

impl BoxedValue {
    fn from_parts(type_info: TypeInfo, storage: Storage) -> Self {
        BoxedValue {
            binding: Arc::new(RwLock::new(Binding { type_info, storage })),
        }
    }

    /// A value with no type bound yet.
    pub fn undef() -> Self {
        Self::from_parts(TypeInfo::undef(), Storage::Undef)
    }

    /// Box `value` by value (owned copy).
    pub fn new<T: AnyValue>(value: T) -> Self {
        Self::from_parts(TypeInfo::of::<T>(), Storage::Owned(new_slot(value)))
    }

    /// Box `()`.
    pub fn void() -> Self {
        Self::new(())
    }

    /// Box `value` by value, forbidding mutation and reassignment.
    pub fn new_const<T: AnyValue>(value: T) -> Self {
        Self::from_parts(
            TypeInfo::of::<T>().with_const(),
            Storage::Owned(new_slot(value)),
        )
    }

    /// Box `value` in shared storage; every copy aliases it.
    pub fn shared<T: AnyValue>(value: T) -> Self {
        Self::from_parts(
            TypeInfo::of::<T>().with_reference(),
            Storage::Shared(new_slot(value)),
        )
    }

    /// A pointer of type `T` that points at nothing.
    pub fn null_pointer<T: AnyValue>() -> Self {
        Self::from_parts(
            TypeInfo::of::<T>().with_pointer(),
            Storage::Pointer(Weak::new()),
        )
    }

    /// A non-owning pointer to this value's payload.
    pub fn pointer_to(&self) -> DispatchResult<Self> {
        let binding = self.binding.read();
        let weak = match &binding.storage {
            Storage::Undef => {
                return Err(type_mismatch("cannot take a pointer to an undefined value"))
            }
            Storage::Owned(slot) | Storage::Shared(slot) => Arc::downgrade(slot),
            Storage::Pointer(weak) => weak.clone(),
        };
        Ok(Self::from_parts(
            binding.type_info.by_value().with_pointer(),
            Storage::Pointer(weak),
        ))
    }

    /// Make a value copy according to the ownership mode.
    ///
    /// Owned payloads are duplicated; shared references and pointers keep
    /// aliasing the same storage. The new handle is a separate binding.
    pub fn copy(&self) -> Self {
        let binding = self.binding.read();
        Self::from_parts(binding.type_info, binding.storage.copied())
    }

    /// Assign `other` into this binding.
    ///
    /// Succeeds when this value is undefined, or when it is not const and
    /// bare-equal to `other`. An undefined target adopts the source's type
    /// and a copy of its payload; a defined target has its payload replaced
    /// in place, so every alias observes the new value. Pointer targets are
    /// rebound rather than written through.
    pub fn assign(&self, other: &BoxedValue) -> DispatchResult<()> {
        if self.ptr_eq(other) {
            return Ok(());
        }

        let (source_type, source_storage) = {
            let source = other.binding.read();
            (source.type_info, source.storage.clone())
        };
        let target_type = self.get_type_info();

        if target_type.is_undef() {
            let storage = source_storage.copied();
            let mut target = self.binding.write();
            target.type_info = source_type.without_const();
            target.storage = storage;
            return Ok(());
        }

        if target_type.is_const() {
            return Err(type_mismatch(format!(
                "cannot assign to const value of type {}",
                target_type.name()
            )));
        }
        if !target_type.bare_equal(&source_type) {
            return Err(type_mismatch(format!(
                "cannot assign {} to {}",
                source_type.name(),
                target_type.name()
            )));
        }

        if target_type.is_pointer() {
            self.binding.write().storage = source_storage;
            return Ok(());
        }

        let source_slot = source_storage
            .slot()
            .ok_or_else(|| type_mismatch("cannot assign from a null pointer"))?;
        let payload = duplicate(&source_slot);
        let target_slot = self.slot()?;
        *target_slot.write() = payload;
        Ok(())
    }

    pub fn get_type_info(&self) -> TypeInfo {
        self.binding.read().type_info
    }

    pub fn ownership(&self) -> Option<Ownership> {
        match self.binding.read().storage {
            Storage::Undef => None,
            Storage::Owned(_) => Some(Ownership::OwnedCopy),
            Storage::Shared(_) => Some(Ownership::SharedReference),
            Storage::Pointer(_) => Some(Ownership::RawPointer),
        }
    }

    pub fn is_undef(&self) -> bool {
        self.get_type_info().is_undef()
    }

    /// True for undefined values and pointers whose referent is gone.
    pub fn is_null(&self) -> bool {
        match &self.binding.read().storage {
            Storage::Undef => true,
            Storage::Owned(_) | Storage::Shared(_) => false,
            Storage::Pointer(weak) => weak.strong_count() == 0,
        }
    }

    pub fn is_const(&self) -> bool {
        self.get_type_info().is_const()
    }

    pub fn is_ref(&self) -> bool {
        self.get_type_info().is_reference()
    }

    pub fn is_pointer(&self) -> bool {
        self.get_type_info().is_pointer()
    }

    /// Bare-equality against `type_info`.
    pub fn is_type(&self, type_info: &TypeInfo) -> bool {
        self.get_type_info().bare_equal(type_info)
    }

    /// Whether both handles refer to the same binding.
    pub fn ptr_eq(&self, other: &BoxedValue) -> bool {
        Arc::ptr_eq(&self.binding, &other.binding)
    }

    fn slot(&self) -> DispatchResult<Slot> {
        let binding = self.binding.read();
        binding.storage.slot().ok_or_else(|| {
            if binding.type_info.is_undef() {
                type_mismatch("value is undefined")
            } else {
                type_mismatch(format!(
                    "null pointer of type {}",
                    binding.type_info.name()
                ))
            }
        })
    }

    /// Borrow the payload as `&dyn Any`.
    pub fn with_any<R>(&self, f: impl FnOnce(&dyn Any) -> R) -> DispatchResult<R> {
        let slot = self.slot()?;
        let guard = slot.read();
        let result = f(AnyValue::as_any(&**guard));
        Ok(result)
    }

    /// Borrow the payload as `&T`.
    pub fn with_ref<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> DispatchResult<R> {
        let type_info = self.get_type_info();
        let slot = self.slot()?;
        let guard = slot.read();
        let value = AnyValue::as_any(&**guard)
            .downcast_ref::<T>()
            .ok_or_else(|| bad_cast(&type_info.name(), &TypeInfo::of::<T>().name()))?;
        let result = f(value);
        Ok(result)
    }

    /// Borrow the payload as `&mut T`. Fails on const values.
    pub fn with_mut<T: 'static, R>(&self, f: impl FnOnce(&mut T) -> R) -> DispatchResult<R> {
        let type_info = self.get_type_info();
        if type_info.is_const() {
            return Err(type_mismatch(format!(
                "cannot modify const value of type {}",
                type_info.name()
            )));
        }
        let slot = self.slot()?;
        let mut guard = slot.write();
        let value = AnyValue::as_any_mut(&mut **guard)
            .downcast_mut::<T>()
            .ok_or_else(|| bad_cast(&type_info.name(), &TypeInfo::of::<T>().name()))?;
        let result = f(value);
        Ok(result)
    }

    /// Clone the payload out as a native `T`.
    pub fn cast<T: Clone + 'static>(&self) -> DispatchResult<T> {
        self.with_ref(T::clone)
    }
}

impl Default for BoxedValue {
    fn default() -> Self {
        Self::undef()
    }
}

impl fmt::Debug for BoxedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let binding = self.binding.read();
        match &binding.storage {
            Storage::Undef => write!(f, "BoxedValue(undefined)"),
            Storage::Pointer(weak) if weak.strong_count() == 0 => {
                write!(f, "BoxedValue(null {})", binding.type_info.name())
            }
            _ => write!(f, "BoxedValue({})", binding.type_info.name()),
        }
    }
}

/// True iff both values are bare-equal.
pub fn type_match(a: &BoxedValue, b: &BoxedValue) -> bool {
    a.get_type_info().bare_equal(&b.get_type_info())
}

#[cfg(test)]
mod tests;
