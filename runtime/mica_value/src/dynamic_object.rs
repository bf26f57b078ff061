//! Script-defined objects: a type name plus named attribute slots.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::BoxedValue;

/// Attribute map of a [`DynamicObject`].
pub type AttrMap = FxHashMap<String, BoxedValue>;

/// An instance of a script-defined type.
///
/// Attribute handles returned by [`DynamicObject::get_attr`] alias the slot
/// stored in the object, so assigning through them updates the object.
/// Cloning deep-copies every attribute (see [`DynamicObject::clone_object`]).
pub struct DynamicObject {
    type_name: String,
    attrs: AttrMap,
}

impl DynamicObject {
    pub fn new(type_name: impl Into<String>) -> Self {
        DynamicObject {
            type_name: type_name.into(),
            attrs: AttrMap::default(),
        }
    }

    pub fn get_type_name(&self) -> &str {
        &self.type_name
    }

    /// Handle to the attribute `name`, creating an undefined slot on first
    /// access.
    pub fn get_attr(&mut self, name: &str) -> BoxedValue {
        if let Some(slot) = self.attrs.get(name) {
            return slot.clone();
        }
        tracing::trace!(type_name = %self.type_name, attr = name, "creating attribute slot");
        let slot = BoxedValue::undef();
        self.attrs.insert(name.to_string(), slot.clone());
        slot
    }

    /// Read-only lookup that does not create slots.
    pub fn find_attr(&self, name: &str) -> Option<&BoxedValue> {
        self.attrs.get(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    pub fn get_attrs(&self) -> &AttrMap {
        &self.attrs
    }

    /// New object with the same type name and a value copy of every
    /// attribute.
    pub fn clone_object(&self) -> DynamicObject {
        DynamicObject {
            type_name: self.type_name.clone(),
            attrs: self
                .attrs
                .iter()
                .map(|(name, value)| (name.clone(), value.copy()))
                .collect(),
        }
    }
}

impl Clone for DynamicObject {
    fn clone(&self) -> Self {
        self.clone_object()
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.attrs.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("DynamicObject")
            .field("type_name", &self.type_name)
            .field("attrs", &names)
            .finish()
    }
}
