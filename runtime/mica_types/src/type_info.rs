//! Immutable descriptor of a native type.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

bitflags::bitflags! {
    /// Qualifiers attached to a [`TypeInfo`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u8 {
        /// The value may not be mutated through this handle.
        const CONST = 1 << 0;
        /// The value aliases storage shared with other holders.
        const REFERENCE = 1 << 1;
        /// The value points at storage it does not own.
        const POINTER = 1 << 2;
        /// The bare type is `()`.
        const VOID = 1 << 3;
        /// No type has been bound yet.
        const UNDEF = 1 << 4;
    }
}

/// Descriptor of a native type: identity, qualifiers and name.
///
/// Two descriptors are equal (`==`) when identity and every qualifier
/// match. They are *bare-equal* ([`TypeInfo::bare_equal`]) when identity
/// and pointer-ness match, ignoring const and reference qualifiers; this is
/// the comparison dispatch uses.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    id: Option<TypeId>,
    flags: TypeFlags,
    bare_name: &'static str,
}

impl TypeInfo {
    /// Descriptor for a value of type `T` held by value.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let id = TypeId::of::<T>();
        let flags = if id == TypeId::of::<()>() {
            TypeFlags::VOID
        } else {
            TypeFlags::empty()
        };
        TypeInfo {
            id: Some(id),
            flags,
            bare_name: type_name::<T>(),
        }
    }

    /// Descriptor of a value that has no type bound yet.
    pub const fn undef() -> Self {
        TypeInfo {
            id: None,
            flags: TypeFlags::UNDEF,
            bare_name: "undefined",
        }
    }

    /// Descriptor of `()`.
    pub fn void() -> Self {
        Self::of::<()>()
    }

    #[must_use]
    pub fn with_const(mut self) -> Self {
        self.flags.insert(TypeFlags::CONST);
        self
    }

    #[must_use]
    pub fn without_const(mut self) -> Self {
        self.flags.remove(TypeFlags::CONST);
        self
    }

    #[must_use]
    pub fn with_reference(mut self) -> Self {
        self.flags.insert(TypeFlags::REFERENCE);
        self
    }

    #[must_use]
    pub fn with_pointer(mut self) -> Self {
        self.flags.insert(TypeFlags::POINTER);
        self
    }

    /// Strip the reference and pointer qualifiers, keeping identity and const.
    #[must_use]
    pub fn by_value(mut self) -> Self {
        self.flags.remove(TypeFlags::REFERENCE | TypeFlags::POINTER);
        self
    }

    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.id
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        self.flags.contains(TypeFlags::CONST)
    }

    #[inline]
    pub fn is_reference(&self) -> bool {
        self.flags.contains(TypeFlags::REFERENCE)
    }

    #[inline]
    pub fn is_pointer(&self) -> bool {
        self.flags.contains(TypeFlags::POINTER)
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        self.flags.contains(TypeFlags::VOID)
    }

    #[inline]
    pub fn is_undef(&self) -> bool {
        self.flags.contains(TypeFlags::UNDEF)
    }

    /// Check whether this descriptor names the bare type `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == Some(TypeId::of::<T>())
    }

    /// Qualifier-insensitive comparison used by dispatch.
    ///
    /// Identity and pointer-ness must match; const and reference qualifiers
    /// are ignored.
    pub fn bare_equal(&self, other: &TypeInfo) -> bool {
        self.id == other.id && self.is_pointer() == other.is_pointer()
    }

    /// Fully qualified Rust path of the bare type.
    pub fn bare_name(&self) -> &'static str {
        self.bare_name
    }

    /// Bare type name with module paths stripped.
    ///
    /// `alloc::vec::Vec<mica_value::BoxedValue>` becomes `Vec<BoxedValue>`.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.bare_name.len());
        let mut segment_start = 0;
        let mut chars = self.bare_name.chars().peekable();
        while let Some(c) = chars.next() {
            if c == ':' && chars.peek() == Some(&':') {
                chars.next();
                out.truncate(segment_start);
            } else if c.is_alphanumeric() || c == '_' {
                out.push(c);
            } else {
                out.push(c);
                segment_start = out.len();
            }
        }
        out
    }

    /// Qualified display name, e.g. `const i32&` or `DynamicObject*`.
    pub fn name(&self) -> String {
        if self.is_undef() {
            return self.bare_name.to_string();
        }
        let mut name = String::new();
        if self.is_const() {
            name.push_str("const ");
        }
        name.push_str(&self.short_name());
        if self.is_pointer() {
            name.push('*');
        }
        if self.is_reference() {
            name.push('&');
        }
        name
    }
}

impl Default for TypeInfo {
    fn default() -> Self {
        Self::undef()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.flags == other.flags
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.flags.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeInfo({})", self.name())
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
