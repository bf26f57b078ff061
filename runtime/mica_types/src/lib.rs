//! Mica Types - native type descriptors.
//!
//! `TypeInfo` is the leaf of the runtime: every boxed value, parameter list
//! and registry entry refers to native types through it. It records the
//! Rust `TypeId` of the bare type together with the qualifiers that describe
//! how a value crossed into the dynamic world (const, by reference, by
//! pointer), so that dispatch can compare types while ignoring qualifiers.

mod type_info;

pub use type_info::{TypeFlags, TypeInfo};
