//! Field tokens and the column locator.
//!
//! A model type describes its columns once ([`Fields::field_defs`]) and knows
//! how to build a *reference* struct with one [`Column`] token per mapped
//! field ([`Fields::build_ref`]). Tokens carry the id of the reference
//! instance that produced them, so a plan can tell `a.id` from `b.id` when
//! the same table is joined twice.
//!
//! Both traits are normally derived (`#[derive(Table)]`, `#[derive(Embed)]`),
//! but they are plain traits and can be written by hand.

mod colmap;
mod table_map;


pub use colmap::{FieldColumnMap, StructColumnMap, TableAndColumnLocator};
pub use table_map::{ColumnMap, TableMap};

use std::any::TypeId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one reference-struct instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        InstanceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Token standing for one field of one reference instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column {
    instance: InstanceId,
    index: u32,
}

impl Column {
    pub fn new(instance: InstanceId, index: u32) -> Self {
        Self { instance, index }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Flattened declaration-order index within the reference struct.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} of reference {}", self.index, self.instance.0)
    }
}

/// Hands out consecutive tokens while a reference struct is built.
#[derive(Debug)]
pub struct FieldCursor {
    instance: InstanceId,
    next: u32,
}

impl FieldCursor {
    pub fn new() -> Self {
        Self {
            instance: InstanceId::next(),
            next: 0,
        }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Token for the next mapped field.
    pub fn next_column(&mut self) -> Column {
        let column = Column::new(self.instance, self.next);
        self.next += 1;
        column
    }
}

impl Default for FieldCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile-time description of one mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub field: &'static str,
    pub column: &'static str,
    pub transient: bool,
}

impl FieldDef {
    pub const fn new(field: &'static str, column: &'static str) -> Self {
        Self {
            field,
            column,
            transient: false,
        }
    }

    pub const fn transient(field: &'static str, column: &'static str) -> Self {
        Self {
            field,
            column,
            transient: true,
        }
    }
}

/// A struct whose public fields map onto columns.
///
/// `field_defs` and `build_ref` must visit fields in the same order:
/// the n-th definition belongs to the n-th token handed out by the cursor.
pub trait Fields: Sized {
    /// Reference struct holding one token per mapped field.
    type Ref: Copy + fmt::Debug;

    fn field_defs(out: &mut Vec<FieldDef>);

    fn build_ref(cursor: &mut FieldCursor) -> Self::Ref;
}

/// A [`Fields`] struct stored in its own table.
pub trait Table: Fields + 'static {
    const TABLE: &'static str;
    const SCHEMA: Option<&'static str> = None;

    /// A fresh reference instance; every call yields distinct tokens.
    fn reference() -> Self::Ref {
        Self::build_ref(&mut FieldCursor::new())
    }

    fn columns() -> Vec<FieldDef> {
        let mut out = Vec::new();
        Self::field_defs(&mut out);
        out
    }
}

/// Implemented by the reference struct of a [`Table`].
pub trait Reference: Copy + Send + Sync + 'static {
    type Model: Table;

    fn instance(&self) -> InstanceId;
}

/// Object-safe view of any [`Reference`], used where differently typed
/// tables meet (joins, join callbacks).
pub trait MapTarget: Send + Sync {
    fn instance(&self) -> InstanceId;
    fn model_type(&self) -> TypeId;
    fn model_name(&self) -> &'static str;
}

impl<R: Reference> MapTarget for R {
    fn instance(&self) -> InstanceId {
        Reference::instance(self)
    }

    fn model_type(&self) -> TypeId {
        TypeId::of::<R::Model>()
    }

    fn model_name(&self) -> &'static str {
        std::any::type_name::<R::Model>()
    }
}
