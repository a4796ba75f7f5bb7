//! Object model for basis.
//!
//! Three reusable building blocks, all driven by runtime name lookup:
//! - [`DataContainer`] — a permissive property bag: declared fields plus an
//!   overflow store, every name readable and writable
//! - [`Entity`] — a container whose outside surface is whitelisted per type by
//!   a [`ClassSchema`], with a novice/confirmed [`Lifecycle`]
//! - [`Collection`] — an ordered set of items, validated on write, with a
//!   cursor, offsets and counting
//!
//! Access decisions go through [`AccessTable::resolve`], which yields
//! forbidden, direct or delegated dispatch for a name. Tables are built once
//! per type and never mutated afterwards.

mod access;
mod collection;
mod container;
mod entity;
#[doc(hidden)]
pub mod fields;
mod schema;

pub use access::{Access, AccessTable, Dispatch};
pub use basis_types::{Error, Key, Operation, Result};
pub use collection::{Collection, CollectionItem, CollectionKind};
pub use container::DataContainer;
pub use entity::{Entity, EntityClass, Lifecycle, Raw, RawMut};
pub use fields::{Fields, Slot, Storage};
pub use schema::{ClassSchema, Getter, Handler, Setter};

#[doc(hidden)]
pub use serde_json;
