//! Declared fields and the overflow store.
//!
//! Every container owns two storages: the fixed fields declared by its
//! concrete type, and an open, insertion-ordered map for everything else.
//! A name is routed to exactly one of them, decided by [`Slot::of`].

use basis_types::{Error, Result};
use serde_json::{Map, Value};

/// Structural introspection over a type's declared fields.
///
/// Implement with [`declare_fields!`](crate::declare_fields) rather than by hand.
pub trait Fields {
    /// Declared field names, in declaration order.
    const FIELD_NAMES: &'static [&'static str];

    /// Reads a declared field. Undeclared names are a logic error.
    fn get_field(&self, name: &str) -> Result<Value>;

    /// Writes a declared field, converting from a dynamic value.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;

    /// Resets a declared field to its default value.
    fn unset_field(&mut self, name: &str);

    fn is_declared(name: &str) -> bool {
        Self::FIELD_NAMES.contains(&name)
    }
}

impl Fields for () {
    const FIELD_NAMES: &'static [&'static str] = &[];

    fn get_field(&self, name: &str) -> Result<Value> {
        Err(undeclared_field(name))
    }

    fn set_field(&mut self, name: &str, _value: Value) -> Result<()> {
        Err(undeclared_field(name))
    }

    fn unset_field(&mut self, _name: &str) {}
}

#[doc(hidden)]
pub fn undeclared_field(name: &str) -> Error {
    Error::Logic(format!("`{name}` is not a declared field"))
}

#[doc(hidden)]
pub fn field_conversion(name: &str, err: serde_json::Error) -> Error {
    Error::InvalidInput(format!("value for field `{name}` has the wrong type: {err}"))
}

/// Implements [`Fields`] for a struct whose fields are `Serialize + DeserializeOwned + Default`.
///
/// ```ignore
/// #[derive(Debug, Default)]
/// struct User { id: i64, name: String }
///
/// basis_model::declare_fields!(User { id, name });
/// ```
#[macro_export]
macro_rules! declare_fields {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Fields for $ty {
            const FIELD_NAMES: &'static [&'static str] = &[$(stringify!($field)),*];

            fn get_field(&self, name: &str) -> $crate::Result<$crate::serde_json::Value> {
                match name {
                    $(stringify!($field) => Ok($crate::serde_json::to_value(&self.$field)?),)*
                    _ => Err($crate::fields::undeclared_field(name)),
                }
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                name: &str,
                value: $crate::serde_json::Value,
            ) -> $crate::Result<()> {
                match name {
                    $(stringify!($field) => {
                        self.$field = $crate::serde_json::from_value(value)
                            .map_err(|e| $crate::fields::field_conversion(name, e))?;
                        Ok(())
                    })*
                    _ => Err($crate::fields::undeclared_field(name)),
                }
            }

            #[allow(clippy::match_single_binding)]
            fn unset_field(&mut self, name: &str) {
                match name {
                    $(stringify!($field) => self.$field = ::core::default::Default::default(),)*
                    _ => {}
                }
            }
        }
    };
}

/// Which storage backs a given name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Field,
    Overflow,
}

impl Slot {
    #[must_use]
    pub fn of<F: Fields>(name: &str) -> Self {
        if F::is_declared(name) {
            Self::Field
        } else {
            Self::Overflow
        }
    }
}

/// Declared fields plus the overflow store.
#[derive(Debug, Clone, Default)]
pub struct Storage<F> {
    fields: F,
    overflow: Map<String, Value>,
}

impl<F: Fields> Storage<F> {
    #[must_use]
    pub fn new(fields: F) -> Self {
        Self {
            fields,
            overflow: Map::new(),
        }
    }

    /// Reads `name`; an empty overflow slot reads as `null`.
    pub fn get(&self, name: &str) -> Result<Value> {
        match Slot::of::<F>(name) {
            Slot::Field => self.fields.get_field(name),
            Slot::Overflow => Ok(self.overflow.get(name).cloned().unwrap_or(Value::Null)),
        }
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        match Slot::of::<F>(name) {
            Slot::Field => self.fields.set_field(name, value),
            Slot::Overflow => {
                self.overflow.insert(name.to_owned(), value);
                Ok(())
            }
        }
    }

    pub fn unset(&mut self, name: &str) {
        match Slot::of::<F>(name) {
            Slot::Field => self.fields.unset_field(name),
            Slot::Overflow => {
                self.overflow.shift_remove(name);
            }
        }
    }

    /// Declared fields first, in declaration order, then overflow entries.
    pub fn snapshot(&self) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        for name in F::FIELD_NAMES {
            out.insert((*name).to_owned(), self.fields.get_field(name)?);
        }
        for (name, value) in &self.overflow {
            if !out.contains_key(name) {
                out.insert(name.clone(), value.clone());
            }
        }
        Ok(out)
    }

    #[must_use]
    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut F {
        &mut self.fields
    }

    #[must_use]
    pub fn overflow(&self) -> &Map<String, Value> {
        &self.overflow
    }
}

