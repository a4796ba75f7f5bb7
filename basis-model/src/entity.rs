use crate::access::Dispatch;
use crate::fields::{Fields, Storage};
use crate::schema::ClassSchema;
use basis_types::{Error, Operation, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// A concrete entity type: its declared fields plus its access configuration.
pub trait EntityClass: Fields + Default + Sized + 'static {
    /// Type name used in error messages.
    const CLASS: &'static str;

    fn schema() -> &'static ClassSchema<Self>;
}

/// Whether an entity has been confirmed against a backing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Constructed, not yet confirmed as persisted or loaded.
    #[default]
    Novice,
    /// Loaded from, or confirmed against, a backing source.
    Confirmed,
}

/// A container whose outside surface is exactly what `T::schema()` declares.
///
/// Reads, writes and calls are resolved against the readable, writable and
/// callable tables; anything else is refused even when a same-named field
/// exists internally.
#[derive(Debug, Clone)]
pub struct Entity<T> {
    storage: Storage<T>,
    lifecycle: Lifecycle,
}

impl<T: EntityClass> Entity<T> {
    fn blank() -> Self {
        Self {
            storage: Storage::new(T::default()),
            lifecycle: Lifecycle::Novice,
        }
    }

    /// Builds a novice entity from construction-time values.
    pub fn make(values: Map<String, Value>) -> Result<Self> {
        Self::make_with(values, Lifecycle::Novice)
    }

    /// Builds an entity in the given lifecycle state.
    ///
    /// Every key must be readable or writable; the check runs before any
    /// value is applied. Values then bypass the writable gate and setter
    /// delegates.
    pub fn make_with(values: Map<String, Value>, lifecycle: Lifecycle) -> Result<Self> {
        let schema = T::schema();
        if let Some(name) = values.keys().find(|name| {
            let name = name.as_str();
            !schema.readable_table().contains(name) && !schema.writable_table().contains(name)
        }) {
            return Err(Error::InvalidInput(format!(
                "property `{name}` cannot be set by `{}::make()`",
                T::CLASS
            )));
        }

        let mut entity = Self::blank();
        entity.load(values, lifecycle)?;
        Ok(entity)
    }

    fn load(&mut self, values: Map<String, Value>, lifecycle: Lifecycle) -> Result<()> {
        match lifecycle {
            Lifecycle::Novice => self.mark_novice(),
            Lifecycle::Confirmed => self.mark_not_novice(),
        }
        debug!(class = T::CLASS, count = values.len(), ?lifecycle, "loading entity");
        for (name, value) in values {
            self.set_raw(&name, value)?;
        }
        Ok(())
    }

    pub(crate) fn mark_novice(&mut self) {
        self.lifecycle = Lifecycle::Novice;
    }

    pub(crate) fn mark_not_novice(&mut self) {
        self.lifecycle = Lifecycle::Confirmed;
    }

    #[must_use]
    pub fn is_novice(&self) -> bool {
        self.lifecycle == Lifecycle::Novice
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        let schema = T::schema();
        match schema.readable_table().resolve(name) {
            Dispatch::Forbidden => Err(denied::<T>(Operation::Read, name)),
            Dispatch::Direct => self.get_raw(name),
            Dispatch::Delegated(method) => {
                let getter = schema
                    .find_getter(method)
                    .ok_or_else(|| missing_method::<T>(Operation::Read, name, method))?;
                trace!(class = T::CLASS, name, method, "delegated read");
                getter(Raw { entity: self })
            }
        }
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let schema = T::schema();
        match schema.writable_table().resolve(name) {
            Dispatch::Forbidden => Err(denied::<T>(Operation::Write, name)),
            Dispatch::Direct => self.set_raw(name, value),
            Dispatch::Delegated(method) => {
                let setter = schema
                    .find_setter(method)
                    .ok_or_else(|| missing_method::<T>(Operation::Write, name, method))?;
                trace!(class = T::CLASS, name, method, "delegated write");
                setter(RawMut { entity: self }, value)
            }
        }
    }

    /// Clears a writable property. Setter delegates are not consulted.
    pub fn unset(&mut self, name: &str) -> Result<()> {
        if !T::schema().writable_table().contains(name) {
            return Err(Error::Logic(format!(
                "unsetting `{name}` on `{}` has no effect: it is not writable",
                T::CLASS
            )));
        }
        self.unset_raw(name)
    }

    /// True iff `name` is readable, whether or not a value is set.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        T::schema().readable_table().contains(name)
    }

    /// Invokes a callable name, passing the invoked name through to the handler.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value> {
        let schema = T::schema();
        let target = match schema.callable_table().resolve(name) {
            Dispatch::Forbidden => {
                return Err(Error::Logic(format!(
                    "call to undefined method `{}::{name}()`",
                    T::CLASS
                )));
            }
            Dispatch::Direct => name,
            Dispatch::Delegated(method) => method,
        };
        let handler = schema
            .find_handler(target)
            .ok_or_else(|| missing_method::<T>(Operation::Call, name, target))?;
        trace!(class = T::CLASS, name, method = target, args = args.len(), "dispatching call");
        handler(RawMut { entity: self }, name, args)
    }

    /// Reads every readable property, in table order, through the gated path.
    pub fn to_array(&self) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        for name in T::schema().readable_table().names() {
            out.insert(name.to_owned(), self.get(name)?);
        }
        Ok(out)
    }

    fn get_raw(&self, name: &str) -> Result<Value> {
        self.storage.get(name)
    }

    fn set_raw(&mut self, name: &str, value: Value) -> Result<()> {
        self.storage.set(name, value)
    }

    fn unset_raw(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidInput("property name must not be empty".into()));
        }
        self.storage.unset(name);
        Ok(())
    }
}

/// Ungated read access, handed only to a type's own getters.
pub struct Raw<'a, T> {
    entity: &'a Entity<T>,
}

impl<T: EntityClass> Raw<'_, T> {
    /// Reads a field or overflow slot without consulting the access tables.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.entity.get_raw(name)
    }

    #[must_use]
    pub fn fields(&self) -> &T {
        self.entity.storage.fields()
    }

    #[must_use]
    pub fn is_novice(&self) -> bool {
        self.entity.is_novice()
    }
}

/// Ungated read/write access, handed only to a type's own setters and call
/// handlers. Lifecycle stays out of reach.
pub struct RawMut<'a, T> {
    entity: &'a mut Entity<T>,
}

impl<T: EntityClass> RawMut<'_, T> {
    pub fn get(&self, name: &str) -> Result<Value> {
        self.entity.get_raw(name)
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        self.entity.set_raw(name, value)
    }

    /// Fails with `InvalidInput` for an empty name.
    pub fn unset(&mut self, name: &str) -> Result<()> {
        self.entity.unset_raw(name)
    }

    #[must_use]
    pub fn fields(&self) -> &T {
        self.entity.storage.fields()
    }

    pub fn fields_mut(&mut self) -> &mut T {
        self.entity.storage.fields_mut()
    }

    #[must_use]
    pub fn is_novice(&self) -> bool {
        self.entity.is_novice()
    }
}

fn denied<T: EntityClass>(operation: Operation, name: &str) -> Error {
    Error::AccessDenied {
        class: T::CLASS,
        operation,
        name: name.to_owned(),
    }
}

fn missing_method<T: EntityClass>(operation: Operation, name: &str, method: &str) -> Error {
    Error::Logic(format!(
        "`{}` maps {operation} `{name}` to method `{method}`, which does not exist",
        T::CLASS
    ))
}
