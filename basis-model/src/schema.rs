use crate::access::{Access, AccessTable, Dispatch};
use crate::entity::{Raw, RawMut};
use basis_types::{Operation, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Delegate serving a readable property.
pub type Getter<T> = fn(Raw<'_, T>) -> Result<Value>;

/// Delegate serving a writable property.
pub type Setter<T> = fn(RawMut<'_, T>, Value) -> Result<()>;

/// Delegate serving a callable name. Receives the name the caller invoked,
/// so several external names can share one implementation.
pub type Handler<T> = fn(RawMut<'_, T>, &str, Vec<Value>) -> Result<Value>;

/// Per-type configuration: which names are readable, writable and callable,
/// and the methods those tables delegate to.
///
/// Built once per entity type, typically inside a `static LazyLock`, and
/// read-only afterwards.
pub struct ClassSchema<T> {
    readable: AccessTable,
    writable: AccessTable,
    callable: AccessTable,
    getters: IndexMap<&'static str, Getter<T>>,
    setters: IndexMap<&'static str, Setter<T>>,
    handlers: IndexMap<&'static str, Handler<T>>,
}

impl<T> Default for ClassSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ClassSchema<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            readable: AccessTable::new(),
            writable: AccessTable::new(),
            callable: AccessTable::new(),
            getters: IndexMap::new(),
            setters: IndexMap::new(),
            handlers: IndexMap::new(),
        }
    }

    /// Shorthand for a property read straight from storage.
    #[must_use]
    pub fn readable(mut self, name: &'static str) -> Self {
        self.readable.insert(name, Access::Direct);
        self
    }

    /// Shorthand for a property read through a registered getter.
    #[must_use]
    pub fn readable_via(mut self, name: &'static str, getter: &'static str) -> Self {
        self.readable.insert(name, Access::Delegate(getter));
        self
    }

    /// Shorthand for a property written straight to storage.
    #[must_use]
    pub fn writable(mut self, name: &'static str) -> Self {
        self.writable.insert(name, Access::Direct);
        self
    }

    /// Shorthand for a property written through a registered setter.
    #[must_use]
    pub fn writable_via(mut self, name: &'static str, setter: &'static str) -> Self {
        self.writable.insert(name, Access::Delegate(setter));
        self
    }

    /// Shorthand for both `readable(name)` and `writable(name)`.
    #[must_use]
    pub fn read_write(self, name: &'static str) -> Self {
        self.readable(name).writable(name)
    }

    /// Shorthand for a method served by the handler of the same name.
    #[must_use]
    pub fn callable(mut self, name: &'static str) -> Self {
        self.callable.insert(name, Access::Direct);
        self
    }

    /// Shorthand for a method name forwarded to another handler.
    #[must_use]
    pub fn callable_via(mut self, name: &'static str, handler: &'static str) -> Self {
        self.callable.insert(name, Access::Delegate(handler));
        self
    }

    #[must_use]
    pub fn getter(mut self, name: &'static str, getter: Getter<T>) -> Self {
        self.getters.insert(name, getter);
        self
    }

    #[must_use]
    pub fn setter(mut self, name: &'static str, setter: Setter<T>) -> Self {
        self.setters.insert(name, setter);
        self
    }

    #[must_use]
    pub fn method(mut self, name: &'static str, handler: Handler<T>) -> Self {
        self.handlers.insert(name, handler);
        self
    }

    #[must_use]
    pub fn table(&self, operation: Operation) -> &AccessTable {
        match operation {
            Operation::Read => &self.readable,
            Operation::Write => &self.writable,
            Operation::Call => &self.callable,
        }
    }

    #[must_use]
    pub fn readable_table(&self) -> &AccessTable {
        &self.readable
    }

    #[must_use]
    pub fn writable_table(&self) -> &AccessTable {
        &self.writable
    }

    #[must_use]
    pub fn callable_table(&self) -> &AccessTable {
        &self.callable
    }

    pub(crate) fn find_getter(&self, name: &str) -> Option<Getter<T>> {
        self.getters.get(name).copied()
    }

    pub(crate) fn find_setter(&self, name: &str) -> Option<Setter<T>> {
        self.setters.get(name).copied()
    }

    pub(crate) fn find_handler(&self, name: &str) -> Option<Handler<T>> {
        self.handlers.get(name).copied()
    }

    /// Table entries whose target method is not registered.
    ///
    /// Dispatching one of these fails with a logic error at call time; a
    /// type's own tests can assert this list is empty instead.
    #[must_use]
    pub fn dangling_delegates(&self) -> Vec<(Operation, &'static str)> {
        let mut dangling = Vec::new();
        for method in self.readable.delegates() {
            if !self.getters.contains_key(method) {
                dangling.push((Operation::Read, method));
            }
        }
        for method in self.writable.delegates() {
            if !self.setters.contains_key(method) {
                dangling.push((Operation::Write, method));
            }
        }
        for name in self.callable.names() {
            let target = match self.callable.resolve(name) {
                Dispatch::Delegated(method) => method,
                _ => name,
            };
            if !self.handlers.contains_key(target) {
                dangling.push((Operation::Call, target));
            }
        }
        dangling
    }
}

impl<T> fmt::Debug for ClassSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassSchema")
            .field("readable", &self.readable)
            .field("writable", &self.writable)
            .field("callable", &self.callable)
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
