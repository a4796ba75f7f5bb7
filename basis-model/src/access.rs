//! Name-indexed access tables.
//!
//! Each class declares one table per [`Operation`](basis_types::Operation).
//! A table maps a property or method name to how the access is served:
//! straight through to storage, or through a named delegate method.

use indexmap::IndexMap;

/// How an allowed name is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Operate on the declared field or overflow slot of the same name.
    Direct,
    /// Invoke the named method from the class's method registry.
    Delegate(&'static str),
}

/// The outcome of resolving a name against a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Forbidden,
    Direct,
    Delegated(&'static str),
}

impl Dispatch {
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden)
    }
}

/// A declaration-ordered mapping from name to [`Access`].
///
/// There is no default-allow: a name missing from the table resolves to
/// [`Dispatch::Forbidden`].
#[derive(Debug, Clone, Default)]
pub struct AccessTable {
    entries: IndexMap<&'static str, Access>,
}

impl AccessTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for `name`, keeping its original position.
    pub fn insert(&mut self, name: &'static str, access: Access) {
        self.entries.insert(name, access);
    }

    #[must_use]
    pub fn resolve(&self, name: &str) -> Dispatch {
        match self.entries.get(name) {
            None => Dispatch::Forbidden,
            Some(Access::Direct) => Dispatch::Direct,
            Some(Access::Delegate(method)) => Dispatch::Delegated(*method),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Delegate method names referenced by this table.
    pub fn delegates(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.values().filter_map(|access| match access {
            Access::Delegate(method) => Some(*method),
            Access::Direct => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(&'static str, Access)> for AccessTable {
    fn from_iter<I: IntoIterator<Item = (&'static str, Access)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
