use crate::fields::{Fields, Storage};
use basis_types::Result;
use serde_json::{Map, Value};

/// A permissive property bag.
///
/// Names declared by `F` are stored in their fields; every other name lands
/// in the overflow store. Unknown names read as `null` and every name is
/// reported as present. Gating is left to [`Entity`](crate::Entity).
#[derive(Debug, Clone, Default)]
pub struct DataContainer<F = ()> {
    storage: Storage<F>,
}

impl<F: Fields + Default> DataContainer<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::from_fields(F::default())
    }

    /// Builds a container and assigns every value in map order.
    pub fn make(values: Map<String, Value>) -> Result<Self> {
        let mut container = Self::new();
        for (name, value) in values {
            container.set(&name, value)?;
        }
        Ok(container)
    }
}

impl<F: Fields> DataContainer<F> {
    #[must_use]
    pub fn from_fields(fields: F) -> Self {
        Self {
            storage: Storage::new(fields),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        self.storage.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        self.storage.set(name, value)
    }

    pub fn unset(&mut self, name: &str) {
        self.storage.unset(name);
    }

    /// Always true: existence checks never gate access on a plain container.
    #[must_use]
    pub fn has(&self, _name: &str) -> bool {
        true
    }

    /// Declared field values followed by overflow entries.
    pub fn to_array(&self) -> Result<Map<String, Value>> {
        self.storage.snapshot()
    }

    #[must_use]
    pub fn fields(&self) -> &F {
        self.storage.fields()
    }

    pub fn fields_mut(&mut self) -> &mut F {
        self.storage.fields_mut()
    }

    #[must_use]
    pub fn overflow(&self) -> &Map<String, Value> {
        self.storage.overflow()
    }
}
