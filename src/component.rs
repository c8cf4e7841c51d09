//! Component registry handed to the node.
//!
//! The orchestrator never looks inside the registry. It is created empty for
//! every run unless a caller attaches one, and is passed through to the node
//! as part of the resolved configuration.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

type Entry = Arc<dyn Any + Send + Sync>;

/// A thread-safe registry of named components.
///
/// Cloning is cheap and clones share the same underlying map.
#[derive(Clone, Default)]
pub struct Components {
    inner: Arc<DashMap<String, Entry>>,
}

impl Components {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under `name`, replacing any previous entry.
    pub fn register<T>(&self, name: impl Into<String>, component: T) -> &Self
    where
        T: Any + Send + Sync,
    {
        self.inner.insert(name.into(), Arc::new(component));
        self
    }

    /// Look up a component by name and concrete type.
    ///
    /// Returns `None` if the name is unknown or registered with another type.
    pub fn get<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let entry = self.inner.get(name)?.value().clone();
        entry.downcast::<T>().ok()
    }

    /// Remove a component, returning whether it was present.
    pub fn remove(&self, name: &str) -> bool {
        self.inner.remove(name).is_some()
    }

    /// Registered component names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Whether both handles refer to the same registry.
    pub fn same_registry(&self, other: &Components) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Components")
            .field("names", &self.names())
            .finish()
    }
}
