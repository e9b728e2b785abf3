use std::collections::HashMap;
use std::sync::Arc;

use nr_workload::WorkloadFactory;

/// Explicit table of backends, keyed by [`WorkloadFactory::backend_id`].
///
/// Built by the embedder at startup and handed to the network builder.
#[derive(Debug, Default, Clone)]
pub struct BackendRegistry {
    factories: HashMap<String, Arc<dyn WorkloadFactory>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory, replacing and returning any previous one with the
    /// same id.
    pub fn register(&mut self, factory: Arc<dyn WorkloadFactory>) -> Option<Arc<dyn WorkloadFactory>> {
        self.factories
            .insert(factory.backend_id().to_string(), factory)
    }

    /// Builder-style [`BackendRegistry::register`].
    pub fn with(mut self, factory: Arc<dyn WorkloadFactory>) -> Self {
        self.register(factory);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn WorkloadFactory>> {
        self.factories.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
