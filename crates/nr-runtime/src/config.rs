/// Id of the reference CPU backend, the default preference.
pub const DEFAULT_BACKEND: &str = "CpuRef";

/// Settings for building a network.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Backends to try for each layer, most preferred first.
    pub backend_preferences: Vec<String>,
    /// Byte budget for the network's tensor arena; `None` means unbounded.
    pub arena_limit: Option<usize>,
    /// Wire split/merge tensors as views of their parent when the backend
    /// and region allow it.
    pub use_sub_tensors: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            backend_preferences: vec![DEFAULT_BACKEND.to_string()],
            arena_limit: None,
            use_sub_tensors: true,
        }
    }
}

impl RuntimeConfig {
    pub fn with_backends<I, S>(mut self, backends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.backend_preferences = backends.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_arena_limit(mut self, bytes: usize) -> Self {
        self.arena_limit = Some(bytes);
        self
    }

    pub fn with_sub_tensors(mut self, enabled: bool) -> Self {
        self.use_sub_tensors = enabled;
        self
    }
}
