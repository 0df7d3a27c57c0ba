use serde::Deserialize;

/// Runtime limits and switches for a [`VM`](crate::VM).
///
/// Deserializes from the `[vm]` table of a host configuration file; every
/// field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VmConfig {
    /// Maximum number of nested function activations.
    pub max_call_depth: usize,
    /// Maximum number of operand stack slots.
    pub max_stack: usize,
    /// Seed for the `dice`/`randint`/`random` generator. `None` seeds from
    /// the OS.
    pub seed: Option<u64>,
    /// Log every executed instruction at trace level.
    pub trace: bool,
}

pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;
pub const DEFAULT_MAX_STACK: usize = 65_536;

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_stack: DEFAULT_MAX_STACK,
            seed: None,
            trace: false,
        }
    }
}

impl VmConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
