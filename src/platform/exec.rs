use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which native backend force kinds should build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Accelerated whenever more than one worker thread is available.
    #[default]
    Auto,
    Cpu,
    Accelerated,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub mode: ExecutionMode,
}

impl ExecutionConfig {
    pub fn cpu() -> Self {
        Self {
            mode: ExecutionMode::Cpu,
        }
    }

    pub fn accelerated() -> Self {
        Self {
            mode: ExecutionMode::Accelerated,
        }
    }

    pub fn is_accelerated_backend_available(&self) -> bool {
        match self.mode {
            ExecutionMode::Cpu => false,
            ExecutionMode::Accelerated => true,
            ExecutionMode::Auto => rayon::current_num_threads() > 1,
        }
    }
}

const DEFAULT_BLOCK_SIZE: u32 = 256;

/// Optimal execution block sizes per force kind, e.g. `"external.periodic"`.
///
/// The values are measured elsewhere; this table only hands them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuner {
    block_sizes: BTreeMap<String, u32>,
    fallback: u32,
}

impl Default for Tuner {
    fn default() -> Self {
        let mut block_sizes = BTreeMap::new();
        block_sizes.insert("external.periodic".to_string(), 128);
        Self {
            block_sizes,
            fallback: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl Tuner {
    pub fn optimal_block_size(&self, kind: &str) -> u32 {
        self.block_sizes
            .get(kind)
            .copied()
            .unwrap_or(self.fallback)
            .max(1)
    }

    pub fn set_block_size(&mut self, kind: impl Into<String>, size: u32) {
        self.block_sizes.insert(kind.into(), size);
    }
}
