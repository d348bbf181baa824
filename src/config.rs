use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::particles::ParticleData;
use crate::core::types::ParticleTypeRegistry;
use crate::error::{Error, Result};
use crate::platform::exec::{ExecutionConfig, Tuner};
use crate::script::ScriptCommand;

/// Settings a simulation context is created with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub execution: ExecutionConfig,
    pub tuning: Tuner,
}

impl ContextConfig {
    pub fn from_ron_str(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }
}

/// Initial particle configuration: `count` particles on a cubic lattice
/// centred at the origin, types assigned round-robin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSetup {
    pub types: Vec<String>,
    pub box_lengths: [f32; 3],
    pub count: usize,
    pub spacing: f32,
}

impl Default for ParticleSetup {
    fn default() -> Self {
        Self {
            types: vec!["A".to_string()],
            box_lengths: [10.0; 3],
            count: 64,
            spacing: 1.0,
        }
    }
}

impl ParticleSetup {
    pub fn build(&self) -> Result<ParticleData> {
        let types = ParticleTypeRegistry::new(self.types.iter().cloned())?;
        if types.is_empty() && self.count > 0 {
            return Err(Error::InvalidParticleData(
                "particles need at least one type".into(),
            ));
        }

        let mut cols = 1;
        while cols * cols * cols < self.count {
            cols += 1;
        }
        let offset = (cols as f32 - 1.0) * self.spacing / 2.0;
        let mut positions = Vec::with_capacity(self.count);
        let mut type_ids = Vec::with_capacity(self.count);

        for i in 0..self.count {
            let col = i % cols;
            let row = (i / cols) % cols;
            let layer = i / (cols * cols);
            positions.push(Vec3::new(
                col as f32 * self.spacing - offset,
                row as f32 * self.spacing - offset,
                layer as f32 * self.spacing - offset,
            ));
            type_ids.push((i % types.type_count()) as u32);
        }

        ParticleData::new(types, Vec3::from_array(self.box_lengths), positions, type_ids)
    }
}

/// A complete script: context settings, initial particles and the commands
/// to run against them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub context: ContextConfig,
    pub particles: ParticleSetup,
    pub commands: Vec<ScriptCommand>,
}

impl Scenario {
    pub fn from_ron_str(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::exec::ExecutionMode;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ContextConfig::from_ron_str("()").unwrap();
        assert_eq!(config, ContextConfig::default());
        assert_eq!(config.tuning.optimal_block_size("external.periodic"), 128);
    }

    #[test]
    fn execution_mode_is_read() {
        let config = ContextConfig::from_ron_str("(execution: (mode: Cpu))").unwrap();
        assert_eq!(config.execution.mode, ExecutionMode::Cpu);
    }

    #[test]
    fn lattice_assigns_types_round_robin() {
        let setup = ParticleSetup {
            types: vec!["A".into(), "B".into()],
            box_lengths: [8.0; 3],
            count: 8,
            spacing: 2.0,
        };
        let particles = setup.build().unwrap();

        assert_eq!(particles.len(), 8);
        assert_eq!(particles.type_ids(), [0, 1, 0, 1, 0, 1, 0, 1]);
        assert_eq!(particles.positions()[0], Vec3::splat(-1.0));
        assert_eq!(particles.positions()[7], Vec3::splat(1.0));
    }

    #[test]
    fn bad_ron_is_a_config_error() {
        let err = ContextConfig::from_ron_str("(execution: 3)").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
