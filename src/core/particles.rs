use glam::Vec3;

use crate::core::types::{ParticleTypeRegistry, TypeSource};
use crate::error::{Error, Result};

/// Snapshot of the particle system a context was initialized with.
///
/// Structure-of-arrays like the integrator state: one `Vec` for positions,
/// one for type ids. Box lengths are the edge lengths of an orthorhombic box
/// centred at the origin.
#[derive(Debug, Clone)]
pub struct ParticleData {
    types: ParticleTypeRegistry,
    box_lengths: Vec3,
    positions: Vec<Vec3>,
    type_ids: Vec<u32>,
}

impl ParticleData {
    pub fn new(
        types: ParticleTypeRegistry,
        box_lengths: Vec3,
        positions: Vec<Vec3>,
        type_ids: Vec<u32>,
    ) -> Result<Self> {
        if positions.len() != type_ids.len() {
            return Err(Error::InvalidParticleData(format!(
                "{} positions but {} type ids",
                positions.len(),
                type_ids.len()
            )));
        }
        if let Some(bad) = type_ids
            .iter()
            .find(|&&id| id as usize >= types.type_count())
        {
            return Err(Error::InvalidParticleData(format!(
                "type id {bad} out of range for {} types",
                types.type_count()
            )));
        }
        if box_lengths.cmple(Vec3::ZERO).any() {
            return Err(Error::InvalidParticleData(format!(
                "box lengths must be positive, got {box_lengths}"
            )));
        }

        Ok(Self {
            types,
            box_lengths,
            positions,
            type_ids,
        })
    }

    pub fn types(&self) -> &ParticleTypeRegistry {
        &self.types
    }

    pub fn box_lengths(&self) -> Vec3 {
        self.box_lengths
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn type_ids(&self) -> &[u32] {
        &self.type_ids
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl TypeSource for ParticleData {
    fn type_registry(&self) -> Option<&ParticleTypeRegistry> {
        Some(&self.types)
    }
}
