use glam::Vec3;

use super::{ForceBuffer, ForceCompute};
use crate::core::particles::ParticleData;

/// Applies the same force to every particle. Contributes no energy.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantForceCompute {
    force: Vec3,
    out: ForceBuffer,
}

impl ConstantForceCompute {
    pub fn new(force: Vec3) -> Self {
        Self {
            force,
            out: ForceBuffer::default(),
        }
    }

    pub fn force(&self) -> Vec3 {
        self.force
    }

    pub fn set_force(&mut self, force: Vec3) {
        self.force = force;
    }
}

impl ForceCompute for ConstantForceCompute {
    fn kind(&self) -> &str {
        "constant"
    }

    fn compute(&mut self, particles: &ParticleData) {
        self.out.reset(particles.len());
        self.out.force.fill(self.force);
    }

    fn forces(&self) -> &ForceBuffer {
        &self.out
    }
}
