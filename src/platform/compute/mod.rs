//! Native compute contract and the in-process compute implementations.

pub mod constant;
pub mod external;
pub mod periodic;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use glam::Vec3;

use crate::core::particles::ParticleData;
use crate::error::{Error, Result};
use crate::platform::record::{Scalar, Scalar4};

pub use constant::ConstantForceCompute;
pub use external::{Evaluator, PotentialExternal};
pub use periodic::PeriodicEvaluator;

/// Per-particle force and potential energy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForceBuffer {
    pub force: Vec<Vec3>,
    pub energy: Vec<Scalar>,
}

impl ForceBuffer {
    pub fn zeroed(n: usize) -> Self {
        Self {
            force: vec![Vec3::ZERO; n],
            energy: vec![0.0; n],
        }
    }

    /// Clears the buffer and sizes it for `n` particles.
    pub fn reset(&mut self, n: usize) {
        self.force.clear();
        self.force.resize(n, Vec3::ZERO);
        self.energy.clear();
        self.energy.resize(n, 0.0);
    }

    pub fn accumulate(&mut self, other: &ForceBuffer) {
        for (f, o) in self.force.iter_mut().zip(&other.force) {
            *f += *o;
        }
        for (e, o) in self.energy.iter_mut().zip(&other.energy) {
            *e += *o;
        }
    }

    pub fn total_energy(&self) -> f64 {
        self.energy.iter().map(|&e| f64::from(e)).sum()
    }

    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }
}

/// A native force-evaluation object.
pub trait ForceCompute {
    /// Short lowercase name of the computed potential.
    fn kind(&self) -> &str;

    /// Recomputes the force on every particle into the compute's own buffer.
    fn compute(&mut self, particles: &ParticleData);

    /// Forces and energies of the last [`compute`](Self::compute). Empty
    /// before the first one.
    fn forces(&self) -> &ForceBuffer;

    /// Stores the packed parameters of one particle type.
    fn set_params(&mut self, type_index: usize, _params: Scalar4) -> Result<()> {
        Err(Error::InvalidArgument(format!(
            "{} compute takes no per-type parameters (type index {type_index})",
            self.kind()
        )))
    }

    /// Recomputes forces `n` times on the current particles and returns the
    /// mean wall time per call in milliseconds.
    fn benchmark(&mut self, particles: &ParticleData, n: u32) -> f64 {
        let start = Instant::now();
        for _ in 0..n {
            self.compute(particles);
        }
        start.elapsed().as_secs_f64() * 1e3 / f64::from(n.max(1))
    }
}

/// Shared reference to a native compute. The owning handle keeps one clone,
/// the scheduler holds another while the compute is active.
pub type ComputeRef = Rc<RefCell<dyn ForceCompute>>;

pub fn share<C: ForceCompute + 'static>(compute: C) -> ComputeRef {
    Rc::new(RefCell::new(compute))
}
