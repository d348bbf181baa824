use crate::coeff::{CoeffBundle, FieldSpec};
use crate::error::Result;
use crate::forces::parametrized::{ForceKind, ParametrizedForce};
use crate::platform::compute::{ComputeRef, PeriodicEvaluator, PotentialExternal, share};
use crate::platform::exec::{ExecutionConfig, Tuner};
use crate::platform::record::{Scalar, Scalar4, int_as_scalar};

/// One-dimensional periodic potential.
///
/// Coefficients, required for every particle type:
///
/// - `A`: order parameter (energy)
/// - `i`: axis, 0, 1 or 2 for x, y or z; any larger axis applies no force
/// - `w`: interface width relative to the box length along `i`
/// - `p`: periodicity, at least 1
///
/// ```
/// use forcectl::core::context::SimulationContext;
/// use forcectl::core::particles::ParticleData;
/// use forcectl::core::types::ParticleTypeRegistry;
/// use forcectl::forces::external::PeriodicForce;
/// use glam::Vec3;
///
/// let mut ctx = SimulationContext::default();
/// let types = ParticleTypeRegistry::new(["A"]).unwrap();
/// ctx.initialize(ParticleData::new(types, Vec3::splat(10.0), vec![Vec3::ZERO], vec![0]).unwrap())
///     .unwrap();
///
/// let periodic = PeriodicForce::create(&mut ctx).unwrap();
/// let force = ctx.get_mut(periodic).unwrap();
/// let _ = force.coeff_mut().set("A", [("A", 1.0), ("i", 0.0), ("w", 0.02), ("p", 3.0)]);
/// ctx.update_coeffs(periodic).unwrap();
/// ```
pub struct Periodic;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::real("A"),
    FieldSpec::integer("i"),
    FieldSpec::real("w"),
    FieldSpec::integer("p"),
];

impl ForceKind for Periodic {
    const KIND: &'static str = "external.periodic";

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn encode(bundle: &CoeffBundle<'_>) -> Result<Scalar4> {
        let i = bundle.int32_at_least("i", 0)?;
        let a = bundle.real("A")? as Scalar;
        let w = bundle.real("w")? as Scalar;
        let p = bundle.int32_at_least("p", 1)?;
        Ok(Scalar4::new(int_as_scalar(i), a, w, int_as_scalar(p)))
    }

    fn create_compute(n_types: usize, execution: &ExecutionConfig, tuner: &Tuner) -> ComputeRef {
        if execution.is_accelerated_backend_available() {
            let block_size = tuner.optimal_block_size(Self::KIND);
            tracing::debug!(target: "forces", kind = Self::KIND, block_size, "accelerated backend");
            share(PotentialExternal::<PeriodicEvaluator>::accelerated(n_types, block_size))
        } else {
            tracing::debug!(target: "forces", kind = Self::KIND, "serial backend");
            share(PotentialExternal::<PeriodicEvaluator>::new(n_types))
        }
    }
}

pub type PeriodicForce = ParametrizedForce<Periodic>;
