use std::any::Any;
use std::marker::PhantomData;

use crate::coeff::schema::field_names;
use crate::coeff::{CoeffBundle, CoefficientTable, FieldSpec};
use crate::core::context::SimulationContext;
use crate::core::ids::{Family, Handle, HandleId};
use crate::core::particles::ParticleData;
use crate::core::types::ParticleTypeRegistry;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::forces::handle::{HandleCore, ManagedHandle};
use crate::platform::compute::{ComputeRef, ForceBuffer};
use crate::platform::exec::{ExecutionConfig, Tuner};
use crate::platform::record::Scalar4;
use crate::platform::scheduler::Scheduler;

/// What a force kind adds on top of the generic coefficient protocol: its
/// fields, how one type's fields are packed, and which native compute runs it.
pub trait ForceKind: 'static {
    /// Kind name, also the key of its tuned block size.
    const KIND: &'static str;

    fn fields() -> &'static [FieldSpec];

    fn encode(bundle: &CoeffBundle<'_>) -> Result<Scalar4>;

    fn create_compute(n_types: usize, execution: &ExecutionConfig, tuner: &Tuner) -> ComputeRef;
}

/// A force configured by per-type coefficients.
pub struct ParametrizedForce<K> {
    core: HandleCore<ComputeRef>,
    coeff: CoefficientTable,
    /// The native object holds the current table. Cleared by any mutable
    /// access to the table.
    synced: bool,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ForceKind> ParametrizedForce<K> {
    /// Builds the native compute for the context's execution mode and
    /// registers it, enabled.
    pub fn create(ctx: &mut SimulationContext) -> Result<Handle<Self>> {
        let id = ctx.allocate_id(Family::ExternalForce)?;
        let n_types = ctx.types()?.type_count();
        let compute = K::create_compute(n_types, ctx.execution(), ctx.tuner());

        let mut core = HandleCore::new(id);
        core.bind(compute, ctx.system_mut());
        tracing::info!(target: "script", kind = K::KIND, handle = %core.name(), "force created");

        Ok(ctx.register(Self {
            core,
            coeff: CoefficientTable::new(),
            synced: false,
            _kind: PhantomData,
        }))
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    pub fn coeff(&self) -> &CoefficientTable {
        &self.coeff
    }

    pub fn coeff_mut(&mut self) -> &mut CoefficientTable {
        self.synced = false;
        &mut self.coeff
    }

    /// Replaces the coefficients with a table built elsewhere.
    pub fn set_coeff_table(&mut self, table: CoefficientTable) {
        self.synced = false;
        self.coeff = table;
    }

    /// True if the native object already holds the current coefficients.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn required_coeffs(&self) -> Vec<&'static str> {
        field_names(K::fields())
    }

    pub fn compute(&self) -> Result<&ComputeRef> {
        self.core.check_initialization()
    }

    pub fn forces(&self) -> Result<ForceBuffer> {
        self.core.forces()
    }

    /// Verifies the table, then encodes and pushes one record per registered
    /// type, in registry order.
    ///
    /// Does nothing if the table is unchanged since the last successful push,
    /// so its warnings are reported once per change, not once per run.
    pub fn update_coeffs(&mut self, types: &ParticleTypeRegistry, diagnostics: &mut Diagnostics) -> Result<()> {
        let compute = self.core.check_initialization()?;
        if self.synced {
            tracing::trace!(target: "forces", handle = %self.core.name(), "coefficients unchanged");
            return Ok(());
        }
        let required = self.required_coeffs();

        let verification = self.coeff.verify(types, &required)?;
        let invalid = verification.invalid_types().to_vec();
        diagnostics.extend(verification.into_issues());
        if !invalid.is_empty() {
            return Err(Error::MissingCoefficients {
                handle: self.core.name().to_string(),
                types: invalid,
            });
        }

        for (index, type_name) in types.iter().enumerate() {
            let bundle = CoeffBundle::gather(&self.coeff, type_name, K::fields())?;
            let record = K::encode(&bundle)?;
            compute.borrow_mut().set_params(index, record)?;
        }
        tracing::debug!(target: "forces", handle = %self.core.name(), types = types.type_count(), "coefficients pushed");
        self.synced = true;
        Ok(())
    }
}

impl<K: ForceKind> ManagedHandle for ParametrizedForce<K> {
    fn id(&self) -> HandleId {
        self.core.id()
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    fn enable(&mut self, scheduler: &mut dyn Scheduler, diagnostics: &mut Diagnostics) -> Result<()> {
        self.core.enable(scheduler, diagnostics)
    }

    fn disable(&mut self, scheduler: &mut dyn Scheduler, diagnostics: &mut Diagnostics) -> Result<()> {
        self.core.disable(scheduler, diagnostics)
    }

    fn update_coeffs(&mut self, types: &ParticleTypeRegistry, diagnostics: &mut Diagnostics) -> Result<()> {
        ParametrizedForce::update_coeffs(self, types, diagnostics)
    }

    fn benchmark(&mut self, particles: &ParticleData, n: u32) -> Result<f64> {
        self.core.benchmark(particles, n)
    }

    fn forces(&self) -> Result<ForceBuffer> {
        self.core.forces()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
