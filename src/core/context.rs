use std::any::type_name;

use crate::coeff::{CoeffValue, TypeSelection};
use crate::config::ContextConfig;
use crate::core::ids::{Family, Handle, HandleId, IdAllocator};
use crate::core::particles::ParticleData;
use crate::core::types::{ParticleTypeRegistry, TypeSource};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::forces::handle::ManagedHandle;
use crate::forces::parametrized::{ForceKind, ParametrizedForce};
use crate::platform::compute::ForceBuffer;
use crate::platform::exec::{ExecutionConfig, Tuner};
use crate::platform::scheduler::System;

/// Summary of a live handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveHandle {
    pub id: HandleId,
    pub name: String,
    pub enabled: bool,
}

/// Everything one simulation instance shares between its handles: particle
/// data and types, the scheduler, handle identities, the live handles
/// themselves and the diagnostics they report.
///
/// Handles are created through their kind's `create` function and then
/// addressed by the returned [`Handle`]. They are never removed; a handle
/// lives as long as its context.
pub struct SimulationContext {
    config: ContextConfig,
    particles: Option<ParticleData>,
    system: System,
    ids: IdAllocator,
    handles: Vec<Box<dyn ManagedHandle>>,
    diagnostics: Diagnostics,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

impl SimulationContext {
    pub fn new(config: ContextConfig) -> Self {
        Self {
            config,
            particles: None,
            system: System::new(),
            ids: IdAllocator::new(),
            handles: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn initialize(&mut self, particles: ParticleData) -> Result<()> {
        if self.particles.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        tracing::info!(
            target: "engine",
            particles = particles.len(),
            types = particles.types().type_count(),
            "simulation initialized"
        );
        self.particles = Some(particles);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.particles.is_some()
    }

    pub fn particles(&self) -> Result<&ParticleData> {
        self.particles
            .as_ref()
            .ok_or(Error::Uninitialized("access particle data"))
    }

    pub fn types(&self) -> Result<&ParticleTypeRegistry> {
        Ok(self.particles()?.types())
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn execution(&self) -> &ExecutionConfig {
        &self.config.execution
    }

    pub fn tuner(&self) -> &Tuner {
        &self.config.tuning
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub(crate) fn system_mut(&mut self) -> &mut System {
        &mut self.system
    }

    /// Next identity of `family`. Fails before initialization, so no handle
    /// can be constructed without particle data.
    pub(crate) fn allocate_id(&mut self, family: Family) -> Result<HandleId> {
        if !self.is_initialized() {
            return Err(Error::Uninitialized("create a force or analyzer"));
        }
        Ok(self.ids.next(family))
    }

    pub(crate) fn register<T: ManagedHandle>(&mut self, handle: T) -> Handle<T> {
        let id = handle.id();
        self.handles.push(Box::new(handle));
        Handle::new(id)
    }

    pub fn get<T: ManagedHandle>(&self, handle: Handle<T>) -> Result<&T> {
        let id = handle.id();
        self.find(id)?
            .as_any()
            .downcast_ref::<T>()
            .ok_or(Error::HandleKind {
                id,
                expected: type_name::<T>(),
            })
    }

    pub fn get_mut<T: ManagedHandle>(&mut self, handle: Handle<T>) -> Result<&mut T> {
        let id = handle.id();
        Self::lookup(&mut self.handles, id)?
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(Error::HandleKind {
                id,
                expected: type_name::<T>(),
            })
    }

    fn find(&self, id: HandleId) -> Result<&dyn ManagedHandle> {
        self.handles
            .iter()
            .find(|h| h.id() == id)
            .map(|h| &**h)
            .ok_or(Error::UnknownHandle(id))
    }

    /// Sets coefficients of a parametrized force. An empty call is reported
    /// into this context's diagnostics.
    pub fn set_coeffs<K, T, I, N, V>(
        &mut self,
        handle: Handle<ParametrizedForce<K>>,
        types: T,
        coeffs: I,
    ) -> Result<()>
    where
        K: ForceKind,
        T: Into<TypeSelection>,
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<CoeffValue>,
    {
        let issue = self.get_mut(handle)?.coeff_mut().set(types, coeffs);
        if let Some(issue) = issue {
            self.diagnostics.report(issue);
        }
        Ok(())
    }

    pub fn enable(&mut self, id: impl Into<HandleId>) -> Result<()> {
        let id = id.into();
        let handle = Self::lookup(&mut self.handles, id)?;
        handle.enable(&mut self.system, &mut self.diagnostics)
    }

    pub fn disable(&mut self, id: impl Into<HandleId>) -> Result<()> {
        let id = id.into();
        let handle = Self::lookup(&mut self.handles, id)?;
        handle.disable(&mut self.system, &mut self.diagnostics)
    }

    pub fn benchmark(&mut self, id: impl Into<HandleId>, n: u32) -> Result<f64> {
        let id = id.into();
        let particles = self
            .particles
            .as_ref()
            .ok_or(Error::Uninitialized("benchmark a force"))?;
        let handle = Self::lookup(&mut self.handles, id)?;
        handle.benchmark(particles, n)
    }

    pub fn update_coeffs(&mut self, id: impl Into<HandleId>) -> Result<()> {
        let id = id.into();
        let types = self
            .particles
            .as_ref()
            .ok_or(Error::Uninitialized("update force coefficients"))?
            .types();
        let handle = Self::lookup(&mut self.handles, id)?;
        handle.update_coeffs(types, &mut self.diagnostics)
    }

    /// Forces of one handle's compute from the last evaluation.
    pub fn forces(&self, id: impl Into<HandleId>) -> Result<ForceBuffer> {
        self.find(id.into())?.forces()
    }

    fn lookup(
        handles: &mut [Box<dyn ManagedHandle>],
        id: HandleId,
    ) -> Result<&mut Box<dyn ManagedHandle>> {
        handles
            .iter_mut()
            .find(|h| h.id() == id)
            .ok_or(Error::UnknownHandle(id))
    }

    /// Live handles in creation order, enabled or not.
    pub fn live_handles(&self) -> impl Iterator<Item = LiveHandle> + '_ {
        self.handles.iter().map(|h| LiveHandle {
            id: h.id(),
            name: h.name().to_string(),
            enabled: h.is_enabled(),
        })
    }

    /// Pushes the coefficients of every enabled handle into its native
    /// object. Stops at the first handle that fails.
    pub fn prepare_run(&mut self) -> Result<()> {
        let types = self
            .particles
            .as_ref()
            .ok_or(Error::Uninitialized("run the simulation"))?
            .types();
        for handle in self.handles.iter_mut().filter(|h| h.is_enabled()) {
            handle.update_coeffs(types, &mut self.diagnostics)?;
        }
        Ok(())
    }

    /// Validates and pushes coefficients, then evaluates the net force of
    /// every active compute and runs the analyzers due at `timestep`.
    pub fn evaluate(&mut self, timestep: u64) -> Result<ForceBuffer> {
        self.prepare_run()?;
        let particles = self.particles()?;
        let forces = self.system.compute_net_force(particles);
        self.system.analyze(timestep, particles);
        tracing::debug!(
            target: "engine",
            timestep,
            energy = forces.total_energy(),
            "forces evaluated"
        );
        Ok(forces)
    }

    pub fn report(&mut self, issue: Diagnostic) {
        self.diagnostics.report(issue);
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

impl TypeSource for SimulationContext {
    fn type_registry(&self) -> Option<&ParticleTypeRegistry> {
        self.particles.as_ref().map(ParticleData::types)
    }
}
