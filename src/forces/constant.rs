use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use crate::core::context::SimulationContext;
use crate::core::ids::{Family, Handle, HandleId};
use crate::core::particles::ParticleData;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::forces::handle::{HandleCore, ManagedHandle};
use crate::platform::compute::{ComputeRef, ConstantForceCompute, ForceBuffer};
use crate::platform::scheduler::Scheduler;

/// The same force on every particle. Has no per-type coefficients.
pub struct ConstantForce {
    core: HandleCore<ComputeRef>,
    compute: Rc<RefCell<ConstantForceCompute>>,
}

impl ConstantForce {
    pub fn create(ctx: &mut SimulationContext, force: Vec3) -> Result<Handle<Self>> {
        let id = ctx.allocate_id(Family::Force)?;
        let compute = Rc::new(RefCell::new(ConstantForceCompute::new(force)));

        let mut core = HandleCore::new(id);
        core.bind(compute.clone() as ComputeRef, ctx.system_mut());
        tracing::info!(target: "script", handle = %core.name(), %force, "constant force created");

        Ok(ctx.register(Self { core, compute }))
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    pub fn force(&self) -> Vec3 {
        self.compute.borrow().force()
    }

    pub fn forces(&self) -> Result<ForceBuffer> {
        self.core.forces()
    }

    pub fn set_force(&mut self, force: Vec3) -> Result<()> {
        tracing::info!(target: "script", handle = %self.core.name(), %force, "set_force()");
        self.core.check_initialization()?;
        self.compute.borrow_mut().set_force(force);
        Ok(())
    }
}

impl ManagedHandle for ConstantForce {
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
