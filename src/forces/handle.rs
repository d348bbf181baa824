//! Base lifecycle shared by every script-level handle.
//!
//! A handle owns the reference to its native object and keeps it registered
//! with the scheduler while enabled. Disabling only unregisters it; the
//! handle, its identity and its native object live on and can be enabled
//! again under the same name.

use std::any::Any;

use crate::core::ids::HandleId;
use crate::core::particles::ParticleData;
use crate::core::types::ParticleTypeRegistry;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{Error, Result};
use crate::platform::analyzer::AnalyzerRef;
use crate::platform::compute::{ComputeRef, ForceBuffer};
use crate::platform::scheduler::Scheduler;

/// A native object that can be (un)registered with a scheduler by name.
pub trait Native: Clone {
    fn attach(&self, scheduler: &mut dyn Scheduler, name: &str);
    fn detach(&self, scheduler: &mut dyn Scheduler, name: &str);
}

impl Native for ComputeRef {
    fn attach(&self, scheduler: &mut dyn Scheduler, name: &str) {
        scheduler.add_compute(self.clone(), name);
    }

    fn detach(&self, scheduler: &mut dyn Scheduler, name: &str) {
        scheduler.remove_compute(name);
    }
}

/// An analyzer together with the period it runs at.
#[derive(Clone)]
pub struct AnalyzerSlot {
    pub analyzer: AnalyzerRef,
    pub period: u64,
}

impl Native for AnalyzerSlot {
    fn attach(&self, scheduler: &mut dyn Scheduler, name: &str) {
        scheduler.add_analyzer(self.analyzer.clone(), name, self.period);
    }

    fn detach(&self, scheduler: &mut dyn Scheduler, name: &str) {
        scheduler.remove_analyzer(name);
    }
}

pub struct HandleCore<N> {
    id: HandleId,
    name: String,
    enabled: bool,
    native: Option<N>,
}

impl<N: Native> HandleCore<N> {
    /// A handle with no native object yet. It must be [`bind`](Self::bind)
    /// before use.
    pub fn new(id: HandleId) -> Self {
        Self {
            id,
            name: id.to_string(),
            enabled: true,
            native: None,
        }
    }

    /// Takes ownership of the native object and registers it.
    pub fn bind(&mut self, native: N, scheduler: &mut dyn Scheduler) {
        native.attach(scheduler, &self.name);
        self.native = Some(native);
        self.enabled = true;
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn check_initialization(&self) -> Result<&N> {
        self.native.as_ref().ok_or_else(|| {
            Error::InternalInvariant(format!("{}: native object not set", self.name))
        })
    }

    pub fn disable(&mut self, scheduler: &mut dyn Scheduler, diagnostics: &mut Diagnostics) -> Result<()> {
        tracing::info!(target: "script", handle = %self.name, "disable()");
        let native = self.check_initialization()?;

        if !self.enabled {
            diagnostics.report(Diagnostic::RedundantToggle {
                handle: self.name.clone(),
                enabled: false,
            });
            return Ok(());
        }

        native.detach(scheduler, &self.name);
        self.enabled = false;
        Ok(())
    }

    pub fn enable(&mut self, scheduler: &mut dyn Scheduler, diagnostics: &mut Diagnostics) -> Result<()> {
        tracing::info!(target: "script", handle = %self.name, "enable()");
        let native = self.check_initialization()?;

        if self.enabled {
            diagnostics.report(Diagnostic::RedundantToggle {
                handle: self.name.clone(),
                enabled: true,
            });
            return Ok(());
        }

        native.attach(scheduler, &self.name);
        self.enabled = true;
        Ok(())
    }
}

impl HandleCore<ComputeRef> {
    /// Average time of one force computation over `n` runs, in milliseconds.
    ///
    /// Runs on the particles as they are now. The native engine may reorder
    /// or cache particle data as a side effect, so a benchmark taken before
    /// the first step is not representative.
    pub fn benchmark(&self, particles: &ParticleData, n: u32) -> Result<f64> {
        let compute = self.check_initialization()?;
        if n == 0 {
            return Err(Error::InvalidArgument(
                "benchmark needs at least one iteration".into(),
            ));
        }
        let ms = compute.borrow_mut().benchmark(particles, n);
        tracing::info!(target: "script", handle = %self.name, n, ms, "benchmark()");
        Ok(ms)
    }

    /// Per-particle force and energy of this compute alone, as of the last
    /// evaluation it took part in. Kept while disabled.
    pub fn forces(&self) -> Result<ForceBuffer> {
        let compute = self.check_initialization()?;
        Ok(compute.borrow().forces().clone())
    }
}

/// A handle owned by a simulation context.
pub trait ManagedHandle: Any {
    fn id(&self) -> HandleId;

    fn name(&self) -> &str;

    fn is_enabled(&self) -> bool;

    fn enable(&mut self, scheduler: &mut dyn Scheduler, diagnostics: &mut Diagnostics) -> Result<()>;

    fn disable(&mut self, scheduler: &mut dyn Scheduler, diagnostics: &mut Diagnostics) -> Result<()>;

    /// Pushes coefficients into the native object. Nothing to do by default.
    fn update_coeffs(&mut self, _types: &ParticleTypeRegistry, _diagnostics: &mut Diagnostics) -> Result<()> {
        Ok(())
    }

    fn benchmark(&mut self, _particles: &ParticleData, _n: u32) -> Result<f64> {
        Err(Error::InvalidArgument(format!(
            "{} has no force computation to benchmark",
            self.name()
        )))
    }

    fn forces(&self) -> Result<ForceBuffer> {
        Err(Error::InvalidArgument(format!(
            "{} computes no forces",
            self.name()
        )))
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
