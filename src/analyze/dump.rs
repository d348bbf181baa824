use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::core::context::SimulationContext;
use crate::core::ids::{Family, Handle, HandleId};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::forces::handle::{AnalyzerSlot, HandleCore, ManagedHandle};
use crate::platform::analyzer::{Frame, TrajectoryRecorder};
use crate::platform::scheduler::Scheduler;

/// Writes particle positions every `period` timesteps.
///
/// The trajectory format fixes its frame spacing when the first frame is
/// written, so the period can never change and a disabled dump cannot be
/// resumed.
pub struct TrajectoryDump {
    core: HandleCore<AnalyzerSlot>,
    recorder: Rc<RefCell<TrajectoryRecorder>>,
    period: u64,
}

impl TrajectoryDump {
    pub fn create(ctx: &mut SimulationContext, period: u64) -> Result<Handle<Self>> {
        if period == 0 {
            return Err(Error::InvalidArgument("dump period must be at least 1".into()));
        }
        let id = ctx.allocate_id(Family::Analyzer)?;
        let recorder = Rc::new(RefCell::new(TrajectoryRecorder::new()));

        let mut core = HandleCore::new(id);
        core.bind(
            AnalyzerSlot {
                analyzer: recorder.clone(),
                period,
            },
            ctx.system_mut(),
        );
        tracing::info!(target: "script", handle = %core.name(), period, "trajectory dump created");

        Ok(ctx.register(Self {
            core,
            recorder,
            period,
        }))
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn is_enabled(&self) -> bool {
        self.core.is_enabled()
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    pub fn set_period(&mut self, period: u64) -> Result<()> {
        tracing::info!(target: "script", handle = %self.core.name(), period, "set_period()");
        Err(Error::ImmutableConfiguration(format!(
            "{}: the trajectory period cannot be changed",
            self.core.name()
        )))
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.recorder.borrow().frames().to_vec()
    }

    pub fn frame_count(&self) -> usize {
        self.recorder.borrow().frames().len()
    }
}

impl ManagedHandle for TrajectoryDump {
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
        if !self.core.is_enabled() {
            tracing::info!(target: "script", handle = %self.core.name(), "enable()");
            return Err(Error::ImmutableConfiguration(format!(
                "{}: trajectory output cannot be re-enabled after it was disabled",
                self.core.name()
            )));
        }
        self.core.enable(scheduler, diagnostics)
    }

    fn disable(&mut self, scheduler: &mut dyn Scheduler, diagnostics: &mut Diagnostics) -> Result<()> {
        self.core.disable(scheduler, diagnostics)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
