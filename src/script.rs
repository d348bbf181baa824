//! Runs a list of control commands against one simulation context.
//!
//! Handles are addressed by the label given when they were created.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::analyze::dump::TrajectoryDump;
use crate::coeff::CoeffValue;
use crate::config::Scenario;
use crate::core::context::SimulationContext;
use crate::core::ids::{Handle, HandleId};
use crate::error::{Error, Result};
use crate::forces::constant::ConstantForce;
use crate::forces::external::PeriodicForce;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptCommand {
    Periodic { label: String },
    Constant { label: String, force: [f32; 3] },
    Dump { label: String, period: u64 },
    SetDefault { label: String, name: String, value: CoeffValue },
    Set {
        label: String,
        types: Vec<String>,
        coeffs: BTreeMap<String, CoeffValue>,
    },
    SetForce { label: String, force: [f32; 3] },
    Enable(String),
    Disable(String),
    Benchmark { label: String, n: u32 },
    SetPeriod { label: String, period: u64 },
    Evaluate { timestep: u64 },
}

/// What a successfully executed command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done,
    Created { label: String, id: HandleId },
    Benchmark { label: String, ms: f64 },
    Evaluated { timestep: u64, energy: f64, net_force: Vec3 },
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Periodic(Handle<PeriodicForce>),
    Constant(Handle<ConstantForce>),
    Dump(Handle<TrajectoryDump>),
}

impl Target {
    fn id(self) -> HandleId {
        match self {
            Target::Periodic(h) => h.id(),
            Target::Constant(h) => h.id(),
            Target::Dump(h) => h.id(),
        }
    }
}

pub struct ScriptRunner {
    ctx: SimulationContext,
    labels: BTreeMap<String, Target>,
}

impl ScriptRunner {
    pub fn new(ctx: SimulationContext) -> Self {
        Self {
            ctx,
            labels: BTreeMap::new(),
        }
    }

    /// A runner over a freshly initialized context built from `scenario`.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let mut ctx = SimulationContext::new(scenario.context.clone());
        ctx.initialize(scenario.particles.build()?)?;
        Ok(Self::new(ctx))
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.ctx
    }

    pub fn into_context(self) -> SimulationContext {
        self.ctx
    }

    pub fn handle_id(&self, label: &str) -> Result<HandleId> {
        self.target(label).map(Target::id)
    }

    /// Executes `commands` in order and stops at the first failure.
    pub fn run<'a, I>(&mut self, commands: I) -> Result<Vec<Outcome>>
    where
        I: IntoIterator<Item = &'a ScriptCommand>,
    {
        commands.into_iter().map(|cmd| self.execute(cmd)).collect()
    }

    pub fn execute(&mut self, command: &ScriptCommand) -> Result<Outcome> {
        tracing::debug!(target: "script", ?command, "execute");
        match command {
            ScriptCommand::Periodic { label } => {
                self.check_label_free(label)?;
                let handle = PeriodicForce::create(&mut self.ctx)?;
                self.insert(label, Target::Periodic(handle))
            }
            ScriptCommand::Constant { label, force } => {
                self.check_label_free(label)?;
                let handle = ConstantForce::create(&mut self.ctx, Vec3::from_array(*force))?;
                self.insert(label, Target::Constant(handle))
            }
            ScriptCommand::Dump { label, period } => {
                self.check_label_free(label)?;
                let handle = TrajectoryDump::create(&mut self.ctx, *period)?;
                self.insert(label, Target::Dump(handle))
            }
            ScriptCommand::SetDefault { label, name, value } => {
                let handle = self.periodic(label)?;
                self.ctx
                    .get_mut(handle)?
                    .coeff_mut()
                    .set_default(name.as_str(), *value);
                Ok(Outcome::Done)
            }
            ScriptCommand::Set {
                label,
                types,
                coeffs,
            } => {
                let handle = self.periodic(label)?;
                self.ctx.set_coeffs(
                    handle,
                    types.as_slice(),
                    coeffs.iter().map(|(k, v)| (k.as_str(), *v)),
                )?;
                Ok(Outcome::Done)
            }
            ScriptCommand::SetForce { label, force } => {
                let handle = match self.target(label)? {
                    Target::Constant(h) => h,
                    other => return Err(kind_error(other, "constant force")),
                };
                self.ctx
                    .get_mut(handle)?
                    .set_force(Vec3::from_array(*force))?;
                Ok(Outcome::Done)
            }
            ScriptCommand::Enable(label) => {
                let id = self.handle_id(label)?;
                self.ctx.enable(id)?;
                Ok(Outcome::Done)
            }
            ScriptCommand::Disable(label) => {
                let id = self.handle_id(label)?;
                self.ctx.disable(id)?;
                Ok(Outcome::Done)
            }
            ScriptCommand::Benchmark { label, n } => {
                let id = self.handle_id(label)?;
                let ms = self.ctx.benchmark(id, *n)?;
                Ok(Outcome::Benchmark {
                    label: label.clone(),
                    ms,
                })
            }
            ScriptCommand::SetPeriod { label, period } => {
                let handle = match self.target(label)? {
                    Target::Dump(h) => h,
                    other => return Err(kind_error(other, "trajectory dump")),
                };
                self.ctx.get_mut(handle)?.set_period(*period)?;
                Ok(Outcome::Done)
            }
            ScriptCommand::Evaluate { timestep } => {
                let forces = self.ctx.evaluate(*timestep)?;
                Ok(Outcome::Evaluated {
                    timestep: *timestep,
                    energy: forces.total_energy(),
                    net_force: forces.force.iter().copied().sum(),
                })
            }
        }
    }

    fn target(&self, label: &str) -> Result<Target> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| Error::UnknownLabel(label.to_string()))
    }

    fn periodic(&self, label: &str) -> Result<Handle<PeriodicForce>> {
        match self.target(label)? {
            Target::Periodic(h) => Ok(h),
            other => Err(kind_error(other, "periodic force")),
        }
    }

    fn check_label_free(&self, label: &str) -> Result<()> {
        if self.labels.contains_key(label) {
            return Err(Error::InvalidArgument(format!(
                "label '{label}' is already in use"
            )));
        }
        Ok(())
    }

    fn insert(&mut self, label: &str, target: Target) -> Result<Outcome> {
        self.labels.insert(label.to_string(), target);
        Ok(Outcome::Created {
            label: label.to_string(),
            id: target.id(),
        })
    }
}

fn kind_error(target: Target, expected: &'static str) -> Error {
    Error::HandleKind {
        id: target.id(),
        expected,
    }
}
