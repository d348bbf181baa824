use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use crate::core::particles::ParticleData;

/// A native object run periodically to observe (never modify) the particles.
pub trait Analyzer {
    fn kind(&self) -> &str;
    fn analyze(&mut self, timestep: u64, particles: &ParticleData);
}

pub type AnalyzerRef = Rc<RefCell<dyn Analyzer>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub timestep: u64,
    pub positions: Vec<Vec3>,
}

/// Append-only trajectory: frames are only ever added at increasing
/// timesteps, never rewritten.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryRecorder {
    frames: Vec<Frame>,
}

impl TrajectoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl Analyzer for TrajectoryRecorder {
    fn kind(&self) -> &str {
        "trajectory"
    }

    fn analyze(&mut self, timestep: u64, particles: &ParticleData) {
        if let Some(last) = self.frames.last() {
            if timestep <= last.timestep {
                tracing::debug!(timestep, last = last.timestep, "skipping non-increasing frame");
                return;
            }
        }
        self.frames.push(Frame {
            timestep,
            positions: particles.positions().to_vec(),
        });
    }
}
