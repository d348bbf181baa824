use crate::core::particles::ParticleData;
use crate::platform::analyzer::AnalyzerRef;
use crate::platform::compute::{ComputeRef, ForceBuffer};

/// The engine's registry of active per-step computations.
pub trait Scheduler {
    fn add_compute(&mut self, compute: ComputeRef, name: &str);
    fn remove_compute(&mut self, name: &str);
    fn add_analyzer(&mut self, analyzer: AnalyzerRef, name: &str, period: u64);
    fn remove_analyzer(&mut self, name: &str);
}

struct ScheduledAnalyzer {
    name: String,
    analyzer: AnalyzerRef,
    period: u64,
}

/// In-process scheduler: active computes and analyzers in registration order.
#[derive(Default)]
pub struct System {
    computes: Vec<(String, ComputeRef)>,
    analyzers: Vec<ScheduledAnalyzer>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute_names(&self) -> impl Iterator<Item = &str> {
        self.computes.iter().map(|(name, _)| name.as_str())
    }

    pub fn analyzer_names(&self) -> impl Iterator<Item = &str> {
        self.analyzers.iter().map(|a| a.name.as_str())
    }

    pub fn compute(&self, name: &str) -> Option<&ComputeRef> {
        self.computes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, compute)| compute)
    }

    /// Sum of the forces of every active compute.
    pub fn compute_net_force(&self, particles: &ParticleData) -> ForceBuffer {
        let mut net = ForceBuffer::zeroed(particles.len());
        for (name, compute) in &self.computes {
            let mut compute = compute.borrow_mut();
            compute.compute(particles);
            tracing::trace!(target: "scheduler", compute = %name, energy = compute.forces().total_energy(), "computed");
            net.accumulate(compute.forces());
        }
        net
    }

    /// Runs every analyzer whose period divides `timestep`.
    pub fn analyze(&self, timestep: u64, particles: &ParticleData) {
        for scheduled in &self.analyzers {
            if timestep % scheduled.period == 0 {
                scheduled.analyzer.borrow_mut().analyze(timestep, particles);
            }
        }
    }
}

impl Scheduler for System {
    fn add_compute(&mut self, compute: ComputeRef, name: &str) {
        if let Some(slot) = self.computes.iter_mut().find(|(n, _)| n == name) {
            tracing::warn!(target: "scheduler", name, "replacing compute registered under the same name");
            slot.1 = compute;
            return;
        }
        self.computes.push((name.to_string(), compute));
    }

    fn remove_compute(&mut self, name: &str) {
        let before = self.computes.len();
        self.computes.retain(|(n, _)| n != name);
        if self.computes.len() == before {
            tracing::warn!(target: "scheduler", name, "no compute to remove");
        }
    }

    fn add_analyzer(&mut self, analyzer: AnalyzerRef, name: &str, period: u64) {
        let period = period.max(1);
        if let Some(slot) = self.analyzers.iter_mut().find(|a| a.name == name) {
            tracing::warn!(target: "scheduler", name, "replacing analyzer registered under the same name");
            slot.analyzer = analyzer;
            slot.period = period;
            return;
        }
        self.analyzers.push(ScheduledAnalyzer {
            name: name.to_string(),
            analyzer,
            period,
        });
    }

    fn remove_analyzer(&mut self, name: &str) {
        let before = self.analyzers.len();
        self.analyzers.retain(|a| a.name != name);
        if self.analyzers.len() == before {
            tracing::warn!(target: "scheduler", name, "no analyzer to remove");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ParticleTypeRegistry;
    use crate::platform::analyzer::TrajectoryRecorder;
    use crate::platform::compute::{ConstantForceCompute, share};
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn particles() -> ParticleData {
        let types = ParticleTypeRegistry::new(["A"]).unwrap();
        ParticleData::new(types, Vec3::splat(4.0), vec![Vec3::ZERO; 3], vec![0; 3]).unwrap()
    }

    #[test]
    fn net_force_sums_active_computes() {
        let mut system = System::new();
        system.add_compute(share(ConstantForceCompute::new(Vec3::X)), "force0");
        system.add_compute(share(ConstantForceCompute::new(Vec3::Y)), "force1");

        let net = system.compute_net_force(&particles());
        assert_eq!(net.force, vec![Vec3::new(1.0, 1.0, 0.0); 3]);

        system.remove_compute("force0");
        let net = system.compute_net_force(&particles());
        assert_eq!(net.force, vec![Vec3::Y; 3]);
        assert_eq!(system.compute_names().collect::<Vec<_>>(), ["force1"]);
    }

    #[test]
    fn analyzers_run_on_their_period() {
        let mut system = System::new();
        let recorder = Rc::new(RefCell::new(TrajectoryRecorder::new()));
        system.add_analyzer(recorder.clone(), "analyzer0", 5);

        let particles = particles();
        for step in 0..=10 {
            system.analyze(step, &particles);
        }

        let steps: Vec<u64> = recorder.borrow().frames().iter().map(|f| f.timestep).collect();
        assert_eq!(steps, [0, 5, 10]);
    }
}
