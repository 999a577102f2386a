//! Policy comparison runner
//!
//! Runs one task set through several scheduling policies and collects a
//! comparable [`SimulationResult`] for each: makespan, energy, CPU
//! utilization and the turnaround/deadline metrics.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::metrics::{compute_metrics, MetricsReport};
use crate::policies::{PolicyKind, Scheduler};
use crate::power::{baseline_energy, PowerTrace};
use crate::types::{ExecutionSlice, Schedule, Task};

/// Result of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub policy_name: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Final time cursor (makespan including idle ticks)
    pub total_time: u64,
    pub busy_time: u64,
    /// `None` when no time elapsed
    pub cpu_utilization: Option<f64>,
    /// Measured for energy-aware policies, full-power estimate otherwise
    pub total_energy: f64,
    pub energy_aware: bool,
    /// `None` when nothing completed
    pub metrics: Option<MetricsReport>,
    pub power_trace: Option<PowerTrace>,
    pub timeline: Vec<ExecutionSlice>,
}

impl SimulationResult {
    pub fn from_schedule(schedule: Schedule, total_tasks: usize) -> Result<Self> {
        let busy_time = schedule.busy_time();
        let metrics = compute_metrics(&schedule.completed)?;
        let energy_aware = schedule.energy.is_some();
        let (total_energy, power_trace) = match schedule.energy {
            Some(profile) => (profile.total_energy, Some(profile.power_trace)),
            None => (baseline_energy(schedule.total_time), None),
        };

        Ok(SimulationResult {
            policy_name: schedule.policy_name,
            total_tasks,
            completed_tasks: schedule.completed.len(),
            total_time: schedule.total_time,
            busy_time,
            cpu_utilization: cpu_utilization(busy_time, schedule.total_time),
            total_energy,
            energy_aware,
            metrics,
            power_trace,
            timeline: schedule.timeline,
        })
    }
}

/// Busy share of the makespan as a percentage. `None` if `total_time` is zero.
pub fn cpu_utilization(busy_time: u64, total_time: u64) -> Option<f64> {
    if total_time == 0 {
        return None;
    }
    Some(busy_time as f64 / total_time as f64 * 100.0)
}

/// Energy saved relative to `baseline` as a percentage. `None` if the baseline is zero.
pub fn energy_savings_percent(baseline: f64, actual: f64) -> Option<f64> {
    if baseline <= 0.0 {
        return None;
    }
    Some((baseline - actual) / baseline * 100.0)
}

/// Results for several policies over the same task set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub results: Vec<SimulationResult>,
}

impl Comparison {
    /// Energy reference: EDF if it was run, else the most energy-hungry policy
    pub fn baseline(&self) -> Option<&SimulationResult> {
        self.results
            .iter()
            .find(|r| r.policy_name == "EDF")
            .or_else(|| {
                self.results
                    .iter()
                    .max_by(|a, b| a.total_energy.total_cmp(&b.total_energy))
            })
    }

    /// Savings of every non-baseline policy against [`Comparison::baseline`]
    pub fn energy_savings(&self) -> Vec<(String, Option<f64>)> {
        let Some(baseline) = self.baseline() else {
            return Vec::new();
        };
        self.results
            .iter()
            .filter(|r| r.policy_name != baseline.policy_name)
            .map(|r| {
                (
                    r.policy_name.clone(),
                    energy_savings_percent(baseline.total_energy, r.total_energy),
                )
            })
            .collect()
    }
}

/// Holds the caller's task set and runs policies over it
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    tasks: Vec<Task>,
}

impl Simulator {
    pub fn new(tasks: Vec<Task>) -> Self {
        Simulator { tasks }
    }

    /// Add a task to the simulation
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Run a single policy. The stored task set is not modified.
    pub fn run(&self, scheduler: &mut dyn Scheduler) -> Result<SimulationResult> {
        let schedule = scheduler.schedule(&self.tasks)?;
        let result = SimulationResult::from_schedule(schedule, self.tasks.len())?;

        if result.completed_tasks < result.total_tasks {
            warn!(
                policy = %result.policy_name,
                completed = result.completed_tasks,
                total = result.total_tasks,
                "not every task completed"
            );
        }
        info!(
            policy = %result.policy_name,
            total_time = result.total_time,
            energy = result.total_energy,
            "policy simulated"
        );
        Ok(result)
    }

    /// Run every policy in `policies` over the same task set
    pub fn compare(&self, policies: &[PolicyKind], time_quantum: u64) -> Result<Comparison> {
        let mut results = Vec::with_capacity(policies.len());
        for kind in policies {
            let mut scheduler = kind.build(time_quantum)?;
            results.push(self.run(scheduler.as_mut())?);
        }
        Ok(Comparison { results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edf::tests::assert_edf_selection;
    use crate::edf::EdfScheduler;
    use crate::power::MAX_FREQ_WATTS;
    use crate::round_robin::RoundRobinScheduler;
    use crate::voltsync::VoltSyncScheduler;
    use crate::workload::{reference_scenario, WorkloadConfig, WorkloadGenerator};

    fn assert_each_completed_once(tasks: &[Task], schedule: &Schedule) {
        assert_eq!(schedule.completed.len(), tasks.len(), "{}", schedule.policy_name);
        for task in tasks {
            let hits = schedule.completed.iter().filter(|t| t.id == task.id).count();
            assert_eq!(hits, 1, "{}: {} completed {} times", schedule.policy_name, task.id, hits);
        }
        assert!(schedule.completed.iter().all(|t| t.remaining_time == 0.0));
    }

    #[test]
    fn test_simulator_creation() {
        let mut simulator = Simulator::default();
        assert!(simulator.tasks().is_empty());

        simulator.add_task(Task::new("T1", 0, 1, 2));
        assert_eq!(simulator.tasks().len(), 1);
    }

    #[test]
    fn test_edf_result_uses_full_power_estimate() {
        let simulator = Simulator::new(reference_scenario());
        let result = simulator.run(&mut EdfScheduler::new()).unwrap();

        assert_eq!(result.completed_tasks, 3);
        assert_eq!(result.total_time, 7);
        assert_eq!(result.total_energy, 7.0 * MAX_FREQ_WATTS);
        assert!(!result.energy_aware);
        assert!(result.power_trace.is_none());
        assert_eq!(result.cpu_utilization, Some(100.0));
    }

    #[test]
    fn test_voltsync_result_uses_measured_energy() {
        let simulator = Simulator::new(vec![Task::new("late", 2, 1, 3)]);
        let result = simulator.run(&mut VoltSyncScheduler::new()).unwrap();

        assert!(result.energy_aware);
        assert_eq!(result.total_energy, 1.0 + 1.0 + 15.0);
        assert_eq!(result.power_trace.as_ref().unwrap().len(), 3);
        assert_eq!(result.busy_time, 1);
        let utilization = result.cpu_utilization.unwrap();
        assert!((utilization - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_reference_scenario() {
        let simulator = Simulator::new(reference_scenario());
        let comparison = simulator
            .compare(&[PolicyKind::RoundRobin, PolicyKind::Edf, PolicyKind::VoltSync], 2)
            .unwrap();

        assert_eq!(comparison.results.len(), 3);
        assert_eq!(comparison.baseline().unwrap().policy_name, "EDF");

        let savings = comparison.energy_savings();
        let voltsync = savings.iter().find(|(name, _)| name == "VoltSync").unwrap();
        // (105 - 85) / 105
        assert!((voltsync.1.unwrap() - 20.0 / 105.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_without_edf_is_most_expensive() {
        let simulator = Simulator::new(reference_scenario());
        let comparison = simulator
            .compare(&[PolicyKind::VoltSync, PolicyKind::RoundRobin], 2)
            .unwrap();

        assert_eq!(comparison.baseline().unwrap().policy_name, "RoundRobin");
    }

    #[test]
    fn test_zero_denominator_guards() {
        assert_eq!(cpu_utilization(0, 0), None);
        assert_eq!(energy_savings_percent(0.0, 0.0), None);

        let empty = Simulator::default();
        let result = empty.run(&mut EdfScheduler::new()).unwrap();
        assert!(result.metrics.is_none());
        assert!(result.cpu_utilization.is_none());
    }

    #[test]
    fn test_invariants_hold_across_seeded_workloads() {
        for seed in 0..200 {
            let config = WorkloadConfig {
                task_count: 1 + (seed as usize % 12),
                mean_interarrival: 1.0 + (seed % 4) as f64,
                max_execution: 1 + seed % 7,
                seed,
                ..Default::default()
            };
            let tasks = WorkloadGenerator::new(config).unwrap().generate().unwrap();
            let total_work: u64 = tasks.iter().map(|t| t.execution_time).sum();

            let quantum = 1 + seed % 3;
            let rr = RoundRobinScheduler::new(quantum).unwrap().schedule(&tasks).unwrap();
            assert_each_completed_once(&tasks, &rr);
            assert_eq!(rr.busy_time(), total_work, "seed {}", seed);

            let edf = EdfScheduler::new().schedule(&tasks).unwrap();
            assert_each_completed_once(&tasks, &edf);
            assert_eq!(edf.busy_time(), total_work, "seed {}", seed);
            assert_edf_selection(&tasks, &edf);

            let voltsync = VoltSyncScheduler::new().schedule(&tasks).unwrap();
            assert_each_completed_once(&tasks, &voltsync);
            assert_edf_selection(&tasks, &voltsync);
            let profile = voltsync.energy.as_ref().unwrap();
            assert_eq!(profile.total_energy, profile.power_trace.total_energy(), "seed {}", seed);
            assert_eq!(profile.power_trace.len() as u64, voltsync.total_time, "seed {}", seed);
            assert!(compute_metrics(&voltsync.completed).unwrap().is_some());
        }
    }
}
