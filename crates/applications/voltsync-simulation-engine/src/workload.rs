//! Task-set generation
//!
//! Synthetic workloads model arrivals as a Poisson process (exponential
//! inter-arrival gaps), uniform execution times, and deadlines placed at a
//! random multiple of the execution time after arrival. Generation is seeded
//! so that a comparison can be reproduced exactly.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Uniform};

use crate::error::{Result, SimError};
use crate::types::Task;

/// Parameters for a synthetic workload
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    pub task_count: usize,
    /// Mean gap between consecutive arrivals (ticks)
    pub mean_interarrival: f64,
    /// Execution times are drawn from `1..=max_execution`
    pub max_execution: u64,
    /// Deadline = arrival + execution * factor, factor drawn from this range
    pub slack_factor: (f64, f64),
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            task_count: 10,
            mean_interarrival: 2.0,
            max_execution: 6,
            slack_factor: (1.0, 3.0),
            seed: 42,
        }
    }
}

/// Seeded synthetic workload generator
pub struct WorkloadGenerator {
    config: WorkloadConfig,
    rng: StdRng,
}

impl WorkloadGenerator {
    pub fn new(config: WorkloadConfig) -> Result<Self> {
        if !(config.mean_interarrival > 0.0) {
            return Err(SimError::invalid_workload(format!(
                "mean inter-arrival time must be positive, got {}",
                config.mean_interarrival
            )));
        }
        if config.max_execution == 0 {
            return Err(SimError::invalid_workload("max execution time must be at least 1 tick"));
        }
        let (low, high) = config.slack_factor;
        if !(low >= 1.0 && high >= low) {
            return Err(SimError::invalid_workload(format!(
                "slack factor range must satisfy 1 <= low <= high, got {}..{}",
                low, high
            )));
        }

        let rng = StdRng::seed_from_u64(config.seed);
        Ok(WorkloadGenerator { config, rng })
    }

    /// Generate `task_count` tasks named `T1..Tn` in arrival order
    pub fn generate(&mut self) -> Result<Vec<Task>> {
        let gaps = Exp::new(1.0 / self.config.mean_interarrival)
            .map_err(|e| SimError::invalid_workload(e.to_string()))?;
        let execution = Uniform::new_inclusive(1, self.config.max_execution);
        let (low, high) = self.config.slack_factor;
        let slack = Uniform::new_inclusive(low, high);

        let mut arrival = 0.0f64;
        let mut tasks = Vec::with_capacity(self.config.task_count);

        for i in 0..self.config.task_count {
            if i > 0 {
                arrival += gaps.sample(&mut self.rng);
            }
            let arrival_time = arrival.floor() as u64;
            let execution_time = execution.sample(&mut self.rng);
            let window = (execution_time as f64 * slack.sample(&mut self.rng)).ceil() as u64;

            tasks.push(Task::new(
                format!("T{}", i + 1),
                arrival_time,
                execution_time,
                arrival_time + window,
            ));
        }

        Ok(tasks)
    }
}

/// The three-task scenario used throughout the comparisons:
/// T1(arrival 0, exec 4, deadline 10), T2(1, 2, 5), T3(2, 1, 12)
pub fn reference_scenario() -> Vec<Task> {
    vec![
        Task::new("T1", 0, 4, 10),
        Task::new("T2", 1, 2, 5),
        Task::new("T3", 2, 1, 12),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenario() {
        let tasks = reference_scenario();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[1].deadline, 5);
        assert!(tasks.iter().all(|t| !t.is_completed()));
    }

    #[test]
    fn test_generation_is_reproducible() {
        let config = WorkloadConfig { task_count: 25, ..Default::default() };
        let a = WorkloadGenerator::new(config.clone()).unwrap().generate().unwrap();
        let b = WorkloadGenerator::new(config).unwrap().generate().unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 25);
    }

    #[test]
    fn test_generated_tasks_are_well_formed() {
        let config = WorkloadConfig { task_count: 50, max_execution: 4, seed: 7, ..Default::default() };
        let tasks = WorkloadGenerator::new(config).unwrap().generate().unwrap();

        assert_eq!(tasks[0].arrival_time, 0);
        for pair in tasks.windows(2) {
            assert!(pair[0].arrival_time <= pair[1].arrival_time);
        }
        for task in &tasks {
            assert!((1..=4).contains(&task.execution_time));
            assert!(task.deadline >= task.arrival_time + task.execution_time);
        }
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let bad_gap = WorkloadConfig { mean_interarrival: 0.0, ..Default::default() };
        assert!(matches!(WorkloadGenerator::new(bad_gap), Err(SimError::InvalidWorkload(_))));

        let bad_exec = WorkloadConfig { max_execution: 0, ..Default::default() };
        assert!(WorkloadGenerator::new(bad_exec).is_err());

        let bad_slack = WorkloadConfig { slack_factor: (0.5, 2.0), ..Default::default() };
        assert!(WorkloadGenerator::new(bad_slack).is_err());
    }
}
