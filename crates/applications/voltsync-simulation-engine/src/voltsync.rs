//! VoltSync: energy-aware EDF
//!
//! Picks the ready task exactly like [`crate::edf::EdfScheduler`], then
//! chooses a CPU frequency from the task's slack:
//!
//! - slack `<=` remaining work + safety margin: full speed, [`PowerState::MaxFreq`]
//! - otherwise: half speed, [`PowerState::LowFreq`]
//!
//! Idle ticks are spent in [`PowerState::Sleep`]. Every tick appends exactly one
//! sample to the power trace and the same wattage to total energy, so
//! `total_energy == sum(trace)` and `trace.len() == total_time`.

use tracing::{debug, trace};

use crate::deadline_queue::DeadlineQueue;
use crate::error::Result;
use crate::policies::Scheduler;
use crate::power::{EnergyProfile, PowerState, PowerTrace};
use crate::types::{record_slice, snapshot_tasks, ExecutionSlice, Schedule, Task};

/// Extra ticks of slack demanded before a task may be throttled
pub const DEFAULT_SAFETY_MARGIN: f64 = 1.0;

/// Energy-aware EDF scheduler with dynamic frequency scaling
#[derive(Debug, Clone)]
pub struct VoltSyncScheduler {
    safety_margin: f64,
}

impl Default for VoltSyncScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl VoltSyncScheduler {
    pub fn new() -> Self {
        VoltSyncScheduler {
            safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }

    pub fn with_safety_margin(safety_margin: f64) -> Self {
        VoltSyncScheduler { safety_margin }
    }

    /// Frequency for `task` at `time`.
    ///
    /// Slack is signed: a task already past its deadline always runs at full speed.
    pub fn select_power_state(&self, task: &Task, time: u64) -> PowerState {
        let slack = task.deadline as f64 - time as f64;
        if slack <= task.remaining_time + self.safety_margin {
            PowerState::MaxFreq
        } else {
            PowerState::LowFreq
        }
    }
}

impl Scheduler for VoltSyncScheduler {
    fn schedule(&mut self, input: &[Task]) -> Result<Schedule> {
        let mut tasks = snapshot_tasks(input)?;
        let total = tasks.len();
        let mut queue = DeadlineQueue::new(&tasks);

        let mut time = 0u64;
        let mut completed = Vec::with_capacity(total);
        let mut timeline = Vec::new();
        let mut power_trace = PowerTrace::new();
        let mut total_energy = 0.0;

        while completed.len() < total {
            queue.admit(&tasks, time);

            let Some(index) = queue.peek() else {
                // Sleep one tick at a time so every idle tick is power-accounted
                power_trace.push(PowerState::Sleep);
                total_energy += PowerState::Sleep.watts();
                record_slice(
                    &mut timeline,
                    ExecutionSlice::idle(time, time + 1).with_power(PowerState::Sleep),
                );
                time += 1;
                continue;
            };

            let state = self.select_power_state(&tasks[index], time);
            let task = &mut tasks[index];
            trace!(task = %task.id, time, remaining = task.remaining_time, power = %state, "running");

            let finished = task.run_for(state.work_per_tick());
            power_trace.push(state);
            total_energy += state.watts();
            record_slice(
                &mut timeline,
                ExecutionSlice::busy(task.id.clone(), time, time + 1).with_power(state),
            );
            time += 1;

            if finished {
                task.complete(time);
                debug!(task = %task.id, time, deadline = task.deadline, "task completed");
                completed.push(task.clone());
                queue.pop();
            }
        }

        debug!(
            policy = self.name(),
            total_time = time,
            total_energy,
            tasks = total,
            "simulation finished"
        );

        Ok(Schedule {
            policy_name: self.name().to_string(),
            completed,
            timeline,
            total_time: time,
            energy: Some(EnergyProfile {
                power_trace,
                total_energy,
            }),
        })
    }

    fn name(&self) -> &str {
        "VoltSync"
    }
}

/// Run VoltSync over `tasks`.
///
/// Returns the tasks in completion order, the per-tick power trace and the
/// total energy consumed.
pub fn voltsync_schedule(tasks: &[Task]) -> Result<(Vec<Task>, PowerTrace, f64)> {
    let schedule = VoltSyncScheduler::new().schedule(tasks)?;
    let (power_trace, total_energy) = match schedule.energy {
        Some(profile) => (profile.power_trace, profile.total_energy),
        None => (PowerTrace::new(), 0.0),
    };
    Ok((schedule.completed, power_trace, total_energy))
}
