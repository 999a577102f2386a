//! Core types for the simulation engine

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::power::{EnergyProfile, PowerState};

/// Caller-supplied task identifier
///
/// Opaque to the engine. Uniqueness within a task set is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of schedulable work
///
/// All times are whole ticks: `arrival_time`, `deadline` and `execution_time`
/// are integers, and fractional execution times are not supported. Only
/// `remaining_time` is fractional, because energy-aware policies can perform
/// half a unit of work per tick.
///
/// `arrival_time`, `execution_time` and `deadline` are fixed at construction.
/// `remaining_time` and `completion_time` are run-state owned by whichever
/// scheduler is simulating this copy of the task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub arrival_time: u64,
    pub execution_time: u64, // Ticks of work at full speed
    pub deadline: u64,
    pub remaining_time: f64, // Fractional under reduced speed
    pub completion_time: Option<u64>,
}

impl Task {
    pub fn new(id: impl Into<String>, arrival_time: u64, execution_time: u64, deadline: u64) -> Self {
        Task {
            id: TaskId::new(id),
            arrival_time,
            execution_time,
            deadline,
            remaining_time: execution_time as f64,
            completion_time: None,
        }
    }

    /// Snapshot with the same identity and freshly initialised run-state
    pub fn fresh(&self) -> Self {
        Task {
            id: self.id.clone(),
            arrival_time: self.arrival_time,
            execution_time: self.execution_time,
            deadline: self.deadline,
            remaining_time: self.execution_time as f64,
            completion_time: None,
        }
    }

    /// Reinitialise run-state in place
    pub fn reset(&mut self) {
        self.remaining_time = self.execution_time as f64;
        self.completion_time = None;
    }

    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }

    pub fn has_arrived(&self, time: u64) -> bool {
        self.arrival_time <= time
    }

    /// Perform `work` units and return whether the task has run out of work.
    ///
    /// Overshoot from a full-speed tick on a half-finished unit clamps to zero.
    pub(crate) fn run_for(&mut self, work: f64) -> bool {
        debug_assert!(!self.is_completed(), "task {} revisited after completion", self.id);
        self.remaining_time = (self.remaining_time - work).max(0.0);
        self.remaining_time <= 0.0
    }

    /// Mark the task as completed at `time`. Only ever called once per run.
    pub(crate) fn complete(&mut self, time: u64) {
        debug_assert!(self.completion_time.is_none(), "task {} completed twice", self.id);
        self.remaining_time = 0.0;
        self.completion_time = Some(time);
    }
}

/// Build fresh per-run snapshots of a caller's task set, rejecting tasks
/// that can never complete.
pub(crate) fn snapshot_tasks(tasks: &[Task]) -> Result<Vec<Task>> {
    tasks
        .iter()
        .map(|task| {
            if task.execution_time == 0 {
                Err(SimError::invalid_task(
                    task.id.0.clone(),
                    "execution time must be at least 1 tick",
                ))
            } else {
                Ok(task.fresh())
            }
        })
        .collect()
}

/// One contiguous interval `[start, end)` of the simulated CPU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSlice {
    pub start: u64,
    pub end: u64,
    pub task_id: Option<TaskId>,      // None when the CPU is idle
    pub power: Option<PowerState>,    // Only recorded by energy-aware policies
}

impl ExecutionSlice {
    pub fn busy(task_id: TaskId, start: u64, end: u64) -> Self {
        ExecutionSlice { start, end, task_id: Some(task_id), power: None }
    }

    pub fn idle(start: u64, end: u64) -> Self {
        ExecutionSlice { start, end, task_id: None, power: None }
    }

    pub fn with_power(mut self, power: PowerState) -> Self {
        self.power = Some(power);
        self
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_idle(&self) -> bool {
        self.task_id.is_none()
    }
}

/// Append a slice, extending the previous one when the same task (or idle
/// period) continues at the same power state.
pub(crate) fn record_slice(timeline: &mut Vec<ExecutionSlice>, slice: ExecutionSlice) {
    if slice.is_empty() {
        return;
    }
    if let Some(last) = timeline.last_mut() {
        if last.end == slice.start && last.task_id == slice.task_id && last.power == slice.power {
            last.end = slice.end;
            return;
        }
    }
    timeline.push(slice);
}

/// Output of one scheduler run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub policy_name: String,
    /// Tasks in the order they completed
    pub completed: Vec<Task>,
    pub timeline: Vec<ExecutionSlice>,
    /// Final position of the time cursor
    pub total_time: u64,
    /// Power trace and energy, for energy-aware policies only
    pub energy: Option<EnergyProfile>,
}

impl Schedule {
    /// Ticks during which some task was running
    pub fn busy_time(&self) -> u64 {
        self.timeline
            .iter()
            .filter(|slice| !slice.is_idle())
            .map(ExecutionSlice::len)
            .sum()
    }

    pub fn completion_of(&self, id: &TaskId) -> Option<u64> {
        self.completed
            .iter()
            .find(|t| &t.id == id)
            .and_then(|t| t.completion_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("T1", 0, 4, 10);

        assert_eq!(task.id, TaskId::new("T1"));
        assert_eq!(task.remaining_time, 4.0);
        assert!(!task.is_completed());
        assert!(task.has_arrived(0));
    }

    #[test]
    fn test_fresh_resets_run_state() {
        let mut task = Task::new("T1", 2, 3, 9);
        task.run_for(3.0);
        task.complete(5);
        assert!(task.is_completed());

        let fresh = task.fresh();
        assert_eq!(fresh.remaining_time, 3.0);
        assert!(fresh.completion_time.is_none());
        assert_eq!(fresh.arrival_time, 2);
        assert_eq!(fresh.deadline, 9);

        task.reset();
        assert_eq!(task, fresh);
    }

    #[test]
    fn test_run_for_clamps_overshoot() {
        let mut task = Task::new("T1", 0, 1, 5);
        assert!(!task.run_for(0.5));
        assert!(task.run_for(1.0));
        assert_eq!(task.remaining_time, 0.0);
    }

    #[test]
    fn test_snapshot_rejects_zero_execution() {
        let tasks = vec![Task::new("ok", 0, 1, 1), Task::new("empty", 0, 0, 1)];

        match snapshot_tasks(&tasks) {
            Err(SimError::InvalidTask { task_id, .. }) => assert_eq!(task_id, "empty"),
            other => panic!("expected invalid task, got {:?}", other),
        }
    }

    #[test]
    fn test_record_slice_merges_contiguous_runs() {
        let mut timeline = Vec::new();
        record_slice(&mut timeline, ExecutionSlice::busy(TaskId::new("T1"), 0, 1));
        record_slice(&mut timeline, ExecutionSlice::busy(TaskId::new("T1"), 1, 2));
        record_slice(&mut timeline, ExecutionSlice::busy(TaskId::new("T2"), 2, 3));
        record_slice(
            &mut timeline,
            ExecutionSlice::busy(TaskId::new("T2"), 3, 4).with_power(PowerState::MaxFreq),
        );
        record_slice(&mut timeline, ExecutionSlice::idle(4, 4));

        assert_eq!(timeline.len(), 3);
        assert_eq!((timeline[0].start, timeline[0].end), (0, 2));
        assert_eq!(timeline[2].power, Some(PowerState::MaxFreq));
    }

    #[test]
    fn test_schedule_busy_time() {
        let schedule = Schedule {
            policy_name: "test".to_string(),
            completed: Vec::new(),
            timeline: vec![
                ExecutionSlice::idle(0, 2),
                ExecutionSlice::busy(TaskId::new("T1"), 2, 5),
                ExecutionSlice::busy(TaskId::new("T2"), 5, 6),
            ],
            total_time: 6,
            energy: None,
        };

        assert_eq!(schedule.busy_time(), 4);
    }
}
