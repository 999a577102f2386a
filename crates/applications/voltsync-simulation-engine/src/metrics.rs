//! Per-task and aggregate statistics over a completed-task set
//!
//! Works on the output of any policy. Turnaround and waiting time are in
//! ticks; the miss rate is a percentage of completed tasks.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SimError};
use crate::types::{Task, TaskId};

/// Whether a task finished by its deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadlineStatus {
    Met,
    Missed,
}

impl DeadlineStatus {
    /// `Met` iff completion is not later than the deadline
    pub fn evaluate(completion_time: u64, deadline: u64) -> Self {
        if completion_time > deadline {
            DeadlineStatus::Missed
        } else {
            DeadlineStatus::Met
        }
    }
}

impl std::fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeadlineStatus::Met => write!(f, "Met"),
            DeadlineStatus::Missed => write!(f, "Missed"),
        }
    }
}

/// One display row per completed task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMetrics {
    pub task_id: TaskId,
    pub turnaround_time: u64,
    pub waiting_time: u64,
    pub deadline_status: DeadlineStatus,
}

/// Aggregate statistics plus the per-task rows they were computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub average_turnaround_time: f64,
    pub average_waiting_time: f64,
    pub deadline_miss_rate: f64, // Percentage
    pub missed_deadlines: usize,
    pub rows: Vec<TaskMetrics>,
}

impl MetricsReport {
    pub fn total_tasks(&self) -> usize {
        self.rows.len()
    }
}

/// Metrics for a single completed task.
///
/// A task that never completed, or whose completion time is earlier than
/// its arrival plus execution time, breaks the scheduler contract and is
/// reported as [`SimError::ContractViolation`].
pub fn task_metrics(task: &Task) -> Result<TaskMetrics> {
    let Some(completion_time) = task.completion_time else {
        return Err(SimError::contract_violation(task.id.0.clone(), "task never completed"));
    };

    let turnaround_time = completion_time.checked_sub(task.arrival_time).ok_or_else(|| {
        SimError::contract_violation(
            task.id.0.clone(),
            format!("completed at {} before arriving at {}", completion_time, task.arrival_time),
        )
    })?;
    let waiting_time = turnaround_time.checked_sub(task.execution_time).ok_or_else(|| {
        SimError::contract_violation(
            task.id.0.clone(),
            format!(
                "turnaround {} shorter than execution time {}",
                turnaround_time, task.execution_time
            ),
        )
    })?;

    Ok(TaskMetrics {
        task_id: task.id.clone(),
        turnaround_time,
        waiting_time,
        deadline_status: DeadlineStatus::evaluate(completion_time, task.deadline),
    })
}

/// Compute turnaround, waiting time and deadline-miss statistics.
///
/// An empty set is a valid outcome with nothing to report and yields `Ok(None)`.
pub fn compute_metrics(completed: &[Task]) -> Result<Option<MetricsReport>> {
    let rows = completed
        .iter()
        .map(task_metrics)
        .collect::<Result<Vec<TaskMetrics>>>()?;

    if rows.is_empty() {
        info!("No tasks completed");
        return Ok(None);
    }

    let count = rows.len() as f64;
    let total_turnaround: u64 = rows.iter().map(|r| r.turnaround_time).sum();
    let total_waiting: u64 = rows.iter().map(|r| r.waiting_time).sum();
    let missed_deadlines = rows
        .iter()
        .filter(|r| r.deadline_status == DeadlineStatus::Missed)
        .count();

    Ok(Some(MetricsReport {
        average_turnaround_time: total_turnaround as f64 / count,
        average_waiting_time: total_waiting as f64 / count,
        deadline_miss_rate: missed_deadlines as f64 / count * 100.0,
        missed_deadlines,
        rows,
    }))
}
