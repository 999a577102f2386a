//! Error types for the simulation engine

use thiserror::Error;

/// Simulation result type
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that can occur while configuring or running a simulation
///
/// Missed deadlines are not errors; they are reported through the metrics.
#[derive(Error, Debug)]
pub enum SimError {
    /// Round-robin time quantum must be at least one tick
    #[error("Invalid time quantum: {0} (must be at least 1 tick)")]
    InvalidQuantum(u64),

    /// A task in the input set cannot be simulated
    #[error("Invalid task {task_id}: {reason}")]
    InvalidTask { task_id: String, reason: String },

    /// Policy name not recognised
    #[error("Unknown policy: {0}")]
    UnknownPolicy(String),

    /// Synthetic workload parameters out of range
    #[error("Invalid workload: {0}")]
    InvalidWorkload(String),

    /// Completed-task record inconsistent with the scheduler's guarantees
    #[error("Contract violation for task {task_id}: {reason}")]
    ContractViolation { task_id: String, reason: String },
}

impl SimError {
    /// Create an invalid task error
    pub fn invalid_task(task_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTask {
            task_id: task_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a contract violation error
    pub fn contract_violation(task_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            task_id: task_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid workload error
    pub fn invalid_workload(msg: impl Into<String>) -> Self {
        Self::InvalidWorkload(msg.into())
    }
}
