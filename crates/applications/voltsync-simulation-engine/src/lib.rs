//! VoltSync Simulation Engine
//!
//! Discrete-time simulator for comparing CPU scheduling policies on a single
//! simulated core:
//!
//! - [`round_robin`]: time-quantum round robin (baseline)
//! - [`edf`]: preemptive earliest-deadline-first (baseline)
//! - [`voltsync`]: energy-aware EDF that throttles tasks with loose deadlines
//!
//! Every policy works on fresh snapshots of the caller's tasks and returns
//! them in completion order. [`metrics`] turns a completed set into
//! turnaround, waiting time and deadline-miss statistics; [`simulator`] runs
//! several policies over one task set and adds energy and utilization.
//!
//! ```
//! use voltsync_simulation_engine::{compute_metrics, edf_schedule, voltsync_schedule, Task};
//!
//! let tasks = vec![Task::new("T1", 0, 4, 10), Task::new("T2", 1, 2, 5), Task::new("T3", 2, 1, 12)];
//!
//! let edf = edf_schedule(&tasks).unwrap();
//! let (completed, trace, energy) = voltsync_schedule(&tasks).unwrap();
//!
//! assert_eq!(edf.len(), 3);
//! assert_eq!(trace.total_energy(), energy);
//! assert_eq!(compute_metrics(&completed).unwrap().unwrap().deadline_miss_rate, 0.0);
//! ```

pub mod deadline_queue;
pub mod edf;
pub mod error;
pub mod metrics;
pub mod policies;
pub mod power;
pub mod round_robin;
pub mod simulator;
pub mod types;
pub mod voltsync;
pub mod workload;

pub use edf::{edf_schedule, EdfScheduler};
pub use error::{Result, SimError};
pub use metrics::{compute_metrics, DeadlineStatus, MetricsReport, TaskMetrics};
pub use policies::{parse_policy_list, PolicyKind, Scheduler};
pub use power::{EnergyProfile, PowerState, PowerTrace};
pub use round_robin::{round_robin_schedule, RoundRobinScheduler};
pub use simulator::{Comparison, SimulationResult, Simulator};
pub use types::{ExecutionSlice, Schedule, Task, TaskId};
pub use voltsync::{voltsync_schedule, VoltSyncScheduler};
pub use workload::{reference_scenario, WorkloadConfig, WorkloadGenerator};
