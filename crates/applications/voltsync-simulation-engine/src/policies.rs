//! Scheduling policies
//!
//! Implements the policies to compare:
//! - Round Robin: fixed time quantum, FIFO requeue
//! - EDF: preemptive earliest-deadline-first at unit granularity
//! - VoltSync: EDF with slack-driven frequency scaling

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::edf::EdfScheduler;
use crate::error::{Result, SimError};
use crate::round_robin::RoundRobinScheduler;
use crate::types::{Schedule, Task};
use crate::voltsync::VoltSyncScheduler;

/// Scheduling policy trait
pub trait Scheduler {
    /// Simulate `tasks` to completion.
    ///
    /// The caller's tasks are left untouched; the policy works on fresh
    /// snapshots, so the same set can be fed to several policies.
    fn schedule(&mut self, tasks: &[Task]) -> Result<Schedule>;

    /// Get policy name
    fn name(&self) -> &str;
}

/// Policy selector used by the CLI and the comparison runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyKind {
    RoundRobin,
    Edf,
    VoltSync,
}

impl PolicyKind {
    /// Build a boxed scheduler. `time_quantum` is only used by round robin.
    pub fn build(self, time_quantum: u64) -> Result<Box<dyn Scheduler>> {
        let scheduler: Box<dyn Scheduler> = match self {
            PolicyKind::RoundRobin => Box::new(RoundRobinScheduler::new(time_quantum)?),
            PolicyKind::Edf => Box::new(EdfScheduler::new()),
            PolicyKind::VoltSync => Box::new(VoltSyncScheduler::new()),
        };
        Ok(scheduler)
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rr" | "round-robin" | "roundrobin" => Ok(PolicyKind::RoundRobin),
            "edf" => Ok(PolicyKind::Edf),
            "voltsync" | "energy" => Ok(PolicyKind::VoltSync),
            other => Err(SimError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Parse a comma-separated policy list such as `"rr,edf,voltsync"`
pub fn parse_policy_list(list: &str) -> Result<Vec<PolicyKind>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PolicyKind::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy_names() {
        assert_eq!("rr".parse::<PolicyKind>().unwrap(), PolicyKind::RoundRobin);
        assert_eq!(" EDF ".parse::<PolicyKind>().unwrap(), PolicyKind::Edf);
        assert_eq!("voltsync".parse::<PolicyKind>().unwrap(), PolicyKind::VoltSync);
        assert!(matches!("fifo".parse::<PolicyKind>(), Err(SimError::UnknownPolicy(_))));
    }

    #[test]
    fn test_parse_policy_list() {
        let kinds = parse_policy_list("rr, edf,,voltsync").unwrap();
        assert_eq!(kinds, vec![PolicyKind::RoundRobin, PolicyKind::Edf, PolicyKind::VoltSync]);
    }

    #[test]
    fn test_build_names() {
        assert_eq!(PolicyKind::RoundRobin.build(2).unwrap().name(), "RoundRobin");
        assert_eq!(PolicyKind::Edf.build(2).unwrap().name(), "EDF");
        assert_eq!(PolicyKind::VoltSync.build(2).unwrap().name(), "VoltSync");
    }

    #[test]
    fn test_build_rejects_zero_quantum_for_round_robin() {
        assert!(matches!(PolicyKind::RoundRobin.build(0), Err(SimError::InvalidQuantum(0))));
        // Quantum is irrelevant to deadline policies
        assert!(PolicyKind::Edf.build(0).is_ok());
    }
}
