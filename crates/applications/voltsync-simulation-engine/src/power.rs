//! CPU power model
//!
//! Three fixed power states with their wattage and the amount of work a task
//! receives per tick in each. Every policy and the comparison layer use the
//! same constants so energy figures are comparable.

use serde::{Deserialize, Serialize};

/// Idle / low-power sleep state (watts)
pub const SLEEP_WATTS: f64 = 1.0;

/// Throttled CPU for tasks with loose deadlines (watts)
pub const LOW_FREQ_WATTS: f64 = 5.0;

/// Maximum performance for tight deadlines (watts)
pub const MAX_FREQ_WATTS: f64 = 15.0;

/// Power state of the simulated CPU during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerState {
    Sleep,
    LowFreq,
    MaxFreq,
}

impl PowerState {
    pub fn watts(self) -> f64 {
        match self {
            PowerState::Sleep => SLEEP_WATTS,
            PowerState::LowFreq => LOW_FREQ_WATTS,
            PowerState::MaxFreq => MAX_FREQ_WATTS,
        }
    }

    /// Units of task work performed in one tick
    pub fn work_per_tick(self) -> f64 {
        match self {
            PowerState::Sleep => 0.0,
            PowerState::LowFreq => 0.5,
            PowerState::MaxFreq => 1.0,
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::Sleep => write!(f, "sleep"),
            PowerState::LowFreq => write!(f, "low-freq"),
            PowerState::MaxFreq => write!(f, "max-freq"),
        }
    }
}

/// Per-tick power states, append-only, indexed by tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerTrace {
    samples: Vec<PowerState>,
}

impl PowerTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: PowerState) {
        self.samples.push(state);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn states(&self) -> &[PowerState] {
        &self.samples
    }

    /// Wattage drawn at each tick
    pub fn watts(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.watts()).collect()
    }

    /// Sum of all samples (one tick = one joule per watt)
    pub fn total_energy(&self) -> f64 {
        self.samples.iter().map(|s| s.watts()).sum()
    }

    pub fn count(&self, state: PowerState) -> usize {
        self.samples.iter().filter(|&&s| s == state).count()
    }
}

/// Energy accounting produced by energy-aware policies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyProfile {
    pub power_trace: PowerTrace,
    pub total_energy: f64,
}

/// Energy of a policy without frequency scaling: full power for the whole makespan
pub fn baseline_energy(total_time: u64) -> f64 {
    total_time as f64 * MAX_FREQ_WATTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wattage_ordering() {
        assert!(PowerState::Sleep.watts() < PowerState::LowFreq.watts());
        assert!(PowerState::LowFreq.watts() < PowerState::MaxFreq.watts());
        assert_eq!(PowerState::MaxFreq.work_per_tick(), 1.0);
        assert_eq!(PowerState::LowFreq.work_per_tick(), 0.5);
    }

    #[test]
    fn test_trace_accounting() {
        let mut trace = PowerTrace::new();
        trace.push(PowerState::Sleep);
        trace.push(PowerState::LowFreq);
        trace.push(PowerState::MaxFreq);
        trace.push(PowerState::Sleep);

        assert_eq!(trace.len(), 4);
        assert_eq!(trace.total_energy(), 22.0);
        assert_eq!(trace.count(PowerState::Sleep), 2);
        assert_eq!(trace.watts(), vec![1.0, 5.0, 15.0, 1.0]);
    }

    #[test]
    fn test_baseline_energy() {
        assert_eq!(baseline_energy(7), 105.0);
        assert_eq!(baseline_energy(0), 0.0);
    }
}
