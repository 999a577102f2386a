//! VoltSync Simulation Engine CLI
//!
//! Command-line interface for comparing scheduling policies on a reference or
//! synthetic task set

use std::fs;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voltsync_simulation_engine::{
    parse_policy_list, reference_scenario, Comparison, Simulator, Task, WorkloadConfig,
    WorkloadGenerator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// T1(0,4,10), T2(1,2,5), T3(2,1,12)
    Reference,
    /// Seeded synthetic workload
    Random,
}

#[derive(Parser, Debug)]
#[command(name = "voltsync-sim")]
#[command(about = "Compare Round Robin, EDF and energy-aware EDF scheduling", long_about = None)]
struct Args {
    /// Policies to compare (comma-separated: rr,edf,voltsync)
    #[arg(short, long, default_value = "rr,edf,voltsync")]
    policies: String,

    /// Round-robin time quantum (ticks)
    #[arg(short, long, default_value_t = 2)]
    quantum: u64,

    /// Task set to simulate
    #[arg(short, long, value_enum, default_value_t = Scenario::Reference)]
    scenario: Scenario,

    /// Number of tasks for the random scenario
    #[arg(short, long, default_value_t = 10)]
    tasks: usize,

    /// Seed for the random scenario
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Mean ticks between arrivals for the random scenario
    #[arg(long, default_value_t = 2.0)]
    mean_interarrival: f64,

    /// Longest execution time for the random scenario (ticks)
    #[arg(long, default_value_t = 6)]
    max_execution: u64,

    /// Output JSON file path (optional)
    #[arg(short, long)]
    output: Option<String>,
}

impl Args {
    fn task_set(&self) -> anyhow::Result<Vec<Task>> {
        match self.scenario {
            Scenario::Reference => Ok(reference_scenario()),
            Scenario::Random => {
                let config = WorkloadConfig {
                    task_count: self.tasks,
                    mean_interarrival: self.mean_interarrival,
                    max_execution: self.max_execution,
                    seed: self.seed,
                    ..Default::default()
                };
                Ok(WorkloadGenerator::new(config)?.generate()?)
            }
        }
    }
}

fn print_report(comparison: &Comparison) {
    println!("\n╔══════════════════════════════════════════════════════════╗");
    println!("║  Simulation Results                                      ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");

    println!(
        "{:<12} {:>10} {:>12} {:>10} {:>14} {:>12} {:>10}",
        "Policy", "Makespan", "Energy (J)", "CPU (%)", "Avg Turnaround", "Avg Waiting", "Miss (%)"
    );
    println!("{}", "-".repeat(86));

    for result in &comparison.results {
        let utilization = result
            .cpu_utilization
            .map(|u| format!("{:.2}", u))
            .unwrap_or_else(|| "N/A".to_string());

        match &result.metrics {
            Some(metrics) => println!(
                "{:<12} {:>10} {:>12.1} {:>10} {:>14.2} {:>12.2} {:>10.2}",
                result.policy_name,
                result.total_time,
                result.total_energy,
                utilization,
                metrics.average_turnaround_time,
                metrics.average_waiting_time,
                metrics.deadline_miss_rate,
            ),
            None => println!(
                "{:<12} {:>10} {:>12.1} {:>10}   no tasks completed",
                result.policy_name, result.total_time, result.total_energy, utilization,
            ),
        }
    }

    for result in &comparison.results {
        let Some(metrics) = &result.metrics else {
            continue;
        };
        println!("\n--- Per-task metrics for {} ---", result.policy_name);
        println!("{:<10} | {:<18} | {:<15} | Deadline Status", "Task ID", "Turnaround Time", "Waiting Time");
        println!("{}", "-".repeat(65));
        for row in &metrics.rows {
            println!(
                "{:<10} | {:<18} | {:<15} | {}",
                row.task_id, row.turnaround_time, row.waiting_time, row.deadline_status
            );
        }
    }

    if let Some(baseline) = comparison.baseline() {
        let savings = comparison.energy_savings();
        if !savings.is_empty() {
            println!("\n{}", "-".repeat(86));
            println!("Energy savings vs {} baseline:", baseline.policy_name);
            for (policy, pct) in savings {
                match pct {
                    Some(pct) => println!("  {:<18} {:>6.2}%", policy, pct),
                    None => println!("  {:<18} {:>7}", policy, "N/A"),
                }
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voltsync_sim=info,voltsync_simulation_engine=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let policies = parse_policy_list(&args.policies)?;
    let tasks = args.task_set()?;

    info!(
        scenario = ?args.scenario,
        tasks = tasks.len(),
        quantum = args.quantum,
        policies = %args.policies,
        "starting comparison"
    );

    let simulator = Simulator::new(tasks);
    let comparison = simulator.compare(&policies, args.quantum)?;

    print_report(&comparison);

    // Output to JSON if requested
    if let Some(output_path) = args.output {
        let json = serde_json::to_string_pretty(&comparison)?;
        fs::write(&output_path, json)
            .with_context(|| format!("failed to write results to {}", output_path))?;
        info!(path = %output_path, "results saved");
    }

    Ok(())
}
