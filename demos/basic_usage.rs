//! Ejemplo básico: compara FCFS, SJF y Round Robin sobre las mismas ráfagas

use std::time::Duration;

use mps_simulator::generator::{random_bursts, RandomBurstConfig};
use mps_simulator::{
    AssignmentPolicy, MetricsCalculator, QueueSelection, SchedulingAlgorithm, Simulation,
    SimulationConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Ejemplo: Uso Básico del Simulador ===\n");

    let bursts = random_bursts(&RandomBurstConfig {
        count: 24,
        length: 10..=120,
        arrival: 0..=100,
        seed: Some(7),
    })?;

    let algorithms = [
        SchedulingAlgorithm::fcfs(),
        SchedulingAlgorithm::sjf(),
        SchedulingAlgorithm::preemptive_round_robin(Duration::from_millis(20)),
    ];

    let calculator = MetricsCalculator::new();
    println!("| Algoritmo                | Completadas | Turnaround prom. | Espera prom. |");
    println!("|--------------------------|-------------|------------------|--------------|");

    for algorithm in algorithms {
        let config = SimulationConfig {
            processor_count: 2,
            assignment: AssignmentPolicy::Multiple(QueueSelection::LeastLoaded),
            algorithm: algorithm.clone(),
        };
        let mut simulation = Simulation::new(config)?.with_deadline(Duration::from_secs(2));
        simulation.load(bursts.clone());
        let report = simulation.run()?;
        let metrics = calculator.calculate(&report, 2);

        println!(
            "| {:<24} | {:>11} | {:>13.2} ms | {:>9.2} ms |",
            algorithm.to_string(),
            metrics.completed,
            metrics.average_turnaround,
            metrics.average_waiting
        );
    }

    Ok(())
}
