use std::env;
use std::process;

use log::LevelFilter;

use mps_simulator::cli::{self, CliError, CliOptions, InputSource};
use mps_simulator::generator::{load_file, random_bursts};
use mps_simulator::{logger, MetricsCalculator, Simulation, SimulationError};

/// Carga las ráfagas, ejecuta la simulación y escribe el reporte.
fn run(options: CliOptions) -> Result<(), SimulationError> {
    let bursts = match &options.input {
        InputSource::File(path) => load_file(path)?,
        InputSource::Random(random) => random_bursts(random)?,
    };

    let processor_count = options.simulation.processor_count;
    let mut simulation = Simulation::new(options.simulation)?;
    simulation.load(bursts);
    let report = simulation.run()?;

    let calculator = MetricsCalculator::new();
    let metrics = calculator.calculate(&report, processor_count);
    let text = calculator.generate_report(&report.finished, &metrics);
    calculator.write_report(&text, options.output_mode, &options.outfile)?;
    Ok(())
}

fn main() {
    // ---------- CLI ----------
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match cli::parse_args(&args) {
        Ok(options) => options,
        Err(CliError::Help) => {
            println!("{}", cli::USAGE);
            return;
        }
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, cli::USAGE);
            process::exit(1);
        }
    };

    // ---------- LOGS ----------
    let level = options
        .log_level
        .unwrap_or_else(|| logger::level_from_env(LevelFilter::Warn));
    if let Err(e) = logger::init(level) {
        eprintln!("No se pudo instalar el logger: {}", e);
    }

    // ---------- SIMULACIÓN ----------
    if let Err(e) = run(options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
