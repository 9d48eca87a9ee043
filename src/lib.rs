//! # Simulador de Planificación Multiprocesador
//!
//! Esta biblioteca simula la planificación de CPU en una máquina con varios
//! procesadores: cada procesador simulado corre en su propio hilo y consume
//! ráfagas de CPU desde colas, según una política de asignación de colas y un
//! algoritmo de planificación configurables, registrando los tiempos de cada
//! ráfaga.
//!
//! ## Características principales
//!
//! - **Colas protegidas**: cada cola vive detrás de un `Mutex` con una
//!   `Condvar`, de modo que los procesadores sin trabajo se bloquean en lugar
//!   de sondear.
//! - **Políticas de asignación**: cola única compartida, o una cola por
//!   procesador elegida por round-robin (`id mod N`) o por menor carga.
//! - **Algoritmos de scheduling**: FCFS, SJF no preemptivo y Round Robin (con
//!   el comportamiento heredado, equivalente a FCFS, o con reparto real por
//!   quantum).
//! - **Plazo global**: todos los procesadores se detienen al superar un tiempo
//!   de pared fijo.
//!
//! ## Estructura del proyecto
//!
//! - `burst`: la ráfaga de CPU y sus tiempos
//! - `queue`: cola de ráfagas y su envoltorio sincronizado
//! - `assignment`: políticas de asignación de ráfagas a colas
//! - `scheduler`: algoritmos de planificación
//! - `processor`: bucle de ejecución de cada procesador
//! - `collector`: recolección de ráfagas terminadas
//! - `simulation`: contexto de la ejecución y orquestación de hilos
//! - `generator`: lectura de archivo y generación aleatoria de ráfagas
//! - `metrics`: estadísticas y reportes
//! - `cli`: interpretación de la línea de comandos
//! - `error`: tipos de error
//! - `logger`: salida de logs a stderr

pub mod assignment;
pub mod burst;
pub mod cli;
pub mod collector;
pub mod error;
pub mod generator;
pub mod logger;
pub mod metrics;
pub mod processor;
pub mod queue;
pub mod scheduler;
pub mod simulation;

// Re-exportar las estructuras principales para facilitar su uso
pub use assignment::{AssignmentPolicy, QueueAssigner, QueueSelection};
pub use burst::Burst;
pub use collector::ResultCollector;
pub use error::{ConfigError, InputError, OutputError, SimulationError};
pub use metrics::{MetricsCalculator, OutputMode, SimulationMetrics};
pub use processor::{ProcessorWorker, SimulationClock};
pub use queue::{BurstQueue, SharedQueue};
pub use scheduler::SchedulingAlgorithm;
pub use simulation::{Simulation, SimulationConfig, SimulationReport};

/// Constantes y valores por defecto del simulador
pub mod config {
    use std::ops::RangeInclusive;
    use std::time::Duration;

    /// Cantidad máxima de procesadores simulados
    pub const MAX_PROCESSORS: usize = 10;

    /// Plazo de reloj de pared tras el cual todos los procesadores se detienen
    pub const SIMULATION_DEADLINE: Duration = Duration::from_secs(30);

    /// Procesadores por defecto
    pub const DEFAULT_PROCESSORS: usize = 2;

    /// Quantum por defecto para Round Robin (en milisegundos)
    pub const DEFAULT_QUANTUM_MS: u64 = 20;

    /// Archivo de entrada por defecto
    pub const DEFAULT_INFILE: &str = "in.txt";

    /// Archivo de salida por defecto
    pub const DEFAULT_OUTFILE: &str = "out.txt";

    /// Cantidad de ráfagas en modo aleatorio
    pub const DEFAULT_RANDOM_COUNT: usize = 200;

    /// Rango de duración de servicio en modo aleatorio (ms)
    pub const DEFAULT_LENGTH_RANGE: RangeInclusive<u64> = 10..=1000;

    /// Rango de tiempo de llegada en modo aleatorio (ms)
    pub const DEFAULT_ARRIVAL_RANGE: RangeInclusive<u64> = 10..=500;
}
