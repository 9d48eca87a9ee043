//! # Módulo de Simulación Principal
//!
//! Contiene el contexto explícito de una ejecución: colas, asignador,
//! algoritmo y plazo. Lo crea el punto de entrada, carga las ráfagas y lanza
//! un hilo por procesador; al terminar todos, entrega los resultados.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::assignment::{AssignmentPolicy, QueueAssigner};
use crate::burst::Burst;
use crate::collector::ResultCollector;
use crate::config;
use crate::error::{ConfigError, SimulationError};
use crate::processor::{ProcessorWorker, SimulationClock};
use crate::queue::SharedQueue;
use crate::scheduler::SchedulingAlgorithm;

/// Parámetros inmutables de una ejecución.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Cantidad de procesadores simulados
    pub processor_count: usize,
    /// Política de asignación de ráfagas a colas
    pub assignment: AssignmentPolicy,
    /// Algoritmo de planificación usado en cada cola
    pub algorithm: SchedulingAlgorithm,
}

impl SimulationConfig {
    /// Verifica la configuración antes de construir la simulación.
    ///
    /// # Returns
    ///
    /// `Ok(())` si es válida, o el primer `ConfigError` encontrado
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processor_count == 0 || self.processor_count > config::MAX_PROCESSORS {
            return Err(ConfigError::InvalidProcessorCount {
                count: self.processor_count,
                max: config::MAX_PROCESSORS,
            });
        }
        self.algorithm.validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            processor_count: config::DEFAULT_PROCESSORS,
            assignment: AssignmentPolicy::default(),
            algorithm: SchedulingAlgorithm::default(),
        }
    }
}

/// Resultado de una ejecución completa.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Ráfagas terminadas en orden de finalización
    pub finished: Vec<Burst>,
    /// Contador de procesos completados
    pub completed: usize,
    /// Ráfagas que quedaron en cola al vencer el plazo
    pub unfinished: usize,
    /// Duración real de la simulación
    pub elapsed: Duration,
}

/// Orquestador de la simulación.
///
/// Es dueño de las colas y de la configuración; los procesadores reciben solo
/// referencias compartidas (`Arc`) a su cola y al recolector.
pub struct Simulation {
    config: SimulationConfig,
    queues: Vec<Arc<SharedQueue>>,
    assigner: QueueAssigner,
    deadline: Duration,
    loaded: usize,
}

impl Simulation {
    /// Crea una simulación con el plazo fijo por defecto.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuración de la ejecución
    ///
    /// # Returns
    ///
    /// La simulación con sus colas vacías, o un `ConfigError`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mps_simulator::{AssignmentPolicy, SchedulingAlgorithm, Simulation, SimulationConfig};
    ///
    /// let config = SimulationConfig {
    ///     processor_count: 2,
    ///     assignment: AssignmentPolicy::Single,
    ///     algorithm: SchedulingAlgorithm::fcfs(),
    /// };
    /// let simulation = Simulation::new(config).unwrap();
    /// assert_eq!(simulation.queue_lengths(), vec![0]);
    /// ```
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let queue_count = config.assignment.queue_count(config.processor_count);
        let queues = (0..queue_count).map(|_| SharedQueue::new()).collect();
        let assigner = QueueAssigner::new(config.assignment, config.processor_count);

        Ok(Self {
            config,
            queues,
            assigner,
            deadline: config::SIMULATION_DEADLINE,
            loaded: 0,
        })
    }

    /// Reemplaza el plazo global de la simulación.
    ///
    /// El binario siempre usa `config::SIMULATION_DEADLINE`; esto existe para
    /// quien embebe la biblioteca (y para las pruebas).
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Asigna cada ráfaga a exactamente una cola.
    ///
    /// # Arguments
    ///
    /// * `bursts` - Ráfagas en el orden en que se crearon
    ///
    /// # Returns
    ///
    /// Cantidad total de ráfagas cargadas hasta ahora
    pub fn load<I>(&mut self, bursts: I) -> usize
    where
        I: IntoIterator<Item = Burst>,
    {
        for burst in bursts {
            self.assigner.place(burst, &self.queues);
            self.loaded += 1;
        }
        info!(
            "{} ráfagas cargadas, longitudes de cola: {:?}",
            self.loaded,
            self.queue_lengths()
        );
        self.loaded
    }

    /// Longitud actual de cada cola.
    pub fn queue_lengths(&self) -> Vec<usize> {
        self.queues.iter().map(|queue| queue.len()).collect()
    }

    /// Contenido actual de cada cola (útil antes de ejecutar).
    pub fn queue_snapshots(&self) -> Vec<Vec<Burst>> {
        self.queues.iter().map(|queue| queue.snapshot()).collect()
    }

    /// Ejecuta la simulación y espera a que terminen todos los procesadores.
    ///
    /// 1. Arranca el reloj compartido
    /// 2. Lanza un hilo por procesador, cada uno con su cola
    /// 3. Espera a todos los hilos (barrera de `join`)
    /// 4. Devuelve las ráfagas terminadas en orden de finalización
    ///
    /// # Returns
    ///
    /// `SimulationReport` con los resultados, o
    /// `SimulationError::WorkerPanicked` si algún hilo terminó con pánico
    pub fn run(self) -> Result<SimulationReport, SimulationError> {
        info!(
            "=== Simulación: {} procesadores, {}, {} (plazo {} ms) ===",
            self.config.processor_count,
            self.config.assignment,
            self.config.algorithm.description(),
            self.deadline.as_millis()
        );

        let collector = Arc::new(ResultCollector::new());
        let clock = SimulationClock::start(self.deadline);

        let handles: Vec<_> = (0..self.config.processor_count)
            .map(|cpu_id| {
                let queue_index = self.config.assignment.queue_for_processor(cpu_id);
                let worker = ProcessorWorker::new(
                    cpu_id,
                    Arc::clone(&self.queues[queue_index]),
                    self.config.algorithm.clone(),
                    Arc::clone(&collector),
                    clock,
                );
                (cpu_id, thread::spawn(move || worker.run()))
            })
            .collect();

        let mut panicked = None;
        for (cpu_id, handle) in handles {
            if handle.join().is_err() {
                warn!("el procesador {} terminó con pánico", cpu_id);
                panicked.get_or_insert(cpu_id);
            }
        }
        if let Some(processor) = panicked {
            return Err(SimulationError::WorkerPanicked { processor });
        }

        let elapsed = clock.started_at().elapsed();
        let unfinished = self.queue_lengths().iter().sum();
        let completed = collector.count();
        let finished = match Arc::try_unwrap(collector) {
            Ok(collector) => collector.into_finished(),
            Err(shared) => shared.snapshot(),
        };

        info!(
            "=== Simulación completada en {} ms: {} terminadas, {} pendientes ===",
            elapsed.as_millis(),
            completed,
            unfinished
        );

        Ok(SimulationReport {
            finished,
            completed,
            unfinished,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::QueueSelection;

    #[test]
    fn test_invalid_processor_count_is_rejected() {
        for count in [0, config::MAX_PROCESSORS + 1] {
            let config = SimulationConfig {
                processor_count: count,
                ..SimulationConfig::default()
            };
            assert!(matches!(
                Simulation::new(config),
                Err(ConfigError::InvalidProcessorCount { .. })
            ));
        }
    }

    #[test]
    fn test_zero_quantum_is_rejected() {
        let config = SimulationConfig {
            algorithm: SchedulingAlgorithm::round_robin(Duration::ZERO),
            ..SimulationConfig::default()
        };
        assert!(matches!(Simulation::new(config), Err(ConfigError::InvalidQuantum(0))));
    }

    #[test]
    fn test_queue_count_follows_policy() {
        let single = Simulation::new(SimulationConfig {
            processor_count: 4,
            assignment: AssignmentPolicy::Single,
            algorithm: SchedulingAlgorithm::fcfs(),
        })
        .unwrap();
        assert_eq!(single.queue_lengths().len(), 1);

        let multiple = Simulation::new(SimulationConfig {
            processor_count: 4,
            assignment: AssignmentPolicy::Multiple(QueueSelection::LeastLoaded),
            algorithm: SchedulingAlgorithm::fcfs(),
        })
        .unwrap();
        assert_eq!(multiple.queue_lengths().len(), 4);
    }

    #[test]
    fn test_load_places_every_burst_once() {
        let mut simulation = Simulation::new(SimulationConfig {
            processor_count: 3,
            assignment: AssignmentPolicy::Multiple(QueueSelection::LeastLoaded),
            algorithm: SchedulingAlgorithm::sjf(),
        })
        .unwrap();

        let loaded = simulation.load((0..10).map(|id| Burst::new(id, 5, 0)));
        assert_eq!(loaded, 10);
        assert_eq!(simulation.queue_lengths(), vec![4, 3, 3]);
    }

    #[test]
    fn test_run_with_empty_queues_stops_at_deadline() {
        let simulation = Simulation::new(SimulationConfig::default())
            .unwrap()
            .with_deadline(Duration::from_millis(40));
        let report = simulation.run().unwrap();

        assert!(report.finished.is_empty());
        assert_eq!(report.completed, 0);
        assert_eq!(report.unfinished, 0);
        assert!(report.elapsed >= Duration::from_millis(40));
    }
}
