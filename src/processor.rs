//! # Módulo de Procesadores
//!
//! Cada procesador simulado se ejecuta en su propio hilo y despacha ráfagas de
//! su cola según el algoritmo configurado, hasta que vence el plazo global de
//! la simulación.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::burst::Burst;
use crate::collector::ResultCollector;
use crate::queue::SharedQueue;
use crate::scheduler::SchedulingAlgorithm;

/// Reloj de pared compartido por todos los procesadores.
///
/// Guarda el instante de inicio de la simulación y el plazo máximo, que se
/// revisa una vez por iteración del bucle de cada procesador.
#[derive(Clone, Copy, Debug)]
pub struct SimulationClock {
    start: Instant,
    deadline: Duration,
}

impl SimulationClock {
    /// Arranca el reloj en este instante.
    ///
    /// # Arguments
    ///
    /// * `deadline` - Tiempo máximo de simulación desde ahora
    pub fn start(deadline: Duration) -> Self {
        Self {
            start: Instant::now(),
            deadline,
        }
    }

    /// Milisegundos transcurridos desde el inicio.
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Instante absoluto en el que vence el plazo.
    pub fn deadline_instant(&self) -> Instant {
        self.start + self.deadline
    }

    /// Indica si ya se superó el plazo.
    pub fn deadline_passed(&self) -> bool {
        self.start.elapsed() > self.deadline
    }

    /// Instante de inicio de la simulación.
    pub fn started_at(&self) -> Instant {
        self.start
    }
}

/// Procesador simulado.
///
/// No hay un despachador central: cada procesador toma trabajo directamente de
/// la cola que le corresponde, que puede ser propia o compartida.
pub struct ProcessorWorker {
    /// Identificador del procesador
    pub cpu_id: usize,
    queue: Arc<SharedQueue>,
    algorithm: SchedulingAlgorithm,
    collector: Arc<ResultCollector>,
    clock: SimulationClock,
}

impl ProcessorWorker {
    /// Crea un procesador listo para ejecutarse en un hilo.
    ///
    /// # Arguments
    ///
    /// * `cpu_id` - Identificador del procesador
    /// * `queue` - Cola de la que toma ráfagas
    /// * `algorithm` - Algoritmo de planificación de esa cola
    /// * `collector` - Destino de las ráfagas terminadas
    /// * `clock` - Reloj compartido con el plazo global
    pub fn new(
        cpu_id: usize,
        queue: Arc<SharedQueue>,
        algorithm: SchedulingAlgorithm,
        collector: Arc<ResultCollector>,
        clock: SimulationClock,
    ) -> Self {
        Self {
            cpu_id,
            queue,
            algorithm,
            collector,
            clock,
        }
    }

    /// Ejecuta el bucle principal del procesador.
    ///
    /// En cada iteración:
    /// 1. Espera (bloqueado, sin sondeo) hasta que haya una ráfaga o venza el plazo
    /// 2. Si obtuvo una ráfaga, la ejecuta durmiendo el tiempo de servicio
    /// 3. Revisa el plazo global y termina si ya pasó
    ///
    /// Un procesador puede exceder el plazo como máximo en la duración de la
    /// ráfaga que estaba ejecutando.
    ///
    /// # Returns
    ///
    /// Cantidad de ráfagas que este procesador completó
    pub fn run(&self) -> usize {
        info!("procesador {} iniciado ({})", self.cpu_id, self.algorithm);
        let mut completed = 0;

        loop {
            let deadline = self.clock.deadline_instant();
            if let Some(burst) = self.queue.wait_select(&self.algorithm, deadline) {
                if self.execute(burst) {
                    completed += 1;
                }
            }

            if self.clock.deadline_passed() {
                info!(
                    "procesador {} alcanzó el plazo en t={} ms ({} ráfagas completadas)",
                    self.cpu_id,
                    self.clock.elapsed_ms(),
                    completed
                );
                break;
            }
        }

        // Otros procesadores de una cola compartida pueden seguir esperando.
        self.queue.notify_all();
        completed
    }

    /// Ejecuta una porción de la ráfaga.
    ///
    /// Simula el cómputo con `thread::sleep`, un milisegundo de servicio por
    /// milisegundo de reloj. Si la porción no alcanza para terminar (Round
    /// Robin preemptivo), la ráfaga vuelve al final de la misma cola.
    ///
    /// # Returns
    ///
    /// `true` si la ráfaga terminó y se envió al recolector
    fn execute(&self, mut burst: Burst) -> bool {
        burst.assign_cpu(self.cpu_id);
        let remaining = Duration::from_millis(burst.remaining);
        let slice = self.algorithm.calculate_quantum(remaining);

        debug!(
            "t={} ms, CPU {}: ráfaga {} inicia por {} ms (restante {} ms)",
            self.clock.elapsed_ms(),
            self.cpu_id,
            burst.id,
            slice.as_millis(),
            burst.remaining
        );

        thread::sleep(slice);

        if slice >= remaining {
            let finish = self.clock.elapsed_ms();
            burst.complete(finish);
            debug!(
                "t={} ms, CPU {}: ráfaga {} completada (turnaround {:?})",
                finish, self.cpu_id, burst.id, burst.turnaround_time
            );
            self.collector.append(burst);
            true
        } else {
            let left = burst.consume(slice.as_millis() as u64);
            debug!(
                "t={} ms, CPU {}: ráfaga {} interrumpida, vuelve a la cola (restante {} ms)",
                self.clock.elapsed_ms(),
                self.cpu_id,
                burst.id,
                left
            );
            self.queue.push(burst);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker_with(
        bursts: &[(u64, u64)],
        algorithm: SchedulingAlgorithm,
        deadline: Duration,
    ) -> (ProcessorWorker, Arc<SharedQueue>, Arc<ResultCollector>) {
        let queue = SharedQueue::new();
        for &(id, length) in bursts {
            queue.push(Burst::new(id, length, 0));
        }
        let collector = Arc::new(ResultCollector::new());
        let worker = ProcessorWorker::new(
            3,
            Arc::clone(&queue),
            algorithm,
            Arc::clone(&collector),
            SimulationClock::start(deadline),
        );
        (worker, queue, collector)
    }

    #[test]
    fn test_worker_drains_queue_and_stops_at_deadline() {
        let (worker, queue, collector) = worker_with(
            &[(0, 20), (1, 10)],
            SchedulingAlgorithm::fcfs(),
            Duration::from_millis(150),
        );

        let started = Instant::now();
        let completed = worker.run();

        assert_eq!(completed, 2);
        assert!(queue.is_empty());
        assert!(started.elapsed() >= Duration::from_millis(150));

        let finished = collector.snapshot();
        let ids: Vec<u64> = finished.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 1]);
        for burst in &finished {
            assert_eq!(burst.cpu_id, Some(3));
            assert_eq!(burst.remaining, 0);
            assert_eq!(
                burst.turnaround_time,
                Some(burst.finish_time.unwrap() as i64 - burst.arrival_time as i64)
            );
        }
        assert!(finished[0].finish_time.unwrap() >= 20);
        assert!(finished[1].finish_time.unwrap() >= 30);
    }

    #[test]
    fn test_preemptive_round_robin_interleaves() {
        let (worker, _queue, collector) = worker_with(
            &[(0, 30), (1, 10)],
            SchedulingAlgorithm::preemptive_round_robin(Duration::from_millis(10)),
            Duration::from_millis(200),
        );

        assert_eq!(worker.run(), 2);

        // La ráfaga corta termina primero aunque se encoló después.
        let ids: Vec<u64> = collector.snapshot().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 0]);
    }

    #[test]
    fn test_deadline_overshoot_is_bounded_by_one_burst() {
        let (worker, queue, collector) = worker_with(
            &[(0, 80), (1, 80)],
            SchedulingAlgorithm::fcfs(),
            Duration::from_millis(30),
        );

        worker.run();

        // Solo la primera ráfaga alcanza a ejecutarse.
        assert_eq!(collector.count(), 1);
        assert_eq!(queue.len(), 1);
    }
}
