//! # Módulo de Algoritmos de Planificación
//!
//! Este módulo implementa los algoritmos de scheduling que usa cada cola para
//! decidir qué ráfaga despacha un procesador, y cuánto tiempo la ejecuta en
//! cada despacho.

use std::fmt;
use std::time::Duration;

use crate::burst::Burst;
use crate::error::ConfigError;
use crate::queue::BurstQueue;

/// Algoritmos de planificación disponibles por cola.
///
/// - FCFS despacha en orden de llegada a la cola
/// - SJF (shortest-remaining-time-first, no preemptivo) despacha la ráfaga con
///   menor tiempo restante
/// - Round Robin despacha en orden de llegada; ver la variante para el uso del
///   quantum
#[derive(Clone, Debug, PartialEq)]
pub enum SchedulingAlgorithm {
    /// First-Come First-Served: se despacha el frente de la cola y se ejecuta
    /// hasta completar.
    Fcfs,

    /// Shortest-Remaining-Time-First no preemptivo.
    ///
    /// Recorre la cola completa y extrae la ráfaga con menor tiempo restante,
    /// sin importar su posición. Ante empates gana la insertada primero.
    ShortestRemainingFirst,

    /// Round Robin.
    ///
    /// Con `preemptive == false` (comportamiento heredado) el quantum se acepta
    /// pero no se usa: cada ráfaga se ejecuta completa en un solo despacho y el
    /// algoritmo es equivalente a FCFS.
    ///
    /// Con `preemptive == true` cada despacho ejecuta `min(quantum, restante)`
    /// y la ráfaga vuelve al final de su cola si aún le queda servicio.
    RoundRobin {
        /// Tiempo máximo de ejecución continua por despacho
        quantum: Duration,
        /// Activa el reparto real por quantum
        preemptive: bool,
    },
}

impl SchedulingAlgorithm {
    /// Crea un algoritmo FCFS.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mps_simulator::SchedulingAlgorithm;
    ///
    /// let algorithm = SchedulingAlgorithm::fcfs();
    /// assert!(!algorithm.is_preemptive());
    /// ```
    pub fn fcfs() -> Self {
        Self::Fcfs
    }

    /// Crea un algoritmo SJF no preemptivo.
    pub fn sjf() -> Self {
        Self::ShortestRemainingFirst
    }

    /// Crea un Round Robin con el comportamiento heredado (sin reparto por
    /// quantum).
    ///
    /// # Arguments
    ///
    /// * `quantum` - Quantum configurado (se conserva pero no limita la ejecución)
    pub fn round_robin(quantum: Duration) -> Self {
        Self::RoundRobin {
            quantum,
            preemptive: false,
        }
    }

    /// Crea un Round Robin que reparte la CPU en porciones de `quantum`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use mps_simulator::SchedulingAlgorithm;
    ///
    /// let rr = SchedulingAlgorithm::preemptive_round_robin(Duration::from_millis(20));
    /// assert!(rr.is_preemptive());
    /// ```
    pub fn preemptive_round_robin(quantum: Duration) -> Self {
        Self::RoundRobin {
            quantum,
            preemptive: true,
        }
    }

    /// Construye un algoritmo a partir de su nombre en línea de comandos.
    ///
    /// # Arguments
    ///
    /// * `name` - `FCFS`, `SJF` o `RR` (sin distinguir mayúsculas)
    /// * `quantum_ms` - Quantum en milisegundos (solo relevante para `RR`)
    /// * `preemptive` - Activa el reparto por quantum en `RR`
    ///
    /// # Returns
    ///
    /// El algoritmo, o un `ConfigError` si el nombre no se reconoce o el
    /// quantum de `RR` es cero
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mps_simulator::SchedulingAlgorithm;
    ///
    /// let sjf = SchedulingAlgorithm::from_name("sjf", 0, false).unwrap();
    /// assert_eq!(sjf, SchedulingAlgorithm::sjf());
    /// assert!(SchedulingAlgorithm::from_name("LIFO", 10, false).is_err());
    /// ```
    pub fn from_name(name: &str, quantum_ms: u64, preemptive: bool) -> Result<Self, ConfigError> {
        match name.to_ascii_uppercase().as_str() {
            "FCFS" => Ok(Self::Fcfs),
            "SJF" | "SRTF" => Ok(Self::ShortestRemainingFirst),
            "RR" => {
                if quantum_ms == 0 {
                    return Err(ConfigError::InvalidQuantum(quantum_ms));
                }
                Ok(Self::RoundRobin {
                    quantum: Duration::from_millis(quantum_ms),
                    preemptive,
                })
            }
            _ => Err(ConfigError::UnknownAlgorithm(name.to_string())),
        }
    }

    /// Determina si el algoritmo puede interrumpir una ráfaga antes de terminar.
    ///
    /// # Returns
    ///
    /// `true` solo para Round Robin en modo preemptivo
    pub fn is_preemptive(&self) -> bool {
        matches!(self, Self::RoundRobin { preemptive: true, .. })
    }

    /// Verifica que los parámetros del algoritmo sean utilizables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::RoundRobin { quantum, .. } if quantum.is_zero() => {
                Err(ConfigError::InvalidQuantum(0))
            }
            _ => Ok(()),
        }
    }

    /// Extrae de la cola la próxima ráfaga a despachar.
    ///
    /// # Arguments
    ///
    /// * `queue` - Cola (ya bloqueada por el llamador) de la que se extrae
    ///
    /// # Returns
    ///
    /// La ráfaga elegida, o `None` si la cola está vacía
    pub fn select(&self, queue: &mut BurstQueue) -> Option<Burst> {
        match self {
            Self::Fcfs | Self::RoundRobin { .. } => queue.pop_front(),
            Self::ShortestRemainingFirst => queue.remove_shortest(),
        }
    }

    /// Calcula cuánto se ejecuta una ráfaga en este despacho.
    ///
    /// # Arguments
    ///
    /// * `remaining` - Servicio pendiente de la ráfaga
    ///
    /// # Returns
    ///
    /// La duración de la porción a ejecutar
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use mps_simulator::SchedulingAlgorithm;
    ///
    /// let remaining = Duration::from_millis(500);
    /// assert_eq!(SchedulingAlgorithm::fcfs().calculate_quantum(remaining), remaining);
    ///
    /// let legacy = SchedulingAlgorithm::round_robin(Duration::from_millis(300));
    /// assert_eq!(legacy.calculate_quantum(remaining), remaining);
    ///
    /// let rr = SchedulingAlgorithm::preemptive_round_robin(Duration::from_millis(300));
    /// assert_eq!(rr.calculate_quantum(remaining), Duration::from_millis(300));
    /// ```
    pub fn calculate_quantum(&self, remaining: Duration) -> Duration {
        match self.get_quantum() {
            Some(quantum) if self.is_preemptive() => remaining.min(quantum),
            _ => remaining,
        }
    }

    /// Obtiene el quantum configurado.
    ///
    /// # Returns
    ///
    /// `Some(Duration)` para Round Robin (se use o no), `None` en otro caso
    pub fn get_quantum(&self) -> Option<Duration> {
        match self {
            Self::RoundRobin { quantum, .. } => Some(*quantum),
            _ => None,
        }
    }

    /// Descripción textual del algoritmo y sus parámetros.
    ///
    /// # Returns
    ///
    /// Texto para los registros de inicio de la simulación
    pub fn description(&self) -> String {
        match self {
            Self::Fcfs => "First-Come First-Served (no preemptivo)".to_string(),
            Self::ShortestRemainingFirst => {
                "Shortest-Remaining-Time-First (no preemptivo)".to_string()
            }
            Self::RoundRobin {
                quantum,
                preemptive: false,
            } => format!(
                "Round Robin heredado (quantum {} ms sin uso, equivale a FCFS)",
                quantum.as_millis()
            ),
            Self::RoundRobin {
                quantum,
                preemptive: true,
            } => format!("Round Robin preemptivo (quantum: {} ms)", quantum.as_millis()),
        }
    }
}

impl Default for SchedulingAlgorithm {
    fn default() -> Self {
        Self::round_robin(Duration::from_millis(crate::config::DEFAULT_QUANTUM_MS))
    }
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::ShortestRemainingFirst => write!(f, "SJF"),
            Self::RoundRobin {
                quantum,
                preemptive,
            } => {
                let mode = if *preemptive { "preemptivo" } else { "heredado" };
                write!(f, "RR {} ms ({})", quantum.as_millis(), mode)
            }
        }
    }
}
