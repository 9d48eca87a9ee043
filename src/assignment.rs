//! # Módulo de Asignación de Colas
//!
//! Decide, una sola vez y en el momento de crear cada ráfaga, en qué cola
//! queda. No hay migración posterior entre colas.

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::burst::Burst;
use crate::error::ConfigError;
use crate::queue::SharedQueue;

/// Sub-política para elegir cola bajo la política de colas múltiples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueSelection {
    /// `RM`: cola `id mod procesadores`.
    RoundRobin,
    /// `LM`: cola con menos ráfagas; empates para el índice menor.
    LeastLoaded,
}

/// Política de asignación de ráfagas a colas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignmentPolicy {
    /// `S`: una cola compartida por todos los procesadores.
    Single,
    /// `M`: una cola por procesador.
    Multiple(QueueSelection),
}

impl AssignmentPolicy {
    /// Interpreta la política en el formato de línea de comandos (`S`/`M`
    /// seguido de `RM`/`LM`).
    ///
    /// # Arguments
    ///
    /// * `policy` - `S` o `M`
    /// * `selection` - `RM` o `LM`; se ignora con la política `S`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mps_simulator::{AssignmentPolicy, QueueSelection};
    ///
    /// let policy = AssignmentPolicy::parse("M", "LM").unwrap();
    /// assert_eq!(policy, AssignmentPolicy::Multiple(QueueSelection::LeastLoaded));
    /// assert_eq!(AssignmentPolicy::parse("S", "").unwrap(), AssignmentPolicy::Single);
    /// ```
    pub fn parse(policy: &str, selection: &str) -> Result<Self, ConfigError> {
        match policy.to_ascii_uppercase().as_str() {
            "S" => Ok(Self::Single),
            "M" => match selection.to_ascii_uppercase().as_str() {
                "RM" => Ok(Self::Multiple(QueueSelection::RoundRobin)),
                "LM" => Ok(Self::Multiple(QueueSelection::LeastLoaded)),
                _ => Err(ConfigError::UnknownQueueSelection(selection.to_string())),
            },
            _ => Err(ConfigError::UnknownAssignmentPolicy(policy.to_string())),
        }
    }

    /// Cantidad de colas que requiere la política para `processor_count`
    /// procesadores.
    pub fn queue_count(&self, processor_count: usize) -> usize {
        match self {
            Self::Single => 1,
            Self::Multiple(_) => processor_count,
        }
    }

    /// Índice de la cola que atiende el procesador `cpu_id`.
    pub fn queue_for_processor(&self, cpu_id: usize) -> usize {
        match self {
            Self::Single => 0,
            Self::Multiple(_) => cpu_id,
        }
    }
}

impl Default for AssignmentPolicy {
    fn default() -> Self {
        Self::Multiple(QueueSelection::RoundRobin)
    }
}

impl fmt::Display for AssignmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "cola única (S)"),
            Self::Multiple(QueueSelection::RoundRobin) => {
                write!(f, "colas múltiples, round-robin (M RM)")
            }
            Self::Multiple(QueueSelection::LeastLoaded) => {
                write!(f, "colas múltiples, menos cargada (M LM)")
            }
        }
    }
}

/// Enruta cada ráfaga nueva hacia exactamente una cola.
#[derive(Clone, Copy, Debug)]
pub struct QueueAssigner {
    policy: AssignmentPolicy,
    processor_count: usize,
}

impl QueueAssigner {
    /// Crea un asignador para la política y la cantidad de procesadores dadas.
    pub fn new(policy: AssignmentPolicy, processor_count: usize) -> Self {
        Self {
            policy,
            processor_count,
        }
    }

    /// Elige la cola destino de una ráfaga.
    ///
    /// Con la política `Single` devuelve siempre 0. Con `Multiple` y
    /// round-robin devuelve `id mod procesadores`; con menos cargada, la
    /// primera cola (de izquierda a derecha) con la menor longitud actual.
    ///
    /// # Arguments
    ///
    /// * `burst` - Ráfaga a ubicar
    /// * `queues` - Colas existentes, indexadas por procesador
    ///
    /// # Returns
    ///
    /// Índice de la cola elegida
    pub fn assign(&self, burst: &Burst, queues: &[Arc<SharedQueue>]) -> usize {
        match self.policy {
            AssignmentPolicy::Single => 0,
            AssignmentPolicy::Multiple(QueueSelection::RoundRobin) => {
                (burst.id % self.processor_count as u64) as usize
            }
            AssignmentPolicy::Multiple(QueueSelection::LeastLoaded) => {
                least_loaded(queues.iter().map(|queue| queue.len()))
            }
        }
    }

    /// Asigna y encola la ráfaga en un solo paso.
    ///
    /// # Returns
    ///
    /// Índice de la cola donde quedó la ráfaga
    pub fn place(&self, burst: Burst, queues: &[Arc<SharedQueue>]) -> usize {
        let index = self.assign(&burst, queues);
        trace!("ráfaga {} asignada a la cola {}", burst.id, index);
        queues[index].push(burst);
        index
    }
}

/// Índice de la primera longitud mínima (comparación estricta).
fn least_loaded(lengths: impl Iterator<Item = usize>) -> usize {
    let mut target = 0;
    let mut min_len = usize::MAX;
    for (index, len) in lengths.enumerate() {
        if len < min_len {
            min_len = len;
            target = index;
        }
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn queues(n: usize) -> Vec<Arc<SharedQueue>> {
        (0..n).map(|_| SharedQueue::new()).collect()
    }

    #[test]
    fn test_parse_policies() {
        assert_eq!(
            AssignmentPolicy::parse("m", "rm").unwrap(),
            AssignmentPolicy::Multiple(QueueSelection::RoundRobin)
        );
        assert_eq!(AssignmentPolicy::parse("S", "XX").unwrap(), AssignmentPolicy::Single);
        assert!(matches!(
            AssignmentPolicy::parse("Q", "RM"),
            Err(ConfigError::UnknownAssignmentPolicy(_))
        ));
        assert!(matches!(
            AssignmentPolicy::parse("M", "ZZ"),
            Err(ConfigError::UnknownQueueSelection(_))
        ));
    }

    #[test]
    fn test_single_policy_always_first_queue() {
        let assigner = QueueAssigner::new(AssignmentPolicy::Single, 4);
        let queues = queues(1);
        for id in 0..10 {
            assert_eq!(assigner.place(Burst::new(id, 10, 0), &queues), 0);
        }
        assert_eq!(queues[0].len(), 10);
    }

    #[test]
    fn test_round_robin_by_id() {
        let policy = AssignmentPolicy::Multiple(QueueSelection::RoundRobin);
        let assigner = QueueAssigner::new(policy, 4);
        let queues = queues(4);
        for id in 0..8 {
            assert_eq!(assigner.place(Burst::new(id, 10, 0), &queues), (id % 4) as usize);
        }
        for queue in &queues {
            assert_eq!(queue.len(), 2);
        }
        let ids: Vec<u64> = queues[3].snapshot().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 7]);
    }

    #[test]
    fn test_least_loaded_ties_go_to_lowest_index() {
        let policy = AssignmentPolicy::Multiple(QueueSelection::LeastLoaded);
        let assigner = QueueAssigner::new(policy, 3);
        let queues = queues(3);
        queues[0].push(Burst::new(100, 1, 0));

        assert_eq!(assigner.place(Burst::new(0, 1, 0), &queues), 1);
        assert_eq!(assigner.place(Burst::new(1, 1, 0), &queues), 2);
        assert_eq!(assigner.place(Burst::new(2, 1, 0), &queues), 0);
        assert_eq!(assigner.place(Burst::new(3, 1, 0), &queues), 1);
    }

    proptest! {
        #[test]
        fn prop_least_loaded_picks_minimum(
            preload in proptest::collection::vec(0usize..6, 1..8),
            extra in 0usize..40,
        ) {
            let n = preload.len();
            let policy = AssignmentPolicy::Multiple(QueueSelection::LeastLoaded);
            let assigner = QueueAssigner::new(policy, n);
            let queues = queues(n);
            let mut next_id = 0u64;
            for (index, &count) in preload.iter().enumerate() {
                for _ in 0..count {
                    queues[index].push(Burst::new(next_id, 1, 0));
                    next_id += 1;
                }
            }

            for _ in 0..extra {
                let lengths: Vec<usize> = queues.iter().map(|q| q.len()).collect();
                let min = *lengths.iter().min().unwrap();
                let chosen = assigner.place(Burst::new(next_id, 1, 0), &queues);
                next_id += 1;

                prop_assert_eq!(lengths[chosen], min);
                prop_assert!(lengths[..chosen].iter().all(|&len| len > min));
            }

            let total: usize = queues.iter().map(|q| q.len()).sum();
            prop_assert_eq!(total as u64, next_id);
        }

        #[test]
        fn prop_round_robin_is_id_mod_n(
            ids in proptest::collection::vec(0u64..10_000, 0..64),
            n in 1usize..10,
        ) {
            let policy = AssignmentPolicy::Multiple(QueueSelection::RoundRobin);
            let assigner = QueueAssigner::new(policy, n);
            let queues = queues(n);
            for &id in &ids {
                let index = assigner.place(Burst::new(id, 1, 0), &queues);
                prop_assert_eq!(index, (id % n as u64) as usize);
            }
            let total: usize = queues.iter().map(|q| q.len()).sum();
            prop_assert_eq!(total, ids.len());
        }
    }
}
