//! # Módulo de Colas de Ráfagas
//!
//! Define la cola ordenada de ráfagas (`BurstQueue`) y su envoltorio
//! sincronizado (`SharedQueue`). La única forma de tocar una cola compartida
//! es a través de su `Mutex`, de modo que un acceso sin exclusión mutua no
//! compila. La `Condvar` asociada despierta a los procesadores en espera
//! cuando llega trabajo nuevo.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::burst::Burst;
use crate::scheduler::SchedulingAlgorithm;

/// Secuencia ordenada de ráfagas (orden de inserción).
///
/// Las operaciones son las que necesitan los algoritmos de planificación:
/// insertar al final, sacar del frente y extraer una posición arbitraria.
#[derive(Debug, Default, Clone)]
pub struct BurstQueue {
    items: VecDeque<Burst>,
}

impl BurstQueue {
    /// Crea una cola vacía.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Inserta una ráfaga al final de la cola.
    pub fn push_back(&mut self, burst: Burst) {
        self.items.push_back(burst);
    }

    /// Extrae la ráfaga del frente (la insertada primero).
    pub fn pop_front(&mut self) -> Option<Burst> {
        self.items.pop_front()
    }

    /// Extrae la ráfaga en la posición indicada, conservando el orden del resto.
    ///
    /// # Arguments
    ///
    /// * `index` - Posición (0 = frente)
    ///
    /// # Returns
    ///
    /// `Some(Burst)` si la posición existe, `None` en caso contrario
    pub fn remove_at(&mut self, index: usize) -> Option<Burst> {
        self.items.remove(index)
    }

    /// Posición de la ráfaga con menor tiempo restante.
    ///
    /// La comparación es estricta, por lo que ante empates gana la que está
    /// más cerca del frente.
    ///
    /// # Returns
    ///
    /// `None` si la cola está vacía
    pub fn shortest_remaining_index(&self) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (index, burst) in self.items.iter().enumerate() {
            match best {
                Some((_, min)) if burst.remaining >= min => {}
                _ => best = Some((index, burst.remaining)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Extrae la ráfaga con menor tiempo restante (la primera, si hay empate).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mps_simulator::{Burst, BurstQueue};
    ///
    /// let mut queue = BurstQueue::new();
    /// queue.push_back(Burst::new(0, 300, 0));
    /// queue.push_back(Burst::new(1, 100, 0));
    /// queue.push_back(Burst::new(2, 200, 0));
    ///
    /// assert_eq!(queue.remove_shortest().map(|b| b.id), Some(1));
    /// assert_eq!(queue.remove_shortest().map(|b| b.id), Some(2));
    /// assert_eq!(queue.remove_shortest().map(|b| b.id), Some(0));
    /// assert!(queue.remove_shortest().is_none());
    /// ```
    pub fn remove_shortest(&mut self) -> Option<Burst> {
        let index = self.shortest_remaining_index()?;
        self.remove_at(index)
    }

    /// Cantidad de ráfagas en la cola.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Indica si la cola está vacía.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Itera las ráfagas en orden de inserción.
    pub fn iter(&self) -> impl Iterator<Item = &Burst> {
        self.items.iter()
    }
}

/// Cola protegida compartida entre el cargador y uno o varios procesadores.
///
/// Con la política de cola única todos los procesadores compiten por la misma
/// instancia; con colas múltiples cada procesador tiene la suya, pero igual se
/// modifica desde el hilo que carga las ráfagas y desde el procesador dueño.
#[derive(Debug, Default)]
pub struct SharedQueue {
    inner: Mutex<BurstQueue>,
    not_empty: Condvar,
}

impl SharedQueue {
    /// Crea una cola compartida vacía lista para repartirse entre hilos.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, BurstQueue> {
        // Ninguna operación deja la cola a medias, así que un lock envenenado
        // se puede seguir usando.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola una ráfaga al final y despierta a un procesador en espera.
    pub fn push(&self, burst: Burst) {
        let mut queue = self.lock();
        queue.push_back(burst);
        self.not_empty.notify_one();
    }

    /// Cantidad actual de ráfagas.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Indica si la cola está vacía en este instante.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Selecciona una ráfaga, esperando trabajo hasta `deadline` como máximo.
    ///
    /// Mientras la cola está vacía el hilo queda bloqueado en la `Condvar`
    /// (sin sondeo activo) y se despierta al encolarse una ráfaga o al vencer
    /// el plazo.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - Algoritmo de selección
    /// * `deadline` - Instante a partir del cual se deja de esperar
    ///
    /// # Returns
    ///
    /// `Some(Burst)` con la ráfaga elegida, `None` si venció el plazo
    pub fn wait_select(
        &self,
        algorithm: &SchedulingAlgorithm,
        deadline: Instant,
    ) -> Option<Burst> {
        let mut queue = self.lock();
        while queue.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _timeout) = self
                .not_empty
                .wait_timeout(queue, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            queue = guard;
        }
        algorithm.select(&mut queue)
    }

    /// Despierta a todos los procesadores bloqueados en esta cola.
    pub fn notify_all(&self) {
        self.not_empty.notify_all();
    }

    /// Copia el contenido actual de la cola (para inspección y reportes).
    pub fn snapshot(&self) -> Vec<Burst> {
        self.lock().iter().cloned().collect()
    }
}
