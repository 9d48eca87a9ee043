//! # Módulo de Recolección de Resultados
//!
//! Agrega las ráfagas terminadas en orden de finalización y lleva la cuenta de
//! procesos completados. Lo comparten todos los procesadores durante la
//! simulación y se lee una sola vez al final.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::burst::Burst;

/// Secuencia de solo-agregado de ráfagas terminadas.
#[derive(Debug, Default)]
pub struct ResultCollector {
    finished: Mutex<Vec<Burst>>,
    completed: AtomicUsize,
}

impl ResultCollector {
    /// Crea un recolector vacío.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Burst>> {
        self.finished.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Agrega una ráfaga terminada.
    ///
    /// El contador se incrementa mientras se mantiene el lock de la secuencia,
    /// así `count()` nunca supera la longitud de `snapshot()`.
    pub fn append(&self, burst: Burst) {
        let mut finished = self.lock();
        finished.push(burst);
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    /// Cantidad de ráfagas completadas hasta ahora.
    pub fn count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Copia de la secuencia completa, en orden de finalización.
    ///
    /// Se espera que se llame después de que todos los procesadores
    /// terminaron; antes de eso la copia es solo una foto parcial.
    pub fn snapshot(&self) -> Vec<Burst> {
        self.lock().clone()
    }

    /// Consume el recolector y devuelve la secuencia sin copiarla.
    pub fn into_finished(self) -> Vec<Burst> {
        self.finished
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
