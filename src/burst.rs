//! # Módulo de Ráfagas
//!
//! Este módulo define la unidad de trabajo de la simulación: la ráfaga de CPU
//! (`Burst`). Cada ráfaga conserva sus datos de entrada inmutables junto con
//! los campos que se completan cuando un procesador la ejecuta.

use std::fmt;

/// Representa una ráfaga de CPU que debe ser ejecutada por algún procesador.
///
/// Los campos `id`, `length` y `arrival_time` provienen de la entrada y no
/// cambian durante la simulación. El resto se rellena en el momento de la
/// ejecución:
/// - `remaining` parte igual a `length` y llega a cero cuando la ráfaga termina
/// - `finish_time` y `turnaround_time` se calculan al completar
/// - `cpu_id` se asigna cuando un procesador la despacha
///
/// Una ráfaga pertenece a una sola cola hasta ser despachada y, después, a la
/// única colección de ráfagas terminadas. Por eso se mueve por valor entre
/// estructuras en lugar de compartirse con `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Burst {
    /// Identificador único dentro de una ejecución
    pub id: u64,
    /// Duración total de servicio (milisegundos)
    pub length: u64,
    /// Tiempo de llegada declarado en la entrada (milisegundos)
    pub arrival_time: u64,
    /// Servicio pendiente (milisegundos)
    pub remaining: u64,
    /// Momento de finalización relativo al inicio de la simulación (ms)
    pub finish_time: Option<u64>,
    /// `finish_time - arrival_time`; puede ser negativo si la llegada declarada
    /// es posterior al momento real de finalización
    pub turnaround_time: Option<i64>,
    /// Procesador que ejecutó la ráfaga
    pub cpu_id: Option<usize>,
}

impl Burst {
    /// Crea una nueva ráfaga lista para ser encolada.
    ///
    /// # Arguments
    ///
    /// * `id` - Identificador único de la ráfaga
    /// * `length` - Duración de servicio en milisegundos
    /// * `arrival_time` - Tiempo de llegada declarado en milisegundos
    ///
    /// # Returns
    ///
    /// Una `Burst` con `remaining == length` y sin datos de ejecución
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mps_simulator::Burst;
    ///
    /// let burst = Burst::new(7, 120, 30);
    /// assert_eq!(burst.remaining, 120);
    /// assert!(!burst.is_finished());
    /// ```
    pub fn new(id: u64, length: u64, arrival_time: u64) -> Self {
        Self {
            id,
            length,
            arrival_time,
            remaining: length,
            finish_time: None,
            turnaround_time: None,
            cpu_id: None,
        }
    }

    /// Registra el procesador que despacha la ráfaga.
    pub fn assign_cpu(&mut self, cpu_id: usize) {
        self.cpu_id = Some(cpu_id);
    }

    /// Descuenta servicio ejecutado del tiempo restante.
    ///
    /// # Arguments
    ///
    /// * `executed_ms` - Milisegundos ejecutados en el último despacho
    ///
    /// # Returns
    ///
    /// El tiempo restante después de descontar
    pub fn consume(&mut self, executed_ms: u64) -> u64 {
        self.remaining = self.remaining.saturating_sub(executed_ms);
        self.remaining
    }

    /// Marca la ráfaga como terminada.
    ///
    /// Fija `remaining` en cero y calcula el turnaround a partir del momento
    /// de finalización, de modo que `turnaround = finish - arrival` se cumple
    /// siempre de forma exacta.
    ///
    /// # Arguments
    ///
    /// * `finish_ms` - Milisegundos transcurridos desde el inicio de la simulación
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mps_simulator::Burst;
    ///
    /// let mut burst = Burst::new(1, 100, 40);
    /// burst.complete(150);
    /// assert_eq!(burst.remaining, 0);
    /// assert_eq!(burst.turnaround_time, Some(110));
    /// ```
    pub fn complete(&mut self, finish_ms: u64) {
        self.remaining = 0;
        self.finish_time = Some(finish_ms);
        self.turnaround_time = Some(signed_diff(finish_ms as i128, self.arrival_time as i128));
    }

    /// Indica si la ráfaga ya fue completada.
    pub fn is_finished(&self) -> bool {
        self.finish_time.is_some()
    }

    /// Tiempo de espera: turnaround menos el servicio total.
    ///
    /// Igual que el turnaround, se satura en los límites de `i64`.
    ///
    /// # Returns
    ///
    /// `Some(i64)` si la ráfaga terminó, `None` en caso contrario
    pub fn waiting_time(&self) -> Option<i64> {
        self.turnaround_time
            .map(|turnaround| signed_diff(turnaround as i128, self.length as i128))
    }
}

/// Resta en `i128` y satura el resultado al rango de `i64`.
///
/// Los tiempos de entrada son `u64` arbitrarios, así que la diferencia puede
/// no caber en un `i64`.
fn signed_diff(minuend: i128, subtrahend: i128) -> i64 {
    let diff = minuend - subtrahend;
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

impl fmt::Display for Burst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ráfaga {:03} (duración {} ms, llegada {} ms, restante {} ms)",
            self.id, self.length, self.arrival_time, self.remaining
        )
    }
}
