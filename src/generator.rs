//! # Módulo de Generación de Ráfagas
//!
//! Produce las ráfagas de entrada, ya sea leyendo un archivo de texto o
//! generándolas al azar.
//!
//! El formato de archivo es una secuencia de triples de enteros separados por
//! espacios en blanco: `id duración llegada`. La lectura termina al final del
//! archivo o en el primer triple que no se puede interpretar como tres enteros
//! no negativos. Ese corte no se reporta como error: el resto del archivo se
//! trata como inexistente.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::RangeInclusive;
use std::path::Path;

use log::debug;
use rand::prelude::*;

use crate::burst::Burst;
use crate::config;
use crate::error::{ConfigError, InputError};

/// Lee ráfagas desde cualquier fuente con buffer.
///
/// # Arguments
///
/// * `reader` - Fuente de texto
///
/// # Returns
///
/// Las ráfagas leídas hasta el final de la entrada o el primer registro mal
/// formado, o `InputError::Read` si falla la lectura en sí
///
/// # Examples
///
/// ```rust
/// use mps_simulator::generator::read_bursts;
///
/// let input = "1 100 0\n2 50 0\n3 oops 7\n4 10 10\n";
/// let bursts = read_bursts(input.as_bytes()).unwrap();
/// assert_eq!(bursts.len(), 2);
/// assert_eq!(bursts[1].length, 50);
/// ```
pub fn read_bursts<R: BufRead>(reader: R) -> Result<Vec<Burst>, InputError> {
    let mut bursts = Vec::new();
    let mut pending: Vec<u64> = Vec::with_capacity(3);

    // Se lee por bytes: un token que no es UTF-8 es un registro mal formado
    // más, no un error de lectura.
    for line in reader.split(b'\n') {
        let line = line.map_err(InputError::Read)?;
        let tokens = line
            .split(|byte| byte.is_ascii_whitespace())
            .filter(|token| !token.is_empty());
        for token in tokens {
            match parse_value(token) {
                Some(value) => pending.push(value),
                None => {
                    debug!(
                        "registro mal formado tras {} ráfagas ('{}'): fin de la entrada",
                        bursts.len(),
                        String::from_utf8_lossy(token)
                    );
                    return Ok(bursts);
                }
            }
            if let [id, length, arrival] = pending[..] {
                bursts.push(Burst::new(id, length, arrival));
                pending.clear();
            }
        }
    }

    if !pending.is_empty() {
        debug!("registro incompleto al final de la entrada, se descarta");
    }
    Ok(bursts)
}

fn parse_value(token: &[u8]) -> Option<u64> {
    std::str::from_utf8(token).ok()?.parse().ok()
}

/// Lee ráfagas desde un archivo.
///
/// # Returns
///
/// `InputError::Open` si el archivo no existe o no se puede abrir
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<Burst>, InputError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let bursts = read_bursts(BufReader::new(file))?;
    debug!("{} ráfagas leídas de '{}'", bursts.len(), path.display());
    Ok(bursts)
}

/// Parámetros del modo de generación aleatoria.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomBurstConfig {
    /// Cantidad de ráfagas a generar
    pub count: usize,
    /// Rango (inclusivo) de la duración de servicio en ms
    pub length: RangeInclusive<u64>,
    /// Rango (inclusivo) del tiempo de llegada en ms
    pub arrival: RangeInclusive<u64>,
    /// Semilla para reproducir una ejecución; `None` usa entropía del sistema
    pub seed: Option<u64>,
}

impl RandomBurstConfig {
    /// Verifica que los rangos no estén vacíos.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("duración", &self.length)?;
        check_range("llegada", &self.arrival)
    }
}

impl Default for RandomBurstConfig {
    fn default() -> Self {
        Self {
            count: config::DEFAULT_RANDOM_COUNT,
            length: config::DEFAULT_LENGTH_RANGE,
            arrival: config::DEFAULT_ARRIVAL_RANGE,
            seed: None,
        }
    }
}

fn check_range(what: &'static str, range: &RangeInclusive<u64>) -> Result<(), ConfigError> {
    if range.is_empty() {
        return Err(ConfigError::InvalidRandomRange {
            what,
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(())
}

/// Genera ráfagas con duración y llegada uniformes en sus rangos.
///
/// Los identificadores son `0..count`, en orden de creación.
///
/// # Examples
///
/// ```rust
/// use mps_simulator::generator::{random_bursts, RandomBurstConfig};
///
/// let config = RandomBurstConfig { count: 5, length: 10..=20, arrival: 0..=0, seed: Some(7) };
/// let bursts = random_bursts(&config).unwrap();
/// assert_eq!(bursts.len(), 5);
/// assert!(bursts.iter().all(|b| (10..=20).contains(&b.length) && b.arrival_time == 0));
/// ```
pub fn random_bursts(config: &RandomBurstConfig) -> Result<Vec<Burst>, ConfigError> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let bursts = (0..config.count as u64)
        .map(|id| {
            let length = rng.random_range(config.length.clone());
            let arrival = rng.random_range(config.arrival.clone());
            Burst::new(id, length, arrival)
        })
        .collect();
    Ok(bursts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::AssignmentPolicy;
    use crate::scheduler::SchedulingAlgorithm;
    use crate::simulation::{Simulation, SimulationConfig};
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_reads_records_across_lines() {
        let bursts = read_bursts("1 100\n0 2 50 0\n".as_bytes()).unwrap();
        assert_eq!(bursts, vec![Burst::new(1, 100, 0), Burst::new(2, 50, 0)]);
    }

    #[test]
    fn test_malformed_record_ends_input() {
        let bursts = read_bursts("1 100 0\n2 -5 0\n3 10 0\n".as_bytes()).unwrap();
        assert_eq!(bursts, vec![Burst::new(1, 100, 0)]);
    }

    #[test]
    fn test_trailing_partial_record_is_dropped() {
        let bursts = read_bursts("1 100 0\n2 50".as_bytes()).unwrap();
        assert_eq!(bursts.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(read_bursts("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_ends_input_keeping_earlier_records() {
        let bursts = read_bursts(&b"1 100 0\n2 50 0\n\xff\xfe\n3 10 0\n"[..]).unwrap();
        assert_eq!(bursts, vec![Burst::new(1, 100, 0), Burst::new(2, 50, 0)]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let bursts = read_bursts("1 100 0\r\n2 50 0\r\n".as_bytes()).unwrap();
        assert_eq!(bursts.len(), 2);
    }

    #[test]
    fn test_huge_arrival_runs_to_completion() {
        let bursts = read_bursts("0 1 9223372036854775808\n1 1 0\n".as_bytes()).unwrap();
        assert_eq!(bursts[0].arrival_time, 1 << 63);

        let mut simulation = Simulation::new(SimulationConfig {
            processor_count: 1,
            assignment: AssignmentPolicy::Single,
            algorithm: SchedulingAlgorithm::fcfs(),
        })
        .unwrap()
        .with_deadline(Duration::from_millis(100));
        simulation.load(bursts);

        let report = simulation.run().unwrap();
        assert_eq!(report.completed, 2);
        let first = &report.finished[0];
        let finish = first.finish_time.unwrap() as i64;
        assert_eq!(first.turnaround_time, Some(i64::MIN + finish));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 30 5").unwrap();
        writeln!(file, "1 40 6").unwrap();

        let bursts = load_file(file.path()).unwrap();
        assert_eq!(bursts, vec![Burst::new(0, 30, 5), Burst::new(1, 40, 6)]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("in.txt");
        assert!(matches!(load_file(&missing), Err(InputError::Open { .. })));
    }

    #[test]
    fn test_random_bursts_are_reproducible() {
        let config = RandomBurstConfig {
            count: 50,
            length: 10..=1000,
            arrival: 10..=500,
            seed: Some(42),
        };
        let first = random_bursts(&config).unwrap();
        let second = random_bursts(&config).unwrap();

        assert_eq!(first, second);
        for (index, burst) in first.iter().enumerate() {
            assert_eq!(burst.id, index as u64);
            assert!(config.length.contains(&burst.length));
            assert!(config.arrival.contains(&burst.arrival_time));
        }
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let config = RandomBurstConfig {
            length: 100..=10,
            ..RandomBurstConfig::default()
        };
        assert!(matches!(
            random_bursts(&config),
            Err(ConfigError::InvalidRandomRange { what: "duración", .. })
        ));
    }
}
