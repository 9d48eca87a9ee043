//! # Módulo de Errores
//!
//! Tipos de error del simulador. Los errores de configuración y de fuente de
//! entrada son fatales y se devuelven al llamador; un registro mal formado en
//! la entrada no es un error (marca el fin de la entrada).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errores de configuración detectados antes de iniciar la simulación.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// Cantidad de procesadores fuera de `1..=max`.
    InvalidProcessorCount { count: usize, max: usize },
    /// Política de asignación distinta de `S` o `M`.
    UnknownAssignmentPolicy(String),
    /// Sub-política de selección de cola distinta de `RM` o `LM`.
    UnknownQueueSelection(String),
    /// Algoritmo de planificación no reconocido.
    UnknownAlgorithm(String),
    /// Quantum inválido para Round Robin.
    InvalidQuantum(u64),
    /// Modo de salida distinto de 1, 2 o 3.
    UnknownOutputMode(String),
    /// Rango vacío o invertido en la generación aleatoria.
    InvalidRandomRange {
        what: &'static str,
        min: u64,
        max: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProcessorCount { count, max } => {
                write!(f, "cantidad de procesadores inválida: {count} (rango 1..={max})")
            }
            Self::UnknownAssignmentPolicy(policy) => {
                write!(f, "política de asignación desconocida: '{policy}' (se espera S o M)")
            }
            Self::UnknownQueueSelection(selection) => {
                write!(f, "selección de cola desconocida: '{selection}' (se espera RM o LM)")
            }
            Self::UnknownAlgorithm(name) => {
                write!(f, "algoritmo desconocido: '{name}' (se espera FCFS, SJF o RR)")
            }
            Self::InvalidQuantum(quantum) => {
                write!(f, "quantum inválido para RR: {quantum} ms (debe ser > 0)")
            }
            Self::UnknownOutputMode(mode) => {
                write!(f, "modo de salida desconocido: '{mode}' (se espera 1, 2 o 3)")
            }
            Self::InvalidRandomRange { what, min, max } => {
                write!(f, "rango aleatorio inválido para {what}: [{min}, {max}]")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errores al abrir o leer la fuente de ráfagas.
#[derive(Debug)]
#[non_exhaustive]
pub enum InputError {
    /// No se pudo abrir el archivo de entrada.
    Open { path: PathBuf, source: io::Error },
    /// Falló la lectura a mitad de la entrada.
    Read(io::Error),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "no se pudo abrir '{}': {source}", path.display())
            }
            Self::Read(err) => write!(f, "error de lectura de la entrada: {err}"),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Read(err) => Some(err),
        }
    }
}

/// Errores al escribir el reporte.
#[derive(Debug)]
pub struct OutputError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no se pudo escribir el reporte en '{}': {}", self.path.display(), self.source)
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Error general de una ejecución de la simulación.
#[derive(Debug)]
#[non_exhaustive]
pub enum SimulationError {
    Config(ConfigError),
    Input(InputError),
    Output(OutputError),
    /// El hilo de un procesador terminó con pánico.
    WorkerPanicked { processor: usize },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuración: {err}"),
            Self::Input(err) => write!(f, "entrada: {err}"),
            Self::Output(err) => write!(f, "salida: {err}"),
            Self::WorkerPanicked { processor } => {
                write!(f, "el procesador {processor} terminó con pánico")
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Input(err) => Some(err),
            Self::Output(err) => Some(err),
            Self::WorkerPanicked { .. } => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<InputError> for SimulationError {
    fn from(err: InputError) -> Self {
        Self::Input(err)
    }
}

impl From<OutputError> for SimulationError {
    fn from(err: OutputError) -> Self {
        Self::Output(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::InvalidProcessorCount { count: 0, max: 10 };
        assert_eq!(err.to_string(), "cantidad de procesadores inválida: 0 (rango 1..=10)");

        let err = ConfigError::UnknownAlgorithm("EDF".into());
        assert!(err.to_string().contains("EDF"));
    }

    #[test]
    fn test_input_error_keeps_source() {
        let err = InputError::Open {
            path: PathBuf::from("no-existe.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("no-existe.txt"));

        let wrapped: SimulationError = err.into();
        assert!(matches!(wrapped, SimulationError::Input(InputError::Open { .. })));
    }
}
