//! # Módulo de Línea de Comandos
//!
//! Interpreta los argumentos del binario `mps`:
//!
//! ```text
//! mps [-n N] [-a SAP QS] [-s ALG Q] [--preemptive-rr] [-i INFILE]
//!     [-m OUTMODE] [-o OUTFILE] [-r T T1 T2 L1 L2 [SEED]] [-v|-vv] [-h]
//! ```
//!
//! Los valores de una opción pueden pasarse como tokens separados
//! (`-a M RM`) o en un único argumento entre comillas (`-a "M RM"`).

use std::fmt;
use std::path::PathBuf;

use log::LevelFilter;

use crate::assignment::AssignmentPolicy;
use crate::config;
use crate::error::ConfigError;
use crate::generator::RandomBurstConfig;
use crate::metrics::{parse_output_mode, OutputMode};
use crate::scheduler::SchedulingAlgorithm;
use crate::simulation::SimulationConfig;

/// Texto de ayuda.
pub const USAGE: &str = "\
Uso: mps [-n N] [-a SAP QS] [-s ALG Q] [--preemptive-rr] [-i INFILE]
           [-m OUTMODE] [-o OUTFILE] [-r T T1 T2 L1 L2 [SEED]] [-v|-vv] [-h]

  -n N              procesadores (1..=10, por defecto 2)
  -a SAP QS         política: S (cola única) | M (colas múltiples) con RM | LM
  -s ALG Q          algoritmo: FCFS | SJF | RR, y quantum en ms
  --preemptive-rr   RR reparte la CPU por quantum (por defecto equivale a FCFS)
  -i INFILE         archivo de ráfagas 'id duración llegada' (por defecto in.txt)
  -m OUTMODE        1 consola, 2 archivo, 3 ambos
  -o OUTFILE        archivo de salida (por defecto out.txt)
  -r T T1 T2 L1 L2  T ráfagas aleatorias, duración en [T1,T2], llegada en [L1,L2]
  -v, -vv           más detalle en los logs (también MPS_LOG=nivel)";

/// Errores de la línea de comandos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// Falta el valor de una opción.
    MissingValue { flag: String },
    /// Un valor no se pudo interpretar.
    InvalidValue { flag: String, value: String },
    /// Opción no reconocida.
    UnknownFlag(String),
    /// Se pidió la ayuda.
    Help,
    /// La combinación de valores no es una configuración válida.
    Config(ConfigError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue { flag } => write!(f, "falta el valor de {flag}"),
            Self::InvalidValue { flag, value } => {
                write!(f, "valor inválido para {flag}: '{value}'")
            }
            Self::UnknownFlag(flag) => write!(f, "opción desconocida: {flag}"),
            Self::Help => write!(f, "{USAGE}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Origen de las ráfagas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Random(RandomBurstConfig),
}

/// Opciones ya validadas del binario.
#[derive(Clone, Debug, PartialEq)]
pub struct CliOptions {
    pub simulation: SimulationConfig,
    pub input: InputSource,
    pub output_mode: OutputMode,
    pub outfile: PathBuf,
    pub log_level: Option<LevelFilter>,
}

/// Interpreta los argumentos (sin el nombre del programa).
///
/// # Arguments
///
/// * `args` - Argumentos de la línea de comandos
///
/// # Returns
///
/// `CliOptions` con los valores por defecto completados, o un `CliError`
///
/// # Examples
///
/// ```rust
/// use mps_simulator::cli::parse_args;
/// use mps_simulator::AssignmentPolicy;
///
/// let args: Vec<String> = ["-n", "4", "-a", "S", "-s", "SJF"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// let options = parse_args(&args).unwrap();
/// assert_eq!(options.simulation.processor_count, 4);
/// assert_eq!(options.simulation.assignment, AssignmentPolicy::Single);
/// ```
pub fn parse_args(args: &[String]) -> Result<CliOptions, CliError> {
    let mut processor_count = config::DEFAULT_PROCESSORS;
    let mut assignment = AssignmentPolicy::default();
    let mut algorithm_name = String::from("RR");
    let mut quantum_ms = config::DEFAULT_QUANTUM_MS;
    let mut preemptive = false;
    let mut input = InputSource::File(PathBuf::from(config::DEFAULT_INFILE));
    let mut output_mode = OutputMode::default();
    let mut outfile = PathBuf::from(config::DEFAULT_OUTFILE);
    let mut log_level = None;

    let mut idx = 0;
    while idx < args.len() {
        let flag = args[idx].as_str();
        idx += 1;

        match flag {
            "-n" | "--n_processors" => {
                let values = take_values(args, &mut idx, flag, 1, 1)?;
                processor_count = parse_number(flag, &values[0])?;
            }
            "-a" | "--assignment_policy" => {
                let values = take_values(args, &mut idx, flag, 1, 2)?;
                let selection = values.get(1).map(String::as_str).unwrap_or("RM");
                assignment = AssignmentPolicy::parse(&values[0], selection)?;
            }
            "-s" | "--scheduling_algorithm" => {
                let values = take_values(args, &mut idx, flag, 1, 2)?;
                algorithm_name = values[0].clone();
                if let Some(q) = values.get(1) {
                    quantum_ms = parse_number(flag, q)?;
                }
            }
            "--preemptive-rr" => preemptive = true,
            "-i" | "--infile" => {
                let values = take_values(args, &mut idx, flag, 1, 1)?;
                input = InputSource::File(PathBuf::from(&values[0]));
            }
            "-m" | "--outmode" => {
                let values = take_values(args, &mut idx, flag, 1, 1)?;
                output_mode = parse_output_mode(&values[0])?;
            }
            "-o" | "--outfile" => {
                let values = take_values(args, &mut idx, flag, 1, 1)?;
                outfile = PathBuf::from(&values[0]);
            }
            "-r" | "--random" => {
                let values = take_values(args, &mut idx, flag, 5, 6)?;
                let numbers = values
                    .iter()
                    .map(|value| parse_number::<u64>(flag, value))
                    .collect::<Result<Vec<_>, _>>()?;
                let random = RandomBurstConfig {
                    count: numbers[0] as usize,
                    length: numbers[1]..=numbers[2],
                    arrival: numbers[3]..=numbers[4],
                    seed: numbers.get(5).copied(),
                };
                random.validate()?;
                input = InputSource::Random(random);
            }
            "-v" => log_level = Some(LevelFilter::Info),
            "-vv" => log_level = Some(LevelFilter::Debug),
            "-h" | "--help" => return Err(CliError::Help),
            other => return Err(CliError::UnknownFlag(other.to_string())),
        }
    }

    let simulation = SimulationConfig {
        processor_count,
        assignment,
        algorithm: SchedulingAlgorithm::from_name(&algorithm_name, quantum_ms, preemptive)?,
    };
    simulation.validate()?;

    Ok(CliOptions {
        simulation,
        input,
        output_mode,
        outfile,
        log_level,
    })
}

/// Toma entre `min` y `max` valores después de una opción.
///
/// Cada argumento se divide por espacios, así `-a "M RM"` y `-a M RM` son
/// equivalentes. Se detiene en el siguiente argumento que empieza con `-`.
fn take_values(
    args: &[String],
    idx: &mut usize,
    flag: &str,
    min: usize,
    max: usize,
) -> Result<Vec<String>, CliError> {
    let mut values = Vec::new();
    while *idx < args.len() && values.len() < max && !args[*idx].starts_with('-') {
        values.extend(args[*idx].split_whitespace().map(str::to_string));
        *idx += 1;
    }

    if values.len() < min {
        return Err(CliError::MissingValue {
            flag: flag.to_string(),
        });
    }
    if values.len() > max {
        return Err(CliError::InvalidValue {
            flag: flag.to_string(),
            value: values.join(" "),
        });
    }
    Ok(values)
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}
