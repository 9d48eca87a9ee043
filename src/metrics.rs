//! # Módulo de Métricas y Reportes
//!
//! Calcula estadísticas a partir de las ráfagas terminadas y genera el reporte
//! final (tabla de texto o CSV) en consola, en archivo o en ambos.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::burst::Burst;
use crate::error::{ConfigError, OutputError};
use crate::simulation::SimulationReport;

/// Métricas agregadas de una ejecución.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationMetrics {
    /// Ráfagas completadas
    pub completed: usize,
    /// Ráfagas que quedaron en cola al vencer el plazo
    pub unfinished: usize,
    /// Turnaround promedio (ms)
    pub average_turnaround: f64,
    /// Espera promedio: turnaround menos servicio (ms)
    pub average_waiting: f64,
    /// Mayor momento de finalización (ms)
    pub makespan: u64,
    /// Ráfagas completadas por cada procesador
    pub per_processor: Vec<usize>,
    /// Ráfagas por segundo de reloj
    pub throughput: f64,
    /// Duración real de la simulación
    pub total_simulation_time: Duration,
}

/// Destino del reporte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// 1: solo consola
    Console,
    /// 2: solo archivo
    File,
    /// 3: consola y archivo
    Both,
}

impl OutputMode {
    /// Interpreta el código numérico de la línea de comandos.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Console),
            2 => Some(Self::File),
            3 => Some(Self::Both),
            _ => None,
        }
    }

    fn to_console(self) -> bool {
        matches!(self, Self::Console | Self::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

impl Default for OutputMode {
    fn default() -> Self {
        Self::Console
    }
}

/// Calculadora de métricas y generador de reportes.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Crea una nueva instancia del calculador de métricas.
    pub fn new() -> Self {
        Self
    }

    /// Calcula las métricas agregadas de una ejecución.
    ///
    /// # Arguments
    ///
    /// * `report` - Resultado devuelto por `Simulation::run`
    /// * `processor_count` - Cantidad de procesadores simulados
    ///
    /// # Returns
    ///
    /// `SimulationMetrics` con los promedios y conteos
    pub fn calculate(
        &self,
        report: &SimulationReport,
        processor_count: usize,
    ) -> SimulationMetrics {
        let finished = &report.finished;
        let completed = finished.len();

        let average = |values: Vec<i64>| {
            if values.is_empty() {
                0.0
            } else {
                // Suma en i128: los tiempos saturados no caben sumados en i64.
                values.iter().map(|&v| i128::from(v)).sum::<i128>() as f64 / values.len() as f64
            }
        };

        let average_turnaround =
            average(finished.iter().filter_map(|b| b.turnaround_time).collect());
        let average_waiting = average(finished.iter().filter_map(Burst::waiting_time).collect());
        let makespan = finished.iter().filter_map(|b| b.finish_time).max().unwrap_or(0);

        let mut per_processor = vec![0; processor_count];
        for cpu in finished.iter().filter_map(|b| b.cpu_id) {
            if let Some(slot) = per_processor.get_mut(cpu) {
                *slot += 1;
            }
        }

        let seconds = report.elapsed.as_secs_f64();
        let throughput = if seconds > 0.0 {
            completed as f64 / seconds
        } else {
            0.0
        };

        SimulationMetrics {
            completed,
            unfinished: report.unfinished,
            average_turnaround,
            average_waiting,
            makespan,
            per_processor,
            throughput,
            total_simulation_time: report.elapsed,
        }
    }

    /// Genera la tabla de ráfagas terminadas, en orden de finalización.
    ///
    /// # Arguments
    ///
    /// * `finished` - Ráfagas terminadas
    /// * `metrics` - Métricas para el bloque de resumen
    ///
    /// # Returns
    ///
    /// String con el reporte formateado
    pub fn generate_report(&self, finished: &[Burst], metrics: &SimulationMetrics) -> String {
        let mut report = String::new();

        report.push_str("Finished bursts:\n");
        report.push_str(&format!(
            "{:<8} {:>6} {:>14} {:>14} {:>16}\n",
            "BurstID", "CPU_ID", "Arrival_Time", "Finish_Time", "Turnaround_Time"
        ));
        report.push_str(&format!("{}\n", "-".repeat(62)));

        for burst in finished {
            report.push_str(&format!(
                "{:<8} {:>6} {:>14} {:>14} {:>16}\n",
                burst.id,
                Cell(burst.cpu_id),
                burst.arrival_time,
                Cell(burst.finish_time),
                Cell(burst.turnaround_time),
            ));
        }

        report.push_str("\n=== ESTADÍSTICAS RESUMIDAS ===\n");
        report.push_str(&format!("Ráfagas completadas: {}\n", metrics.completed));
        report.push_str(&format!("Ráfagas pendientes: {}\n", metrics.unfinished));
        report.push_str(&format!(
            "Turnaround promedio: {:.2} ms\n",
            metrics.average_turnaround
        ));
        report.push_str(&format!("Espera promedio: {:.2} ms\n", metrics.average_waiting));
        report.push_str(&format!("Última finalización: {} ms\n", metrics.makespan));
        report.push_str(&format!("Ráfagas por procesador: {:?}\n", metrics.per_processor));
        report.push_str(&format!(
            "Duración total de simulación: {}\n",
            Self::format_duration(metrics.total_simulation_time)
        ));
        report.push_str(&format!(
            "Throughput: {:.3} ráfagas/segundo\n",
            metrics.throughput
        ));

        report
    }

    /// Genera las ráfagas terminadas en formato CSV.
    pub fn generate_csv_report(&self, finished: &[Burst]) -> String {
        let mut csv = String::from("BurstID,CPU_ID,Arrival_Time,Finish_Time,Turnaround_Time\n");
        for burst in finished {
            csv.push_str(&format!(
                "{},{},{},{},{}\n",
                burst.id,
                Cell(burst.cpu_id),
                burst.arrival_time,
                Cell(burst.finish_time),
                Cell(burst.turnaround_time),
            ));
        }
        csv
    }

    /// Escribe el reporte en el destino configurado.
    ///
    /// # Arguments
    ///
    /// * `report` - Texto ya generado
    /// * `mode` - Consola, archivo o ambos
    /// * `path` - Archivo destino (se ignora en modo consola)
    pub fn write_report(
        &self,
        report: &str,
        mode: OutputMode,
        path: &Path,
    ) -> Result<(), OutputError> {
        if mode.to_console() {
            print!("{report}");
        }
        if mode.to_file() {
            fs::write(path, report).map_err(|source| OutputError {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Formatea una duración como "s.mmm".
    pub fn format_duration(duration: Duration) -> String {
        let millis = duration.as_millis();
        format!("{}.{:03}s", millis / 1000, millis % 1000)
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Celda de tabla para campos opcionales ("-" si falta).
struct Cell<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => f.pad(&value.to_string()),
            None => f.pad("-"),
        }
    }
}

/// Interpreta el modo de salida, con error de configuración si no es 1, 2 o 3.
pub fn parse_output_mode(code: &str) -> Result<OutputMode, ConfigError> {
    code.trim()
        .parse::<u8>()
        .ok()
        .and_then(OutputMode::from_code)
        .ok_or_else(|| ConfigError::UnknownOutputMode(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished_burst(id: u64, cpu: usize, length: u64, arrival: u64, finish: u64) -> Burst {
        let mut burst = Burst::new(id, length, arrival);
        burst.assign_cpu(cpu);
        burst.complete(finish);
        burst
    }

    fn sample_report() -> SimulationReport {
        SimulationReport {
            finished: vec![
                finished_burst(0, 0, 100, 0, 100),
                finished_burst(1, 1, 50, 10, 60),
                finished_burst(2, 0, 50, 0, 150),
            ],
            completed: 3,
            unfinished: 1,
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(MetricsCalculator::format_duration(Duration::from_millis(1500)), "1.500s");
        assert_eq!(MetricsCalculator::format_duration(Duration::from_millis(250)), "0.250s");
        assert_eq!(MetricsCalculator::format_duration(Duration::ZERO), "0.000s");
    }

    #[test]
    fn test_calculate_metrics() {
        let calculator = MetricsCalculator::new();
        let metrics = calculator.calculate(&sample_report(), 2);

        assert_eq!(metrics.completed, 3);
        assert_eq!(metrics.unfinished, 1);
        // Turnarounds: 100, 50, 150
        assert!((metrics.average_turnaround - 100.0).abs() < f64::EPSILON);
        // Esperas: 0, 0, 100
        assert!((metrics.average_waiting - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.makespan, 150);
        assert_eq!(metrics.per_processor, vec![2, 1]);
        assert!((metrics.throughput - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report_has_zero_averages() {
        let report = SimulationReport {
            finished: Vec::new(),
            completed: 0,
            unfinished: 0,
            elapsed: Duration::ZERO,
        };
        let metrics = MetricsCalculator::new().calculate(&report, 3);
        assert_eq!(metrics.average_turnaround, 0.0);
        assert_eq!(metrics.throughput, 0.0);
        assert_eq!(metrics.per_processor, vec![0, 0, 0]);
    }

    #[test]
    fn test_saturated_turnarounds_do_not_overflow_average() {
        let report = SimulationReport {
            finished: vec![
                finished_burst(0, 0, 1, u64::MAX, 5),
                finished_burst(1, 0, 1, u64::MAX, 6),
            ],
            completed: 2,
            unfinished: 0,
            elapsed: Duration::from_millis(10),
        };
        let metrics = MetricsCalculator::new().calculate(&report, 1);
        assert_eq!(metrics.average_turnaround, i64::MIN as f64);
        assert_eq!(metrics.average_waiting, i64::MIN as f64);
    }

    #[test]
    fn test_text_report_lists_bursts_in_completion_order() {
        let calculator = MetricsCalculator::new();
        let report = sample_report();
        let metrics = calculator.calculate(&report, 2);
        let text = calculator.generate_report(&report.finished, &metrics);

        assert!(text.contains("BurstID"));
        assert!(text.contains("Turnaround_Time"));
        assert!(text.contains("ESTADÍSTICAS RESUMIDAS"));

        let rows: Vec<&str> = text.lines().skip(3).take(3).collect();
        let ids: Vec<&str> = rows.iter().filter_map(|r| r.split_whitespace().next()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_csv_report() {
        let csv = MetricsCalculator::new().generate_csv_report(&sample_report().finished);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "0,0,0,100,100");
        assert_eq!(lines[2], "1,1,10,60,50");
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        MetricsCalculator::new()
            .write_report("contenido\n", OutputMode::File, &path)
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "contenido\n");
    }

    #[test]
    fn test_parse_output_mode() {
        assert_eq!(parse_output_mode("3").unwrap(), OutputMode::Both);
        assert!(matches!(parse_output_mode("4"), Err(ConfigError::UnknownOutputMode(_))));
    }
}
