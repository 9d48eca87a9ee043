//! Logger mínimo para la fachada `log`: escribe cada registro en stderr.

use std::io::Write;

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(
                stderr,
                "[{:<5}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

/// Variable de entorno que fija el nivel (`error`, `warn`, `info`, `debug`, `trace`).
pub const LOG_ENV: &str = "MPS_LOG";

/// Instala el logger con el nivel indicado.
///
/// Si ya había un logger instalado solo se actualiza el nivel máximo.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let installed = log::set_logger(&LOGGER);
    log::set_max_level(level);
    installed
}

/// Nivel pedido por `MPS_LOG`, o `default` si no está definido o no se reconoce.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(default)
}

/// Traduce un nombre de nivel a `LevelFilter`.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(Level::Error.to_level_filter()),
        "warn" => Some(Level::Warn.to_level_filter()),
        "info" => Some(Level::Info.to_level_filter()),
        "debug" => Some(Level::Debug.to_level_filter()),
        "trace" => Some(Level::Trace.to_level_filter()),
        _ => None,
    }
}
