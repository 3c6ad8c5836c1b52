use std::io::IsTerminal;

use super::format::LoggerFormat;

/// Settings for [`logger_init`](super::logger_init).
///
/// `level` accepts any `EnvFilter` directive (`info`, `stationvisor=debug,warn`).
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: false,
            use_color: std::io::stdout().is_terminal(),
        }
    }
}
