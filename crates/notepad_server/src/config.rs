//! Server configuration from flags and environment.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "notepad-server", version, about = "AI assist endpoints for the notepad")]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "NOTEPAD_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long, env = "NOTEPAD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files. Logs go to stderr when unset.
    #[arg(long, env = "NOTEPAD_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;
    use clap::Parser;

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "notepad-server",
            "--bind",
            "0.0.0.0:8080",
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }
}
