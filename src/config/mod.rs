//! CLI arguments and layered configuration.
//!
//! Precedence is CLI flag > environment variable > built-in default.
//! `clap`'s `env` attribute folds the environment variable in before
//! `CliArgs::parse()` returns, so [`AppConfig::from_cli`] only has to choose
//! between "the user set something" and "fall back to the default".

pub mod defaults;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "achemdbd")]
#[command(about = "In-memory artificial-chemistry engine")]
#[command(version)]
pub struct CliArgs {
    /// HTTP bind address, e.g. 0.0.0.0:8080
    #[arg(long, env = "ACHEMDB_ADDR")]
    pub addr: Option<String>,

    /// Environment id created at startup if it doesn't already exist
    #[arg(long, env = "ACHEMDB_ENV_ID")]
    pub env_id: Option<String>,

    /// Schema JSON file installed into the startup environment
    #[arg(long, env = "ACHEMDB_SCHEMA_FILE")]
    pub schema_file: Option<PathBuf>,

    /// Directory snapshots are written to and restored from
    #[arg(long, env = "ACHEMDB_SNAPSHOT_DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Ticks between automatic snapshots
    #[arg(long, env = "ACHEMDB_SNAPSHOT_EVERY_TICKS")]
    pub snapshot_every_ticks: Option<u64>,

    /// Tracing log level filter, passed straight to `EnvFilter`
    #[arg(long, env = "ACHEMDB_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Resolved configuration the binary runs with.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: String,
    pub env_id: String,
    pub schema_file: Option<PathBuf>,
    pub snapshot_dir: Option<PathBuf>,
    pub snapshot_every_ticks: u64,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_cli(cli: CliArgs) -> Self {
        Self {
            addr: cli.addr.unwrap_or_else(|| defaults::ADDR.to_string()),
            env_id: cli.env_id.unwrap_or_else(|| defaults::ENV_ID.to_string()),
            schema_file: cli.schema_file,
            snapshot_dir: Some(
                cli.snapshot_dir
                    .unwrap_or_else(|| PathBuf::from(defaults::SNAPSHOT_DIR)),
            ),
            snapshot_every_ticks: cli
                .snapshot_every_ticks
                .unwrap_or(defaults::SNAPSHOT_EVERY_TICKS),
            log_level: cli.log_level.unwrap_or_else(|| defaults::LOG_LEVEL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cli = CliArgs {
            addr: None,
            env_id: None,
            schema_file: None,
            snapshot_dir: None,
            snapshot_every_ticks: None,
            log_level: None,
        };
        let config = AppConfig::from_cli(cli);
        assert_eq!(config.addr, defaults::ADDR);
        assert_eq!(config.env_id, defaults::ENV_ID);
        assert_eq!(config.snapshot_every_ticks, defaults::SNAPSHOT_EVERY_TICKS);
        assert_eq!(config.snapshot_dir, Some(PathBuf::from(defaults::SNAPSHOT_DIR)));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cli = CliArgs {
            addr: Some("127.0.0.1:9000".to_string()),
            env_id: Some("lab".to_string()),
            schema_file: None,
            snapshot_dir: Some(PathBuf::from("/tmp/snaps")),
            snapshot_every_ticks: Some(50),
            log_level: Some("debug".to_string()),
        };
        let config = AppConfig::from_cli(cli);
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.env_id, "lab");
        assert_eq!(config.snapshot_every_ticks, 50);
        assert_eq!(config.log_level, "debug");
    }
}
