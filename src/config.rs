//! Configuration module for the echo server.
//!
//! Supports both command-line arguments and TOML configuration file.
//! CLI arguments take precedence over config file values.

use clap::Parser;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Command-line arguments for the echo server
#[derive(Parser, Debug)]
#[command(name = "line-echo")]
#[command(version)]
#[command(about = "A line-oriented TCP echo server", long_about = None)]
pub struct CliArgs {
    /// Port to listen on
    pub port: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind to (e.g., 127.0.0.1)
    #[arg(short = 'l', long)]
    pub host: Option<IpAddr>,

    /// Listen backlog for pending connections
    #[arg(short, long)]
    pub backlog: Option<u32>,

    /// Number of runtime worker threads (defaults to number of CPU cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server-related configuration
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// Port to listen on, kept as text so it is validated like the CLI value
    pub port: Option<String>,
    #[serde(default = "default_backlog")]
    pub backlog: u32,
    /// Number of runtime worker threads
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            backlog: default_backlog(),
            workers: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_backlog() -> u32 {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Final resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub backlog: u32,
    pub workers: Option<usize>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from the process arguments and optional TOML file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_args(CliArgs::parse())
    }

    /// Resolve parsed CLI args against the TOML file they point at, if any.
    pub fn from_args(cli: CliArgs) -> Result<Self, ConfigError> {
        let toml_config = if let Some(ref config_path) = cli.config {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::FileRead(config_path.clone(), e))?;
            toml::from_str(&contents)
                .map_err(|e| ConfigError::TomlParse(config_path.clone(), e))?
        } else {
            TomlConfig::default()
        };

        Self::merge(cli, toml_config)
    }

    /// Merge CLI args with file values. CLI takes precedence.
    fn merge(cli: CliArgs, toml_config: TomlConfig) -> Result<Self, ConfigError> {
        let port = cli
            .port
            .or(toml_config.server.port)
            .ok_or(ConfigError::MissingPort)?;

        Ok(Config {
            host: cli.host.unwrap_or(toml_config.server.host),
            port: parse_port(&port)?,
            backlog: cli.backlog.unwrap_or(toml_config.server.backlog),
            workers: cli.workers.or(toml_config.server.workers),
            log_level: cli.log_level.unwrap_or(toml_config.logging.level),
        })
    }

    /// Socket address the listener binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse a decimal port number. `0` requests an ephemeral port.
pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidPort {
            value: value.to_string(),
            source,
        })
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please provide a port number!")]
    MissingPort,

    #[error("invalid port number '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    TomlParse(PathBuf, #[source] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("line-echo").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = TomlConfig::default();
        assert_eq!(config.server.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.server.port, None);
        assert_eq!(config.server.backlog, 1024);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
            [server]
            host = "127.0.0.1"
            port = "7007"
            backlog = 64
            workers = 4

            [logging]
            level = "debug"
        "#;

        let config: TomlConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.host, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.server.port.as_deref(), Some("7007"));
        assert_eq!(config.server.backlog, 64);
        assert_eq!(config.server.workers, Some(4));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_positional_port() {
        let config = Config::from_args(args(&["8081"])).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8081");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_missing_port() {
        let err = Config::from_args(args(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPort));
        assert_eq!(err.to_string(), "Please provide a port number!");
    }

    #[test]
    fn test_invalid_port() {
        for bad in ["invalidPort", "65536", "-1", ""] {
            match parse_port(bad) {
                Err(ConfigError::InvalidPort { value, .. }) => assert_eq!(value, bad),
                other => panic!("unexpected: {:?}", other),
            }
        }
    }

    #[test]
    fn test_cli_overrides_file() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = "7007"

            [logging]
            level = "warn"
        "#,
        )
        .unwrap();

        let config = Config::merge(
            args(&["9000", "--host", "::1", "--log-level", "trace"]),
            toml_config,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "::1".parse::<IpAddr>().unwrap());
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_port_from_file() {
        let toml_config: TomlConfig = toml::from_str("[server]\nport = \"7007\"\n").unwrap();
        let config = Config::merge(args(&[]), toml_config).unwrap();
        assert_eq!(config.port, 7007);
    }

    #[test]
    fn test_unreadable_config_file() {
        let err = Config::from_args(args(&["8081", "--config", "/nonexistent/line-echo.toml"]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(..)));
    }
}
