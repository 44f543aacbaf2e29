//! Configuration file management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Complete gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// External verifier settings.
    #[serde(default)]
    pub verifier: VerifierConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

/// External verifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Verifier executable. A bare name is resolved through PATH.
    #[serde(default = "default_verifier_command")]
    pub command: String,
    /// Arguments placed before the proof path.
    #[serde(default = "default_verifier_args")]
    pub args: Vec<String>,
    /// Wall-clock budget for one verification run, in seconds.
    #[serde(default = "default_verifier_timeout")]
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default tracing filter, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default value functions

fn default_listen_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_verifier_command() -> String {
    "cairo-prove".to_string()
}

fn default_verifier_args() -> Vec<String> {
    vec!["verify".to_string()]
}

fn default_verifier_timeout() -> u64 {
    600
}

fn default_log_filter() -> String {
    "pike_gateway=info,pike_ledger=info,tower_http=debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            command: default_verifier_command(),
            args: default_verifier_args(),
            timeout_secs: default_verifier_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the default location.
    ///
    /// The path comes from `PIKE_CONFIG` when set, otherwise `pike.toml`
    /// in the working directory. Falls back to defaults if no file
    /// exists there.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The config file path.
    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PIKE_CONFIG") {
            return PathBuf::from(path);
        }
        PathBuf::from("pike.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.listen_addr, "127.0.0.1:8000");
        assert_eq!(config.verifier.command, "cairo-prove");
        assert_eq!(config.verifier.args, vec!["verify".to_string()]);
        assert_eq!(config.verifier.timeout_secs, 600);
    }

    #[test]
    fn test_config_serialization() {
        let config = GatewayConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let _parsed: GatewayConfig = toml::from_str(&toml_str).expect("parse");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [server]
            listen_addr = "0.0.0.0:9000"

            [verifier]
            command = "/opt/prover/cairo-prove"
            "#,
        )
        .expect("parse");
        assert_eq!(config.server.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.verifier.command, "/opt/prover/cairo-prove");
        // Unspecified keys fall back to defaults.
        assert_eq!(config.verifier.args, vec!["verify".to_string()]);
        assert_eq!(config.verifier.timeout_secs, 600);
    }
}
