//! Bridge configuration
//!
//! Defaults, then `UNREAL_MCP_*` environment variables, then Unreal-style
//! `-UnrealMCP*` command-line flags. Later sources win.

use crate::game_thread::DEFAULT_QUEUE_CAPACITY;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use unreal_mcp_wire::DEFAULT_MAX_FRAME_BYTES;

pub const DEFAULT_PORT: u16 = 55557;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    /// Close a connection that sends nothing for this long
    pub receive_timeout: Option<Duration>,
    pub max_frame_bytes: usize,
    pub queue_capacity: usize,
    pub log_file: Option<PathBuf>,
    pub log_to_stderr: bool,
    /// `EnvFilter` directive string
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            receive_timeout: None,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            log_file: None,
            log_to_stderr: true,
            log_filter: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Read the process environment and arguments
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Build from explicit sources so callers (and tests) need not touch the
    /// process environment.
    pub fn from_sources<I, F>(args: I, env: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_env(env)?;
        config.apply_args(args)?;
        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, env: F) -> Result<(), ConfigError> {
        if let Some(v) = env("UNREAL_MCP_BIND") {
            self.bind_address = parse_value("UNREAL_MCP_BIND", &v)?;
        }
        if let Some(v) = env("UNREAL_MCP_PORT") {
            self.port = parse_value("UNREAL_MCP_PORT", &v)?;
        }
        if let Some(v) = env("UNREAL_MCP_RECV_TIMEOUT_SECS") {
            self.receive_timeout = parse_timeout("UNREAL_MCP_RECV_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = env("UNREAL_MCP_MAX_FRAME_BYTES") {
            self.max_frame_bytes = parse_positive("UNREAL_MCP_MAX_FRAME_BYTES", &v)?;
        }
        if let Some(v) = env("UNREAL_MCP_QUEUE_CAPACITY") {
            self.queue_capacity = parse_positive("UNREAL_MCP_QUEUE_CAPACITY", &v)?;
        }
        if let Some(v) = env("UNREAL_MCP_LOG_FILE") {
            self.log_file = non_empty_path(&v);
        }
        if let Some(v) = env("UNREAL_MCP_LOG_STDERR") {
            self.log_to_stderr = parse_bool("UNREAL_MCP_LOG_STDERR", &v)?;
        }
        if let Some(v) = env("RUST_LOG") {
            if !v.trim().is_empty() {
                self.log_filter = v;
            }
        }
        Ok(())
    }

    fn apply_args<I: IntoIterator<Item = String>>(&mut self, args: I) -> Result<(), ConfigError> {
        for arg in args {
            // Lowercasing ASCII keeps byte offsets, so the value can be
            // sliced out of the original argument.
            let lower = arg.to_ascii_lowercase();
            if lower == "-unrealmcpnostderr" {
                self.log_to_stderr = false;
            } else if let Some(v) = flag_value(&arg, &lower, "-unrealmcpbind=") {
                self.bind_address = parse_value("-UnrealMCPBind", v)?;
            } else if let Some(v) = flag_value(&arg, &lower, "-unrealmcpport=") {
                self.port = parse_value("-UnrealMCPPort", v)?;
            } else if let Some(v) = flag_value(&arg, &lower, "-unrealmcprecvtimeout=") {
                self.receive_timeout = parse_timeout("-UnrealMCPRecvTimeout", v)?;
            } else if let Some(v) = flag_value(&arg, &lower, "-unrealmcplogfile=") {
                self.log_file = non_empty_path(v);
            }
        }
        Ok(())
    }
}

fn flag_value<'a>(arg: &'a str, lower: &str, prefix: &str) -> Option<&'a str> {
    lower
        .starts_with(prefix)
        .then(|| arg[prefix.len()..].trim_matches('"'))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, value, e.to_string()))
}

fn parse_positive(key: &str, value: &str) -> Result<usize, ConfigError> {
    match parse_value::<usize>(key, value)? {
        0 => Err(ConfigError::invalid(key, value, "must be greater than zero")),
        n => Ok(n),
    }
}

/// Seconds, fractional allowed. Zero disables the timeout.
fn parse_timeout(key: &str, value: &str) -> Result<Option<Duration>, ConfigError> {
    let secs: f64 = parse_value(key, value)?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(ConfigError::invalid(key, value, "must be a non-negative number of seconds"));
    }
    Ok((secs > 0.0).then(|| Duration::from_secs_f64(secs)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected true or false")),
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    (!value.is_empty()).then(|| PathBuf::from(value))
}
