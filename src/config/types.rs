//! Basic types and enums for configuration

use std::{fmt::Display, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    constants::defaults,
    error::{Error, Result},
};

/// Tag of a backend the generator knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// Local filesystem access
    Filesystem,
    /// REST API proxy
    Api,
    /// SQL database access
    Database,
}

impl BackendType {
    pub const ALL: [BackendType; 3] =
        [BackendType::Filesystem, BackendType::Api, BackendType::Database];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Filesystem => "filesystem",
            BackendType::Api => "api",
            BackendType::Database => "database",
        }
    }
}

impl Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BackendType::ALL.into_iter().find(|t| t.as_str() == s).ok_or_else(|| {
            Error::UnknownBackend {
                backend: s.to_string(),
                available: BackendType::ALL
                    .iter()
                    .map(BackendType::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        })
    }
}

/// Transport the generated server listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Transport {
    /// Standard input/output
    #[default]
    Stdio,
    /// Server-sent events over HTTP
    Sse,
}

impl Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Transport::Stdio => "stdio",
            Transport::Sse => "sse",
        };
        write!(f, "{s}")
    }
}

/// Log level of the generated server, spelled the way Python's `logging` expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

/// Project-wide settings that are not specific to a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub transport: Transport,
    #[serde(default = "get_default_host")]
    pub host: String,
    #[serde(default = "get_default_port")]
    pub port: u16,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: get_default_host(),
            port: get_default_port(),
            log_level: LogLevel::default(),
        }
    }
}

fn get_default_host() -> String {
    defaults::HOST.to_string()
}

fn get_default_port() -> u16 {
    defaults::PORT
}
