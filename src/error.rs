//! Error enum
use std::fmt;
use std::process::ExitStatus;

use crate::systems::{Metric, Role};

/// Problems detected before any work is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    LengthMismatch { source: usize, reference: usize },
    EmptyCorpus,
    NoIterations,
    NoMetrics,
    UnknownMetric(String),
    NoScorer(Metric),
    InvalidScorer(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { source, reference } => write!(
                f,
                "source and reference must have the same number of lines (got {source} and {reference})"
            ),
            Self::EmptyCorpus => write!(f, "corpus is empty"),
            Self::NoIterations => write!(f, "at least one bootstrap iteration is required"),
            Self::NoMetrics => write!(f, "no metric to evaluate"),
            Self::UnknownMetric(m) => write!(f, "unknown metric: {m}"),
            Self::NoScorer(m) => write!(f, "no scorer command configured for {m}"),
            Self::InvalidScorer(s) => write!(f, "invalid scorer definition: {s}"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Csv(csv::Error),
    Serde(serde_json::Error),
    Yaml(serde_yaml::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Custom(String),
    Config(ConfigError),
    /// An external program exited unsuccessfully.
    Command {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    ScoreParse(String),
    Translation {
        iteration: usize,
        role: Role,
        system: String,
        source: Box<Error>,
    },
    Scoring {
        iteration: usize,
        role: Role,
        metric: Metric,
        source: Box<Error>,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::Serde(e) => write!(f, "serialization error: {e}"),
            Self::Yaml(e) => write!(f, "yaml error: {e}"),
            Self::Glob(e) => write!(f, "glob error: {e}"),
            Self::GlobPattern(e) => write!(f, "glob pattern error: {e}"),
            Self::Custom(s) => write!(f, "{s}"),
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Command {
                program,
                status,
                stderr,
            } => write!(f, "{program} failed ({status}): {}", stderr.trim_end()),
            Self::ScoreParse(out) => write!(f, "could not find a score in output: {out:?}"),
            Self::Translation {
                iteration,
                role,
                system,
                source,
            } => write!(
                f,
                "iteration {iteration}: translation failed for {role} system {system}: {source}"
            ),
            Self::Scoring {
                iteration,
                role,
                metric,
                source,
            } => write!(
                f,
                "iteration {iteration}: {metric} scoring failed for {role} system: {source}"
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Error {
        Error::Yaml(e)
    }
}
