//! Evaluation metrics.
use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::error::{ConfigError, Error};

/// Corpus-level translation metrics. Higher is better for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Bleu,
    Chrf,
    Meteor,
    Comet,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bleu => "bleu",
            Self::Chrf => "chrf",
            Self::Meteor => "meteor",
            Self::Comet => "comet",
        }
    }

    /// Parse a comma separated list of metrics, eg. `bleu,meteor,comet`.
    /// Duplicates are kept once, in first-seen order.
    pub fn parse_list(list: &str) -> Result<Vec<Metric>, Error> {
        let mut metrics = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let m: Metric = name.parse()?;
            if !metrics.contains(&m) {
                metrics.push(m);
            }
        }
        Ok(metrics)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bleu" => Ok(Self::Bleu),
            "chrf" => Ok(Self::Chrf),
            "meteor" => Ok(Self::Meteor),
            "comet" => Ok(Self::Comet),
            _ => Err(ConfigError::UnknownMetric(s.to_string()).into()),
        }
    }
}
