/*! Translation systems and scorers.

Both are external collaborators, run out of process:

- [Translate] turns a source file into a hypothesis file for a given [System],
- [Score] turns aligned hypotheses and references into a corpus-level number for a given [Metric].

Closures implement both traits, which makes it easy to swap real toolkits for deterministic stubs.
!*/
pub(crate) mod command;
mod metric;
mod score;
mod translate;

use std::fmt;
use std::path::{Path, PathBuf};

pub use metric::Metric;
pub use score::{CommandScorer, Score, ScoreInput};
pub use translate::{OnmtTranslator, Translate};

/// Which side of a comparison a system is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Baseline,
    Experimental,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => write!(f, "baseline"),
            Self::Experimental => write!(f, "experimental"),
        }
    }
}

/// A trained translation system, identified by a name and a model location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct System {
    name: String,
    model: PathBuf,
}

impl System {
    pub fn new(name: impl Into<String>, model: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }

    /// Use the model path as the system name.
    pub fn from_model(model: &Path) -> Self {
        Self::new(model.to_string_lossy(), model)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &Path {
        &self.model
    }
}
