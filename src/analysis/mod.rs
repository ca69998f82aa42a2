/*! Corpus analysis

Descriptive statistics on tokenized corpora:

- [vocab]: token frequencies and vocabulary sizes,
- [overlap]: words shared between source and target sides, and near matches ([bktree]),
- [endings]: agreement of sentence-final punctuation.
!*/
pub mod bktree;
pub mod endings;
pub mod overlap;
pub mod vocab;

pub use endings::EndingStats;
pub use overlap::{Overlap, OverlapStats};
pub use vocab::{Comparison, VocabStats, Vocabulary};
