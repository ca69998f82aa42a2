/*! Data processing around the translation toolkit.

- [preprocess]: tokenization, lowercasing and cleaning of the raw splits,
- [bpe]: subword encoding/decoding,
- [onmt]: BPE learning, data configuration and vocabularies for training,
- [sweep]: translation of a test set over checkpoints and decoding parameters.
!*/
pub mod bpe;
pub mod onmt;
pub mod preprocess;
pub mod sweep;

pub use onmt::OnmtPreparer;
pub use preprocess::Preprocessor;
pub use sweep::{Checkpoint, Sweep, SweepRecord};
