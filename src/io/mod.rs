/*!
# IO utilities

Line-oriented reading and writing of corpus files.

Every corpus file handled here is a plain UTF-8 text file holding one sentence per line.
!*/
pub mod corpus;

pub use corpus::{read_lines, write_lines, ParallelCorpus};
