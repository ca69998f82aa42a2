/*! Parallel corpus loading

A [ParallelCorpus] holds two index-aligned sides: `source[i]` is translated by `reference[i]`.
Alignment is checked once, when loading, so that resampling never pairs unrelated sentences.
!*/
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use log::debug;

use crate::error::{ConfigError, Error};

/// Read `path` line by line, trimming surrounding whitespace.
pub fn read_lines(path: &Path) -> Result<Vec<String>, Error> {
    let f = File::open(path)?;
    BufReader::new(f)
        .lines()
        .map(|line| line.map(|l| l.trim().to_owned()).map_err(Error::Io))
        .collect()
}

/// Write each line followed by `\n`.
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<(), Error> {
    let mut w = BufWriter::new(File::create(path)?);
    for line in lines {
        w.write_all(line.as_ref().as_bytes())?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

/// Source sentences and their reference translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelCorpus {
    source: Vec<String>,
    reference: Vec<String>,
}

impl ParallelCorpus {
    /// Builds a corpus, failing if both sides do not have the same length.
    pub fn new(source: Vec<String>, reference: Vec<String>) -> Result<Self, Error> {
        if source.len() != reference.len() {
            return Err(ConfigError::LengthMismatch {
                source: source.len(),
                reference: reference.len(),
            }
            .into());
        }
        Ok(Self { source, reference })
    }

    pub fn from_paths(src: &Path, reference: &Path) -> Result<Self, Error> {
        let source = read_lines(src)?;
        let reference = read_lines(reference)?;
        debug!(
            "loaded {} source and {} reference lines",
            source.len(),
            reference.len()
        );
        Self::new(source, reference)
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Materialize the pairs at `indices`, in the order given.
    /// Indices may repeat.
    pub fn select(&self, indices: &[usize]) -> (Vec<String>, Vec<String>) {
        indices
            .iter()
            .map(|&i| (self.source[i].clone(), self.reference[i].clone()))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_trims_whitespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "  ber bino  \nfoo\t\r\n\nlast").unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines, vec!["ber bino", "foo", "", "last"]);
    }

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_lines(&path, &["a b", "c"]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a b\nc\n");
    }

    #[test]
    fn mismatch_is_a_config_error() {
        let res = ParallelCorpus::new(vec!["a".into(), "b".into()], vec!["a".into()]);
        match res {
            Err(Error::Config(ConfigError::LengthMismatch { source, reference })) => {
                assert_eq!(source, 2);
                assert_eq!(reference, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn select_keeps_pairs_aligned() {
        let corpus = ParallelCorpus::new(
            vec!["s0".into(), "s1".into(), "s2".into()],
            vec!["r0".into(), "r1".into(), "r2".into()],
        )
        .unwrap();

        let (src, reference) = corpus.select(&[2, 0, 2]);
        assert_eq!(src, vec!["s2", "s0", "s2"]);
        assert_eq!(reference, vec!["r2", "r0", "r2"]);
    }
}
