//! Sentence-final punctuation agreement between two aligned files.
use std::{fmt, path::Path};

use serde::Serialize;

use crate::error::Error;
use crate::io::read_lines;

const END_PUNCT: [char; 3] = ['.', '!', '?'];

/// Whether `line` ends with `.`, `!` or `?`, ignoring trailing whitespace.
pub fn has_end_punct(line: &str) -> bool {
    line.trim_end().ends_with(END_PUNCT)
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct EndingStats {
    pub total_lines: usize,
    pub matching_endings: usize,
    pub both_with_punct: usize,
    pub both_without_punct: usize,
    pub only_first_punct: usize,
    pub only_second_punct: usize,
}

impl EndingStats {
    pub fn add(&mut self, first: &str, second: &str) {
        self.total_lines += 1;
        match (has_end_punct(first), has_end_punct(second)) {
            (true, true) => {
                self.matching_endings += 1;
                self.both_with_punct += 1;
            }
            (false, false) => {
                self.matching_endings += 1;
                self.both_without_punct += 1;
            }
            (true, false) => self.only_first_punct += 1,
            (false, true) => self.only_second_punct += 1,
        }
    }

    pub fn matching_percentage(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        self.matching_endings as f64 / self.total_lines as f64 * 100.0
    }
}

impl fmt::Display for EndingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total lines analyzed: {}", self.total_lines)?;
        writeln!(
            f,
            "Lines with matching endings: {} ({:.2}%)",
            self.matching_endings,
            self.matching_percentage()
        )?;
        writeln!(f, "Lines both with punctuation: {}", self.both_with_punct)?;
        writeln!(
            f,
            "Lines both without punctuation: {}",
            self.both_without_punct
        )?;
        writeln!(
            f,
            "Lines with punctuation only in file 1: {}",
            self.only_first_punct
        )?;
        write!(
            f,
            "Lines with punctuation only in file 2: {}",
            self.only_second_punct
        )
    }
}

/// Compare line endings of two files, pairing lines up to the shorter file.
pub fn analyze(first: &Path, second: &Path) -> Result<EndingStats, Error> {
    let (a, b) = (read_lines(first)?, read_lines(second)?);
    let mut stats = EndingStats::default();
    for (x, y) in a.iter().zip(b.iter()) {
        stats.add(x, y);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punct() {
        assert!(has_end_punct("Apwoyo. "));
        assert!(has_end_punct("Itye nining?"));
        assert!(!has_end_punct("Rwot,"));
        assert!(!has_end_punct(""));
    }

    #[test]
    fn counts() {
        let mut s = EndingStats::default();
        s.add("a.", "b!");
        s.add("a", "b");
        s.add("a?", "b");
        s.add("a", "b.");
        assert_eq!(s.total_lines, 4);
        assert_eq!(s.matching_endings, 2);
        assert_eq!(s.both_with_punct, 1);
        assert_eq!(s.both_without_punct, 1);
        assert_eq!(s.only_first_punct, 1);
        assert_eq!(s.only_second_punct, 1);
        assert_eq!(s.matching_percentage(), 50.0);
        assert!(s.to_string().contains("Lines with matching endings: 2 (50.00%)"));
    }

    #[test]
    fn zips_to_shorter() {
        let dir = tempfile::tempdir().unwrap();
        let (a, b) = (dir.path().join("a"), dir.path().join("b"));
        std::fs::write(&a, "one.\ntwo.\nthree.\n").unwrap();
        std::fs::write(&b, "uno.\ndos\n").unwrap();
        let s = analyze(&a, &b).unwrap();
        assert_eq!(s.total_lines, 2);
        assert_eq!(s.only_first_punct, 1);
    }
}
