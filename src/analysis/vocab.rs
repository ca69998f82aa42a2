//! Vocabulary statistics.
//!
//! Counts whitespace-separated tokens of a file and summarizes how many token types
//! reach given frequency thresholds. Useful to pick vocabulary sizes and minimum frequencies.

use std::{collections::HashMap, fmt, path::Path};

use itertools::Itertools;
use serde::Serialize;

use crate::error::Error;
use crate::io::read_lines;

/// Number of most frequent tokens listed in reports.
const NB_MOST_COMMON: usize = 10;

pub const THRESHOLDS: [u64; 8] = [1, 2, 3, 5, 10, 20, 50, 100];

/// Token counter.
#[derive(Debug, Default)]
pub struct Vocabulary {
    counts: HashMap<String, u64>,
    nb_tokens: u64,
}

impl Vocabulary {
    pub fn add_line(&mut self, line: &str) {
        for token in line.split_whitespace() {
            self.counts
                .entry(token.to_string())
                .and_modify(|count| *count += 1)
                .or_insert(1);
            self.nb_tokens += 1;
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let mut vocab = Self::default();
        for line in read_lines(path)? {
            vocab.add_line(&line);
        }
        Ok(vocab)
    }

    fn types_where(&self, pred: impl Fn(u64) -> bool) -> u64 {
        self.counts.values().filter(|c| pred(**c)).count() as u64
    }

    pub fn stats(&self) -> VocabStats {
        VocabStats {
            total_tokens: self.nb_tokens,
            unique_tokens: self.counts.len() as u64,
            tokens_occurring_once: self.types_where(|c| c == 1),
            tokens_occurring_twice: self.types_where(|c| c == 2),
            tokens_occurring_5_plus: self.types_where(|c| c >= 5),
        }
    }

    /// Number of types occurring at least `t` times, for each threshold.
    pub fn distribution(&self) -> Vec<(u64, u64)> {
        THRESHOLDS
            .iter()
            .map(|&t| (t, self.types_where(|c| c >= t)))
            .collect()
    }

    /// `n` most frequent tokens, most frequent first. Ties are broken alphabetically.
    pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
        self.counts
            .iter()
            .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
            .take(n)
            .map(|(w, c)| (w.as_str(), *c))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VocabStats {
    pub total_tokens: u64,
    pub unique_tokens: u64,
    pub tokens_occurring_once: u64,
    pub tokens_occurring_twice: u64,
    pub tokens_occurring_5_plus: u64,
}

impl VocabStats {
    pub fn type_token_ratio(&self) -> f64 {
        if self.total_tokens == 0 {
            return 0.0;
        }
        self.unique_tokens as f64 / self.total_tokens as f64
    }
}

/// Statistics of a single file.
pub fn analyze(path: &Path) -> Result<VocabStats, Error> {
    Ok(Vocabulary::from_path(path)?.stats())
}

/// A CSV row of the frequency distribution of both sides.
#[derive(Debug, Serialize)]
struct DistributionRow<'a> {
    threshold: u64,
    language: &'a str,
    types: u64,
}

/// Side by side statistics of two files.
#[derive(Debug)]
pub struct Comparison {
    pub src_name: String,
    pub tgt_name: String,
    pub src: Vocabulary,
    pub tgt: Vocabulary,
}

impl Comparison {
    /// Analyze both files in parallel.
    pub fn new(src: &Path, tgt: &Path, src_name: &str, tgt_name: &str) -> Result<Self, Error> {
        let (src, tgt) = rayon::join(|| Vocabulary::from_path(src), || Vocabulary::from_path(tgt));
        Ok(Self {
            src_name: src_name.to_string(),
            tgt_name: tgt_name.to_string(),
            src: src?,
            tgt: tgt?,
        })
    }

    pub fn report(&self) -> String {
        self.to_string()
    }

    /// Write the threshold distribution of both sides as CSV.
    pub fn write_distribution(&self, dst: &Path) -> Result<(), Error> {
        let mut out = csv::WriterBuilder::new().from_path(dst)?;
        for (name, vocab) in [(&self.src_name, &self.src), (&self.tgt_name, &self.tgt)] {
            for (threshold, types) in vocab.distribution() {
                out.serialize(DistributionRow {
                    threshold,
                    language: name,
                    types,
                })?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (s, t) = (self.src.stats(), self.tgt.stats());
        let rows = [
            ("Total tokens", s.total_tokens, t.total_tokens),
            ("Unique tokens", s.unique_tokens, t.unique_tokens),
            (
                "Tokens occurring once",
                s.tokens_occurring_once,
                t.tokens_occurring_once,
            ),
            (
                "Tokens occurring twice",
                s.tokens_occurring_twice,
                t.tokens_occurring_twice,
            ),
            (
                "Tokens occurring 5+ times",
                s.tokens_occurring_5_plus,
                t.tokens_occurring_5_plus,
            ),
        ];

        writeln!(f, "Vocabulary Statistics:")?;
        writeln!(
            f,
            "{:<25} {:<15} {:<15}",
            "Metric", self.src_name, self.tgt_name
        )?;
        writeln!(f, "{}", "-".repeat(55))?;
        for (name, a, b) in rows {
            writeln!(f, "{:<25} {:<15} {:<15}", name, a, b)?;
        }

        writeln!(f, "\nVocabulary Analysis:")?;
        writeln!(
            f,
            "- {} type-token ratio: {:.4}",
            self.src_name,
            s.type_token_ratio()
        )?;
        writeln!(
            f,
            "- {} type-token ratio: {:.4}",
            self.tgt_name,
            t.type_token_ratio()
        )?;
        if s.unique_tokens > 0 {
            writeln!(
                f,
                "- Ratio of {} to {} unique tokens: {:.2}",
                self.tgt_name,
                self.src_name,
                t.unique_tokens as f64 / s.unique_tokens as f64
            )?;
        }

        writeln!(f, "\nMost common tokens:")?;
        for (name, vocab) in [(&self.src_name, &self.src), (&self.tgt_name, &self.tgt)] {
            let top = vocab
                .most_common(NB_MOST_COMMON)
                .into_iter()
                .map(|(token, count)| format!("{} ({})", token, count))
                .join(", ");
            writeln!(f, "- {}: {}", name, top)?;
        }
        Ok(())
    }
}
