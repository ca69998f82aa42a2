/*! Word overlap between the two sides of a bitext.

Words shared by both languages (loanwords, names, numbers, untranslated segments) can be copied
verbatim by a translation system. This module measures how much of the source vocabulary also
appears on the target side, and lists near matches within a small edit distance.

Words are lowercased whitespace tokens of at least `min_length` characters.
!*/
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use itertools::Itertools;
use log::info;
use rayon::prelude::*;
use serde::Serialize;

use super::bktree::BkTree;
use crate::error::Error;
use crate::io::read_lines;

pub const MIN_WORD_LENGTH: usize = 4;
pub const TOP_N: usize = 5000;

/// Lowercased words of `line` with at least `min_length` characters.
pub fn words(line: &str, min_length: usize) -> Vec<String> {
    line.split_whitespace()
        .filter(|w| w.chars().count() >= min_length)
        .map(str::to_lowercase)
        .collect()
}

pub fn load_words(path: &Path, min_length: usize) -> Result<Vec<Vec<String>>, Error> {
    Ok(read_lines(path)?
        .iter()
        .map(|line| words(line, min_length))
        .collect())
}

pub fn vocabulary(corpus: &[Vec<String>]) -> HashSet<&str> {
    corpus.iter().flatten().map(String::as_str).collect()
}

/// The `n` most frequent words of `corpus`.
pub fn top_vocabulary(corpus: &[Vec<String>], n: usize) -> HashSet<&str> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for word in corpus.iter().flatten() {
        *counts.entry(word.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .take(n)
        .map(|(w, _)| w)
        .collect()
}

/// Size of the intersection over size of the union. 0 when both are empty.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Pairs `(word, match, distance)` of source words with target words at most `max_distance` edits away.
pub fn similar_words(
    src_vocab: &HashSet<&str>,
    tgt_vocab: &HashSet<&str>,
    max_distance: usize,
) -> Vec<(String, String, usize)> {
    info!("Building BK-tree for {} target words", tgt_vocab.len());
    let tree: BkTree = tgt_vocab.iter().copied().collect();

    info!("Searching for similar words...");
    let mut pairs: Vec<(String, String, usize)> = src_vocab
        .par_iter()
        .flat_map_iter(|word| {
            tree.find(word, max_distance)
                .into_iter()
                .map(|(d, m)| (word.to_string(), m.to_string(), d))
                .collect::<Vec<_>>()
        })
        .collect();
    pairs.sort();
    pairs
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapStats {
    pub total_words: usize,
    pub unique_src_words: usize,
    pub unique_tgt_words: usize,
    pub overlap_types: usize,
    pub overlap_instances: usize,
    pub overlap_types_percent: f64,
    pub overlap_instances_percent: f64,
    pub top_overlap: Vec<(String, usize)>,
}

/// Compute overlap statistics, writing every line pair that shares words to `examples`.
pub fn analyze_overlap<W: Write>(
    src: &[Vec<String>],
    tgt: &[Vec<String>],
    mut examples: W,
) -> Result<OverlapStats, Error> {
    let src_vocab = vocabulary(src);
    let tgt_vocab = vocabulary(tgt);
    let overlap: HashSet<&str> = src_vocab.intersection(&tgt_vocab).copied().collect();

    let mut overlap_count: HashMap<&str, usize> = HashMap::new();
    let mut overlap_instances = 0;
    let total_words: usize = src.iter().map(Vec::len).sum();

    for (i, (s, t)) in src.iter().zip(tgt).enumerate() {
        let shared: Vec<&str> = s
            .iter()
            .map(String::as_str)
            .filter(|w| overlap.contains(w))
            .collect();
        if shared.is_empty() {
            continue;
        }
        writeln!(examples, "Line {}:", i + 1)?;
        writeln!(examples, "Source:  {}", s.join(" "))?;
        writeln!(examples, "Target:  {}", t.join(" "))?;
        writeln!(examples, "Overlapping words: {}\n", shared.join(", "))?;
        overlap_instances += shared.len();
        for w in shared {
            *overlap_count.entry(w).or_insert(0) += 1;
        }
    }
    examples.flush()?;

    let percent = |part: usize, whole: usize| {
        if whole == 0 {
            0.0
        } else {
            part as f64 / whole as f64 * 100.0
        }
    };

    Ok(OverlapStats {
        total_words,
        unique_src_words: src_vocab.len(),
        unique_tgt_words: tgt_vocab.len(),
        overlap_types: overlap.len(),
        overlap_instances,
        overlap_types_percent: percent(overlap.len(), src_vocab.len()),
        overlap_instances_percent: percent(overlap_instances, total_words),
        top_overlap: overlap_count
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            .take(10)
            .map(|(w, c)| (w.to_string(), c))
            .collect(),
    })
}

/// Full overlap analysis of a bitext, with results written in a folder.
#[derive(Debug, Clone)]
pub struct Overlap {
    src: PathBuf,
    tgt: PathBuf,
    dst: PathBuf,
    pub min_word_length: usize,
    pub max_distance: usize,
    /// Restrict the source vocabulary to its most frequent words for the similarity search.
    pub top_n: Option<usize>,
}

impl Overlap {
    pub fn new(src: &Path, tgt: &Path, dst: &Path) -> Self {
        Self {
            src: src.to_path_buf(),
            tgt: tgt.to_path_buf(),
            dst: dst.to_path_buf(),
            min_word_length: MIN_WORD_LENGTH,
            max_distance: 1,
            top_n: Some(TOP_N),
        }
    }

    /// Writes `overlap_examples.txt`, `overlap_statistics.txt` and `similar_words.txt` in the destination.
    pub fn run(&self) -> Result<(OverlapStats, f64), Error> {
        std::fs::create_dir_all(&self.dst)?;
        let (src, tgt) = rayon::join(
            || load_words(&self.src, self.min_word_length),
            || load_words(&self.tgt, self.min_word_length),
        );
        let (src, tgt) = (src?, tgt?);

        let examples = BufWriter::new(File::create(self.dst.join("overlap_examples.txt"))?);
        let stats = analyze_overlap(&src, &tgt, examples)?;

        let src_vocab = match self.top_n {
            Some(n) => top_vocabulary(&src, n),
            None => vocabulary(&src),
        };
        let tgt_vocab = vocabulary(&tgt);
        let similarity = jaccard(&src_vocab, &tgt_vocab);
        info!("Jaccard similarity: {:.4}", similarity);

        let similar = similar_words(&src_vocab, &tgt_vocab, self.max_distance);
        info!(
            "Number of similar words (edit distance <= {}): {}",
            self.max_distance,
            similar.len()
        );
        let mut out = BufWriter::new(File::create(self.dst.join("similar_words.txt"))?);
        for (word, m, d) in &similar {
            writeln!(out, "{}\t{}\tDistance: {}", word, m, d)?;
        }
        out.flush()?;

        let mut out = BufWriter::new(File::create(self.dst.join("overlap_statistics.txt"))?);
        write!(out, "{}", self.report(&stats, similarity))?;
        out.flush()?;

        Ok((stats, similarity))
    }

    pub fn report(&self, stats: &OverlapStats, similarity: f64) -> String {
        let mut out = format!(
            "Analysis of {:?} / {:?} (words with length >= {})\n\n",
            self.src, self.tgt, self.min_word_length
        );
        out += &format!("Total source words: {}\n", stats.total_words);
        out += &format!("Unique source words: {}\n", stats.unique_src_words);
        out += &format!("Unique target words: {}\n", stats.unique_tgt_words);
        out += &format!("Number of overlapping word types: {}\n", stats.overlap_types);
        out += &format!(
            "Number of overlapping word instances: {}\n",
            stats.overlap_instances
        );
        out += &format!(
            "Percentage of overlapping word types: {:.2}%\n",
            stats.overlap_types_percent
        );
        out += &format!(
            "Percentage of overlapping word instances: {:.2}%\n",
            stats.overlap_instances_percent
        );
        out += &format!("Jaccard similarity: {:.4}\n", similarity);
        out += "\nTop 10 overlapping words:\n";
        for (word, count) in &stats.top_overlap {
            out += &format!("{}: {}\n", word, count);
        }
        out
    }
}
