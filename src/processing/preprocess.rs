/*! Tokenization and cleaning of the raw SALT splits.

For every split, `salt.<split>.<lang>` files are tokenized on Unicode word boundaries, lowercased and written
as `salt.<split>.tk.lc.<lang>` (tokens separated by single spaces).

The training split is additionally cleaned: pairs where either side is too short or too long are dropped.
!*/
use std::path::{Path, PathBuf};

use log::info;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{ConfigError, Error};
use crate::io::{read_lines, write_lines};

pub const SPLITS: [&str; 3] = ["train", "dev", "test"];

/// Split on Unicode word boundaries, keeping punctuation as tokens and dropping whitespace.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_word_bounds()
        .filter(|tok| !tok.trim().is_empty())
        .collect()
}

/// Tokenize then lowercase every token.
pub fn tokenize_lower(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(str::to_lowercase).collect()
}

/// Keep the pairs where both sides have between `min_len` and `max_len` tokens (inclusive).
pub fn clean(
    src: Vec<Vec<String>>,
    tgt: Vec<Vec<String>>,
    min_len: usize,
    max_len: usize,
) -> (Vec<Vec<String>>, Vec<Vec<String>>) {
    let bounds = min_len..=max_len;
    src.into_iter()
        .zip(tgt)
        .filter(|(s, t)| bounds.contains(&s.len()) && bounds.contains(&t.len()))
        .unzip()
}

#[derive(Debug, Clone)]
pub struct Preprocessor {
    src_dir: PathBuf,
    dst_dir: PathBuf,
    /// Language suffixes of the input files, eg. `ach` and `en`.
    langs: (String, String),
    /// Language suffixes of the output files, eg. `ach` and `eng`.
    out_langs: (String, String),
    min_len: usize,
    max_len: usize,
}

impl Preprocessor {
    pub fn new(src_dir: &Path, dst_dir: &Path, src_lang: &str, tgt_lang: &str) -> Self {
        Self {
            src_dir: src_dir.to_path_buf(),
            dst_dir: dst_dir.to_path_buf(),
            langs: (src_lang.to_string(), tgt_lang.to_string()),
            out_langs: (src_lang.to_string(), output_lang(tgt_lang)),
            min_len: 1,
            max_len: 40,
        }
    }

    pub fn with_bounds(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len;
        self
    }

    fn process_file(path: &Path) -> Result<Vec<Vec<String>>, Error> {
        Ok(read_lines(path)?
            .iter()
            .map(|line| tokenize_lower(line))
            .collect())
    }

    fn save(tokens: &[Vec<String>], path: &Path) -> Result<(), Error> {
        let lines: Vec<String> = tokens.iter().map(|t| t.join(" ")).collect();
        write_lines(path, &lines)
    }

    /// Process one split, returning the number of sentence pairs written.
    pub fn process_split(&self, split: &str) -> Result<usize, Error> {
        info!("Processing {} set...", split);
        let src_in = self.src_dir.join(format!("salt.{}.{}", split, self.langs.0));
        let tgt_in = self.src_dir.join(format!("salt.{}.{}", split, self.langs.1));

        let mut src = Self::process_file(&src_in)?;
        let mut tgt = Self::process_file(&tgt_in)?;
        if src.len() != tgt.len() {
            return Err(ConfigError::LengthMismatch {
                source: src.len(),
                reference: tgt.len(),
            }
            .into());
        }

        if split == "train" {
            let before = src.len();
            (src, tgt) = clean(src, tgt, self.min_len, self.max_len);
            info!("[{}] kept {}/{} pairs", split, src.len(), before);
        }

        let src_out = self
            .dst_dir
            .join(format!("salt.{}.tk.lc.{}", split, self.out_langs.0));
        let tgt_out = self
            .dst_dir
            .join(format!("salt.{}.tk.lc.{}", split, self.out_langs.1));
        Self::save(&src, &src_out)?;
        Self::save(&tgt, &tgt_out)?;

        info!("Completed processing {} set", split);
        Ok(src.len())
    }

    pub fn process_all(&self) -> Result<(), Error> {
        std::fs::create_dir_all(&self.dst_dir)?;
        for split in SPLITS {
            self.process_split(split)?;
        }
        info!(
            "Preprocessing completed. Processed files are in {:?}",
            self.dst_dir
        );
        Ok(())
    }
}

/// Raw SALT files use `en` where processed files use `eng`.
fn output_lang(lang: &str) -> String {
    match lang {
        "en" => "eng".to_string(),
        other => other.to_string(),
    }
}
