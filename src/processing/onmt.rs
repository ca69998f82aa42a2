/*! Training data preparation for OpenNMT-py.

From tokenized train and dev splits:

1. learn BPE codes on the concatenation of both train sides,
2. encode train and dev into `<split>.bpe.<lang>`,
3. write the `<prefix>_config.yaml` data configuration,
4. build the vocabularies with `onmt_build_vocab`.
!*/
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use super::bpe::BpeApplier;
use crate::error::Error;
use crate::io::{read_lines, write_lines};
use crate::systems::command;

pub const VOCAB_SIZE: usize = 8000;
pub const MIN_FREQUENCY: usize = 1;
pub const BPE_OPERATIONS: usize = 8000;
pub const N_SAMPLE: usize = 10000;

/// Learns BPE merge operations through `subword-nmt`.
#[derive(Debug, Clone)]
pub struct BpeLearner {
    program: String,
    operations: usize,
}

impl BpeLearner {
    pub fn new(operations: usize) -> Self {
        Self {
            program: "subword-nmt".to_string(),
            operations,
        }
    }

    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    fn args(&self, input: &Path, codes: &Path) -> Vec<String> {
        vec![
            "learn-bpe".to_string(),
            "-s".to_string(),
            self.operations.to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-o".to_string(),
            codes.to_string_lossy().into_owned(),
        ]
    }

    pub fn learn(&self, input: &Path, codes: &Path) -> Result<(), Error> {
        info!("learning {} BPE operations from {:?}", self.operations, input);
        command::run(&self.program, self.args(input, codes))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusPaths {
    pub path_src: PathBuf,
    pub path_tgt: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataConfig {
    pub corpus_1: CorpusPaths,
    pub valid: CorpusPaths,
}

/// Data and vocabulary section of an OpenNMT-py configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocabConfig {
    pub save_data: PathBuf,
    pub data: DataConfig,
    pub src_vocab: PathBuf,
    pub tgt_vocab: PathBuf,
    pub src_vocab_size: usize,
    pub tgt_vocab_size: usize,
    pub src_words_min_frequency: usize,
    pub tgt_words_min_frequency: usize,
    pub share_vocab: bool,
    pub transforms: Vec<String>,
    /// Keep existing vocabularies and samples.
    pub overwrite: bool,
}

#[derive(Debug, Clone)]
pub struct OnmtPreparer {
    train: (PathBuf, PathBuf),
    dev: (PathBuf, PathBuf),
    dst: PathBuf,
    save_prefix: String,
    langs: (String, String),
    pub vocab_size: usize,
    pub min_frequency: usize,
    pub bpe_operations: usize,
    /// Sentences sampled by `onmt_build_vocab`.
    pub n_sample: usize,
    subword_nmt: String,
    build_vocab: String,
}

impl OnmtPreparer {
    pub fn new(
        train: (&Path, &Path),
        dev: (&Path, &Path),
        dst: &Path,
        save_prefix: &str,
    ) -> Self {
        Self {
            train: (train.0.to_path_buf(), train.1.to_path_buf()),
            dev: (dev.0.to_path_buf(), dev.1.to_path_buf()),
            dst: dst.to_path_buf(),
            save_prefix: save_prefix.to_string(),
            langs: ("ach".to_string(), "en".to_string()),
            vocab_size: VOCAB_SIZE,
            min_frequency: MIN_FREQUENCY,
            bpe_operations: BPE_OPERATIONS,
            n_sample: N_SAMPLE,
            subword_nmt: "subword-nmt".to_string(),
            build_vocab: "onmt_build_vocab".to_string(),
        }
    }

    pub fn with_langs(mut self, src_lang: &str, tgt_lang: &str) -> Self {
        self.langs = (src_lang.to_string(), tgt_lang.to_string());
        self
    }

    /// Use other executables for `subword-nmt` and `onmt_build_vocab`.
    pub fn with_programs(mut self, subword_nmt: &str, build_vocab: &str) -> Self {
        self.subword_nmt = subword_nmt.to_string();
        self.build_vocab = build_vocab.to_string();
        self
    }

    fn save_data(&self) -> PathBuf {
        self.dst.join(&self.save_prefix)
    }

    pub fn codes_path(&self) -> PathBuf {
        self.dst.join(format!("{}.codes", self.save_prefix))
    }

    pub fn config_path(&self) -> PathBuf {
        self.dst.join(format!("{}_config.yaml", self.save_prefix))
    }

    fn bpe_path(&self, split: &str, lang: &str) -> PathBuf {
        self.dst.join(format!("{}.bpe.{}", split, lang))
    }

    fn vocab_path(&self, lang: &str) -> PathBuf {
        let mut name = self.save_data().into_os_string();
        name.push(format!(".vocab.{}", lang));
        name.into()
    }

    pub fn config(&self) -> VocabConfig {
        let (src, tgt) = (&self.langs.0, &self.langs.1);
        VocabConfig {
            save_data: self.save_data(),
            data: DataConfig {
                corpus_1: CorpusPaths {
                    path_src: self.bpe_path("train", src),
                    path_tgt: self.bpe_path("train", tgt),
                },
                valid: CorpusPaths {
                    path_src: self.bpe_path("dev", src),
                    path_tgt: self.bpe_path("dev", tgt),
                },
            },
            src_vocab: self.vocab_path(src),
            tgt_vocab: self.vocab_path(tgt),
            src_vocab_size: self.vocab_size,
            tgt_vocab_size: self.vocab_size,
            src_words_min_frequency: self.min_frequency,
            tgt_words_min_frequency: self.min_frequency,
            share_vocab: false,
            transforms: vec!["filtertoolong".to_string()],
            overwrite: false,
        }
    }

    /// Learn codes on both train sides. The concatenated input is removed afterwards.
    pub fn learn_bpe(&self) -> Result<PathBuf, Error> {
        let joint = self.dst.join(format!("{}.train.joint", self.save_prefix));
        let mut lines = read_lines(&self.train.0)?;
        lines.extend(read_lines(&self.train.1)?);
        write_lines(&joint, &lines)?;

        let codes = self.codes_path();
        let learnt = BpeLearner::new(self.bpe_operations)
            .with_program(&self.subword_nmt)
            .learn(&joint, &codes);
        std::fs::remove_file(&joint)?;
        learnt?;

        info!("BPE codes saved to {:?}", codes);
        Ok(codes)
    }

    pub fn apply_bpe(&self, codes: &Path) -> Result<(), Error> {
        let bpe = BpeApplier::new(codes).with_program(&self.subword_nmt);
        let datasets = [
            ("train", &self.train.0, &self.langs.0),
            ("train", &self.train.1, &self.langs.1),
            ("dev", &self.dev.0, &self.langs.0),
            ("dev", &self.dev.1, &self.langs.1),
        ];
        for (split, input, lang) in datasets {
            let output = self.bpe_path(split, lang);
            bpe.apply(input, &output)?;
            info!("BPE applied to {:?}, output saved to {:?}", input, output);
        }
        Ok(())
    }

    pub fn write_config(&self) -> Result<PathBuf, Error> {
        let path = self.config_path();
        std::fs::write(&path, serde_yaml::to_string(&self.config())?)?;
        info!("Configuration file saved to {:?}", path);
        Ok(path)
    }

    fn build_vocab_args(&self) -> Vec<String> {
        vec![
            "-config".to_string(),
            self.config_path().to_string_lossy().into_owned(),
            "-n_sample".to_string(),
            self.n_sample.to_string(),
        ]
    }

    pub fn build_vocab(&self) -> Result<(), Error> {
        info!("Building vocabulary...");
        command::run(&self.build_vocab, self.build_vocab_args())?;
        info!("Vocabulary building completed successfully.");
        Ok(())
    }

    pub fn run(&self) -> Result<(), Error> {
        std::fs::create_dir_all(&self.dst)?;
        let codes = self.learn_bpe()?;
        self.apply_bpe(&codes)?;
        self.write_config()?;
        self.build_vocab()
    }
}
