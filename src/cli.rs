//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "salt-mt", about = "Acholi/English machine translation tooling.")]
/// Holds every command that is callable by the `salt-mt` command.
pub enum SaltMt {
    #[structopt(about = "Paired bootstrap significance test between two systems")]
    Bootstrap(Bootstrap),
    #[structopt(about = "Translate a test set with every checkpoint and decoding setting")]
    Sweep(Sweep),
    #[structopt(about = "Tokenize, lowercase and clean train/dev/test splits")]
    Preprocess(Preprocess),
    #[structopt(about = "Learn and apply BPE, then build OpenNMT-py vocabularies")]
    Prepare(Prepare),
    #[structopt(about = "Compare vocabulary statistics of two files")]
    Vocab(Vocab),
    #[structopt(about = "Find words shared between source and target sides")]
    Overlap(Overlap),
    #[structopt(about = "Compare sentence-final punctuation of two aligned files")]
    Endings(Endings),
}

#[derive(Debug, StructOpt)]
/// Bootstrap command and parameters.
pub struct Bootstrap {
    #[structopt(parse(from_os_str), help = "source sentences")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "reference translations")]
    pub reference: PathBuf,
    #[structopt(parse(from_os_str), help = "baseline model")]
    pub baseline: PathBuf,
    #[structopt(parse(from_os_str), help = "experimental model")]
    pub experimental: PathBuf,
    #[structopt(
        help = "comma separated metrics (bleu, chrf, meteor, comet)",
        short = "m",
        long = "metrics",
        default_value = "bleu,meteor,comet"
    )]
    pub metrics: String,
    #[structopt(
        help = "number of bootstrap iterations",
        short = "n",
        long = "iterations",
        default_value = "1000"
    )]
    pub iterations: usize,
    #[structopt(help = "translation batch size", long = "batch-size", default_value = "32")]
    pub batch_size: usize,
    #[structopt(help = "beam size", long = "beam-size", default_value = "5")]
    pub beam_size: usize,
    #[structopt(help = "GPU id passed to the translator", long = "gpu", default_value = "0")]
    pub gpu: String,
    #[structopt(help = "seed for resampling. Random if not set", long = "seed")]
    pub seed: Option<u64>,
    #[structopt(
        parse(from_os_str),
        help = "scratch directory. Deleted with everything in it after the run, even if it existed before",
        long = "temp-dir",
        default_value = "bootstrap_temp"
    )]
    pub temp_dir: PathBuf,
    #[structopt(
        help = "scorer command for a metric, as metric=template. \
Placeholders: {src}, {hyp}, {ref}",
        long = "scorer"
    )]
    pub scorers: Vec<String>,
    #[structopt(parse(from_os_str), help = "write the summary as JSON", long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub struct Sweep {
    #[structopt(parse(from_os_str), help = "directory holding model_step_*.pt checkpoints")]
    pub model_dir: PathBuf,
    #[structopt(parse(from_os_str), help = "test source file")]
    pub test_src: PathBuf,
    #[structopt(parse(from_os_str), help = "test reference file")]
    pub test_ref: PathBuf,
    #[structopt(parse(from_os_str), help = "output directory")]
    pub dst: PathBuf,
    #[structopt(parse(from_os_str), help = "BPE codes applied to the source", long = "bpe-codes")]
    pub bpe_codes: Option<PathBuf>,
    #[structopt(help = "beam sizes to try [default: 5]", long = "beam-sizes")]
    pub beam_sizes: Vec<usize>,
    #[structopt(help = "batch sizes to try [default: 32]", long = "batch-sizes")]
    pub batch_sizes: Vec<usize>,
    #[structopt(help = "GPU id passed to the translator", long = "gpu", default_value = "0")]
    pub gpu: String,
    #[structopt(help = "source language code", long = "src-lang", default_value = "ach")]
    pub src_lang: String,
}

#[derive(Debug, StructOpt)]
pub struct Preprocess {
    #[structopt(
        parse(from_os_str),
        help = "directory holding salt.<split>.<lang> files, for the train, dev and test splits"
    )]
    pub src_dir: PathBuf,
    #[structopt(parse(from_os_str), help = "output directory")]
    pub dst_dir: PathBuf,
    #[structopt(long = "src-lang", default_value = "ach")]
    pub src_lang: String,
    #[structopt(long = "tgt-lang", default_value = "en")]
    pub tgt_lang: String,
    #[structopt(
        help = "minimum sentence length, in tokens",
        long = "min-len",
        default_value = "1"
    )]
    pub min_len: usize,
    #[structopt(
        help = "maximum sentence length, in tokens",
        long = "max-len",
        default_value = "40"
    )]
    pub max_len: usize,
}

#[derive(Debug, StructOpt)]
pub struct Prepare {
    #[structopt(parse(from_os_str), help = "tokenized train source")]
    pub train_src: PathBuf,
    #[structopt(parse(from_os_str), help = "tokenized train target")]
    pub train_tgt: PathBuf,
    #[structopt(parse(from_os_str), help = "tokenized dev source")]
    pub dev_src: PathBuf,
    #[structopt(parse(from_os_str), help = "tokenized dev target")]
    pub dev_tgt: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "output-dir",
        default_value = "onmt_data"
    )]
    pub dst: PathBuf,
    #[structopt(
        help = "prefix of codes, configuration and vocabulary files",
        long = "save-prefix",
        default_value = "data"
    )]
    pub save_prefix: String,
    #[structopt(long = "src-lang", default_value = "ach")]
    pub src_lang: String,
    #[structopt(long = "tgt-lang", default_value = "en")]
    pub tgt_lang: String,
    #[structopt(long = "vocab-size", default_value = "8000")]
    pub vocab_size: usize,
    #[structopt(long = "min-frequency", default_value = "1")]
    pub min_frequency: usize,
    #[structopt(
        help = "number of BPE merge operations",
        long = "bpe-operations",
        default_value = "8000"
    )]
    pub bpe_operations: usize,
    #[structopt(
        help = "sentences sampled to build the vocabularies",
        long = "n-sample",
        default_value = "10000"
    )]
    pub n_sample: usize,
}

#[derive(Debug, StructOpt)]
pub struct Vocab {
    #[structopt(parse(from_os_str))]
    pub src: PathBuf,
    #[structopt(parse(from_os_str))]
    pub tgt: PathBuf,
    #[structopt(long = "src-name", default_value = "Source")]
    pub src_name: String,
    #[structopt(long = "tgt-name", default_value = "Target")]
    pub tgt_name: String,
    #[structopt(
        parse(from_os_str),
        help = "write the frequency distribution as CSV",
        long = "csv"
    )]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub struct Overlap {
    #[structopt(parse(from_os_str))]
    pub src: PathBuf,
    #[structopt(parse(from_os_str))]
    pub tgt: PathBuf,
    #[structopt(parse(from_os_str), help = "where reports are written")]
    pub dst: PathBuf,
    #[structopt(long = "min-word-length", default_value = "4")]
    pub min_word_length: usize,
    #[structopt(
        help = "maximum edit distance for similar words",
        long = "max-distance",
        default_value = "1"
    )]
    pub max_distance: usize,
    #[structopt(
        help = "only search similar words among the n most frequent source words",
        long = "top-n",
        default_value = "5000"
    )]
    pub top_n: usize,
}

#[derive(Debug, StructOpt)]
pub struct Endings {
    #[structopt(parse(from_os_str))]
    pub first: PathBuf,
    #[structopt(parse(from_os_str))]
    pub second: PathBuf,
}
