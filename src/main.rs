//! # salt-mt
//!
//! Tooling around Acholi/English neural machine translation experiments:
//! corpus preprocessing, training data preparation, checkpoint sweeps, corpus analysis and
//! paired bootstrap significance testing between two trained systems.
//!
//! ## Getting started
//!
//! ```sh
//! salt-mt 0.1.0
//! Acholi/English machine translation tooling.
//!
//! USAGE:
//!     salt-mt <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     bootstrap     Paired bootstrap significance test between two systems
//!     endings       Compare sentence-final punctuation of two aligned files
//!     help          Prints this message or the help of the given subcommand(s)
//!     overlap       Find words shared between source and target sides
//!     prepare       Learn and apply BPE, then build OpenNMT-py vocabularies
//!     preprocess    Tokenize, lowercase and clean train/dev/test splits
//!     sweep         Translate a test set with every checkpoint and decoding setting
//!     vocab         Compare vocabulary statistics of two files
//! ```
//!
//! Logging is configured through `RUST_LOG`, eg. `RUST_LOG=info salt-mt bootstrap ...`.

use std::fs::File;

use structopt::StructOpt;

use salt_mt::analysis::{endings, Comparison};
use salt_mt::bootstrap::{BootstrapConfig, BootstrapEvaluator};
use salt_mt::error::Error;
use salt_mt::io::ParallelCorpus;
use salt_mt::processing::{bpe::BpeApplier, OnmtPreparer, Preprocessor};
use salt_mt::systems::{CommandScorer, Metric, OnmtTranslator, System};

#[macro_use]
extern crate log;

mod cli;

fn bootstrap(b: cli::Bootstrap) -> Result<(), Error> {
    let metrics = Metric::parse_list(&b.metrics)?;
    let mut scorer = CommandScorer::default();
    for definition in &b.scorers {
        scorer.set_from_definition(definition)?;
    }
    scorer.check(&metrics)?;

    let corpus = ParallelCorpus::from_paths(&b.src, &b.reference)?;
    let config = BootstrapConfig {
        n_iterations: b.iterations,
        seed: b.seed,
        temp_dir: b.temp_dir,
    };
    let mut evaluator = BootstrapEvaluator::new(
        corpus,
        System::from_model(&b.baseline),
        System::from_model(&b.experimental),
        metrics,
        config,
    )?;
    let translator = OnmtTranslator::new(&b.gpu, b.batch_size, b.beam_size);

    let summary = evaluator.run(&translator, &scorer)?;
    println!("{}", summary);

    if let Some(output) = b.output {
        let f = File::create(&output)?;
        serde_json::to_writer_pretty(f, &summary)?;
        info!("summary written to {:?}", output);
    }
    Ok(())
}

fn sweep(s: cli::Sweep) -> Result<(), Error> {
    let mut sweep = salt_mt::processing::Sweep::new(&s.model_dir, &s.test_src, &s.test_ref, &s.dst)
        .with_src_lang(&s.src_lang);
    if let Some(codes) = &s.bpe_codes {
        sweep = sweep.with_bpe(BpeApplier::new(codes));
    }
    if !s.beam_sizes.is_empty() {
        sweep = sweep.with_beam_sizes(s.beam_sizes);
    }
    if !s.batch_sizes.is_empty() {
        sweep = sweep.with_batch_sizes(s.batch_sizes);
    }

    let gpu = s.gpu;
    let records = sweep.run(
        |beam_size, batch_size| {
            OnmtTranslator::new(&gpu, batch_size, beam_size).with_replace_unk(true)
        },
        &CommandScorer::default(),
    )?;
    println!("{} configurations evaluated, results in {:?}", records.len(), sweep.results_path());
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::SaltMt::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::SaltMt::Bootstrap(b) => bootstrap(b)?,
        cli::SaltMt::Sweep(s) => sweep(s)?,
        cli::SaltMt::Preprocess(p) => {
            Preprocessor::new(&p.src_dir, &p.dst_dir, &p.src_lang, &p.tgt_lang)
                .with_bounds(p.min_len, p.max_len)
                .process_all()?;
        }
        cli::SaltMt::Prepare(p) => {
            let mut preparer = OnmtPreparer::new(
                (p.train_src.as_path(), p.train_tgt.as_path()),
                (p.dev_src.as_path(), p.dev_tgt.as_path()),
                &p.dst,
                &p.save_prefix,
            )
            .with_langs(&p.src_lang, &p.tgt_lang);
            preparer.vocab_size = p.vocab_size;
            preparer.min_frequency = p.min_frequency;
            preparer.bpe_operations = p.bpe_operations;
            preparer.n_sample = p.n_sample;
            preparer.run()?;
        }
        cli::SaltMt::Vocab(v) => {
            let cmp = Comparison::new(&v.src, &v.tgt, &v.src_name, &v.tgt_name)?;
            println!("{}", cmp.report());
            if let Some(csv) = v.csv {
                cmp.write_distribution(&csv)?;
            }
        }
        cli::SaltMt::Overlap(o) => {
            let mut overlap = salt_mt::analysis::Overlap::new(&o.src, &o.tgt, &o.dst);
            overlap.min_word_length = o.min_word_length;
            overlap.max_distance = o.max_distance;
            overlap.top_n = Some(o.top_n);
            let (stats, similarity) = overlap.run()?;
            println!("{}", overlap.report(&stats, similarity));
        }
        cli::SaltMt::Endings(e) => {
            let stats = endings::analyze(&e.first, &e.second)?;
            println!("{}", stats);
        }
    };

    Ok(())
}
