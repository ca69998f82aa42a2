/*! Checkpoint and decoding parameter sweep.

Translates a test set with every saved checkpoint (`model_step_<N>.pt`) and every combination of beam
and batch sizes, then scores each output with BLEU and chrF.

Unlike bootstrap evaluation, a failing combination is logged and skipped: the sweep is exploratory
and the other combinations remain meaningful.
!*/
use std::path::{Path, PathBuf};

use itertools::iproduct;
use log::{error, info, warn};
use serde::Serialize;

use super::bpe::{remove_bpe_file, BpeApplier};
use crate::error::Error;
use crate::io::read_lines;
use crate::systems::{Metric, Score, ScoreInput, System, Translate};

/// A saved model and its training step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub path: PathBuf,
    pub step: u64,
}

impl Checkpoint {
    /// Parse `model_step_<N>.pt`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let step = path
            .file_name()?
            .to_str()?
            .strip_prefix("model_step_")?
            .strip_suffix(".pt")?
            .parse()
            .ok()?;
        Some(Self {
            path: path.to_path_buf(),
            step,
        })
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// List checkpoints of `model_dir`, ordered by training step.
pub fn checkpoints(model_dir: &Path) -> Result<Vec<Checkpoint>, Error> {
    let pattern = model_dir.join("model_step_*.pt");
    let mut found = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let path = entry?;
        match Checkpoint::from_path(&path) {
            Some(c) => found.push(c),
            None => warn!("ignoring {:?}: no step number", path),
        }
    }
    found.sort_by_key(|c| c.step);
    Ok(found)
}

/// One line of the results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRecord {
    pub checkpoint: String,
    pub step: u64,
    pub beam_size: usize,
    pub batch_size: usize,
    pub bleu: f64,
    pub chrf: f64,
    pub output_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Sweep {
    model_dir: PathBuf,
    test_src: PathBuf,
    test_ref: PathBuf,
    dst: PathBuf,
    bpe: Option<BpeApplier>,
    src_lang: String,
    beam_sizes: Vec<usize>,
    batch_sizes: Vec<usize>,
}

impl Sweep {
    pub fn new(model_dir: &Path, test_src: &Path, test_ref: &Path, dst: &Path) -> Self {
        Self {
            model_dir: model_dir.to_path_buf(),
            test_src: test_src.to_path_buf(),
            test_ref: test_ref.to_path_buf(),
            dst: dst.to_path_buf(),
            bpe: None,
            src_lang: "ach".to_string(),
            beam_sizes: vec![5],
            batch_sizes: vec![32],
        }
    }

    pub fn with_bpe(mut self, bpe: BpeApplier) -> Self {
        self.bpe = Some(bpe);
        self
    }

    pub fn with_src_lang(mut self, lang: &str) -> Self {
        self.src_lang = lang.to_string();
        self
    }

    pub fn with_beam_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.beam_sizes = sizes;
        self
    }

    pub fn with_batch_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.batch_sizes = sizes;
        self
    }

    pub fn results_path(&self) -> PathBuf {
        self.dst.join("translation_results.csv")
    }

    /// Source file handed to the translator: BPE encoded if codes are set.
    fn prepare_source(&self) -> Result<PathBuf, Error> {
        match &self.bpe {
            Some(bpe) => {
                let encoded = self.dst.join(format!("test.bpe.{}", self.src_lang));
                bpe.apply(&self.test_src, &encoded)?;
                Ok(encoded)
            }
            None => Ok(self.test_src.clone()),
        }
    }

    /// Translate, decode and score one combination.
    #[allow(clippy::too_many_arguments)]
    fn run_one<T, S>(
        &self,
        translator: &T,
        scorer: &S,
        checkpoint: &Checkpoint,
        src: &Path,
        beam_size: usize,
        batch_size: usize,
        sources: &[String],
        references: &[String],
    ) -> Result<SweepRecord, Error>
    where
        T: Translate + ?Sized,
        S: Score + ?Sized,
    {
        let output_bpe = self.dst.join(format!(
            "trans_step{}_beam{}_batch{}.bpe.txt",
            checkpoint.step, beam_size, batch_size
        ));
        let system = System::new(checkpoint.name(), &checkpoint.path);
        translator.translate(&system, src, &output_bpe)?;

        let output = remove_bpe_file(&output_bpe)?;
        let hypotheses = read_lines(&output)?;
        let input = ScoreInput {
            sources,
            hypotheses: &hypotheses,
            references,
            src_path: &self.test_src,
            hyp_path: &output,
            ref_path: &self.test_ref,
        };

        Ok(SweepRecord {
            checkpoint: checkpoint.name(),
            step: checkpoint.step,
            beam_size,
            batch_size,
            bleu: scorer.score(Metric::Bleu, &input)?,
            chrf: scorer.score(Metric::Chrf, &input)?,
            output_file: output,
        })
    }

    /// Run every combination and write the results table, best BLEU first.
    ///
    /// `make_translator` is called with `(beam_size, batch_size)`.
    pub fn run<F, T, S>(&self, make_translator: F, scorer: &S) -> Result<Vec<SweepRecord>, Error>
    where
        F: Fn(usize, usize) -> T,
        T: Translate,
        S: Score + ?Sized,
    {
        std::fs::create_dir_all(&self.dst)?;
        let src = self.prepare_source()?;
        let sources = read_lines(&self.test_src)?;
        let references = read_lines(&self.test_ref)?;

        let checkpoints = checkpoints(&self.model_dir)?;
        info!("found {} checkpoints in {:?}", checkpoints.len(), self.model_dir);

        let mut records = Vec::new();
        for (checkpoint, &beam_size, &batch_size) in
            iproduct!(checkpoints.iter(), self.beam_sizes.iter(), self.batch_sizes.iter())
        {
            info!(
                "Translating with checkpoint {}, beam_size={}, batch_size={}",
                checkpoint.name(),
                beam_size,
                batch_size
            );
            let translator = make_translator(beam_size, batch_size);
            match self.run_one(
                &translator,
                scorer,
                checkpoint,
                &src,
                beam_size,
                batch_size,
                &sources,
                &references,
            ) {
                Ok(record) => records.push(record),
                Err(e) => error!(
                    "{} (beam {}, batch {}) failed: {}",
                    checkpoint.name(),
                    beam_size,
                    batch_size,
                    e
                ),
            }
        }

        records.sort_by(|a, b| b.bleu.total_cmp(&a.bleu));

        let mut out = csv::WriterBuilder::new().from_path(self.results_path())?;
        for record in &records {
            out.serialize(record)?;
        }
        out.flush()?;

        match records.first() {
            Some(best) => {
                info!("Best configuration:");
                info!("Checkpoint: {}", best.checkpoint);
                info!("Step: {}", best.step);
                info!("Beam size: {}", best.beam_size);
                info!("Batch size: {}", best.batch_size);
                info!("BLEU score: {:.2}", best.bleu);
                info!("chrF score: {:.2}", best.chrf);
                info!("Output file: {:?}", best.output_file);
            }
            None => warn!("no combination succeeded"),
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_checkpoint_names() {
        let c = Checkpoint::from_path(Path::new("onmt/model_step_1500.pt")).unwrap();
        assert_eq!(c.step, 1500);
        assert_eq!(c.name(), "model_step_1500.pt");
        assert!(Checkpoint::from_path(Path::new("model_step_x.pt")).is_none());
        assert!(Checkpoint::from_path(Path::new("model_step_10.bin")).is_none());
    }

    #[test]
    fn checkpoints_sorted_by_step() {
        let dir = tempdir().unwrap();
        for name in [
            "model_step_10.pt",
            "model_step_9.pt",
            "model_step_100.pt",
            "vocab.pt",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let steps: Vec<u64> = checkpoints(dir.path())
            .unwrap()
            .into_iter()
            .map(|c| c.step)
            .collect();
        assert_eq!(steps, vec![9, 10, 100]);
    }
}
