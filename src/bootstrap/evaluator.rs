//! Paired bootstrap resampling over two translation systems.
//!
//! Each iteration draws as many sentence indices as the corpus holds, uniformly and with replacement,
//! translates the resampled source with both systems and scores both outputs with every metric.
//! The system with the strictly higher score wins the iteration for that metric.
//!
//! Iterations run one after the other, and only the current iteration's files exist on disk.
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::stats::{BootstrapSummary, MetricSummary, RunningSeries, Tally};
use super::workspace::{IterationArea, Workspace};
use crate::error::{ConfigError, Error};
use crate::io::{read_lines, write_lines, ParallelCorpus};
use crate::systems::{Metric, Role, Score, ScoreInput, System, Translate};

/// Parameters of a bootstrap run that are not the systems themselves.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub n_iterations: usize,
    /// Seed of the index sampler. Runs are only reproducible when set.
    pub seed: Option<u64>,
    /// Working directory, created at the start of a run and removed at its end.
    pub temp_dir: PathBuf,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            n_iterations: 1000,
            seed: None,
            temp_dir: PathBuf::from("bootstrap_temp"),
        }
    }
}

/// Per metric accumulators.
#[derive(Debug, Default)]
struct Accumulator {
    baseline: RunningSeries,
    experimental: RunningSeries,
    tally: Tally,
}

pub struct BootstrapEvaluator {
    corpus: ParallelCorpus,
    baseline: System,
    experimental: System,
    metrics: Vec<Metric>,
    config: BootstrapConfig,
    rng: StdRng,
}

impl BootstrapEvaluator {
    /// Validate the setup. Nothing touches the filesystem until [Self::run].
    pub fn new(
        corpus: ParallelCorpus,
        baseline: System,
        experimental: System,
        metrics: Vec<Metric>,
        config: BootstrapConfig,
    ) -> Result<Self, Error> {
        if corpus.is_empty() {
            return Err(ConfigError::EmptyCorpus.into());
        }
        if config.n_iterations == 0 {
            return Err(ConfigError::NoIterations.into());
        }
        if metrics.is_empty() {
            return Err(ConfigError::NoMetrics.into());
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            corpus,
            baseline,
            experimental,
            metrics,
            config,
            rng,
        })
    }

    /// Draw as many indices as the corpus holds, in `[0, len)`, with replacement.
    pub fn sample(&mut self) -> Vec<usize> {
        let n = self.corpus.len();
        (0..n).map(|_| self.rng.gen_range(0..n)).collect()
    }

    /// Run every iteration and reduce the results.
    ///
    /// The first failing translation or scoring aborts the run.
    /// The temporary directory is removed in every case.
    pub fn run<T, S>(&mut self, translator: &T, scorer: &S) -> Result<BootstrapSummary, Error>
    where
        T: Translate + ?Sized,
        S: Score + ?Sized,
    {
        info!(
            "Starting bootstrap evaluation with {} iterations on {} sentences",
            self.config.n_iterations,
            self.corpus.len()
        );
        let start = Instant::now();
        let workspace = Workspace::create(&self.config.temp_dir)?;

        let mut acc: Vec<Accumulator> = self
            .metrics
            .iter()
            .map(|_| Accumulator::default())
            .collect();

        for k in 0..self.config.n_iterations {
            let indices = self.sample();
            let area = workspace.iteration(k)?;
            let (base_scores, exp_scores) =
                self.evaluate_sample(k, &indices, &area, translator, scorer)?;
            drop(area);

            for (a, (b, e)) in acc.iter_mut().zip(base_scores.into_iter().zip(exp_scores)) {
                a.baseline.push(b);
                a.experimental.push(e);
                a.tally.record(b, e);
            }

            if (k + 1) % 10 == 0 {
                info!("Completed {} iterations...", k + 1);
            }
        }

        let n = self.config.n_iterations;
        let metrics = self
            .metrics
            .iter()
            .zip(acc.iter())
            .map(|(m, a)| MetricSummary::new(*m, &a.baseline, &a.experimental, &a.tally, n))
            .collect();

        Ok(BootstrapSummary {
            iterations: n,
            total_sentences: self.corpus.len(),
            elapsed_secs: start.elapsed().as_secs_f64(),
            metrics,
        })
    }

    /// Translate and score the resample given by `indices` with both systems.
    ///
    /// Returns baseline and experimental scores, in metric order.
    fn evaluate_sample<T, S>(
        &self,
        iteration: usize,
        indices: &[usize],
        area: &IterationArea,
        translator: &T,
        scorer: &S,
    ) -> Result<(Vec<f64>, Vec<f64>), Error>
    where
        T: Translate + ?Sized,
        S: Score + ?Sized,
    {
        let (src, reference) = self.corpus.select(indices);
        let (src_path, ref_path) = (area.src(), area.reference());
        write_lines(&src_path, &src)?;
        write_lines(&ref_path, &reference)?;

        let base_path = area.baseline_out();
        let exp_path = area.experimental_out();
        let base_hyp = translate(
            iteration,
            Role::Baseline,
            &self.baseline,
            translator,
            &src_path,
            &base_path,
            src.len(),
        )?;
        let exp_hyp = translate(
            iteration,
            Role::Experimental,
            &self.experimental,
            translator,
            &src_path,
            &exp_path,
            src.len(),
        )?;

        let base_input = ScoreInput {
            sources: &src,
            hypotheses: &base_hyp,
            references: &reference,
            src_path: &src_path,
            hyp_path: &base_path,
            ref_path: &ref_path,
        };
        let exp_input = ScoreInput {
            hypotheses: &exp_hyp,
            hyp_path: &exp_path,
            ..base_input
        };

        let mut base_scores = Vec::with_capacity(self.metrics.len());
        let mut exp_scores = Vec::with_capacity(self.metrics.len());
        for metric in &self.metrics {
            base_scores.push(score(iteration, Role::Baseline, *metric, scorer, &base_input)?);
            exp_scores.push(score(iteration, Role::Experimental, *metric, scorer, &exp_input)?);
        }
        debug!(
            "iteration {}: baseline {:?}, experimental {:?}",
            iteration, base_scores, exp_scores
        );

        Ok((base_scores, exp_scores))
    }
}

/// Run the translator and read its output back, checking it has one line per source sentence.
fn translate<T: Translate + ?Sized>(
    iteration: usize,
    role: Role,
    system: &System,
    translator: &T,
    src: &Path,
    dst: &Path,
    expected: usize,
) -> Result<Vec<String>, Error> {
    let wrap = |e: Error| Error::Translation {
        iteration,
        role,
        system: system.name().to_string(),
        source: Box::new(e),
    };

    translator.translate(system, src, dst).map_err(wrap)?;
    let hyp = read_lines(dst).map_err(wrap)?;
    if hyp.len() != expected {
        return Err(wrap(Error::Custom(format!(
            "expected {} hypotheses, got {}",
            expected,
            hyp.len()
        ))));
    }
    Ok(hyp)
}

fn score<S: Score + ?Sized>(
    iteration: usize,
    role: Role,
    metric: Metric,
    scorer: &S,
    input: &ScoreInput,
) -> Result<f64, Error> {
    scorer
        .score(metric, input)
        .map_err(|e| Error::Scoring {
            iteration,
            role,
            metric,
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn corpus(n: usize) -> ParallelCorpus {
        let side: Vec<String> = (0..n).map(|i| format!("sentence {i}")).collect();
        ParallelCorpus::new(side.clone(), side).unwrap()
    }

    fn evaluator(n: usize, config: BootstrapConfig) -> Result<BootstrapEvaluator, Error> {
        BootstrapEvaluator::new(
            corpus(n),
            System::new("base", "base.pt"),
            System::new("exp", "exp.pt"),
            vec![Metric::Bleu],
            config,
        )
    }

    #[test]
    fn rejects_zero_iterations() {
        let config = BootstrapConfig {
            n_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            evaluator(3, config),
            Err(Error::Config(ConfigError::NoIterations))
        ));
    }

    #[test]
    fn rejects_empty_corpus_and_metrics() {
        assert!(matches!(
            evaluator(0, BootstrapConfig::default()),
            Err(Error::Config(ConfigError::EmptyCorpus))
        ));
        let res = BootstrapEvaluator::new(
            corpus(2),
            System::new("a", "a"),
            System::new("b", "b"),
            vec![],
            BootstrapConfig::default(),
        );
        assert!(matches!(res, Err(Error::Config(ConfigError::NoMetrics))));
    }

    #[test]
    fn samples_have_corpus_size_and_range() {
        let mut ev = evaluator(
            7,
            BootstrapConfig {
                seed: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        for _ in 0..50 {
            let s = ev.sample();
            assert_eq!(s.len(), 7);
            assert!(s.iter().all(|&i| i < 7));
        }
    }

    #[test]
    fn sampling_is_seeded() {
        let config = BootstrapConfig {
            seed: Some(42),
            ..Default::default()
        };
        let mut a = evaluator(20, config.clone()).unwrap();
        let mut b = evaluator(20, config).unwrap();
        assert_eq!(a.sample(), b.sample());
        assert_eq!(a.sample(), b.sample());
    }

    #[test]
    fn short_output_is_a_translation_failure() {
        let root = tempdir().unwrap();
        let temp_dir = root.path().join("tmp");
        let mut ev = evaluator(
            4,
            BootstrapConfig {
                n_iterations: 3,
                seed: Some(0),
                temp_dir: temp_dir.clone(),
            },
        )
        .unwrap();

        let drop_last = |_: &System, src: &Path, dst: &Path| -> Result<(), Error> {
            let mut lines = read_lines(src)?;
            lines.pop();
            write_lines(dst, &lines)
        };
        fn never(_: Metric, _: &ScoreInput) -> Result<f64, Error> {
            Ok(0.0)
        }

        match ev.run(&drop_last, &never) {
            Err(Error::Translation {
                iteration, role, ..
            }) => {
                assert_eq!(iteration, 0);
                assert_eq!(role, Role::Baseline);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!temp_dir.exists());
    }
}
