use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use salt_mt::bootstrap::{BootstrapConfig, BootstrapEvaluator, BootstrapSummary};
use salt_mt::error::{ConfigError, Error};
use salt_mt::io::{read_lines, write_lines, ParallelCorpus};
use salt_mt::systems::{Metric, Role, ScoreInput, System};
use tempfile::tempdir;

fn systems() -> (System, System) {
    (
        System::new("base", "base.pt"),
        System::new("exp", "exp.pt"),
    )
}

fn config(temp_dir: &Path, n_iterations: usize, seed: u64) -> BootstrapConfig {
    BootstrapConfig {
        n_iterations,
        seed: Some(seed),
        temp_dir: temp_dir.to_path_buf(),
    }
}

/// Both systems copy their input.
fn identity(_: &System, src: &Path, dst: &Path) -> Result<(), Error> {
    std::fs::copy(src, dst)?;
    Ok(())
}

/// The experimental system fixes some sentences and breaks another one.
fn lookup(system: &System, src: &Path, dst: &Path) -> Result<(), Error> {
    let out: Vec<String> = read_lines(src)?
        .into_iter()
        .map(|line| match (system.name(), line.as_str()) {
            ("exp", "a") => "q".to_string(),
            ("exp", "c") => "x".to_string(),
            ("exp", "d") => "z".to_string(),
            _ => line,
        })
        .collect();
    write_lines(dst, &out)
}

/// Share of hypotheses that are equal to their reference.
fn accuracy(_: Metric, input: &ScoreInput) -> Result<f64, Error> {
    let correct = input
        .hypotheses
        .iter()
        .zip(input.references)
        .filter(|(h, r)| h == r)
        .count();
    Ok(correct as f64 / input.hypotheses.len() as f64)
}

fn constant(_: Metric, _: &ScoreInput) -> Result<f64, Error> {
    Ok(1.0)
}

/// 1.0 when every hypothesis equals its reference, 0.0 otherwise.
fn exact_match(_: Metric, input: &ScoreInput) -> Result<f64, Error> {
    if input.hypotheses == input.references {
        Ok(1.0)
    } else {
        Ok(0.0)
    }
}

static TRANSLATED: AtomicUsize = AtomicUsize::new(0);

/// Copies its input, counting calls and checking the resample size.
fn counting(_: &System, src: &Path, dst: &Path) -> Result<(), Error> {
    assert_eq!(read_lines(src)?.len(), 5);
    TRANSLATED.fetch_add(1, Ordering::SeqCst);
    identity(&System::new("", ""), src, dst)
}

fn favours_experimental(_: Metric, input: &ScoreInput) -> Result<f64, Error> {
    if input.hyp_path.ends_with("exp_out.txt") {
        Ok(0.9)
    } else {
        Ok(0.4)
    }
}

fn comet_fails(metric: Metric, input: &ScoreInput) -> Result<f64, Error> {
    match metric {
        Metric::Comet => Err(Error::Custom("comet crashed".to_string())),
        _ => constant(metric, input),
    }
}

fn lines(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn letters() -> ParallelCorpus {
    ParallelCorpus::new(
        lines(&["a", "b", "c", "d", "e"]),
        lines(&["a", "b", "x", "y", "e"]),
    )
    .unwrap()
}

#[test]
fn length_mismatch_is_rejected() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.txt");
    let reference = dir.path().join("ref.txt");
    std::fs::write(&src, "one\ntwo\nthree\n").unwrap();
    std::fs::write(&reference, "un\ndeux\n").unwrap();

    let err = ParallelCorpus::from_paths(&src, &reference).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::LengthMismatch {
            source: 3,
            reference: 2
        })
    ));
}

#[test]
fn invalid_config_creates_nothing() {
    let dir = tempdir().unwrap();
    let temp = dir.path().join("bootstrap_temp");
    let (base, exp) = systems();

    let err = BootstrapEvaluator::new(letters(), base, exp, vec![Metric::Bleu], config(&temp, 0, 1))
        .err()
        .unwrap();
    assert!(matches!(err, Error::Config(ConfigError::NoIterations)));
    assert!(!temp.exists());
}

#[test]
fn tallies_partition_iterations() {
    let dir = tempdir().unwrap();
    let temp = dir.path().join("bootstrap_temp");
    let (base, exp) = systems();
    let metrics = vec![Metric::Bleu, Metric::Chrf];

    let mut evaluator =
        BootstrapEvaluator::new(letters(), base, exp, metrics, config(&temp, 200, 7)).unwrap();
    let summary = evaluator.run(&lookup, &accuracy).unwrap();

    assert_eq!(summary.iterations, 200);
    assert_eq!(summary.total_sentences, 5);
    assert_eq!(summary.metrics.len(), 2);
    for m in &summary.metrics {
        assert_eq!(m.baseline_wins + m.experimental_wins + m.ties, 200);
        assert!(m.baseline_wins > 0);
        assert!(m.experimental_wins > 0);
        assert_eq!(m.experimental_win_ratio, m.experimental_wins as f64 / 200.0);
        assert_eq!(
            m.p_value,
            (m.baseline_wins as f64 + m.ties as f64 / 2.0) / 200.0
        );
    }
    assert!(!temp.exists());
}

#[test]
fn identical_systems_always_tie() {
    let dir = tempdir().unwrap();
    let temp = dir.path().join("bootstrap_temp");
    let (base, exp) = systems();

    let mut evaluator =
        BootstrapEvaluator::new(letters(), base, exp, vec![Metric::Bleu], config(&temp, 50, 3))
            .unwrap();
    let summary = evaluator.run(&identity, &accuracy).unwrap();
    let bleu = summary.metric(Metric::Bleu).unwrap();

    assert_eq!(bleu.ties, 50);
    assert_eq!(bleu.baseline_wins, 0);
    assert_eq!(bleu.experimental_wins, 0);
    assert_eq!(bleu.experimental_win_ratio, 0.0);
    assert_eq!(bleu.p_value, 0.5);
    assert_eq!(bleu.baseline_mean, bleu.experimental_mean);
}

#[test]
fn one_resample_per_iteration() {
    let dir = tempdir().unwrap();
    let temp = dir.path().join("bootstrap_temp");
    let (base, exp) = systems();

    let mut evaluator =
        BootstrapEvaluator::new(letters(), base, exp, vec![Metric::Chrf], config(&temp, 13, 5))
            .unwrap();
    let summary = evaluator.run(&counting, &constant).unwrap();

    // both systems translate every resample
    assert_eq!(TRANSLATED.load(Ordering::SeqCst), 2 * 13);
    assert_eq!(summary.metric(Metric::Chrf).unwrap().ties, 13);
}

#[test]
fn experimental_always_better() {
    let dir = tempdir().unwrap();
    let temp = dir.path().join("bootstrap_temp");
    let (base, exp) = systems();

    let mut evaluator =
        BootstrapEvaluator::new(letters(), base, exp, vec![Metric::Comet], config(&temp, 20, 3))
            .unwrap();
    let summary = evaluator.run(&identity, &favours_experimental).unwrap();
    let comet = summary.metric(Metric::Comet).unwrap();

    assert_eq!(comet.experimental_wins, 20);
    assert_eq!(comet.experimental_win_ratio, 1.0);
    assert_eq!(comet.p_value, 0.0);
    assert_eq!(comet.baseline_std, 0.0);
    assert!((comet.experimental_mean - 0.9).abs() < 1e-12);
}

#[test]
fn constant_scores() {
    let dir = tempdir().unwrap();
    let temp = dir.path().join("bootstrap_temp");
    let (base, exp) = systems();
    let sentences = lines(&["Apwoyo", "Itye nining?", "Afoyo matek", "Wan watye maber"]);
    let corpus = ParallelCorpus::new(sentences.clone(), sentences).unwrap();
    let metrics = vec![Metric::Bleu, Metric::Meteor, Metric::Comet];

    let mut evaluator =
        BootstrapEvaluator::new(corpus, base, exp, metrics, config(&temp, 100, 42)).unwrap();
    let summary = evaluator.run(&identity, &exact_match).unwrap();

    for m in &summary.metrics {
        assert_eq!(m.baseline_mean, 1.0);
        assert_eq!(m.experimental_mean, 1.0);
        assert_eq!(m.baseline_std, 0.0);
        assert_eq!(m.ties, 100);
        assert_eq!(m.p_value, 0.5);
    }

    let report = summary.to_string();
    assert!(report.contains("Number of iterations: 100"));
    assert!(report.contains("Baseline: 1.0000"));
}

#[test]
fn scoring_failure_aborts_and_cleans_up() {
    let dir = tempdir().unwrap();
    let temp = dir.path().join("bootstrap_temp");
    let (base, exp) = systems();
    let metrics = vec![Metric::Bleu, Metric::Comet];

    let mut evaluator =
        BootstrapEvaluator::new(letters(), base, exp, metrics, config(&temp, 10, 1)).unwrap();
    let err = evaluator.run(&identity, &comet_fails).unwrap_err();

    assert!(matches!(
        err,
        Error::Scoring {
            iteration: 0,
            role: Role::Baseline,
            metric: Metric::Comet,
            ..
        }
    ));
    assert!(err.to_string().contains("comet crashed"));
    assert!(!temp.exists());
}

fn run_seeded(temp: &Path, seed: u64) -> BootstrapSummary {
    let (base, exp) = systems();
    let mut evaluator =
        BootstrapEvaluator::new(letters(), base, exp, vec![Metric::Bleu], config(temp, 30, seed))
            .unwrap();
    let mut summary = evaluator.run(&lookup, &accuracy).unwrap();
    summary.elapsed_secs = 0.0;
    summary
}

#[test]
fn same_seed_same_summary() {
    let dir = tempdir().unwrap();
    let temp = dir.path().join("bootstrap_temp");
    assert_eq!(run_seeded(&temp, 11), run_seeded(&temp, 11));
}

#[test]
fn different_seeds_resample_differently() {
    let sample = |seed: u64| {
        let (base, exp) = systems();
        let config = BootstrapConfig {
            seed: Some(seed),
            ..Default::default()
        };
        let src: Vec<String> = (0..50).map(|i| format!("sentence {}", i)).collect();
        let corpus = ParallelCorpus::new(src.clone(), src).unwrap();
        BootstrapEvaluator::new(corpus, base, exp, vec![Metric::Bleu], config)
            .unwrap()
            .sample()
    };
    assert_eq!(sample(1), sample(1));
    assert_ne!(sample(1), sample(2));
}
