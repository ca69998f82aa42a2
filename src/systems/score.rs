//! Scoring collaborator.
use std::{collections::HashMap, path::Path};

use log::debug;

use super::{command, Metric};
use crate::error::{ConfigError, Error};

/// Aligned sentences of one scoring request, along with the files they were written to.
///
/// `hypotheses[i]` translates `sources[i]` and is compared with `references[i]`.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub sources: &'a [String],
    pub hypotheses: &'a [String],
    pub references: &'a [String],
    pub src_path: &'a Path,
    pub hyp_path: &'a Path,
    pub ref_path: &'a Path,
}

/// Computes a corpus-level score. Higher is better.
pub trait Score {
    fn score(&self, metric: Metric, input: &ScoreInput) -> Result<f64, Error>;
}

impl<F> Score for F
where
    F: Fn(Metric, &ScoreInput) -> Result<f64, Error>,
{
    fn score(&self, metric: Metric, input: &ScoreInput) -> Result<f64, Error> {
        self(metric, input)
    }
}

const BLEU_TEMPLATE: &str = "sacrebleu {ref} -i {hyp} -m bleu -b -w 4";
const CHRF_TEMPLATE: &str = "sacrebleu {ref} -i {hyp} -m chrf -b -w 4";
const COMET_TEMPLATE: &str =
    "comet-score -s {src} -t {hyp} -r {ref} --model Unbabel/XCOMET-XL --quiet --only_system";

/// Scores by running one external command per metric.
///
/// Commands are whitespace separated templates where `{src}`, `{hyp}` and `{ref}`
/// are replaced by file paths. The score is the last number printed on stdout.
#[derive(Debug, Clone)]
pub struct CommandScorer {
    templates: HashMap<Metric, String>,
}

impl Default for CommandScorer {
    /// `bleu` and `chrf` through sacrebleu, `comet` through comet-score.
    /// `meteor` has no default.
    fn default() -> Self {
        let templates = [
            (Metric::Bleu, BLEU_TEMPLATE),
            (Metric::Chrf, CHRF_TEMPLATE),
            (Metric::Comet, COMET_TEMPLATE),
        ]
        .into_iter()
        .map(|(m, t)| (m, t.to_string()))
        .collect();
        Self { templates }
    }
}

impl CommandScorer {
    pub fn set(&mut self, metric: Metric, template: &str) {
        self.templates.insert(metric, template.to_string());
    }

    /// Set a template from a `metric=template` definition.
    pub fn set_from_definition(&mut self, definition: &str) -> Result<(), Error> {
        let (metric, template) = definition
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidScorer(definition.to_string()))?;
        if template.trim().is_empty() {
            return Err(ConfigError::InvalidScorer(definition.to_string()).into());
        }
        self.set(metric.trim().parse()?, template.trim());
        Ok(())
    }

    /// Fails if one of `metrics` has no command.
    pub fn check(&self, metrics: &[Metric]) -> Result<(), Error> {
        match metrics.iter().find(|m| !self.templates.contains_key(m)) {
            Some(m) => Err(ConfigError::NoScorer(*m).into()),
            None => Ok(()),
        }
    }

    fn command_line(&self, metric: Metric, input: &ScoreInput) -> Result<Vec<String>, Error> {
        let template = self
            .templates
            .get(&metric)
            .ok_or(ConfigError::NoScorer(metric))?;
        let src = input.src_path.to_string_lossy();
        let hyp = input.hyp_path.to_string_lossy();
        let reference = input.ref_path.to_string_lossy();

        Ok(template
            .split_whitespace()
            .map(|part| {
                part.replace("{src}", &src)
                    .replace("{hyp}", &hyp)
                    .replace("{ref}", &reference)
            })
            .collect())
    }
}

impl Score for CommandScorer {
    fn score(&self, metric: Metric, input: &ScoreInput) -> Result<f64, Error> {
        let mut argv = self.command_line(metric, input)?.into_iter();
        let program = argv
            .next()
            .ok_or_else(|| ConfigError::InvalidScorer(metric.to_string()))?;
        let stdout = command::run(&program, argv)?;
        let score = parse_score(&stdout)?;
        debug!("{metric} = {score}");
        Ok(score)
    }
}

/// Find the last number in a scorer's output.
///
/// Handles bare numbers (`21.3`) as well as labelled ones (`out.txt\tscore: 0.8123`).
pub(crate) fn parse_score(output: &str) -> Result<f64, Error> {
    output
        .split_whitespace()
        .rev()
        .map(|tok| tok.trim_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-')))
        .find_map(|tok| tok.parse::<f64>().ok())
        .ok_or_else(|| Error::ScoreParse(output.to_string()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn input<'a>(paths: &'a [PathBuf; 3], empty: &'a [String]) -> ScoreInput<'a> {
        ScoreInput {
            sources: empty,
            hypotheses: empty,
            references: empty,
            src_path: &paths[0],
            hyp_path: &paths[1],
            ref_path: &paths[2],
        }
    }

    #[test]
    fn parse_bare_and_labelled() {
        assert_eq!(parse_score("21.3\n").unwrap(), 21.3);
        assert_eq!(parse_score("out.txt\tscore: 0.8123\n").unwrap(), 0.8123);
        assert_eq!(parse_score("BLEU = 12.5,").unwrap(), 12.5);
        assert!(matches!(
            parse_score("no numbers here"),
            Err(Error::ScoreParse(_))
        ));
    }

    #[test]
    fn default_templates() {
        let scorer = CommandScorer::default();
        assert!(scorer.check(&[Metric::Bleu, Metric::Chrf, Metric::Comet]).is_ok());
        match scorer.check(&[Metric::Bleu, Metric::Meteor]) {
            Err(Error::Config(ConfigError::NoScorer(m))) => assert_eq!(m, Metric::Meteor),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn placeholders_are_substituted() {
        let scorer = CommandScorer::default();
        let paths = [
            PathBuf::from("s.txt"),
            PathBuf::from("h.txt"),
            PathBuf::from("r.txt"),
        ];
        let argv = scorer
            .command_line(Metric::Bleu, &input(&paths, &[]))
            .unwrap();
        assert_eq!(
            argv,
            vec!["sacrebleu", "r.txt", "-i", "h.txt", "-m", "bleu", "-b", "-w", "4"]
        );
    }

    #[test]
    fn definitions() {
        let mut scorer = CommandScorer::default();
        scorer
            .set_from_definition("meteor=meteor-cli {hyp} {ref}")
            .unwrap();
        assert!(scorer.check(&[Metric::Meteor]).is_ok());

        assert!(matches!(
            scorer.set_from_definition("meteor"),
            Err(Error::Config(ConfigError::InvalidScorer(_)))
        ));
        assert!(matches!(
            scorer.set_from_definition("ter=tercom"),
            Err(Error::Config(ConfigError::UnknownMetric(_)))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn runs_command() {
        let mut scorer = CommandScorer::default();
        scorer.set(Metric::Meteor, "echo score: 0.42");
        let paths = [PathBuf::new(), PathBuf::new(), PathBuf::new()];
        let score = scorer.score(Metric::Meteor, &input(&paths, &[])).unwrap();
        assert_eq!(score, 0.42);
    }
}
