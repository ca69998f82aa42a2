//! Translation collaborator.
use std::path::Path;

use log::error;

use super::{command, System};
use crate::error::Error;

/// Translates a file of source sentences (one per line) into a file of hypotheses.
///
/// Implementations must produce exactly one output line per input line, in order.
pub trait Translate {
    fn translate(&self, system: &System, src: &Path, dst: &Path) -> Result<(), Error>;
}

impl<F> Translate for F
where
    F: Fn(&System, &Path, &Path) -> Result<(), Error>,
{
    fn translate(&self, system: &System, src: &Path, dst: &Path) -> Result<(), Error> {
        self(system, src, dst)
    }
}

/// Translation through OpenNMT-py's `onmt_translate`.
///
/// Decoding parameters are passed through unmodified.
#[derive(Debug, Clone)]
pub struct OnmtTranslator {
    program: String,
    gpu: String,
    batch_size: usize,
    beam_size: usize,
    replace_unk: bool,
}

impl OnmtTranslator {
    pub fn new(gpu: &str, batch_size: usize, beam_size: usize) -> Self {
        Self {
            program: "onmt_translate".to_string(),
            gpu: gpu.to_string(),
            batch_size,
            beam_size,
            replace_unk: true,
        }
    }

    /// Use another executable (eg. a wrapper script).
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    pub fn with_replace_unk(mut self, replace_unk: bool) -> Self {
        self.replace_unk = replace_unk;
        self
    }

    fn args(&self, system: &System, src: &Path, dst: &Path) -> Vec<String> {
        let mut args = vec![
            "-model".to_string(),
            system.model().to_string_lossy().into_owned(),
            "-src".to_string(),
            src.to_string_lossy().into_owned(),
            "-output".to_string(),
            dst.to_string_lossy().into_owned(),
            "-gpu".to_string(),
            self.gpu.clone(),
            "-batch_size".to_string(),
            self.batch_size.to_string(),
            "-beam_size".to_string(),
            self.beam_size.to_string(),
        ];
        if self.replace_unk {
            args.push("-replace_unk".to_string());
        }
        args
    }
}

impl Translate for OnmtTranslator {
    fn translate(&self, system: &System, src: &Path, dst: &Path) -> Result<(), Error> {
        command::run(&self.program, self.args(system, src, dst))
            .map(|_| ())
            .map_err(|e| {
                error!("translation error with {}: {}", system.name(), e);
                e
            })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn onmt_arguments() {
        let t = OnmtTranslator::new("0", 32, 5);
        let system = System::new("base", "onmt_data/onmt_model");
        let args = t.args(&system, Path::new("src.txt"), Path::new("out.txt"));

        assert_eq!(
            args,
            vec![
                "-model",
                "onmt_data/onmt_model",
                "-src",
                "src.txt",
                "-output",
                "out.txt",
                "-gpu",
                "0",
                "-batch_size",
                "32",
                "-beam_size",
                "5",
                "-replace_unk"
            ]
        );
    }

    #[test]
    fn no_replace_unk() {
        let t = OnmtTranslator::new("-1", 16, 3).with_replace_unk(false);
        let system = System::new("exp", PathBuf::from("m.pt"));
        let args = t.args(&system, Path::new("a"), Path::new("b"));
        assert!(!args.contains(&"-replace_unk".to_string()));
        assert_eq!(args[7], "-1");
    }

    #[test]
    fn closures_translate() {
        let copy = |_: &System, src: &Path, dst: &Path| -> Result<(), Error> {
            std::fs::copy(src, dst)?;
            Ok(())
        };
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        std::fs::write(&src, "a\nb\n").unwrap();

        copy.translate(&System::new("stub", "none"), &src, &dst)
            .unwrap();
        assert_eq!(std::fs::read_to_string(dst).unwrap(), "a\nb\n");
    }

    #[cfg(unix)]
    #[test]
    fn failing_program() {
        let t = OnmtTranslator::new("0", 1, 1).with_program("false");
        let res = t.translate(
            &System::new("x", "y"),
            Path::new("src"),
            Path::new("dst"),
        );
        assert!(matches!(res, Err(Error::Command { .. })));
    }
}
