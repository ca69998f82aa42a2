//! Subword (BPE) encoding and decoding.
//!
//! Encoding is delegated to `subword-nmt apply-bpe`; decoding just removes the `@@ ` joiners.
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Error;
use crate::io::{read_lines, write_lines};
use crate::systems::command;

/// Applies learnt BPE codes through `subword-nmt`.
#[derive(Debug, Clone)]
pub struct BpeApplier {
    program: String,
    codes: PathBuf,
}

impl BpeApplier {
    pub fn new(codes: &Path) -> Self {
        Self {
            program: "subword-nmt".to_string(),
            codes: codes.to_path_buf(),
        }
    }

    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    fn args(&self, src: &Path, dst: &Path) -> Vec<String> {
        vec![
            "apply-bpe".to_string(),
            "-c".to_string(),
            self.codes.to_string_lossy().into_owned(),
            "-i".to_string(),
            src.to_string_lossy().into_owned(),
            "-o".to_string(),
            dst.to_string_lossy().into_owned(),
        ]
    }

    pub fn apply(&self, src: &Path, dst: &Path) -> Result<(), Error> {
        info!("applying BPE codes {:?} to {:?}", self.codes, src);
        command::run(&self.program, self.args(src, dst))?;
        Ok(())
    }
}

/// Join subwords back into words.
pub fn remove_bpe(line: &str) -> String {
    let line = line.replace("@@ ", "");
    match line.strip_suffix("@@") {
        Some(stripped) => stripped.to_string(),
        None => line,
    }
}

/// Decode `path` into a sibling file, named by dropping the `.bpe` part of its name.
///
/// `trans.bpe.txt` becomes `trans.txt`; a name without `.bpe.` gets a `.debpe` suffix.
pub fn remove_bpe_file(path: &Path) -> Result<PathBuf, Error> {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    let out_name = match name {
        Some(n) if n.contains(".bpe.") => n.replacen(".bpe.", ".", 1),
        Some(n) => format!("{n}.debpe"),
        None => return Err(Error::Custom(format!("{path:?} is not a file path"))),
    };
    let out = path.with_file_name(out_name);

    let lines: Vec<String> = read_lines(path)?.iter().map(|l| remove_bpe(l)).collect();
    write_lines(&out, &lines)?;
    Ok(out)
}
