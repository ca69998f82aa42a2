//! Running external tools.
use std::ffi::OsStr;
use std::process::Command;

use log::debug;

use crate::error::Error;

/// Run `program` with `args`, waiting for it to finish.
///
/// Returns captured stdout on success.
/// A non-zero exit status becomes [Error::Command], carrying stderr.
pub(crate) fn run<I, S>(program: &str, args: I) -> Result<String, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    debug!("running {:?}", cmd);

    let output = cmd.output()?;
    if !output.status.success() {
        return Err(Error::Command {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let out = run("echo", ["21.5"]).unwrap();
        assert_eq!(out.trim(), "21.5");
    }

    #[test]
    fn failure_carries_stderr() {
        match run("sh", ["-c", "echo broken >&2; exit 3"]) {
            Err(Error::Command {
                program,
                status,
                stderr,
            }) => {
                assert_eq!(program, "sh");
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr.trim(), "broken");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_io() {
        assert!(matches!(
            run("surely-not-an-installed-program", ["x"]),
            Err(Error::Io(_))
        ));
    }
}
