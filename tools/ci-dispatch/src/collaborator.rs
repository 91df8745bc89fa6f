//! The boundary between the dispatcher and the external commands it drives.
//!
//! The dispatcher never spawns processes directly. Every call to the container runtime or the remote
//! test script goes through a [`Collaborator`], which hands back the captured standard output along
//! with an optional [`InvocationError`]. Callers decide whether a failure is reported or ignored.

use miette::Diagnostic;
use std::ffi::OsStr;
use std::process::{Command, ExitStatus};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum InvocationError {
    #[error("failed to launch `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited unsuccessfully ({status})")]
    Status { program: String, status: ExitStatus },
}

/// The outcome of a single collaborator call.
///
/// The output is kept even when the call failed, as a collaborator may print something useful
/// before exiting with an error.
#[derive(Debug, Default)]
pub struct Invocation {
    pub output: Vec<u8>,
    pub error: Option<InvocationError>,
}

impl Invocation {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The captured output as text, without the trailing line break.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.output)
            .trim_end_matches(['\r', '\n'])
            .to_owned()
    }
}

pub trait Collaborator {
    /// Run `program` with `args`, blocking until it has exited.
    fn invoke(&mut self, program: &str, args: &[&OsStr]) -> Invocation;
}

/// Collaborator backed by real child processes.
///
/// Standard error of the child is inherited, so diagnostics from the container runtime or the test
/// script reach the terminal directly.
#[derive(Debug, Default)]
pub struct ProcessCollaborator;

impl Collaborator for ProcessCollaborator {
    fn invoke(&mut self, program: &str, args: &[&OsStr]) -> Invocation {
        tracing::debug!(program, ?args, "invoking collaborator");
        let mut command = Command::new(program);
        command.args(args).stderr(std::process::Stdio::inherit());
        match command.output() {
            Ok(output) if output.status.success() => Invocation {
                output: output.stdout,
                error: None,
            },
            Ok(output) => Invocation {
                output: output.stdout,
                error: Some(InvocationError::Status {
                    program: program.to_owned(),
                    status: output.status,
                }),
            },
            Err(source) => Invocation {
                output: Vec::new(),
                error: Some(InvocationError::Spawn {
                    program: program.to_owned(),
                    source,
                }),
            },
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use crate::collaborator::{Collaborator, InvocationError, ProcessCollaborator};
    use std::ffi::OsStr;

    #[test]
    fn test_capture_standard_output() {
        let invocation = ProcessCollaborator.invoke("echo", &[OsStr::new("110#t1")]);
        assert!(invocation.is_success());
        assert_eq!(invocation.output, b"110#t1\n");
        assert_eq!(invocation.text(), "110#t1");
    }

    #[test]
    fn test_non_zero_status_is_an_error() {
        let invocation = ProcessCollaborator.invoke("false", &[]);
        assert!(matches!(
            invocation.error,
            Some(InvocationError::Status { ref program, .. }) if program == "false"
        ));
    }

    #[test]
    fn test_missing_program_is_a_spawn_error() {
        let invocation = ProcessCollaborator.invoke("ci-dispatch-no-such-program", &[]);
        assert!(invocation.output.is_empty());
        assert!(matches!(
            invocation.error,
            Some(InvocationError::Spawn { .. })
        ));
    }
}
