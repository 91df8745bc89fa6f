use crate::args::{Classification, ModeFlags};
use crate::collaborator::{Collaborator, Invocation};
use crate::config::{ConfigError, DispatcherConfig};
use crate::payload::Payload;
use crate::target::RemoteTarget;
use miette::Diagnostic;
use std::ffi::OsStr;
use std::io::Write;
use thiserror::Error;

/// Classify the tokens, and dispatch every requested test.
///
/// Collaborator failures are reported, but never turn into an error here. The only errors are the
/// dispatcher's own: an unusable configuration, or a report that could not be written.
pub fn execute_dispatch<S, C, W>(
    tokens: &[S],
    config: &DispatcherConfig,
    collaborator: C,
    out: W,
) -> Result<DispatchSummary, DispatchError>
where
    S: AsRef<str>,
    C: Collaborator,
    W: Write,
{
    let classification = Classification::classify(tokens);
    let mut dispatcher = Dispatcher::new(config, collaborator, out)?;
    let uploaded = UploadOperation::execute(&mut dispatcher, &classification.flags)?;
    let results = TestOperation::execute(&mut dispatcher, &classification)?;
    Ok(DispatchSummary {
        uploaded,
        dispatched: results.len(),
        failed: results.iter().filter(|r| !r.invocation.is_success()).count(),
    })
}

#[derive(Debug, Error, Diagnostic)]
pub enum DispatchError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to write dispatch report")]
    Report(#[from] std::io::Error),
}

/// What happened during a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Whether the upload succeeded, or `None` if no upload was requested.
    pub uploaded: Option<bool>,
    pub dispatched: usize,
    pub failed: usize,
}

/// The output of one remote test invocation.
#[derive(Debug)]
pub struct TestResult<'a> {
    pub identifier: &'a str,
    pub invocation: Invocation,
}

/// Runs collaborators on behalf of a single dispatch, and writes the report.
pub struct Dispatcher<'c, C, W> {
    config: &'c DispatcherConfig,
    target: RemoteTarget,
    collaborator: C,
    out: W,
}

impl<'c, C: Collaborator, W: Write> Dispatcher<'c, C, W> {
    pub fn new(config: &'c DispatcherConfig, collaborator: C, out: W) -> Result<Self, ConfigError> {
        let target = config.remote_target()?;
        Ok(Self {
            config,
            target,
            collaborator,
            out,
        })
    }

    /// Write one report line, echoing the collaborator's output after the label.
    fn report(&mut self, label: &str, invocation: &Invocation) -> std::io::Result<()> {
        let text = invocation.text();
        if text.is_empty() {
            writeln!(self.out, "{}:", label)
        } else {
            writeln!(self.out, "{}: {}", label, text)
        }
    }
}

pub trait DispatchOperation<'c, I, O> {
    fn execute<C: Collaborator, W: Write>(
        dispatcher: &mut Dispatcher<'c, C, W>,
        input: I,
    ) -> Result<O, DispatchError>;
}

/// Operation for copying the compiler artifact onto the remote test host.
///
/// A failed copy is reported and the dispatch carries on, since the remote host may still hold a
/// usable compiler from an earlier upload.
pub struct UploadOperation;
impl<'c, 'f> DispatchOperation<'c, &'f ModeFlags, Option<bool>> for UploadOperation {
    fn execute<C: Collaborator, W: Write>(
        dispatcher: &mut Dispatcher<'c, C, W>,
        flags: &'f ModeFlags,
    ) -> Result<Option<bool>, DispatchError> {
        if !flags.upload {
            return Ok(None);
        }
        let destination = dispatcher.target.to_string();
        let invocation = dispatcher.collaborator.invoke(
            &dispatcher.config.runtime,
            &[
                OsStr::new("cp"),
                dispatcher.config.artifact.as_os_str(),
                OsStr::new(&destination),
            ],
        );
        let label = match &invocation.error {
            None => "update ok".to_owned(),
            Some(err) => {
                tracing::warn!(%destination, error = %err, "artifact upload failed");
                format!("update failed ({})", err)
            }
        };
        dispatcher.report(&label, &invocation)?;
        Ok(Some(invocation.is_success()))
    }
}

/// Operation for running every requested test on the remote host, one after another.
pub struct TestOperation;
impl<'c, 'a> DispatchOperation<'c, &'a Classification, Vec<TestResult<'a>>> for TestOperation {
    fn execute<C: Collaborator, W: Write>(
        dispatcher: &mut Dispatcher<'c, C, W>,
        classification: &'a Classification,
    ) -> Result<Vec<TestResult<'a>>, DispatchError> {
        let identifiers = classification.request.identifiers();
        writeln!(dispatcher.out, "tests: {:?}", identifiers)?;
        let mut results = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let payload = Payload::new(
                classification.flags,
                identifier,
                dispatcher.config.payload_format,
            )
            .to_string();
            let invocation = dispatcher.collaborator.invoke(
                &dispatcher.config.interpreter,
                &[
                    dispatcher.config.script.as_os_str(),
                    OsStr::new(&payload),
                ],
            );
            // Failures stay out of the report, which only echoes what the script printed.
            if let Some(err) = &invocation.error {
                tracing::warn!(%identifier, %payload, error = %err, "test invocation failed");
            }
            dispatcher.report(&format!("test {}", identifier), &invocation)?;
            results.push(TestResult {
                identifier,
                invocation,
            });
        }
        Ok(results)
    }
}
