//! External process execution
//!
//! Every collaborator (renderers, pdfedit, pdftk, pdfnup, bookland, ps2pdf,
//! pdfinfo) is an argument-list-driven process. [`CommandRunner`] spawns
//! them; [`run`] and [`run_piped`] add the logging and the "nonzero exit is
//! a failure" rule on top so every runner behaves the same.

use crate::job::JobContext;
use crate::options::ToolConfig;
use crate::types::*;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(OsString::as_os_str)
    }

    /// Arguments as (lossy) strings
    pub fn arg_strings(&self) -> Vec<String> {
        self.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// File name of the program, for short log lines
    pub fn name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// What a finished process left behind
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run that printed `stdout`
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    fn status_text(&self) -> String {
        match self.status {
            Some(code) => format!("status {code}"),
            None => "no status (signal)".to_string(),
        }
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Spawns external processes and waits for them.
///
/// Implementations report only spawn and I/O errors; exit status is judged
/// by [`run`] and [`run_piped`].
pub trait CommandRunner {
    fn execute(&self, command: &ToolCommand) -> impl Future<Output = Result<CommandOutput>> + Send;

    /// Run `producer | consumer`. The returned output carries the consumer's
    /// stdout, both stderrs, and the first nonzero status.
    fn execute_piped(
        &self,
        producer: &ToolCommand,
        consumer: &ToolCommand,
    ) -> impl Future<Output = Result<CommandOutput>> + Send;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn execute(&self, command: &ToolCommand) -> Result<CommandOutput> {
        let output = tokio::process::Command::new(command.program())
            .args(command.get_args())
            .stdin(Stdio::null())
            .output()
            .await?;
        Ok(output.into())
    }

    async fn execute_piped(
        &self,
        producer: &ToolCommand,
        consumer: &ToolCommand,
    ) -> Result<CommandOutput> {
        let mut first = tokio::process::Command::new(producer.program())
            .args(producer.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        let pipe: Stdio = first
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("producer has no stdout"))?
            .try_into()?;

        let second = tokio::process::Command::new(consumer.program())
            .args(consumer.get_args())
            .stdin(pipe)
            .output();

        let (first, second) = tokio::join!(first.wait_with_output(), second);
        let first = CommandOutput::from(first?);
        let second = CommandOutput::from(second?);

        Ok(CommandOutput {
            status: if first.success() {
                second.status
            } else {
                first.status
            },
            stdout: second.stdout,
            stderr: format!("{}{}", first.stderr, second.stderr),
        })
    }
}

/// Everything a job needs to reach its external tools: where they live,
/// how to spawn them, and whose log lines they belong to
pub struct Toolchain<'a, R> {
    pub config: &'a ToolConfig,
    pub runner: &'a R,
    pub ctx: &'a JobContext,
}

impl<R> Clone for Toolchain<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Toolchain<'_, R> {}

impl<'a, R: CommandRunner> Toolchain<'a, R> {
    pub fn new(config: &'a ToolConfig, runner: &'a R, ctx: &'a JobContext) -> Self {
        Self {
            config,
            runner,
            ctx,
        }
    }

    pub async fn run(&self, command: &ToolCommand) -> Result<CommandOutput> {
        run(self.runner, self.ctx, command).await
    }

    pub async fn run_piped(
        &self,
        producer: &ToolCommand,
        consumer: &ToolCommand,
    ) -> Result<CommandOutput> {
        run_piped(self.runner, self.ctx, producer, consumer).await
    }
}

/// Run `command`, logging it and its output; a nonzero exit is an error
pub async fn run<R: CommandRunner>(
    runner: &R,
    ctx: &JobContext,
    command: &ToolCommand,
) -> Result<CommandOutput> {
    log::info!("{ctx} {command}");
    let output = runner.execute(command).await.inspect_err(|e| {
        log::error!("{ctx} Failed on command {command}: {e}");
    })?;
    check(ctx, &command.to_string(), &command.name(), output)
}

/// Run `producer | consumer` with the same logging and status rule as [`run`]
pub async fn run_piped<R: CommandRunner>(
    runner: &R,
    ctx: &JobContext,
    producer: &ToolCommand,
    consumer: &ToolCommand,
) -> Result<CommandOutput> {
    let line = format!("{producer} | {consumer}");
    log::info!("{ctx} {line}");
    let output = runner
        .execute_piped(producer, consumer)
        .await
        .inspect_err(|e| {
            log::error!("{ctx} Failed on command {line}: {e}");
        })?;
    check(ctx, &line, &consumer.name(), output)
}

fn check(ctx: &JobContext, line: &str, name: &str, output: CommandOutput) -> Result<CommandOutput> {
    if output.success() {
        log::debug!(
            "{ctx} {name} returned {} and produced\nstdout:{}\nstderr:{}",
            output.status_text(),
            output.stdout,
            output.stderr
        );
        Ok(output)
    } else {
        log::error!(
            "{ctx} {line}\n{name} returned {} and produced\nstdout:{}\nstderr:{}",
            output.status_text(),
            output.stdout,
            output.stderr
        );
        Err(BookError::ToolFailed {
            command: line.to_string(),
            status: output.status_text(),
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_arguments() {
        let cmd = ToolCommand::new("/usr/bin/pdftk")
            .arg("in.pdf")
            .args(["cat", "output", "out.pdf"]);
        assert_eq!(cmd.to_string(), "/usr/bin/pdftk in.pdf cat output out.pdf");
        assert_eq!(cmd.name(), "pdftk");
    }

    #[test]
    fn test_success_needs_zero_status() {
        assert!(CommandOutput::ok("").success());
        let killed = CommandOutput {
            status: None,
            ..Default::default()
        };
        assert!(!killed.success());
        assert_eq!(killed.status_text(), "no status (signal)");
    }
}
