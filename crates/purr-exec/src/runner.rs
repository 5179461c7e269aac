use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct ExecuteResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
    pub error: Option<String>,
}

impl ExecuteResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && self.error.is_none()
    }
}

/// One unit of streamed output.
#[derive(Debug, PartialEq, Eq)]
pub enum OutputChunk {
    Line(String),
    Exited { exit_code: i32 },
}

/// Runs kubectl commands and `!`-prefixed shell escapes as child
/// processes. The kubectl binary is resolved from `PATH` once, up front.
pub struct Executor {
    kubectl: PathBuf,
}

impl Executor {
    pub fn new() -> Result<Self> {
        let kubectl =
            find_in_path("kubectl").ok_or_else(|| anyhow::anyhow!("kubectl not found in PATH"))?;
        Ok(Self { kubectl })
    }

    #[cfg(test)]
    pub(crate) fn with_kubectl_path(kubectl: PathBuf) -> Self {
        Self { kubectl }
    }

    pub fn kubectl_path(&self) -> &Path {
        &self.kubectl
    }

    /// Runs to completion, capturing both output streams.
    pub async fn run(&self, command: &str) -> ExecuteResult {
        let trimmed = command.trim();

        if let Some(shell) = trimmed.strip_prefix('!') {
            let shell = shell.trim();
            if shell.is_empty() {
                return ExecuteResult {
                    exit_code: 1,
                    error: Some("empty shell command".to_string()),
                    ..Default::default()
                };
            }
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(shell);
            return run_child(cmd).await;
        }

        let mut cmd = Command::new(&self.kubectl);
        cmd.args(kubectl_args(trimmed));
        run_child(cmd).await
    }

    /// Spawns the command and streams merged stdout/stderr lines over a
    /// channel, finishing with an [`OutputChunk::Exited`]. Cancellation
    /// kills the child.
    pub fn run_streaming(&self, command: &str, cancel: CancellationToken) -> mpsc::Receiver<OutputChunk> {
        let (tx, rx) = mpsc::channel(100);
        let trimmed = command.trim();

        let mut cmd = if let Some(shell) = trimmed.strip_prefix('!') {
            let shell = shell.trim();
            if shell.is_empty() {
                tokio::spawn(async move {
                    let _ = tx.send(OutputChunk::Exited { exit_code: 1 }).await;
                });
                return rx;
            }
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(shell);
            cmd
        } else {
            let mut cmd = Command::new(&self.kubectl);
            cmd.args(kubectl_args(trimmed));
            cmd
        };

        tokio::spawn(async move {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).stdin(Stdio::null()).kill_on_drop(true);

            let mut child = match cmd.spawn() {
                Ok(child) => child,
                Err(e) => {
                    warn!(error = %e, "spawn failed");
                    let _ = tx.send(OutputChunk::Line(format!("error: {e}"))).await;
                    let _ = tx.send(OutputChunk::Exited { exit_code: -1 }).await;
                    return;
                }
            };

            let mut out_lines = child.stdout.take().map(|s| BufReader::new(s).lines());
            let mut err_lines = child.stderr.take().map(|s| BufReader::new(s).lines());

            while out_lines.is_some() || err_lines.is_some() {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        let _ = child.kill().await;
                        break;
                    }
                    line = read_next(&mut out_lines), if out_lines.is_some() => match line {
                        Some(line) => {
                            if tx.send(OutputChunk::Line(line)).await.is_err() {
                                let _ = child.kill().await;
                                break;
                            }
                        }
                        None => out_lines = None,
                    },
                    line = read_next(&mut err_lines), if err_lines.is_some() => match line {
                        Some(line) => {
                            if tx.send(OutputChunk::Line(line)).await.is_err() {
                                let _ = child.kill().await;
                                break;
                            }
                        }
                        None => err_lines = None,
                    },
                }
            }

            let exit_code = match child.wait().await {
                Ok(status) => status.code().unwrap_or(-1),
                Err(_) => -1,
            };
            let _ = tx.send(OutputChunk::Exited { exit_code }).await;
        });

        rx
    }
}

async fn read_next<R>(lines: &mut Option<Lines<R>>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    match lines {
        Some(lines) => lines.next_line().await.ok().flatten(),
        None => None,
    }
}

async fn run_child(mut cmd: Command) -> ExecuteResult {
    let start = Instant::now();
    cmd.stdin(Stdio::null());

    match cmd.output().await {
        Ok(output) => {
            let exit_code = output.status.code().unwrap_or(-1);
            ExecuteResult {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code,
                duration: start.elapsed(),
                error: (!output.status.success()).then(|| format!("command exited with code {exit_code}")),
            }
        }
        Err(e) => ExecuteResult {
            exit_code: -1,
            duration: start.elapsed(),
            error: Some(e.to_string()),
            ..Default::default()
        },
    }
}

/// Splits a line into kubectl arguments, dropping a leading `kubectl`.
fn kubectl_args(command: &str) -> Vec<String> {
    let stripped = command.strip_prefix("kubectl ").unwrap_or(command).trim();
    stripped.split_whitespace().map(str::to_string).collect()
}

/// Resolves a binary against `PATH`.
fn find_in_path(binary: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).map(|dir| dir.join(binary)).find(|candidate| candidate.is_file())
}
