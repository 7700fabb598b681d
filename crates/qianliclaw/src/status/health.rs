//! `openclaw health` subprocess check.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const DEFAULT_CLI: &str = "openclaw";
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// How long to keep draining pipes after the child is gone.
const PIPE_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum HealthError {
    #[error("failed to start `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("failed to wait for `{program}`: {source}")]
    Wait { program: String, source: io::Error },

    #[error("`{program} health` timed out after {}s", .timeout.as_secs_f32())]
    TimedOut { program: String, timeout: Duration },

    #[error("`{program} health` exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

/// Text captured from the child's stdout and stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// Non-empty streams joined by a newline.
    pub fn combined(&self) -> String {
        [self.stdout.as_str(), self.stderr.as_str()]
            .into_iter()
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug)]
pub enum HealthOutcome {
    Succeeded(CapturedOutput),
    Failed {
        error: HealthError,
        output: CapturedOutput,
    },
}

/// Response shape of a health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<HealthOutcome> for HealthResult {
    fn from(outcome: HealthOutcome) -> Self {
        match outcome {
            HealthOutcome::Succeeded(output) => HealthResult {
                ok: true,
                output: Some(output.stdout),
                error: None,
            },
            HealthOutcome::Failed { error, output } => {
                let combined = output.combined();
                let message = if combined.is_empty() {
                    error.to_string()
                } else {
                    combined
                };
                HealthResult {
                    ok: false,
                    output: None,
                    error: Some(message),
                }
            }
        }
    }
}

/// Runs `<cli> health` with a wall-clock bound.
#[derive(Debug, Clone)]
pub struct HealthChecker {
    default_program: String,
    timeout: Duration,
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new(DEFAULT_CLI, DEFAULT_HEALTH_TIMEOUT)
    }
}

impl HealthChecker {
    pub fn new(default_program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            default_program: default_program.into(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The executable to run: a non-blank override, else the default found on `PATH`.
    pub fn program_for(&self, cli_path: Option<&str>) -> String {
        cli_path
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .unwrap_or(&self.default_program)
            .to_string()
    }

    pub async fn check(&self, cli_path: Option<&str>) -> HealthResult {
        self.run(cli_path).await.into()
    }

    /// Run the check. On timeout the child is killed and reaped before returning.
    pub async fn run(&self, cli_path: Option<&str>) -> HealthOutcome {
        let program = self.program_for(cli_path);
        debug!(%program, timeout = ?self.timeout, "Running health check");

        let mut child = match Command::new(&program)
            .arg("health")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(source) => {
                warn!(%program, error = %source, "Failed to start health check");
                return HealthOutcome::Failed {
                    error: HealthError::Spawn { program, source },
                    output: CapturedOutput::default(),
                };
            }
        };

        let stdout = PipeReader::spawn(child.stdout.take());
        let stderr = PipeReader::spawn(child.stderr.take());

        let failure = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => None,
            Ok(Ok(status)) => Some(HealthError::Failed {
                program: program.clone(),
                status,
            }),
            Ok(Err(source)) => Some(HealthError::Wait {
                program: program.clone(),
                source,
            }),
            Err(_) => {
                warn!(%program, timeout = ?self.timeout, "Health check timed out, killing it");
                // kill() also waits, so the child does not linger as a zombie.
                if let Err(e) = child.kill().await {
                    warn!(%program, error = %e, "Failed to kill timed out health check");
                }
                Some(HealthError::TimedOut {
                    program: program.clone(),
                    timeout: self.timeout,
                })
            }
        };

        let (stdout, stderr) = tokio::join!(stdout.finish(), stderr.finish());
        let output = CapturedOutput { stdout, stderr };

        match failure {
            None => {
                info!(%program, "Health check passed");
                HealthOutcome::Succeeded(output)
            }
            Some(error) => {
                info!(%program, error = %error, "Health check failed");
                HealthOutcome::Failed { error, output }
            }
        }
    }
}

/// Background reader that keeps every chunk it has seen so far.
///
/// A grandchild that inherited the pipe can hold it open after the child
/// exits, so the reader may never see EOF.
struct PipeReader {
    buf: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl PipeReader {
    fn spawn<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let task = tokio::spawn(async move {
            let Some(mut pipe) = pipe else {
                return;
            };
            let mut chunk = [0u8; 4096];
            loop {
                match pipe.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => sink.lock().await.extend_from_slice(&chunk[..n]),
                    Err(e) => {
                        debug!(error = %e, "Health check pipe read failed");
                        break;
                    }
                }
            }
        });
        Self { buf, task }
    }

    /// Wait briefly for EOF, then stop the reader and return what it collected.
    async fn finish(mut self) -> String {
        if tokio::time::timeout(PIPE_DRAIN_TIMEOUT, &mut self.task)
            .await
            .is_err()
        {
            debug!("Health check pipe still open, keeping partial output");
            self.task.abort();
        }
        let buf = self.buf.lock().await;
        String::from_utf8_lossy(&buf).into_owned()
    }
}
