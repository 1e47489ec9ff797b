//! Long-running node process.
//!
//! Spawns `lightchain run` with piped output, forwards every line to the log and
//! feeds it to a [`ReadinessClassifier`] until both endpoints are open. The
//! startup deadline is imposed here; the classifier itself never times out.
//!
//! ## Output handling
//!
//! One reader thread per stream (stdout, stderr) pushes lines into a shared
//! channel, so lines of a single stream keep their order. Once the node is
//! ready the receiving end is dropped and the readers keep draining the pipes
//! into the log only.

use crate::process::readiness::{ReadinessClassifier, ReadinessState};
use log::{debug, info};
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// How long to wait for an exit status after the node closed its output
const EXIT_GRACE: Duration = Duration::from_secs(1);

/// Errors while bringing the node up
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Node exited before it was ready ({status})")]
    Exited { status: String },

    #[error("Node was not ready after {0:?}")]
    Timeout(Duration),
}

/// A running node and the readiness of its endpoints
#[derive(Debug)]
pub struct NodeProcess {
    child: Child,
    lines: Option<Receiver<String>>,
    classifier: ReadinessClassifier,
}

impl NodeProcess {
    /// Start the node binary with the given arguments.
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, StartupError> {
        info!("Starting node: {} {}", program, args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| StartupError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let (tx, rx) = mpsc::channel();
        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, "stdout", tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, "stderr", tx);
        }

        Ok(Self {
            child,
            lines: Some(rx),
            classifier: ReadinessClassifier::new(),
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn readiness(&self) -> ReadinessState {
        self.classifier.state()
    }

    /// Block until both endpoints are open, the node exits, or `timeout` passes.
    pub fn wait_until_ready(&mut self, timeout: Duration) -> Result<(), StartupError> {
        if self.classifier.is_ready() {
            return Ok(());
        }
        let Some(lines) = self.lines.take() else {
            return Err(StartupError::Exited {
                status: "output closed".to_string(),
            });
        };

        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match lines.recv_timeout(remaining) {
                Ok(line) => {
                    if self.classifier.feed(&line).is_ready() {
                        info!("Node is ready (pid {})", self.child.id());
                        return Ok(());
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.lines = Some(lines);
                    return Err(StartupError::Timeout(timeout));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(StartupError::Exited {
                        status: self.exit_status(),
                    });
                }
            }
        }
    }

    /// Block until the node exits.
    pub fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait()
    }

    /// Terminate the node and reap it.
    pub fn kill(&mut self) -> io::Result<ExitStatus> {
        if let Some(status) = self.child.try_wait()? {
            return Ok(status);
        }
        self.child.kill()?;
        self.child.wait()
    }

    fn exit_status(&mut self) -> String {
        let deadline = Instant::now() + EXIT_GRACE;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => return status.to_string(),
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(20)),
                Ok(None) => return "output closed".to_string(),
                Err(e) => return e.to_string(),
            }
        }
    }
}

impl Drop for NodeProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            debug!("Stopping node (pid {})", self.child.id());
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn forward_lines<R: Read + Send + 'static>(stream: R, label: &'static str, tx: Sender<String>) {
    thread::spawn(move || {
        for line in BufReader::new(stream).lines().map_while(Result::ok) {
            debug!("[node {}] {}", label, line);
            // The receiver is gone once the node is ready; keep draining the pipe
            let _ = tx.send(line);
        }
    });
}
