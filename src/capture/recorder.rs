//! Microphone recorder state machine.
//!
//! `Idle → Recording → Idle`; stopping yields the finished audio file
//! path that feeds the transcription stage. The actual capture is behind
//! the [`AudioBackend`] trait: production spawns a configurable capture
//! command, tests use an in-memory fixture.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{debug, warn};
use uuid::Uuid;

/// How long a capture command gets to flush and exit after being asked
/// to stop, before it is killed outright.
const FINALIZE_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from the capture stage. Permission and recording errors abort
/// the capture attempt; the recorder returns to idle.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Recording already in progress")]
    AlreadyRecording,

    #[error("Recording failed: {0}")]
    RecordingFailed(String),
}

/// Low-level capture backend.
#[async_trait]
pub trait AudioBackend: Send {
    /// Check microphone permission before any capture starts.
    fn check_permission(&self) -> Result<(), CaptureError>;

    /// Begin capturing into `output`.
    async fn begin(&mut self, output: &Path) -> Result<(), CaptureError>;

    /// Finalize the capture so `output` is a complete audio file.
    async fn finish(&mut self) -> Result<(), CaptureError>;

    /// Unload any live capture. Must tolerate being called repeatedly and
    /// without a capture in progress.
    fn release(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// Recorder gating the backend behind the state machine.
pub struct Recorder<B: AudioBackend> {
    backend: B,
    state: RecorderState,
    /// Directory finished recordings land in
    out_dir: PathBuf,
    /// Output path of the in-flight recording
    current: Option<PathBuf>,
}

impl<B: AudioBackend> Recorder<B> {
    pub fn new(backend: B, out_dir: PathBuf) -> Self {
        Self {
            backend,
            state: RecorderState::Idle,
            out_dir,
            current: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Request permission and begin capture. Starting while already
    /// recording is rejected; no concurrent recordings.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.state == RecorderState::Recording {
            return Err(CaptureError::AlreadyRecording);
        }

        self.backend.check_permission()?;

        tokio::fs::create_dir_all(&self.out_dir)
            .await
            .map_err(|e| CaptureError::RecordingFailed(e.to_string()))?;

        let output = self.out_dir.join(format!("dump-{}.m4a", Uuid::new_v4()));
        self.backend.begin(&output).await?;

        self.current = Some(output);
        self.state = RecorderState::Recording;
        debug!("Recording started");
        Ok(())
    }

    /// Finalize the capture and yield the audio file path. Stopping when
    /// no recording was started is a no-op.
    pub async fn stop(&mut self) -> Result<Option<PathBuf>, CaptureError> {
        if self.state != RecorderState::Recording {
            return Ok(None);
        }

        let result = self.backend.finish().await;
        self.state = RecorderState::Idle;

        match result {
            Ok(()) => {
                let path = self.current.take();
                debug!(path = ?path, "Recording stopped");
                Ok(path)
            }
            Err(e) => {
                self.current = None;
                self.backend.release();
                Err(e)
            }
        }
    }

    /// Unload any live capture. Safe to call twice, and called again on
    /// drop for abandoned recordings.
    pub fn release(&mut self) {
        self.backend.release();
        self.state = RecorderState::Idle;
        self.current = None;
    }
}

impl<B: AudioBackend> Drop for Recorder<B> {
    fn drop(&mut self) {
        self.backend.release();
    }
}

/// Backend that spawns a capture command (e.g. `rec`/`sox`) with the
/// output path as its final argument, and stops it to finalize the file.
pub struct CommandBackend {
    command: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandBackend {
    pub fn new(command: String, args: Vec<String>) -> Self {
        Self {
            command,
            args,
            child: None,
        }
    }
}

#[async_trait]
impl AudioBackend for CommandBackend {
    fn check_permission(&self) -> Result<(), CaptureError> {
        // Probe the capture binary; an unlaunchable recorder is
        // indistinguishable from a denied microphone for our purposes.
        match std::process::Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Err(CaptureError::PermissionDenied)
            }
            Err(e) => Err(CaptureError::RecordingFailed(format!(
                "capture command '{}' unavailable: {}",
                self.command, e
            ))),
        }
    }

    async fn begin(&mut self, output: &Path) -> Result<(), CaptureError> {
        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::PermissionDenied => CaptureError::PermissionDenied,
                _ => CaptureError::RecordingFailed(e.to_string()),
            })?;

        self.child = Some(child);
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), CaptureError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        // The capture command writes until asked to stop. `rec`/`sox`
        // finalize the container (trailer, header sizes) on SIGINT;
        // SIGKILL would leave the output file truncated.
        if let Some(pid) = child.id() {
            let _ = Command::new("kill")
                .arg("-INT")
                .arg(pid.to_string())
                .status()
                .await;
        }

        match tokio::time::timeout(FINALIZE_TIMEOUT, child.wait()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(CaptureError::RecordingFailed(e.to_string())),
            Err(_) => {
                let _ = child.kill().await;
                Err(CaptureError::RecordingFailed(
                    "capture command did not finalize in time".to_string(),
                ))
            }
        }
    }

    fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                warn!("Failed to release capture process: {}", e);
            }
        }
    }
}
