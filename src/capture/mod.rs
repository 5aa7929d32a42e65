//! Audio capture for brain dumps.

pub mod recorder;

pub use recorder::{AudioBackend, CaptureError, CommandBackend, Recorder, RecorderState};
