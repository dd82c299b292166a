//! Audio source acquisition
//!
//! This module produces exactly one in-memory [`AudioClip`] per completed
//! acquisition, from one of two capability-equivalent sources:
//! - recording, via a pluggable [`AudioBackend`] driven by [`Recorder`]
//! - upload, via media-type validation and file loading in [`upload`]

pub mod backend;
pub mod clip;
pub mod file;
pub mod recorder;
pub mod upload;

#[cfg(feature = "device-capture")]
pub mod device;

pub use backend::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource};
pub use clip::{format_label, AudioClip, ClipSource};
pub use file::{AudioFile, FileBackend};
pub use recorder::Recorder;
