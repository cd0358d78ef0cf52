//! Encoding sinks.
//!
//! Sinks consume normalized frames in playback order; the orchestrator drives them.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
