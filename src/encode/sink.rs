use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{StillreelError, StillreelResult};
use crate::images::normalize::FrameRGBA;

/// Configuration provided to a [`FrameSink`] when a run starts encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Every appended frame must have exactly this size.
    pub resolution: Resolution,
    /// Output frame rate.
    pub fps: Fps,
}

/// Consumer of normalized frames, in playback order.
///
/// Contract: `begin` once, then any number of `append`, then `finalize` exactly once. Callers
/// must reach `finalize` on every exit path after a successful `begin`.
pub trait FrameSink {
    /// Open the output for a run.
    fn begin(&mut self, cfg: SinkConfig) -> StillreelResult<()>;
    /// Append one frame. Frames whose size differs from the configured resolution are rejected.
    fn append(&mut self, frame: &FrameRGBA) -> StillreelResult<()>;
    /// Flush and close the output.
    fn finalize(&mut self) -> StillreelResult<()>;
    /// Frames accepted since `begin`.
    fn frames_written(&self) -> u64;
}

/// Reject frames that do not match the session size.
pub(crate) fn check_frame(cfg: &SinkConfig, frame: &FrameRGBA) -> StillreelResult<()> {
    if frame.resolution() != cfg.resolution {
        return Err(StillreelError::encoder(format!(
            "frame size mismatch: got {}, expected {}",
            frame.resolution(),
            cfg.resolution
        )));
    }
    if frame.data.len() != cfg.resolution.rgba_len() {
        return Err(StillreelError::encoder(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

/// In-memory sink for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<FrameRGBA>,
    finalized: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames, in append order.
    pub fn frames(&self) -> &[FrameRGBA] {
        &self.frames
    }

    /// Whether `finalize` has run.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StillreelResult<()> {
        cfg.resolution.validate()?;
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finalized = false;
        Ok(())
    }

    fn append(&mut self, frame: &FrameRGBA) -> StillreelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StillreelError::encoder("sink not started"))?;
        if self.finalized {
            return Err(StillreelError::encoder("sink is already finalized"));
        }
        check_frame(cfg, frame)?;
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finalize(&mut self) -> StillreelResult<()> {
        if self.cfg.is_none() {
            return Err(StillreelError::encoder("sink not started"));
        }
        if self.finalized {
            return Err(StillreelError::encoder("sink is already finalized"));
        }
        self.finalized = true;
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames.len() as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
