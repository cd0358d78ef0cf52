use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig, check_frame};
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{StillreelError, StillreelResult};
use crate::images::normalize::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path. An existing file is overwritten.
    pub out_path: PathBuf,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    /// Options for writing an MP4 to `out_path` over a black background.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Video encoder session: spawns the system `ffmpeg` and streams raw frames to its stdin.
///
/// Output is H.264 in an MP4 container (`yuv420p`, or `yuv444p` when a dimension is odd) at the configured frame rate. The session
/// owns the output path exclusively for its lifetime; concurrent sessions on the same path are
/// not supported.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    frames_written: u64,
}

impl FfmpegSink {
    /// Create a sink. Nothing is spawned until [`FrameSink::begin`].
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            frames_written: 0,
        }
    }

    /// Output path of this session.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> StillreelResult<()> {
        if self.child.is_some() {
            return Err(StillreelError::encoder("ffmpeg session already started"));
        }
        let res = cfg.resolution;
        res.validate()?;
        check_out_dir(&self.opts.out_path)?;

        ensure_parent_dir(&self.opts.out_path)
            .map_err(|e| StillreelError::encoder(format!("{e:#}")))?;

        if !is_ffmpeg_on_path() {
            return Err(StillreelError::encoder(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // Input: raw opaque RGBA8 frames (alpha flattened in `append`).
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &res.to_string(),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);
        // Output: h264; yuv420p needs even dimensions.
        cmd.args([
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            output_pix_fmt(res),
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);
        tracing::debug!(?cmd, "spawning ffmpeg");

        let mut child = cmd.spawn().map_err(|e| {
            StillreelError::encoder(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StillreelError::encoder("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| StillreelError::encoder("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.scratch = vec![0u8; res.rgba_len()];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.frames_written = 0;
        Ok(())
    }

    fn append(&mut self, frame: &FrameRGBA) -> StillreelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StillreelError::encoder("ffmpeg sink not started"))?;
        check_frame(cfg, frame)?;

        flatten_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.opts.bg_rgba)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StillreelError::encoder("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            StillreelError::encoder(format!(
                "failed to write frame {} to ffmpeg stdin: {e}; '{}' may be truncated",
                self.frames_written + 1,
                self.opts.out_path.display()
            ))
        })?;
        self.frames_written += 1;
        Ok(())
    }

    fn finalize(&mut self) -> StillreelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| StillreelError::encoder("ffmpeg sink not started or already finalized"))?;

        let status = child.wait().map_err(|e| {
            StillreelError::encoder(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| StillreelError::encoder("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| StillreelError::encoder(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        self.cfg = None;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(StillreelError::encoder(format!(
                "ffmpeg exited with status {}: {}; '{}' may be truncated",
                status,
                stderr.trim(),
                self.opts.out_path.display()
            )));
        }
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            tracing::warn!(
                path = %self.opts.out_path.display(),
                "ffmpeg session dropped without finalize; output may be truncated"
            );
            let _ = child.wait();
        }
    }
}

/// Output pixel format for `res`: `yuv420p` when both dimensions are even, else `yuv444p`.
pub(crate) fn output_pix_fmt(res: Resolution) -> &'static str {
    if res.is_even() { "yuv420p" } else { "yuv444p" }
}

/// Fail with a `Config` error when the output's folder, or one of its ancestors, is a file.
pub(crate) fn check_out_dir(out_path: &Path) -> StillreelResult<()> {
    let Some(parent) = out_path.parent() else {
        return Ok(());
    };
    for dir in parent.ancestors() {
        if dir.as_os_str().is_empty() {
            break;
        }
        match std::fs::metadata(dir) {
            Ok(meta) if meta.is_dir() => return Ok(()),
            Ok(_) => {
                return Err(StillreelError::config(format!(
                    "output folder '{}' is not a directory",
                    dir.display()
                )));
            }
            Err(_) => continue,
        }
    }
    Ok(())
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` before `-i` sets the input framerate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn flatten_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    bg_rgba: [u8; 4],
) -> StillreelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StillreelError::encoder(
            "flatten_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let r = mul_div255(s[0] as u16, a) + mul_div255(bg_r, inv);
        let g = mul_div255(s[1] as u16, a) + mul_div255(bg_g, inv);
        let b = mul_div255(s[2] as u16, a) + mul_div255(bg_b, inv);

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StillreelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
