use std::path::PathBuf;

use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::error::{StillreelError, StillreelResult};
use crate::images::normalize::normalize_frame;
use crate::images::order::order_images;
use crate::images::resolve::resolve_images;
use crate::request::model::ConversionRequest;

/// Lifecycle of one conversion run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionState {
    /// Not started.
    Idle,
    /// Scanning the input folder.
    Resolving,
    /// Sorting the resolved images.
    Ordering,
    /// Decoding, resizing and appending frames.
    Encoding,
    /// Output sealed. Terminal.
    Finalized,
    /// Fatal failure. Terminal.
    Aborted,
}

/// An image left out of the video because it could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SkippedImage {
    /// Offending image.
    pub path: PathBuf,
    /// Decoder message.
    pub reason: String,
}

/// Outcome of a run that wrote at least one frame.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ConversionReport {
    /// Path of the sealed video.
    pub output_path: PathBuf,
    /// Frames in the video.
    pub frames_written: u64,
    /// Images skipped due to decode failure, in playback order.
    pub skipped: Vec<SkippedImage>,
}

impl ConversionReport {
    /// `true` when some images were skipped.
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Drives one conversion: resolve, order, then normalize and append each image, then finalize.
///
/// The run is synchronous and single-threaded. A `Converter` is single-use; its final
/// [`ConversionState`] stays observable after [`Converter::run`] returns.
#[derive(Debug)]
pub struct Converter {
    state: ConversionState,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    /// A converter in [`ConversionState::Idle`].
    pub fn new() -> Self {
        Self {
            state: ConversionState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> ConversionState {
        self.state
    }

    fn enter(&mut self, next: ConversionState) {
        tracing::debug!(from = ?self.state, to = ?next, "conversion state");
        self.state = next;
    }

    fn abort(&mut self, err: StillreelError) -> StillreelError {
        tracing::error!(state = ?self.state, error = %err, "conversion aborted");
        self.state = ConversionState::Aborted;
        err
    }

    /// Run `req` against `sink`.
    ///
    /// Per-image decode failures are collected in the report. Fatal failures return an error and
    /// leave the converter in [`ConversionState::Aborted`]. A run that writes zero frames returns
    /// [`StillreelError::AllFramesFailed`] after sealing the output.
    #[tracing::instrument(
        skip_all,
        fields(
            input = %req.input_folder.display(),
            output = %req.output_folder.display(),
            fps = req.fps,
            resolution = %req.resolution,
        )
    )]
    pub fn run(
        &mut self,
        req: &ConversionRequest,
        sink: &mut dyn FrameSink,
    ) -> StillreelResult<ConversionReport> {
        if self.state != ConversionState::Idle {
            return Err(StillreelError::config(format!(
                "converter already used (state {:?})",
                self.state
            )));
        }

        let fps = match req
            .validate()
            .and_then(|()| req.check_output_folder())
            .and_then(|()| req.frame_rate())
        {
            Ok(fps) => fps,
            Err(e) => return Err(self.abort(e)),
        };

        self.enter(ConversionState::Resolving);
        let images = match resolve_images(&req.input_folder) {
            Ok(images) if images.is_empty() => {
                return Err(self.abort(StillreelError::NoImages {
                    folder: req.input_folder.clone(),
                }));
            }
            Ok(images) => images,
            Err(e) => return Err(self.abort(e)),
        };
        let total = images.len();

        self.enter(ConversionState::Ordering);
        let images = order_images(images, req.sort_key, req.descending);

        self.enter(ConversionState::Encoding);
        let output_path = req.output_path();
        let cfg = SinkConfig {
            resolution: req.resolution,
            fps,
        };
        if let Err(e) = sink.begin(cfg) {
            return Err(self.abort(e));
        }

        let mut skipped = Vec::new();
        let mut written = 0u64;
        for image in &images {
            let appended = match normalize_frame(image, req.resolution) {
                Ok(frame) => sink.append(&frame),
                Err(e) if !e.is_fatal() => {
                    tracing::warn!(path = %image.path().display(), error = %e, "skipping image");
                    skipped.push(SkippedImage {
                        path: image.path().to_path_buf(),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => Err(e),
            };
            if let Err(e) = appended {
                let e = match sink.finalize() {
                    Ok(()) => e,
                    Err(fin) => {
                        tracing::warn!(error = %fin, "finalize after failed append");
                        e.with_finalize_failure(fin)
                    }
                };
                return Err(self.abort(e));
            }
            written += 1;
        }

        match sink.finalize() {
            Ok(()) => {}
            // An empty stream may refuse to seal; zero frames is reported below either way.
            Err(e) if written == 0 => {
                tracing::warn!(error = %e, "finalize of empty stream failed");
            }
            Err(e) => return Err(self.abort(e)),
        }
        self.enter(ConversionState::Finalized);

        if written == 0 {
            tracing::error!(skipped = skipped.len(), "every image failed to decode");
            return Err(StillreelError::AllFramesFailed {
                output_path,
                skipped: skipped.len(),
            });
        }

        tracing::info!(
            frames = written,
            skipped = skipped.len(),
            total,
            duration_secs = fps.frames_to_secs(written),
            "video written"
        );
        Ok(ConversionReport {
            output_path,
            frames_written: written,
            skipped,
        })
    }
}

/// Run `req` against any sink.
pub fn convert_with_sink(
    req: &ConversionRequest,
    sink: &mut dyn FrameSink,
) -> StillreelResult<ConversionReport> {
    Converter::new().run(req, sink)
}

/// Run `req`, writing `<output_folder>/output_video.mp4` through the system `ffmpeg`.
///
/// Running two conversions against the same output folder at the same time is not supported.
pub fn convert(req: &ConversionRequest) -> StillreelResult<ConversionReport> {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(req.output_path()));
    convert_with_sink(req, &mut sink)
}

#[cfg(test)]
#[path = "../../tests/unit/convert/pipeline.rs"]
mod tests;
