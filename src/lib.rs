//! stillreel turns a folder of still images into a single MP4 video.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: list the supported images in the input folder ([`resolve_images`])
//! 2. **Order**: sort them by name, date, size or pixel count ([`order_images`])
//! 3. **Normalize**: decode each image and stretch it to the target size ([`normalize_frame`])
//! 4. **Encode**: append frames to a [`FrameSink`], by default the system `ffmpeg` ([`FfmpegSink`])
//!
//! [`convert`] composes the steps for one [`ConversionRequest`] and returns a
//! [`ConversionReport`]. Images that fail to decode are skipped and reported, every other
//! failure aborts the run with a [`StillreelError`].
//!
//! The core is synchronous and UI-agnostic: callers build a request, hand it over by reference,
//! and translate the result for display. It never calls back into the caller.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod convert;
mod foundation;
mod images;
mod request;

/// Encoding sinks.
pub mod encode;

pub use convert::pipeline::{
    ConversionReport, ConversionState, Converter, SkippedImage, convert, convert_with_sink,
};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Fps, Resolution};
pub use foundation::error::{ErrorKind, StillreelError, StillreelResult};
pub use images::normalize::{FrameRGBA, RESIZE_FILTER, normalize_frame};
pub use images::order::order_images;
pub use images::resolve::{
    ImageFile, SUPPORTED_EXTENSIONS, has_supported_extension, resolve_images,
};
pub use request::model::{ConversionRequest, OUTPUT_FILE_NAME, SortKey};
