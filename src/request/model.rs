use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::encode::ffmpeg::check_out_dir;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{StillreelError, StillreelResult};

/// File name of the video written into the output folder.
pub const OUTPUT_FILE_NAME: &str = "output_video.mp4";

/// Key used by the ordering engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Full path string, byte-wise.
    #[default]
    Name,
    /// Filesystem creation time (see [`crate::ImageFile::created_at`]).
    Date,
    /// File size in bytes.
    Size,
    /// Pixel count read from the image header.
    Resolution,
}

/// One conversion job. Built once by the caller, validated once, then read-only for the run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConversionRequest {
    /// Folder scanned (non-recursively) for images.
    pub input_folder: PathBuf,
    /// Folder receiving [`OUTPUT_FILE_NAME`].
    pub output_folder: PathBuf,
    /// Integer frames per second.
    pub fps: u32,
    /// Every frame is stretched to exactly this size.
    pub resolution: Resolution,
    /// Ordering key.
    #[serde(default)]
    pub sort_key: SortKey,
    /// Reverse the key comparison.
    #[serde(default)]
    pub descending: bool,
}

impl ConversionRequest {
    /// Request with the original picker's defaults: 30 fps, 1920x1080, sorted by name ascending.
    pub fn new(input_folder: impl Into<PathBuf>, output_folder: impl Into<PathBuf>) -> Self {
        Self {
            input_folder: input_folder.into(),
            output_folder: output_folder.into(),
            fps: 30,
            resolution: Resolution::FULL_HD,
            sort_key: SortKey::Name,
            descending: false,
        }
    }

    /// Set the frame rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the output resolution.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the ordering key and direction.
    pub fn with_order(mut self, sort_key: SortKey, descending: bool) -> Self {
        self.sort_key = sort_key;
        self.descending = descending;
        self
    }

    /// Load a request from a JSON file.
    pub fn from_json_file(path: &Path) -> StillreelResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open request '{}'", path.display()))?;
        let req: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse request JSON '{}'", path.display()))?;
        Ok(req)
    }

    /// Check every parameter without touching the filesystem.
    pub fn validate(&self) -> StillreelResult<()> {
        if self.input_folder.as_os_str().is_empty() {
            return Err(StillreelError::config("input folder is not set"));
        }
        if self.output_folder.as_os_str().is_empty() {
            return Err(StillreelError::config("output folder is not set"));
        }
        if self.fps == 0 {
            return Err(StillreelError::config("fps must be > 0"));
        }
        self.resolution.validate()?;
        Ok(())
    }

    /// Reject an output folder that exists as, or sits below, a non-directory.
    ///
    /// A missing folder is fine; it is created when encoding starts.
    pub fn check_output_folder(&self) -> StillreelResult<()> {
        check_out_dir(&self.output_path())
    }

    /// Frame rate as [`Fps`].
    pub fn frame_rate(&self) -> StillreelResult<Fps> {
        Fps::integer(self.fps)
    }

    /// `<output_folder>/output_video.mp4`. Depends on nothing but `output_folder`.
    pub fn output_path(&self) -> PathBuf {
        self.output_folder.join(OUTPUT_FILE_NAME)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/model.rs"]
mod tests;
