use std::path::PathBuf;

/// Convenience result type used across stillreel.
pub type StillreelResult<T> = Result<T, StillreelError>;

/// Top-level error taxonomy returned by the conversion core.
#[derive(thiserror::Error, Debug)]
pub enum StillreelError {
    /// Missing or invalid request parameters (folders, fps, resolution).
    #[error("configuration error: {0}")]
    Config(String),

    /// The input folder path is empty or cannot be listed.
    #[error("configuration error: input folder '{}' is unreadable: {reason}", path.display())]
    Folder {
        /// Folder that could not be read.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// The input folder holds no file with a supported image extension.
    #[error("no images: no supported images found in '{}'", folder.display())]
    NoImages {
        /// Folder that was scanned.
        folder: PathBuf,
    },

    /// One image could not be decoded. Recovered per item by the orchestrator.
    #[error("decode error: '{}': {reason}", path.display())]
    Decode {
        /// Offending image.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// The output stream could not be opened, written or sealed.
    #[error("encoder error: {0}")]
    Encoder(String),

    /// Every resolved image failed to decode; the output holds zero frames.
    #[error(
        "no frames written: all {skipped} image(s) failed to decode, '{}' is unusable",
        output_path.display()
    )]
    AllFramesFailed {
        /// Path of the (empty) output file.
        output_path: PathBuf,
        /// Number of images that were skipped.
        skipped: usize,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a [`StillreelError`], suitable for display or serialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid request or unreadable input folder.
    Config,
    /// Input folder has no supported images.
    NoImages,
    /// A single image failed to decode.
    Decode,
    /// Output stream failure.
    Encoder,
    /// Zero frames were written.
    AllFramesFailed,
    /// Anything else (IO with context, dependency errors).
    Other,
}

impl StillreelError {
    /// Build a [`StillreelError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StillreelError::Encoder`] value.
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder(msg.into())
    }

    /// Build a [`StillreelError::Decode`] value.
    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Attach the failure of sealing the output after this error already stopped encoding.
    ///
    /// Only [`StillreelError::Encoder`] absorbs the detail; other kinds are returned unchanged.
    pub fn with_finalize_failure(self, finalize: StillreelError) -> Self {
        let detail = match finalize {
            Self::Encoder(msg) => msg,
            other => other.to_string(),
        };
        match self {
            Self::Encoder(msg) => Self::Encoder(format!("{msg}; finalize also failed: {detail}")),
            other => other,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::Folder { .. } => ErrorKind::Config,
            Self::NoImages { .. } => ErrorKind::NoImages,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Encoder(_) => ErrorKind::Encoder,
            Self::AllFramesFailed { .. } => ErrorKind::AllFramesFailed,
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// `false` only for per-image decode failures, which never abort a run.
    pub fn is_fatal(&self) -> bool {
        self.kind() != ErrorKind::Decode
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
