use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use anyhow::Context as _;

use crate::foundation::core::Resolution;
use crate::foundation::error::{StillreelError, StillreelResult};

/// Lowercase extensions accepted by the resolver.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "webp"];

/// A still image discovered on disk. Attributes are read on demand.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    /// Wrap a path. No filesystem access happens here.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the image.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes.
    pub fn byte_size(&self) -> StillreelResult<u64> {
        let meta = std::fs::metadata(&self.path)
            .with_context(|| format!("stat '{}'", self.path.display()))?;
        Ok(meta.len())
    }

    /// Creation time as reported by the platform.
    ///
    /// Where the filesystem has no birth time this falls back to the Unix `ctime`
    /// (last inode change), then to the modification time. Ordering by date is therefore
    /// only as portable as the underlying metadata.
    pub fn created_at(&self) -> StillreelResult<SystemTime> {
        let meta = std::fs::metadata(&self.path)
            .with_context(|| format!("stat '{}'", self.path.display()))?;
        if let Ok(t) = meta.created() {
            return Ok(t);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt as _;
            let secs = meta.ctime();
            let nanos = meta.ctime_nsec();
            if secs >= 0 && (0..1_000_000_000).contains(&nanos) {
                return Ok(SystemTime::UNIX_EPOCH
                    + std::time::Duration::new(secs as u64, nanos as u32));
            }
        }
        let t = meta
            .modified()
            .with_context(|| format!("read timestamps of '{}'", self.path.display()))?;
        Ok(t)
    }

    /// Pixel dimensions read from the image header, without decoding pixel data.
    pub fn pixel_dimensions(&self) -> StillreelResult<Resolution> {
        let (width, height) = image::ImageReader::open(&self.path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| StillreelError::decode(&self.path, e))?
            .into_dimensions()
            .map_err(|e| StillreelError::decode(&self.path, e))?;
        Ok(Resolution::new(width, height))
    }
}

/// `true` when the extension of `name` is one of [`SUPPORTED_EXTENSIONS`], ignoring ASCII case.
///
/// Only the extension has to be UTF-8; the rest of the name may be arbitrary bytes.
pub fn has_supported_extension(name: impl AsRef<Path>) -> bool {
    name.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|ok| ext.eq_ignore_ascii_case(ok))
        })
}

/// List the supported images directly inside `folder` (non-recursive).
///
/// Only regular files (after following symlinks) are returned, sorted by file name so the
/// result does not depend on directory iteration order. An empty result is not an error here.
#[tracing::instrument(skip_all, fields(folder = %folder.display()))]
pub fn resolve_images(folder: &Path) -> StillreelResult<Vec<ImageFile>> {
    if folder.as_os_str().is_empty() {
        return Err(StillreelError::Folder {
            path: folder.to_path_buf(),
            reason: "path is empty".to_string(),
        });
    }
    let folder_err = |e: std::io::Error| StillreelError::Folder {
        path: folder.to_path_buf(),
        reason: e.to_string(),
    };

    let mut found = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(folder_err)? {
        let entry = entry.map_err(folder_err)?;
        let name = entry.file_name();
        if !has_supported_extension(&name) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        found.push((name, path));
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));

    tracing::debug!(count = found.len(), "resolved images");
    Ok(found.into_iter().map(|(_, p)| ImageFile::new(p)).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/images/resolve.rs"]
mod tests;
