use image::imageops::FilterType;

use crate::foundation::core::Resolution;
use crate::foundation::error::{StillreelError, StillreelResult};
use crate::images::resolve::ImageFile;

/// Resampling filter used for every frame of a run (bilinear).
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// One decoded frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight-alpha RGBA8, row-major, tightly packed.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Frame size.
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

/// Decode `image` and stretch it to exactly `target`, ignoring the source aspect ratio.
///
/// The content format is sniffed, so a mislabeled extension still decodes. Any failure is a
/// [`StillreelError::Decode`] for this image only.
pub fn normalize_frame(image: &ImageFile, target: Resolution) -> StillreelResult<FrameRGBA> {
    target.validate()?;
    let path = image.path();

    let decoded = image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| StillreelError::decode(path, e))?
        .decode()
        .map_err(|e| StillreelError::decode(path, e))?;

    let rgba = decoded.to_rgba8();
    let resized = if rgba.dimensions() == (target.width, target.height) {
        rgba
    } else {
        image::imageops::resize(&rgba, target.width, target.height, RESIZE_FILTER)
    };

    Ok(FrameRGBA {
        width: resized.width(),
        height: resized.height(),
        data: resized.into_raw(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/images/normalize.rs"]
mod tests;
