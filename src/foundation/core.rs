use std::{fmt, str::FromStr};

use crate::foundation::error::{StillreelError, StillreelResult};

/// Output frame rate as a rational `num/den`. Requests only produce integer rates (`den == 1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Frames per `den` seconds.
    pub num: u32,
    /// Must be > 0.
    pub den: u32,
}

impl Fps {
    /// Frame rates offered by the original picker.
    pub const PRESETS: [u32; 4] = [5, 15, 30, 60];

    /// Build a validated rational frame rate.
    pub fn new(num: u32, den: u32) -> StillreelResult<Self> {
        if den == 0 {
            return Err(StillreelError::config("fps denominator must be > 0"));
        }
        if num == 0 {
            return Err(StillreelError::config("fps must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Build an integer frame rate.
    pub fn integer(fps: u32) -> StillreelResult<Self> {
        Self::new(fps, 1)
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration covered by `frames` frames.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// Target frame size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// `1080x720`, the first preset of the original picker.
    pub const HD_720_WIDE: Self = Self::new(1080, 720);
    /// `1920x1080`.
    pub const FULL_HD: Self = Self::new(1920, 1080);

    /// Build a resolution without validation; see [`Resolution::validate`].
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest accepted width or height.
    pub const MAX_DIMENSION: u32 = 16_384;

    /// Both dimensions must be positive and at most [`Resolution::MAX_DIMENSION`].
    pub fn validate(self) -> StillreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StillreelError::config(format!(
                "resolution {self} must have non-zero width and height"
            )));
        }
        if self.width > Self::MAX_DIMENSION || self.height > Self::MAX_DIMENSION {
            return Err(StillreelError::config(format!(
                "resolution {self} exceeds the maximum of {max}x{max}",
                max = Self::MAX_DIMENSION
            )));
        }
        Ok(())
    }

    /// `true` when both dimensions are even (needed for 4:2:0 chroma subsampling).
    pub fn is_even(self) -> bool {
        self.width.is_multiple_of(2) && self.height.is_multiple_of(2)
    }

    /// Total pixel count.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Byte length of a tightly packed RGBA8 frame at this size.
    ///
    /// Saturates instead of overflowing; validated resolutions stay far below the limit.
    pub fn rgba_len(self) -> usize {
        usize::try_from(self.area().saturating_mul(4)).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = StillreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| StillreelError::config(format!("resolution '{s}' is not WIDTHxHEIGHT")))?;
        let parse = |v: &str, what: &str| {
            v.trim().parse::<u32>().map_err(|e| {
                StillreelError::config(format!("resolution '{s}' has invalid {what}: {e}"))
            })
        };
        let res = Self::new(parse(w, "width")?, parse(h, "height")?);
        res.validate()?;
        Ok(res)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
