use crate::domain::entity::Rgb;
use crate::domain::error::LedError;
use crate::domain::ports::LedStrip;

/// Index of the indicator pixel
pub const PIXEL: usize = 0;

/// Single-pixel status indicator on top of an LED strip.
///
/// Owns the only handle to the strip. Every color change is pushed to the
/// hardware immediately.
pub struct LedIndicator<S> {
    strip: S,
    color: Option<Rgb>,
}

impl<S: LedStrip> LedIndicator<S> {
    pub const fn new(strip: S) -> Self {
        Self { strip, color: None }
    }

    pub fn set_color(&mut self, color: Rgb) -> Result<(), LedError> {
        self.strip.set_pixel(PIXEL, color)?;
        self.strip.refresh()?;
        self.color = Some(color);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), LedError> {
        self.strip.clear()?;
        self.color = None;
        Ok(())
    }

    /// Last color pushed to the strip, `None` after a clear
    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }
}
