use std::convert::Infallible;

use crate::image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// A resizable RGBA surface.
///
/// Rendering writes RGBA pixels into `frame_mut()`; presentation shows them somewhere. The
/// windowed loop presents through `pixels`, headless runs and tests keep the frame in memory.
pub trait Surface {
    type Error;

    fn size(&self) -> SurfaceSize;
    fn frame_mut(&mut self) -> &mut [u8];

    fn resize(&mut self, size: SurfaceSize) -> Result<(), Self::Error>;
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// In-memory surface for headless execution and tests.
#[derive(Debug, Clone)]
pub struct RgbaBufferSurface {
    image: RgbaImage,
    presented: u64,
}

impl RgbaBufferSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            image: RgbaImage::new(size.width, size.height),
            presented: 0,
        }
    }

    pub fn frame(&self) -> &[u8] {
        self.image.as_bytes()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Surface for RgbaBufferSurface {
    type Error = Infallible;

    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.image.width(), self.image.height())
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        self.image.as_bytes_mut()
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<(), Self::Error> {
        if size != self.size() {
            self.image = RgbaImage::new(size.width, size.height);
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.presented += 1;
        Ok(())
    }
}
